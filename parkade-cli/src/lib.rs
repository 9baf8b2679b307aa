//! parkade-cli: interactive and batch front ends for the parkade engine.

use std::io::Write;
use std::path::PathBuf;

use parkade::{PARKADE_VERSION, ParkingService, execute};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const USAGE: &str = "\
Usage: parkade [<commands_file>]

Without a file, commands are read from standard input until 'exit'.

Commands:
  create_parking_lot <capacity>
  park <registration_number> <color>
  leave <slot_number> [<hours>]
  status
  registration_numbers_for_cars_with_color <color>
  slot_numbers_for_cars_with_color <color>
  slot_number_for_registration_number <registration_number>";

/// First line printed on stdout in both modes.
pub fn banner() -> String {
    format!("parkade {PARKADE_VERSION}")
}

/// Initialize tracing with PARKADE_LOG and LOG_FORMAT support.
///
/// Logs go to stderr; stdout carries command output only.
pub fn init_tracing() {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let base_level = match std::env::var("PARKADE_LOG").as_deref() {
            Ok("debug") => "debug",
            Ok("info") => "info",
            Ok("warn") | Ok("warning") => "warn",
            Ok("error") => "error",
            _ => "warn",
        };

        EnvFilter::new(format!("parkade={base_level},parkade_cli={base_level}"))
    };

    let use_json = std::env::var("LOG_FORMAT").as_deref() == Ok("json");

    if use_json {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr));
        let _ = subscriber.try_init();
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr));
        let _ = subscriber.try_init();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    Batch(PathBuf),
}

/// Parse `argv`. `Err` carries the message to print above the usage text
/// (empty for `--help`).
pub fn parse_args(args: &[String]) -> Result<Mode, String> {
    let mut file: Option<PathBuf> = None;

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return Err(String::new()),
            flag if flag.starts_with('-') => return Err(format!("unknown flag: {flag}")),
            path => {
                if file.is_some() {
                    return Err(format!("unexpected argument: {path}"));
                }
                file = Some(PathBuf::from(path));
            }
        }
    }

    Ok(file.map_or(Mode::Interactive, Mode::Batch))
}

const INVALID_UTF8: &str = "Input line is not valid UTF-8";

/// Read one raw line. `Ok(None)` at end of input; `Ok(Some(None))` for a
/// line that is not valid UTF-8, so callers can skip it and keep reading.
async fn read_line<R>(
    input: &mut R,
    buf: &mut Vec<u8>,
) -> std::io::Result<Option<Option<String>>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if input.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8(std::mem::take(buf)).ok()))
}

/// Lines read and commands rejected during a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub lines: usize,
    pub errors: usize,
}

/// Execute every line of `input`. A failing line is reported with its line
/// number and processing continues with the next one.
pub async fn run_batch<R, W>(
    service: &ParkingService,
    mut input: R,
    out: &mut W,
) -> anyhow::Result<BatchSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut summary = BatchSummary::default();
    let mut buf = Vec::new();

    while let Some(line) = read_line(&mut input, &mut buf).await? {
        summary.lines += 1;
        let Some(line) = line else {
            summary.errors += 1;
            debug!(line = summary.lines, "Skipping undecodable line");
            writeln!(out, "Error at line {}: {INVALID_UTF8}", summary.lines)?;
            continue;
        };
        match execute(service, line.trim()).await {
            Ok(Some(outcome)) => writeln!(out, "{outcome}")?,
            Ok(None) => {}
            Err(e) => {
                summary.errors += 1;
                debug!(line = summary.lines, error = %e, "Command failed");
                writeln!(out, "Error at line {}: {e}", summary.lines)?;
            }
        }
    }

    Ok(summary)
}

/// Prompt loop until `exit` (any case) or end of input.
pub async fn run_interactive<R, W>(
    service: &ParkingService,
    mut input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Please Enter 'exit' to end Execution")?;
    let mut buf = Vec::new();

    loop {
        write!(out, "Input: ")?;
        out.flush()?;

        let Some(line) = read_line(&mut input, &mut buf).await? else {
            break;
        };
        let Some(line) = line else {
            writeln!(out, "{INVALID_UTF8}")?;
            continue;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") {
            break;
        }

        match execute(service, line).await {
            Ok(Some(outcome)) => writeln!(out, "{outcome}")?,
            Ok(None) => {}
            Err(e) => writeln!(out, "{e}")?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("parkade")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn banner_names_the_version() {
        let banner = banner();
        assert_eq!(banner, format!("parkade {PARKADE_VERSION}"));
        assert!(!banner.contains('\n'));
    }

    #[test]
    fn no_arguments_is_interactive() {
        assert_eq!(parse_args(&args(&[])), Ok(Mode::Interactive));
    }

    #[test]
    fn one_argument_is_batch() {
        assert_eq!(
            parse_args(&args(&["commands.txt"])),
            Ok(Mode::Batch(PathBuf::from("commands.txt")))
        );
    }

    #[test]
    fn extra_arguments_and_flags_are_rejected() {
        assert_eq!(
            parse_args(&args(&["a.txt", "b.txt"])),
            Err("unexpected argument: b.txt".to_string())
        );
        assert_eq!(
            parse_args(&args(&["--verbose"])),
            Err("unknown flag: --verbose".to_string())
        );
        assert_eq!(parse_args(&args(&["-h"])), Err(String::new()));
    }

    #[tokio::test]
    async fn batch_reports_line_numbers_and_continues() {
        let service = ParkingService::new();
        let input = "\
create_parking_lot 2
park KA-01 White
park KA-02
leave one
unknown_verb 7

park KA-02 Black
park KA-03 Red
leave 1 1
park KA-03 Red
slot_numbers_for_cars_with_color red
";
        let mut out = Vec::new();
        let summary = run_batch(&service, input.as_bytes(), &mut out)
            .await
            .unwrap();

        assert_eq!(summary, BatchSummary { lines: 11, errors: 3 });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\
Created parking lot with 2 slots
Allocated slot number: 1
Error at line 3: Missing argument color for 'park'
Error at line 4: Invalid value for slot_number
Allocated slot number: 2
Error at line 8: Sorry, parking lot is full
Slot number 1 is free with charge 10
Allocated slot number: 1
1
"
        );
    }

    #[tokio::test]
    async fn batch_reads_from_file() {
        use std::io::Write as _;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "create_parking_lot 1").unwrap();
        writeln!(file, "park KA-01 White").unwrap();
        writeln!(file, "status").unwrap();

        let reader = tokio::io::BufReader::new(tokio::fs::File::open(file.path()).await.unwrap());
        let service = ParkingService::new();
        let mut out = Vec::new();
        let summary = run_batch(&service, reader, &mut out).await.unwrap();

        assert_eq!(summary.errors, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Created parking lot with 1 slots\nAllocated slot number: 1\n\
             Slot No.\tRegistration No.\tColor\n1\t\tKA-01\t\tWhite\n"
        );
    }

    #[tokio::test]
    async fn interactive_stops_at_exit() {
        let service = ParkingService::new();
        let input = "create_parking_lot 1\npark KA-01 White\nleave 3\nEXIT\npark KA-02 Red\n";
        let mut out = Vec::new();
        run_interactive(&service, input.as_bytes(), &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Created parking lot with 1 slots"));
        assert!(text.contains("Allocated slot number: 1"));
        assert!(text.contains("Invalid slot number 3"));
        assert!(!text.contains("KA-02"));
        assert_eq!(service.available(service.default_level()).await, Ok(0));
    }

    #[tokio::test]
    async fn batch_skips_undecodable_line_and_continues() {
        let service = ParkingService::new();
        let mut input = b"create_parking_lot 2\npark KA-01 Wh".to_vec();
        input.extend_from_slice(&[0xff, 0xfe]);
        input.extend_from_slice(b"ite\npark KA-02 Black\nstatus\n");

        let mut out = Vec::new();
        let summary = run_batch(&service, input.as_slice(), &mut out)
            .await
            .unwrap();

        assert_eq!(summary, BatchSummary { lines: 4, errors: 1 });
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\
Created parking lot with 2 slots
Error at line 2: Input line is not valid UTF-8
Allocated slot number: 1
Slot No.\tRegistration No.\tColor
1\t\tKA-02\t\tBlack
"
        );
        assert_eq!(service.available(service.default_level()).await, Ok(1));
    }

    #[tokio::test]
    async fn interactive_skips_undecodable_line() {
        let service = ParkingService::new();
        let mut input = b"create_parking_lot 1\npark \xff\n".to_vec();
        input.extend_from_slice(b"park KA-01 White\nexit\n");

        let mut out = Vec::new();
        run_interactive(&service, input.as_slice(), &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Input line is not valid UTF-8"));
        assert!(text.contains("Allocated slot number: 1"));
        assert_eq!(service.available(service.default_level()).await, Ok(0));
    }

    #[tokio::test]
    async fn interactive_ends_at_eof() {
        let service = ParkingService::new();
        let mut out = Vec::new();
        run_interactive(&service, "status\n".as_bytes(), &mut out)
            .await
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("parking lot is not created"));
    }
}
