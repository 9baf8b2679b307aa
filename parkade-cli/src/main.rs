use std::io::Write;
use std::process;

use parkade::{PARKADE_VERSION, ParkadeConfig, ParkingService};
use parkade_cli::{Mode, USAGE, banner, init_tracing, parse_args, run_batch, run_interactive};
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mode = match parse_args(&args) {
        Ok(mode) => mode,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("error: {msg}");
                eprintln!();
            }
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };

    init_tracing();
    info!("parkade {PARKADE_VERSION}");

    let service = ParkingService::new().with_config(ParkadeConfig::from_env());

    if let Err(e) = run(mode, &service).await {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

async fn run(mode: Mode, service: &ParkingService) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", banner())?;

    match mode {
        Mode::Interactive => {
            println!("{USAGE}");
            println!();
            let stdin = BufReader::new(tokio::io::stdin());
            run_interactive(service, stdin, &mut stdout).await?;
        }
        Mode::Batch(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .map_err(|e| anyhow::anyhow!("failed to open {}: {e}", path.display()))?;
            let summary = run_batch(service, BufReader::new(file), &mut stdout).await?;
            info!(
                lines = summary.lines,
                errors = summary.errors,
                "Batch complete"
            );
        }
    }

    service.teardown().await;
    Ok(())
}
