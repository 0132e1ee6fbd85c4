// Entry point: renders every configured chart from the simulator's CSV output.
use std::error::Error;
use std::io::IsTerminal;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use memsat::chart::ChartComposer;
use memsat::chart::bitmap::BitmapSurface;
use memsat::cli::Args;
use memsat::config::AppConfig;

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut config = AppConfig::load_or_default(&args.config);
    args.apply(&mut config);

    let composer = ChartComposer::new(&config);
    let mut surface = BitmapSurface::new();
    let saved = composer.compose_all(
        &mut surface,
        &config.data.distributions,
        &config.chart.kinds,
    )?;
    info!("{} chart(s) written to {}", saved.len(), config.chart.out_dir.display());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .without_time()
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        error!("memsat failed: {err}");
        std::process::exit(1);
    }
}
