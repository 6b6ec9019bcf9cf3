// Entry point: renders the paper figures and prints their summaries.
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use safl_figures::cli::{Args, Command};
use safl_figures::paper::{run_epoch, run_table47};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = args.resolve_config();
    info!(seed = cfg.general.seed, out_dir = %cfg.general.out_dir.display(), "rendering figures");

    let result = match args.command {
        Command::Epoch => run_epoch(&cfg),
        Command::Table47 => run_table47(&cfg),
        Command::All => run_epoch(&cfg).and_then(|a| Ok(a + &run_table47(&cfg)?)),
    };

    match result {
        Ok(summary) => print!("{summary}"),
        Err(err) => {
            eprintln!("figure generation failed: {err}");
            std::process::exit(1);
        }
    }
}
