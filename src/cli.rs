use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::FigureConfig;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config TOML (written with commented defaults if missing)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// RNG seed for the synthetic series (overrides config)
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Directory for figures and CSV (overrides config)
    #[arg(long, global = true)]
    pub out_dir: Option<PathBuf>,

    /// Skip the PNG output
    #[arg(long, global = true, default_value_t = false)]
    pub no_png: bool,

    /// Skip the SVG output
    #[arg(long, global = true, default_value_t = false)]
    pub no_svg: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Accuracy and trusted-node ratio over training rounds
    Epoch,
    /// Detection performance per attack type
    Table47,
    /// Both figures
    All,
}

impl Args {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> FigureConfig {
        let mut cfg = self
            .config
            .as_deref()
            .map(FigureConfig::load_or_default)
            .unwrap_or_default();
        if let Some(seed) = self.seed {
            cfg.general.seed = seed;
        }
        if let Some(dir) = &self.out_dir {
            cfg.general.out_dir = dir.clone();
        }
        if self.no_png {
            cfg.render.png = false;
        }
        if self.no_svg {
            cfg.render.svg = false;
        }
        cfg
    }
}
