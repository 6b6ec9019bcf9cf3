//! Figure pipelines: synthesize (or load) the data, render it, summarize it.

pub mod attack;
pub mod epoch;
pub mod render;
pub mod report;
pub mod stats;
pub mod synth;

use std::error::Error;
use std::fs::{create_dir_all, write};

use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

use crate::config::FigureConfig;
use attack::ATTACK_TABLE;
use epoch::EpochFigure;
use render::{AttackChart, EpochChart, Formats, export};

fn formats(cfg: &FigureConfig) -> Formats {
    Formats {
        png: cfg.render.png,
        svg: cfg.render.svg,
    }
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Accuracy and trusted-ratio curves. Returns the console summary.
pub fn run_epoch(cfg: &FigureConfig) -> Result<String, Box<dyn Error>> {
    let mut rng = seeded_rng(cfg.general.seed);
    let figure = EpochFigure::generate(&cfg.epoch, &mut rng);
    let out_dir = &cfg.general.out_dir;

    let chart = EpochChart {
        figure: &figure,
        stride: cfg.epoch.plot_stride,
        size: cfg.render.epoch_size,
    };
    export(&chart, out_dir, formats(cfg))?;

    if cfg.epoch.write_csv {
        create_dir_all(out_dir)?;
        let csv_path = out_dir.join(format!("{}.csv", render::EPOCH_STEM));
        write(&csv_path, figure.to_csv())?;
        info!(path = %csv_path.display(), "wrote series csv");
    }

    Ok(report::epoch_report(&figure))
}

/// Grouped bar chart of the attack-type table. Returns the console summary.
pub fn run_table47(cfg: &FigureConfig) -> Result<String, Box<dyn Error>> {
    let chart = AttackChart {
        rows: &ATTACK_TABLE,
        size: cfg.render.attack_size,
    };
    export(&chart, &cfg.general.out_dir, formats(cfg))?;
    Ok(report::attack_report(&ATTACK_TABLE))
}
