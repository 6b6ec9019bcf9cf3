//! Data for the two-panel accuracy / trusted-ratio figure.

use rand::Rng;
use tracing::{debug, warn};

use crate::config::EpochConfig;
use crate::paper::stats::{Convergence, WindowStats, convergence_round, trailing_window};
use crate::paper::synth::{
    AccuracyProfile, ROUNDS, SERIES_LEN, generate_trusted_ratio, no_filter_trusted, round_index,
};

#[derive(Clone, Debug)]
pub struct AccuracyTrack {
    pub name: &'static str,
    pub values: Vec<f64>,
    pub tail: WindowStats,
}

impl AccuracyTrack {
    pub fn final_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(f64::NAN)
    }
}

#[derive(Clone, Debug)]
pub struct EpochFigure {
    pub rounds: Vec<usize>,
    /// SAFL-VR, FedProx, FedAvg.
    pub accuracy: [AccuracyTrack; 3],
    pub safl_trusted: Vec<f64>,
    pub fedavg_trusted: Vec<f64>,
    pub threshold: f64,
    pub safl_convergence: Convergence,
    pub fedavg_convergence: Convergence,
}

impl EpochFigure {
    pub fn generate<R: Rng + ?Sized>(cfg: &EpochConfig, rng: &mut R) -> Self {
        let profiles = [
            AccuracyProfile::safl_vr(),
            AccuracyProfile::fedprox(),
            AccuracyProfile::fedavg(),
        ];
        let accuracy = profiles.map(|p| {
            let values = p.generate(SERIES_LEN, rng);
            let tail = trailing_window(&values, cfg.tail_start_round).unwrap_or_else(|| {
                warn!(
                    series = p.name,
                    tail_start_round = cfg.tail_start_round,
                    len = values.len(),
                    "trailing window is empty; reporting zero statistics"
                );
                WindowStats::default()
            });
            AccuracyTrack {
                name: p.name,
                values,
                tail,
            }
        });
        let safl_trusted = generate_trusted_ratio(ROUNDS, rng);
        let fedavg_trusted = no_filter_trusted(SERIES_LEN);

        let threshold = cfg.convergence_threshold;
        let safl_convergence = convergence_round(&accuracy[0].values, threshold, ROUNDS);
        let fedavg_convergence = convergence_round(&accuracy[2].values, threshold, ROUNDS);
        debug!(
            safl = safl_convergence.round,
            fedavg = fedavg_convergence.round,
            "convergence rounds"
        );

        Self {
            rounds: round_index(),
            accuracy,
            safl_trusted,
            fedavg_trusted,
            threshold,
            safl_convergence,
            fedavg_convergence,
        }
    }

    pub fn final_trusted(&self) -> f64 {
        self.safl_trusted.last().copied().unwrap_or(f64::NAN)
    }

    pub fn filtered_share(&self) -> f64 {
        100.0 - self.final_trusted()
    }

    /// `(round, value)` points for every `stride`-th round.
    pub fn sampled(&self, series: &[f64], stride: usize) -> Vec<(f64, f64)> {
        self.rounds
            .iter()
            .zip(series)
            .step_by(stride.max(1))
            .map(|(&r, &v)| (r as f64, v))
            .collect()
    }

    pub fn to_csv(&self) -> String {
        let mut csv = String::from("round");
        for track in &self.accuracy {
            csv.push_str(&format!(",{}_accuracy", track.name));
        }
        csv.push_str(",SAFL-VR_trusted,FedAvg_trusted\n");
        for (i, round) in self.rounds.iter().enumerate() {
            csv.push_str(&format!("{round}"));
            for track in &self.accuracy {
                csv.push_str(&format!(",{:.6}", track.values[i]));
            }
            csv.push_str(&format!(
                ",{:.6},{:.6}\n",
                self.safl_trusted[i], self.fedavg_trusted[i]
            ));
        }
        csv
    }
}
