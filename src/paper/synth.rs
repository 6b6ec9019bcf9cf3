//! Synthetic accuracy and trusted-node ratio series.
//!
//! Every generator takes the random source explicitly so that a seeded
//! `StdRng` reproduces a figure bit for bit.

use rand::Rng;
use rand_distr::StandardNormal;

/// Last round index; series carry `ROUNDS + 1` values.
pub const ROUNDS: usize = 100;
pub const SERIES_LEN: usize = ROUNDS + 1;

pub const ACCURACY_MIN: f64 = 50.0;
pub const ACCURACY_MAX: f64 = 98.0;

pub const TRUST_START: f64 = 100.0;
pub const TRUST_FLOOR: f64 = 82.0;
pub const TRUST_JITTER: f64 = 0.3;

pub fn round_index() -> Vec<usize> {
    (0..=ROUNDS).collect()
}

/// Closed-form base curve: exponential saturation plus an optional sine wobble.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvergenceTrend {
    pub floor: f64,
    pub gain: f64,
    pub tau: f64,
    pub wobble_amp: f64,
    pub wobble_period: f64,
}

impl ConvergenceTrend {
    pub fn value(&self, round: usize) -> f64 {
        let i = round as f64;
        let saturation = self.floor + self.gain * (1.0 - (-i / self.tau).exp());
        if self.wobble_amp == 0.0 {
            return saturation;
        }
        saturation + self.wobble_amp * (i / self.wobble_period).sin()
    }

    pub fn series(&self, len: usize) -> Vec<f64> {
        (0..len).map(|i| self.value(i)).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccuracyProfile {
    pub name: &'static str,
    pub trend: ConvergenceTrend,
    pub noise_level: f64,
    pub fluctuation_freq: f64,
}

impl AccuracyProfile {
    pub fn safl_vr() -> Self {
        Self {
            name: "SAFL-VR",
            trend: ConvergenceTrend {
                floor: 60.0,
                gain: 35.0,
                tau: 20.0,
                wobble_amp: 0.0,
                wobble_period: 1.0,
            },
            noise_level: 1.0,
            fluctuation_freq: 0.15,
        }
    }

    pub fn fedprox() -> Self {
        Self {
            name: "FedProx",
            trend: ConvergenceTrend {
                floor: 55.0,
                gain: 25.0,
                tau: 25.0,
                wobble_amp: 5.0,
                wobble_period: 15.0,
            },
            noise_level: 2.0,
            fluctuation_freq: 0.25,
        }
    }

    pub fn fedavg() -> Self {
        Self {
            name: "FedAvg",
            trend: ConvergenceTrend {
                floor: 50.0,
                gain: 20.0,
                tau: 30.0,
                wobble_amp: 8.0,
                wobble_period: 10.0,
            },
            noise_level: 3.0,
            fluctuation_freq: 0.3,
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, len: usize, rng: &mut R) -> Vec<f64> {
        let base = self.trend.series(len);
        generate_accuracy(&base, self.noise_level, self.fluctuation_freq, rng)
    }
}

fn gaussian<R: Rng + ?Sized>(rng: &mut R, sigma: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    z * sigma
}

/// Adds Gaussian noise and a sine perturbation to `base`, clamped to
/// `[ACCURACY_MIN, ACCURACY_MAX]`. One normal draw per element, in order.
pub fn generate_accuracy<R: Rng + ?Sized>(
    base: &[f64],
    noise_level: f64,
    fluctuation_freq: f64,
    rng: &mut R,
) -> Vec<f64> {
    base.iter()
        .enumerate()
        .map(|(i, &b)| {
            let noise = gaussian(rng, noise_level);
            let fluctuation = (i as f64 * fluctuation_freq).sin() * (noise_level / 2.0);
            (b + noise + fluctuation).clamp(ACCURACY_MIN, ACCURACY_MAX)
        })
        .collect()
}

/// Uniform decrement bounds for one round of trust decay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrustDecayPhase {
    Early,
    Middle,
    Late,
}

impl TrustDecayPhase {
    pub fn bounds(self) -> (f64, f64) {
        match self {
            Self::Early => (0.5, 1.5),
            Self::Middle => (0.1, 0.5),
            Self::Late => (0.0, 0.2),
        }
    }
}

pub fn decay_phase(round: usize) -> TrustDecayPhase {
    if round < 20 {
        TrustDecayPhase::Early
    } else if round < 50 {
        TrustDecayPhase::Middle
    } else {
        TrustDecayPhase::Late
    }
}

/// Decay walk from 100 floored at 82, before jitter.
pub fn trusted_ratio_decay<R: Rng + ?Sized>(rounds: usize, rng: &mut R) -> Vec<f64> {
    let mut trusted = Vec::with_capacity(rounds + 1);
    trusted.push(TRUST_START);
    let mut current = TRUST_START;
    for round in 1..=rounds {
        let (lo, hi) = decay_phase(round).bounds();
        let decay = rng.random_range(lo..hi);
        current = (current - decay).max(TRUST_FLOOR);
        trusted.push(current);
    }
    trusted
}

/// Decay walk followed by independent jitter on every round.
///
/// The jitter pass runs after the floor is applied, so a value may land
/// slightly below `TRUST_FLOOR`.
pub fn generate_trusted_ratio<R: Rng + ?Sized>(rounds: usize, rng: &mut R) -> Vec<f64> {
    let mut trusted = trusted_ratio_decay(rounds, rng);
    for v in trusted.iter_mut() {
        *v += gaussian(rng, TRUST_JITTER);
    }
    trusted
}

/// FedAvg keeps every node.
pub fn no_filter_trusted(len: usize) -> Vec<f64> {
    vec![TRUST_START; len]
}
