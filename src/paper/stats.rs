/// Mean and population standard deviation of a window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub std: f64,
}

impl WindowStats {
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        Some(Self {
            mean,
            std: var.sqrt(),
        })
    }
}

/// Statistics over `series[start_round..]`.
pub fn trailing_window(series: &[f64], start_round: usize) -> Option<WindowStats> {
    series.get(start_round..).and_then(WindowStats::of)
}

pub fn first_crossing(series: &[f64], threshold: f64) -> Option<usize> {
    series.iter().position(|&v| v >= threshold)
}

/// Round at which a series first reaches the threshold, or `sentinel`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Convergence {
    pub round: usize,
    pub sentinel: usize,
}

impl Convergence {
    pub fn reached(&self) -> bool {
        self.round < self.sentinel
    }
}

pub fn convergence_round(series: &[f64], threshold: f64, sentinel: usize) -> Convergence {
    Convergence {
        round: first_crossing(series, threshold).unwrap_or(sentinel),
        sentinel,
    }
}
