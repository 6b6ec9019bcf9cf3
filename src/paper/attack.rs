//! Per-attack-type detection metrics (literal figures, not computed).

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackRow {
    pub label: &'static str,
    pub detection_rate: f64,
    pub false_positive_rate: f64,
    pub f1: f64,
}

const fn row(label: &'static str, dr: f64, fpr: f64, f1: f64) -> AttackRow {
    AttackRow {
        label,
        detection_rate: dr,
        false_positive_rate: fpr,
        f1,
    }
}

pub const ATTACK_TABLE: [AttackRow; 6] = [
    row("Type 1", 97.8, 1.5, 98.1),
    row("Type 2", 91.3, 3.8, 93.4),
    row("Type 4", 99.1, 0.9, 99.2),
    row("Type 8", 88.6, 5.1, 91.3),
    row("Type 16", 93.5, 2.7, 95.1),
    row("Avg", 94.1, 2.8, 95.4),
];

pub const BAR_WIDTH: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackMetric {
    DetectionRate,
    F1,
    FalsePositiveRate,
}

impl AttackMetric {
    /// Bar order inside each category group.
    pub const ORDER: [AttackMetric; 3] = [Self::DetectionRate, Self::F1, Self::FalsePositiveRate];

    pub fn legend(self) -> &'static str {
        match self {
            Self::DetectionRate => "Detection rate (DR)",
            Self::F1 => "F1 score",
            Self::FalsePositiveRate => "False-positive rate (FPR)",
        }
    }

    pub fn value(self, row: &AttackRow) -> f64 {
        match self {
            Self::DetectionRate => row.detection_rate,
            Self::F1 => row.f1,
            Self::FalsePositiveRate => row.false_positive_rate,
        }
    }

    /// Horizontal offset of this metric's bar from the group centre.
    pub fn offset(self) -> f64 {
        match self {
            Self::DetectionRate => -BAR_WIDTH,
            Self::F1 => 0.0,
            Self::FalsePositiveRate => BAR_WIDTH,
        }
    }
}

/// `(x0, x1, height)` for one bar of category `index`.
pub fn bar_span(index: usize, metric: AttackMetric, row: &AttackRow) -> (f64, f64, f64) {
    let centre = index as f64 + metric.offset();
    let half = BAR_WIDTH / 2.0;
    (centre - half, centre + half, metric.value(row))
}
