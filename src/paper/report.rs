//! Plain-text summaries printed after the figures are written.

use std::fmt::Write;

use crate::paper::attack::AttackRow;
use crate::paper::epoch::EpochFigure;

const RULE_WIDTH: usize = 50;

fn header(out: &mut String, title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{rule}");
}

pub fn epoch_report(fig: &EpochFigure) -> String {
    let mut out = String::new();
    header(&mut out, "Detailed statistics:");
    for track in &fig.accuracy {
        let _ = writeln!(out, "{} final accuracy: {:.1}%", track.name, track.final_value());
    }
    for track in &fig.accuracy {
        let _ = writeln!(
            out,
            "{} last-20-round mean accuracy: {:.1}% (±{:.1})",
            track.name, track.tail.mean, track.tail.std
        );
    }
    let _ = writeln!(out, "SAFL-VR final trusted-node ratio: {:.1}%", fig.final_trusted());
    let _ = writeln!(out, "Filtered Sybil-node share: {:.1}%", fig.filtered_share());
    let _ = writeln!(
        out,
        "SAFL-VR round reaching {:.0}% accuracy: {}",
        fig.threshold, fig.safl_convergence.round
    );
    if fig.fedavg_convergence.reached() {
        let _ = writeln!(
            out,
            "FedAvg round reaching {:.0}% accuracy: {}",
            fig.threshold, fig.fedavg_convergence.round
        );
    } else {
        let _ = writeln!(out, "FedAvg did not reach {:.0}% accuracy", fig.threshold);
    }
    out
}

pub fn attack_report(rows: &[AttackRow]) -> String {
    let mut out = String::new();
    header(&mut out, "Detection performance by attack type:");
    for row in rows {
        let _ = writeln!(
            out,
            "{}: DR={}%, FPR={}%, F1={}%",
            row.label, row.detection_rate, row.false_positive_rate, row.f1
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EpochConfig;
    use crate::paper::attack::ATTACK_TABLE;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn attack_lines_reproduce_literals() {
        let report = attack_report(&ATTACK_TABLE);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3 + ATTACK_TABLE.len());
        assert_eq!(lines[0], "=".repeat(50));
        assert_eq!(lines[3], "Type 1: DR=97.8%, FPR=1.5%, F1=98.1%");
        assert_eq!(lines[5], "Type 4: DR=99.1%, FPR=0.9%, F1=99.2%");
        assert_eq!(lines[8], "Avg: DR=94.1%, FPR=2.8%, F1=95.4%");
    }

    #[test]
    fn epoch_report_mentions_every_series() {
        let fig = EpochFigure::generate(&EpochConfig::default(), &mut StdRng::seed_from_u64(42));
        let report = epoch_report(&fig);
        for name in ["SAFL-VR", "FedProx", "FedAvg"] {
            assert!(report.contains(&format!("{name} final accuracy: ")));
        }
        let safl = format!("SAFL-VR round reaching 90% accuracy: {}", fig.safl_convergence.round);
        assert!(report.contains(&safl));
        let trusted = format!("SAFL-VR final trusted-node ratio: {:.1}%", fig.final_trusted());
        assert!(report.contains(&trusted));
    }

    #[test]
    fn fedavg_never_reaching_threshold_is_reported() {
        let mut fig =
            EpochFigure::generate(&EpochConfig::default(), &mut StdRng::seed_from_u64(42));
        fig.fedavg_convergence.round = fig.fedavg_convergence.sentinel;
        let report = epoch_report(&fig);
        assert!(report.ends_with("FedAvg did not reach 90% accuracy\n"));
    }
}
