use std::fs;
use std::path::PathBuf;

use plotters::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use safl_figures::config::EpochConfig;
use safl_figures::paper::attack::ATTACK_TABLE;
use safl_figures::paper::epoch::EpochFigure;
use safl_figures::paper::render::{
    ATTACK_STEM, AttackChart, EPOCH_STEM, EpochChart, Figure, Formats, export,
};

fn unique_dir(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "safl_figures_render_{}_{}",
        name,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    path
}

fn render_svg<F: Figure>(figure: &F) -> String {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, figure.size()).into_drawing_area();
        figure.draw(&root).expect("draw figure");
        root.present().expect("present svg");
    }
    svg
}

fn epoch_figure() -> EpochFigure {
    EpochFigure::generate(&EpochConfig::default(), &mut StdRng::seed_from_u64(42))
}

#[test]
fn attack_chart_labels_categories_and_values() {
    let chart = AttackChart {
        rows: &ATTACK_TABLE,
        size: (1200, 700),
    };
    let svg = render_svg(&chart);
    for row in &ATTACK_TABLE {
        assert!(svg.contains(row.label), "missing category {}", row.label);
    }
    assert!(svg.contains("99.1"));
    assert!(svg.contains("5.1"));
    assert!(svg.contains("0.9"));
    assert!(svg.contains("Detection rate (DR)"));
    assert!(svg.contains("False-positive rate (FPR)"));
}

#[test]
fn epoch_chart_draws_annotation_and_stats_boxes() {
    let fig = epoch_figure();
    let chart = EpochChart {
        figure: &fig,
        stride: 2,
        size: (1680, 600),
    };
    let svg = render_svg(&chart);

    assert!(fig.safl_convergence.reached());
    assert!(svg.contains("SAFL-VR reaches 90%"));
    assert!(svg.contains(&format!("at round {}", fig.safl_convergence.round)));

    for track in &fig.accuracy {
        let line = format!("{}: {:.1}% (±{:.1})", track.name, track.tail.mean, track.tail.std);
        assert!(svg.contains(&line), "missing stats line {line}");
    }
    assert!(svg.contains(&format!("Final trusted nodes: {:.1}%", fig.final_trusted())));
    assert!(svg.contains(&format!(
        "Filtered malicious nodes: {:.1}%",
        fig.filtered_share()
    )));
    assert!(svg.contains(">20<"), "integer tick labels");
    assert!(!svg.contains(">20.0<"));
}

#[test]
fn export_writes_png_and_svg() {
    let dir = unique_dir("export");
    let fig = epoch_figure();
    let epoch = EpochChart {
        figure: &fig,
        stride: 2,
        size: (840, 300),
    };
    let formats = Formats {
        png: true,
        svg: true,
    };

    let written = export(&epoch, &dir, formats).expect("export epoch");
    assert_eq!(
        written,
        vec![
            dir.join(format!("{EPOCH_STEM}.png")),
            dir.join(format!("{EPOCH_STEM}.svg")),
        ]
    );
    for path in &written {
        assert!(fs::metadata(path).expect("written file").len() > 0);
    }

    let attack = AttackChart {
        rows: &ATTACK_TABLE,
        size: (600, 350),
    };
    let written = export(&attack, &dir, formats).expect("export attack");
    assert_eq!(written.len(), 2);
    assert!(written[1].ends_with(format!("{ATTACK_STEM}.svg")));

    let _ = fs::remove_dir_all(&dir);
}
