use std::error::Error;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info};

use crate::paper::attack::{AttackMetric, AttackRow, bar_span};
use crate::paper::epoch::EpochFigure;

pub type DrawResult = Result<(), Box<dyn Error>>;

pub const EPOCH_STEM: &str = "trust_driven_aggregation_realistic";
pub const ATTACK_STEM: &str = "attack_type_performance";

const WHEAT: RGBColor = RGBColor(245, 222, 179);
const FEDPROX_GREEN: RGBColor = RGBColor(0, 128, 0);
const DR_GREEN: RGBColor = RGBColor(46, 139, 87);
const F1_BLUE: RGBColor = RGBColor(65, 105, 225);
const FPR_RED: RGBColor = RGBColor(205, 92, 92);

/// A chart that can be drawn onto any plotters backend.
pub trait Figure {
    fn stem(&self) -> &str;
    fn size(&self) -> (u32, u32);
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult
    where
        DB::ErrorType: 'static;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Formats {
    pub png: bool,
    pub svg: bool,
}

/// Writes `<stem>.png` and/or `<stem>.svg` under `out_dir`.
pub fn export<F: Figure>(
    figure: &F,
    out_dir: &Path,
    formats: Formats,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    create_dir_all(out_dir)?;
    let mut written = Vec::new();

    if formats.png {
        let path = out_dir.join(format!("{}.png", figure.stem()));
        let root = BitMapBackend::new(&path, figure.size()).into_drawing_area();
        figure.draw(&root)?;
        root.present()?;
        drop(root);
        info!(path = %path.display(), "wrote raster figure");
        written.push(path);
    }
    if formats.svg {
        let path = out_dir.join(format!("{}.svg", figure.stem()));
        let root = SVGBackend::new(&path, figure.size()).into_drawing_area();
        figure.draw(&root)?;
        root.present()?;
        drop(root);
        info!(path = %path.display(), "wrote vector figure");
        written.push(path);
    }
    if written.is_empty() {
        debug!(stem = figure.stem(), "all output formats disabled");
    }
    Ok(written)
}

pub struct EpochChart<'a> {
    pub figure: &'a EpochFigure,
    pub stride: usize,
    pub size: (u32, u32),
}

impl Figure for EpochChart<'_> {
    fn stem(&self) -> &str {
        EPOCH_STEM
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let panels = root.split_evenly((1, 2));
        self.draw_accuracy(&panels[0])?;
        self.draw_trust(&panels[1])?;
        Ok(())
    }
}

impl EpochChart<'_> {
    fn draw_accuracy<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let fig = self.figure;
        let mut chart = ChartBuilder::on(area)
            .caption("(a) Global model accuracy", ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0f64..100.0f64, 0.0f64..100.0f64)?;

        chart
            .configure_mesh()
            .x_labels(6)
            .y_labels(6)
            .x_label_formatter(&tick_label)
            .y_label_formatter(&tick_label)
            .bold_line_style(BLACK.mix(0.15))
            .light_line_style(WHITE.mix(0.0))
            .x_desc("Training round")
            .y_desc("Accuracy (%)")
            .draw()?;

        let styles = [
            BLUE.mix(0.9).stroke_width(3),
            FEDPROX_GREEN.mix(0.8).stroke_width(2),
            RED.mix(0.8).stroke_width(2),
        ];
        for (track, style) in fig.accuracy.iter().zip(styles) {
            chart
                .draw_series(LineSeries::new(fig.sampled(&track.values, self.stride), style))?
                .label(track.name)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }

        let c = fig.safl_convergence;
        if c.reached() {
            let x = c.round as f64;
            let marker = BLUE.mix(0.7).stroke_width(1);
            chart.draw_series(
                dash_polyline(&[(x, 0.0), (x, 100.0)], 1.0, 1.5)
                    .into_iter()
                    .map(|seg| PathElement::new(seg, marker)),
            )?;

            let (tx, ty) = (x + 10.0, 60.0);
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(tx, ty + 2.0), (x, fig.threshold)],
                BLUE.stroke_width(1),
            )))?;
            chart.draw_series(std::iter::once(TriangleMarker::new(
                (x, fig.threshold),
                5,
                BLUE.filled(),
            )))?;
            let font = ("sans-serif", 14).into_font().color(&BLUE);
            let lines = [
                format!("SAFL-VR reaches {:.0}%", fig.threshold),
                format!("at round {}", c.round),
            ];
            for (k, line) in lines.into_iter().enumerate() {
                chart.draw_series(std::iter::once(
                    EmptyElement::at((tx, ty)) + Text::new(line, (0, 16 * k as i32), font.clone()),
                ))?;
            }
        }

        let stats: Vec<String> = fig
            .accuracy
            .iter()
            .map(|t| format!("{}: {:.1}% (±{:.1})", t.name, t.tail.mean, t.tail.std))
            .collect();
        draw_text_box(&mut chart, (2.0, 98.0), &stats)?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_trust<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let fig = self.figure;
        let mut chart = ChartBuilder::on(area)
            .caption("(b) Trusted-node ratio", ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0f64..100.0f64, 0.0f64..100.0f64)?;

        chart
            .configure_mesh()
            .x_labels(6)
            .y_labels(6)
            .x_label_formatter(&tick_label)
            .y_label_formatter(&tick_label)
            .bold_line_style(BLACK.mix(0.15))
            .light_line_style(WHITE.mix(0.0))
            .x_desc("Training round")
            .y_desc("Trusted-node ratio (%)")
            .draw()?;

        let safl = BLUE.mix(0.9).stroke_width(3);
        chart
            .draw_series(LineSeries::new(
                fig.sampled(&fig.safl_trusted, self.stride),
                safl,
            ))?
            .label("SAFL-VR")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], safl));

        let fedavg = RED.mix(0.7).stroke_width(2);
        let fedavg_points = fig.sampled(&fig.fedavg_trusted, self.stride);
        chart
            .draw_series(
                dash_polyline(&fedavg_points, 2.5, 1.5)
                    .into_iter()
                    .map(|seg| PathElement::new(seg, fedavg)),
            )?
            .label("FedAvg")
            .legend(move |(x, y)| {
                EmptyElement::at((x, y))
                    + PathElement::new(vec![(0, 0), (8, 0)], fedavg)
                    + PathElement::new(vec![(12, 0), (20, 0)], fedavg)
            });

        let stats = [
            format!("Final trusted nodes: {:.1}%", fig.final_trusted()),
            format!("Filtered malicious nodes: {:.1}%", fig.filtered_share()),
        ];
        draw_text_box(&mut chart, (2.0, 98.0), &stats)?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerLeft)
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }
}

/// Wheat-coloured box anchored at its top-left corner `at`.
fn draw_text_box<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    at: (f64, f64),
    lines: &[String],
) -> DrawResult
where
    DB::ErrorType: 'static,
{
    let line_h = 18;
    let width = lines.iter().map(|l| l.chars().count() as i32).max().unwrap_or(0) * 8 + 16;
    let height = line_h * lines.len() as i32 + 10;
    chart.draw_series(std::iter::once(
        EmptyElement::at(at) + Rectangle::new([(0, 0), (width, height)], WHEAT.mix(0.8).filled()),
    ))?;
    let font = ("sans-serif", 14).into_font();
    for (k, line) in lines.iter().enumerate() {
        chart.draw_series(std::iter::once(
            EmptyElement::at(at)
                + Text::new(line.clone(), (8, 6 + line_h * k as i32), font.clone()),
        ))?;
    }
    Ok(())
}

pub struct AttackChart<'a> {
    pub rows: &'a [AttackRow],
    pub size: (u32, u32),
}

impl Figure for AttackChart<'_> {
    fn stem(&self) -> &str {
        ATTACK_STEM
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let x_max = self.rows.len() as f64 - 0.5;
        let mut chart = ChartBuilder::on(root)
            .caption("SAFL-VR detection performance by attack type", ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..x_max, 0.0f64..105.0f64)?;

        let rows = self.rows;
        let category = |x: &f64| category_label(rows, *x);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(2 * rows.len() + 1)
            .x_label_formatter(&category)
            .bold_line_style(BLACK.mix(0.15))
            .light_line_style(WHITE.mix(0.0))
            .x_desc("Attack type")
            .y_desc("Percentage (%)")
            .draw()?;

        let value_style = TextStyle::from(("sans-serif", 13).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        for metric in AttackMetric::ORDER {
            let fill = metric_color(metric).mix(0.8).filled();
            chart
                .draw_series(rows.iter().enumerate().map(|(i, row)| {
                    let (x0, x1, h) = bar_span(i, metric, row);
                    Rectangle::new([(x0, 0.0), (x1, h)], fill)
                }))?
                .label(metric.legend())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], fill));

            chart.draw_series(rows.iter().enumerate().map(|(i, row)| {
                let (x0, x1, h) = bar_span(i, metric, row);
                EmptyElement::at(((x0 + x1) / 2.0, h))
                    + Text::new(format!("{h:.1}"), (0, -3), value_style.clone())
            }))?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }
}

fn metric_color(metric: AttackMetric) -> RGBColor {
    match metric {
        AttackMetric::DetectionRate => DR_GREEN,
        AttackMetric::F1 => F1_BLUE,
        AttackMetric::FalsePositiveRate => FPR_RED,
    }
}

/// Whole-number tick text for the 0..100 axes.
pub fn tick_label(v: &f64) -> String {
    format!("{v:.0}")
}

/// Category name for tick positions that land on a group centre; blank otherwise.
pub fn category_label(rows: &[AttackRow], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    rows.get(nearest as usize)
        .map(|r| r.label.to_string())
        .unwrap_or_default()
}

/// Splits a polyline into dash pieces of length `dash` separated by `gap`,
/// measured along the path in data units.
pub fn dash_polyline(points: &[(f64, f64)], dash: f64, gap: f64) -> Vec<Vec<(f64, f64)>> {
    let mut dashes = Vec::new();
    if points.len() < 2 || dash.is_nan() || dash <= 0.0 || gap < 0.0 {
        return dashes;
    }
    let period = dash + gap;
    let mut current = vec![points[0]];
    let mut phase = 0.0f64;

    for seg in points.windows(2) {
        let (a, b) = (seg[0], seg[1]);
        let len = (b.0 - a.0).hypot(b.1 - a.1);
        if !len.is_finite() {
            continue;
        }
        let mut t = 0.0f64;
        while t < len {
            let drawing = phase < dash;
            let boundary = if drawing { dash } else { period };
            let step = (boundary - phase).min(len - t);
            t += step;
            phase += step;
            let f = t / len;
            let p = (a.0 + (b.0 - a.0) * f, a.1 + (b.1 - a.1) * f);
            if drawing {
                current.push(p);
            }
            if phase >= boundary - 1e-12 {
                if drawing {
                    if current.len() >= 2 {
                        dashes.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                } else {
                    current = vec![p];
                    phase = 0.0;
                }
            }
        }
    }
    if current.len() >= 2 {
        dashes.push(current);
    }
    dashes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::attack::ATTACK_TABLE;
    use approx::assert_relative_eq;

    #[test]
    fn straight_line_dashes() {
        let dashes = dash_polyline(&[(0.0, 0.0), (10.0, 0.0)], 2.0, 1.0);
        assert_eq!(dashes.len(), 4);
        assert_relative_eq!(dashes[0][0].0, 0.0);
        assert_relative_eq!(dashes[0].last().unwrap().0, 2.0);
        assert_relative_eq!(dashes[1][0].0, 3.0);
        assert_relative_eq!(dashes[3].last().unwrap().0, 10.0);
    }

    #[test]
    fn dash_continues_across_vertices() {
        let dashes = dash_polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)], 3.0, 1.0);
        assert_eq!(dashes.len(), 1);
        assert_eq!(dashes[0].len(), 3);
        assert_eq!(dashes[0][1], (1.0, 0.0));
    }

    #[test]
    fn zero_gap_is_one_solid_piece_per_dash() {
        let dashes = dash_polyline(&[(0.0, 0.0), (0.0, 4.0)], 1.0, 0.0);
        assert_eq!(dashes.len(), 4);
    }

    #[test]
    fn degenerate_input_draws_nothing() {
        assert!(dash_polyline(&[(1.0, 1.0)], 1.0, 1.0).is_empty());
        assert!(dash_polyline(&[(0.0, 0.0), (5.0, 0.0)], 0.0, 1.0).is_empty());
    }

    #[test]
    fn ticks_print_as_integers() {
        assert_eq!(tick_label(&0.0), "0");
        assert_eq!(tick_label(&20.0), "20");
        assert_eq!(tick_label(&100.0), "100");
    }

    #[test]
    fn category_labels_only_on_integers() {
        assert_eq!(category_label(&ATTACK_TABLE, 0.0), "Type 1");
        assert_eq!(category_label(&ATTACK_TABLE, 4.0), "Type 16");
        assert_eq!(category_label(&ATTACK_TABLE, 5.0), "Avg");
        assert_eq!(category_label(&ATTACK_TABLE, 2.5), "");
        assert_eq!(category_label(&ATTACK_TABLE, -0.5), "");
        assert_eq!(category_label(&ATTACK_TABLE, 6.0), "");
    }
}
