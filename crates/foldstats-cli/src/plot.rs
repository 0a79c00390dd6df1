//! SVG rendering of the numeric series computed by the analysis crate.

use std::path::Path;

use foldstats_analysis::{algorithm::Algorithm, composite};
use plotters::{coord::Shift, prelude::*};
use tracing::info;

const CAPTION_FONT: (&str, i32) = ("sans-serif", 24);
const LABEL_FONT: (&str, i32) = ("sans-serif", 16);

fn algorithm_color(algorithm: Algorithm) -> RGBColor {
    let (r, g, b) = algorithm.color();
    RGBColor(r, g, b)
}

fn svg_root(path: &Path, size: (u32, u32)) -> DrawingArea<SVGBackend<'_>, Shift> {
    info!(path = %path.display(), "writing plot");
    SVGBackend::new(path, size).into_drawing_area()
}

/// Label formatter for a segmented axis: the centre of segment `i` gets `labels[i]`.
fn segment_label(labels: &[String], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

fn bar(x: usize, bottom: f64, top: f64, color: RGBColor) -> Rectangle<(SegmentValue<usize>, f64)> {
    let mut rect = Rectangle::new(
        [
            (SegmentValue::Exact(x), bottom),
            (SegmentValue::Exact(x + 1), top),
        ],
        color.filled(),
    );
    rect.set_margin(0, 0, 6, 6);
    rect
}

/// Bar chart of the mean ROC AUC of every algorithm.
pub fn plot_mean_auc(path: &Path, values: &[(Algorithm, f64)]) -> anyhow::Result<()> {
    let labels = values
        .iter()
        .map(|(a, _)| a.abbrev().to_owned())
        .collect::<Vec<_>>();

    let root = svg_root(path, (800, 600));
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Mean AUC Across All ML Algorithms", CAPTION_FONT)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..values.len()).into_segmented(), 0.0..1.0)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(values.len() + 1)
        .x_label_formatter(&|v| segment_label(&labels, v))
        .x_desc("Algorithm")
        .y_desc("Mean AUC")
        .draw()?;

    chart.draw_series(
        values
            .iter()
            .enumerate()
            .map(|(i, &(algorithm, auc))| bar(i, 0.0, auc, algorithm_color(algorithm))),
    )?;
    root.present()?;
    Ok(())
}

/// Stacked bar chart of one composite variant.
///
/// `rows` has one row per algorithm and one column per feature; algorithms
/// are stacked bottom to top in the given order. With no features the chart
/// is drawn with empty axes.
pub fn plot_composite(
    path: &Path,
    features: &[String],
    algorithms: &[Algorithm],
    rows: &[Vec<f64>],
    y_label: &str,
) -> anyhow::Result<()> {
    let bases = composite::stack_bases(rows);
    let top = (0..features.len())
        .map(|j| rows.iter().map(|row| row[j]).sum::<f64>())
        .fold(0.0, f64::max);
    let y_max = if top > 0.0 { top * 1.05 } else { 1.0 };

    let root = svg_root(path, (1600, 900));
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(160)
        .y_label_area_size(80)
        .build_cartesian_2d((0..features.len().max(1)).into_segmented(), 0.0..y_max)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(features.len() + 1)
        .x_label_formatter(&|v| segment_label(features, v))
        .x_label_style(LABEL_FONT.into_font().transform(FontTransform::Rotate90))
        .x_desc("Feature")
        .y_desc(y_label)
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    for ((&algorithm, row), base) in algorithms.iter().zip(rows).zip(&bases) {
        let color = algorithm_color(algorithm);
        chart
            .draw_series(
                row.iter()
                    .zip(base)
                    .enumerate()
                    .map(|(j, (&value, &bottom))| bar(j, bottom, bottom + value, color)),
            )?
            .label(algorithm.name())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// One box per labelled sample set.
///
/// Empty sample sets are left blank.
pub fn plot_boxplots(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    labels: &[String],
    samples: &[Vec<f64>],
) -> anyhow::Result<()> {
    let quartiles = samples
        .iter()
        .map(|s| (!s.is_empty()).then(|| Quartiles::new(s)))
        .collect::<Vec<_>>();
    let (low, high) = quartiles
        .iter()
        .flatten()
        .map(Quartiles::values)
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v[0]), hi.max(v[4]))
        });
    let (low, high) = if low.is_finite() && high > low {
        let pad = (high - low) * 0.05;
        (low - pad, high + pad)
    } else if low.is_finite() {
        (low - 0.5, low + 0.5)
    } else {
        (0.0, 1.0)
    };

    let width = u32::try_from(labels.len()).map_or(4000, |n| n.saturating_mul(40).clamp(600, 4000));
    let root = svg_root(path, (width, 700));
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(20)
        .x_label_area_size(140)
        .y_label_area_size(80)
        .build_cartesian_2d((0..labels.len()).into_segmented(), low..high)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len() + 1)
        .x_label_formatter(&|v| segment_label(labels, v))
        .x_label_style(LABEL_FONT.into_font().transform(FontTransform::Rotate90))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(quartiles.iter().enumerate().filter_map(|(i, q)| {
        q.as_ref()
            .map(|q| Boxplot::new_vertical(SegmentValue::CenterOf(i), q).width(20))
    }))?;
    root.present()?;
    Ok(())
}

/// Heatmap of a confusion matrix with the count written in every cell.
#[expect(clippy::cast_precision_loss)]
pub fn plot_confusion_matrix(path: &Path, title: &str, matrix: &[Vec<u64>]) -> anyhow::Result<()> {
    let classes = matrix.len();
    let max = matrix.iter().flatten().copied().max().unwrap_or(0).max(1);
    let class_labels = (0..classes).map(|c| c.to_string()).collect::<Vec<_>>();

    let root = svg_root(path, (600, 560));
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, CAPTION_FONT)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0..classes).into_segmented(),
            (0..classes).into_segmented(),
        )?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(classes + 1)
        .y_labels(classes + 1)
        .x_label_formatter(&|v| segment_label(&class_labels, v))
        .y_label_formatter(&|v| segment_label(&class_labels, v))
        .x_desc("Predicted label")
        .y_desc("True label")
        .draw()?;

    let cells = matrix.iter().enumerate().flat_map(|(row, counts)| {
        counts.iter().enumerate().map(move |(col, &count)| (row, col, count))
    });
    chart.draw_series(cells.clone().map(|(row, col, count)| {
        let shade = count as f64 / max as f64;
        Rectangle::new(
            [
                (SegmentValue::Exact(col), SegmentValue::Exact(row)),
                (SegmentValue::Exact(col + 1), SegmentValue::Exact(row + 1)),
            ],
            BLUE.mix(0.1 + 0.8 * shade).filled(),
        )
    }))?;
    chart.draw_series(cells.map(|(row, col, count)| {
        Text::new(
            count.to_string(),
            (SegmentValue::CenterOf(col), SegmentValue::CenterOf(row)),
            LABEL_FONT.into_font(),
        )
    }))?;
    root.present()?;
    Ok(())
}
