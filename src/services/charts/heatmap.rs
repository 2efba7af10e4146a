use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::prelude::*;

use super::bar::chart_err;
use super::palette::heat_color;
use crate::error::AppError;

const CELL_HEIGHT: u32 = 26;
const WIDTH: u32 = 980;

/// Heatmap over a category grid; `values[row][col]` maps to
/// `(x_labels[col], y_labels[row])` and rows are drawn first-at-the-top.
pub fn heatmap(
    title: &str,
    x_labels: &[String],
    y_labels: &[String],
    values: &[Vec<f64>],
) -> Result<String, AppError> {
    let cols = x_labels.len() as i32;
    let rows = y_labels.len() as i32;
    let height = 160 + CELL_HEIGHT * y_labels.len() as u32;

    let max = values
        .iter()
        .flatten()
        .copied()
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (WIDTH, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 22))
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(200)
            .build_cartesian_2d((0i32..cols).into_segmented(), (0i32..rows).into_segmented())
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(x_labels.len())
            .y_labels(y_labels.len())
            .x_label_formatter(&|segment| segment_label(segment, x_labels, false, rows))
            .y_label_formatter(&|segment| segment_label(segment, y_labels, true, rows))
            .label_style(("sans-serif", 12))
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(values.iter().enumerate().flat_map(|(row, row_values)| {
                // First row of the grid sits at the top of the chart.
                let y = rows - 1 - row as i32;
                row_values.iter().enumerate().map(move |(col, value)| {
                    let mut rect = Rectangle::new(
                        [
                            (SegmentValue::Exact(col as i32), SegmentValue::Exact(y)),
                            (SegmentValue::Exact(col as i32 + 1), SegmentValue::Exact(y + 1)),
                        ],
                        heat_color(value / max).filled(),
                    );
                    rect.set_margin(1, 1, 1, 1);
                    rect
                })
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(buf)
}

fn segment_label(
    segment: &SegmentValue<i32>,
    labels: &[String],
    flipped: bool,
    rows: i32,
) -> String {
    let SegmentValue::CenterOf(idx) = segment else {
        return String::new();
    };
    let idx = if flipped { rows - 1 - *idx } else { *idx };
    if idx < 0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_grid_as_svg() {
        let x = vec!["enero".to_string(), "febrero".to_string()];
        let y = vec!["Guatemala".to_string(), "Petén".to_string(), "Izabal".to_string()];
        let values = vec![
            vec![3.0, 1.0],
            vec![2.0, 4.0],
            vec![0.0, 0.0],
        ];
        let svg = heatmap("Registrations", &x, &y, &values).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Registrations"));
    }

    #[test]
    fn single_cell_grid_renders() {
        let x = vec!["enero".to_string()];
        let y = vec!["Guatemala".to_string()];
        let svg = heatmap("One cell", &x, &y, &[vec![5.0]]).unwrap();
        assert!(svg.contains("<svg"));
    }
}
