use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::prelude::*;

use super::palette::generate_palette;
use crate::error::AppError;

const BAR_WIDTH: u32 = 900;
const BAR_HEIGHT: u32 = 600;
/// Vertical room per category of a horizontal bar chart.
const ROW_HEIGHT: u32 = 30;

pub(super) fn chart_err<E: std::fmt::Display>(err: E) -> AppError {
    AppError::Chart(err.to_string())
}

/// Vertical bar chart over ordered categories, rendered as an SVG document.
pub fn vertical_bars(
    title: &str,
    y_desc: &str,
    data: &[(String, f64)],
) -> Result<String, AppError> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (BAR_WIDTH, BAR_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let max = axis_max(data);
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(16)
            .x_label_area_size(64)
            .y_label_area_size(72)
            .build_cartesian_2d((0i32..data.len() as i32).into_segmented(), 0f64..max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(data.len())
            .x_label_formatter(&|segment| segment_label(segment, data))
            .y_desc(y_desc)
            .label_style(("sans-serif", 13))
            .draw()
            .map_err(chart_err)?;

        let colors = generate_palette(data.len());
        chart
            .draw_series(data.iter().enumerate().map(|(idx, (_, value))| {
                let mut rect = Rectangle::new(
                    [
                        (SegmentValue::Exact(idx as i32), 0.0),
                        (SegmentValue::Exact(idx as i32 + 1), *value),
                    ],
                    colors[idx].filled(),
                );
                rect.set_margin(2, 2, 2, 2);
                rect
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(buf)
}

/// Horizontal bar chart; `data` is drawn bottom-up, so callers pass it
/// ascending when the largest bar should sit on top.
pub fn horizontal_bars(
    title: &str,
    x_desc: &str,
    data: &[(String, f64)],
) -> Result<String, AppError> {
    let height = 160 + ROW_HEIGHT * data.len() as u32;
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, (BAR_WIDTH, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let max = axis_max(data);
        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 24))
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(220)
            .build_cartesian_2d(0f64..max, (0i32..data.len() as i32).into_segmented())
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(data.len())
            .y_label_formatter(&|segment| segment_label(segment, data))
            .x_desc(x_desc)
            .label_style(("sans-serif", 13))
            .draw()
            .map_err(chart_err)?;

        let colors = generate_palette(data.len());
        chart
            .draw_series(data.iter().enumerate().map(|(idx, (_, value))| {
                let mut rect = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(idx as i32)),
                        (*value, SegmentValue::Exact(idx as i32 + 1)),
                    ],
                    colors[idx].filled(),
                );
                rect.set_margin(2, 2, 2, 2);
                rect
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(buf)
}

fn axis_max(data: &[(String, f64)]) -> f64 {
    let max = data.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    if max <= 0.0 {
        1.0
    } else {
        max * 1.08
    }
}

fn segment_label(segment: &SegmentValue<i32>, data: &[(String, f64)]) -> String {
    match segment {
        SegmentValue::CenterOf(idx) => data
            .get(*idx as usize)
            .map(|(label, _)| label.clone())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<(String, f64)> {
        vec![
            ("enero".to_string(), 120.0),
            ("febrero".to_string(), 80.0),
            ("marzo".to_string(), 95.0),
        ]
    }

    #[test]
    fn vertical_chart_renders_svg() {
        let svg = vertical_bars("Divorces by month", "divorces", &sample()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Divorces by month"));
    }

    #[test]
    fn horizontal_chart_renders_svg() {
        let svg = horizontal_bars("Divorces by group", "divorces", &sample()).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn zero_values_still_render() {
        let data = vec![("enero".to_string(), 0.0)];
        let svg = vertical_bars("Empty month", "divorces", &data).unwrap();
        assert!(svg.contains("<svg"));
    }
}
