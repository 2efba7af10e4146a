use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_rgb(Hsl::new(hue, 0.65, 0.52))
        })
        .collect()
}

/// Sequential ramp for heatmap cells: light to dark at a fixed warm hue,
/// `t` in [0, 1].
pub fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0) as f32;
    hsl_to_rgb(Hsl::new(16.0, 0.80, 0.94 - 0.64 * t))
}

fn hsl_to_rgb(hsl: Hsl) -> RGBColor {
    let rgb: Srgb = hsl.into_color();
    RGBColor(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
