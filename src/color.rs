use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

/// Marker colour for local maxima.
pub const MAXIMA_COLOR: Color32 = Color32::from_rgb(230, 80, 70);
/// Marker colour for local minima.
pub const MINIMA_COLOR: Color32 = Color32::from_rgb(70, 150, 230);

/// Hue step between consecutive channels, in degrees (golden angle).
const HUE_STEP: f32 = 137.507_77;

/// `n` distinct colours. Hues advance by the golden angle so that
/// neighbouring channels (`x_0`, `x_1`, ...) never share a similar hue;
/// lightness alternates to separate the rare near-collisions.
pub fn channel_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 * HUE_STEP) % 360.0;
            let lightness = if i % 2 == 0 { 0.58 } else { 0.68 };
            let rgb: Srgb = Hsl::new(hue, 0.7, lightness).into_color();
            let [r, g, b] = [rgb.red, rgb.green, rgb.blue]
                .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
            Color32::from_rgb(r, g, b)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Channel colours: channel name → Color32
// ---------------------------------------------------------------------------

/// One distinct colour per channel of the displayed dataset.
#[derive(Debug, Clone)]
pub struct ChannelColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ChannelColors {
    pub fn new(channels: &[&str]) -> Self {
        let mapping = channels
            .iter()
            .zip(channel_palette(channels.len()))
            .map(|(name, c)| (name.to_string(), c))
            .collect();
        ChannelColors {
            mapping,
            default_color: Color32::LIGHT_BLUE,
        }
    }

    pub fn color_for(&self, channel: &str) -> Color32 {
        self.mapping
            .get(channel)
            .copied()
            .unwrap_or(self.default_color)
    }
}
