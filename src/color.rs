use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Hue of the first series; the single-dataset histogram is drawn yellow.
const START_HUE: f32 = 55.0;

/// `n` visually distinct colours with evenly spaced hues, starting at yellow.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (START_HUE + i as f32 / n as f32 * 360.0) % 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.85, 0.55).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Dataset colours: dataset index → Color32
// ---------------------------------------------------------------------------

/// One fill colour per loaded dataset.
#[derive(Debug, Clone)]
pub struct DatasetColors {
    colors: Vec<Color32>,
    default_color: Color32,
}

impl DatasetColors {
    pub fn new(n_datasets: usize) -> Self {
        Self {
            colors: generate_palette(n_datasets),
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, dataset: usize) -> Color32 {
        self.colors
            .get(dataset)
            .copied()
            .unwrap_or(self.default_color)
    }
}
