use egui::Color32;
use serde::{Deserialize, Serialize};

/// User-adjustable annotation defaults, persisted across runs through
/// eframe storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// RGBA annotation color shared by strokes, stamps and text
    pub color: [u8; 4],
    /// Outline width for stamp shapes
    pub stamp_stroke_width: f32,
    /// Free-hand brush thickness
    pub brush_thickness: f32,
    /// Font size for text annotations
    pub text_size: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            color: [255, 0, 0, 255],
            stamp_stroke_width: 3.0,
            brush_thickness: 3.0,
            text_size: 40.0,
        }
    }
}

impl ToolSettings {
    pub fn color32(&self) -> Color32 {
        Color32::from_rgba_premultiplied(self.color[0], self.color[1], self.color[2], self.color[3])
    }

    pub fn set_color32(&mut self, color: Color32) {
        self.color = color.to_array();
    }
}
