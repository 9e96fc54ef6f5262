use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Vec2};

use super::Element;

/// Text element, centered on its insertion point
#[derive(Clone, Debug)]
pub struct Text {
    id: usize,
    content: String,
    center: Pos2,
    color: Color32,
    size: f32,
}

impl Text {
    pub fn new(id: usize, content: String, center: Pos2, color: Color32, size: f32) -> Self {
        Self {
            id,
            content,
            center,
            color,
            size,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn center(&self) -> Pos2 {
        self.center
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    // Conservative estimate for hit-testing and bounds; the live canvas and
    // the export path both lay the glyphs out themselves.
    pub(crate) fn estimated_size(&self) -> Vec2 {
        let chars = self.content.chars().count().max(1) as f32;
        Vec2::new((chars * self.size * 0.6).max(20.0), self.size * 1.4)
    }
}

impl Element for Text {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "text"
    }

    fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.estimated_size())
    }

    fn draw(&self, painter: &Painter, origin: Vec2) {
        painter.text(
            self.center + origin,
            Align2::CENTER_CENTER,
            &self.content,
            FontId::proportional(self.size),
            self.color,
        );
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        self.rect().contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}
