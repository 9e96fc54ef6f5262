use egui::{Painter, Pos2, Rect, Vec2};

// Re-export concrete implementations
mod common;
pub mod stamp;
pub mod stroke;
pub mod text;

pub use stamp::{Stamp, StampKind};
pub use stroke::{Stroke, StrokeBuilder};
pub use text::Text;

/// Common trait that all annotation elements implement
pub trait Element {
    /// Get the unique identifier for this element
    fn id(&self) -> usize;

    /// Get the element type as a string
    fn element_type(&self) -> &'static str;

    /// Bounding rectangle in canvas-local coordinates
    fn rect(&self) -> Rect;

    /// Draw the element on the live canvas; `origin` maps canvas-local
    /// coordinates to screen space.
    fn draw(&self, painter: &Painter, origin: Vec2);

    /// Test whether the canvas-local position hits the element
    fn hit_test(&self, pos: Pos2) -> bool;

    /// Translate the element by the given delta
    fn translate(&mut self, delta: Vec2);
}

/// Enumeration of all annotation element types
#[derive(Clone, Debug)]
pub enum ElementType {
    Stroke(Stroke),
    Stamp(Stamp),
    Text(Text),
}

impl Element for ElementType {
    fn id(&self) -> usize {
        match self {
            ElementType::Stroke(s) => s.id(),
            ElementType::Stamp(s) => s.id(),
            ElementType::Text(t) => t.id(),
        }
    }

    fn element_type(&self) -> &'static str {
        match self {
            ElementType::Stroke(_) => "stroke",
            ElementType::Stamp(_) => "stamp",
            ElementType::Text(_) => "text",
        }
    }

    fn rect(&self) -> Rect {
        match self {
            ElementType::Stroke(s) => s.rect(),
            ElementType::Stamp(s) => s.rect(),
            ElementType::Text(t) => t.rect(),
        }
    }

    fn draw(&self, painter: &Painter, origin: Vec2) {
        match self {
            ElementType::Stroke(s) => s.draw(painter, origin),
            ElementType::Stamp(s) => s.draw(painter, origin),
            ElementType::Text(t) => t.draw(painter, origin),
        }
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        match self {
            ElementType::Stroke(s) => s.hit_test(pos),
            ElementType::Stamp(s) => s.hit_test(pos),
            ElementType::Text(t) => t.hit_test(pos),
        }
    }

    fn translate(&mut self, delta: Vec2) {
        match self {
            ElementType::Stroke(s) => s.translate(delta),
            ElementType::Stamp(s) => s.translate(delta),
            ElementType::Text(t) => t.translate(delta),
        }
    }
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;
    use egui::Color32;

    /// Create a new free-hand stroke element
    pub fn create_stroke(
        id: usize,
        points: Vec<Pos2>,
        thickness: f32,
        color: Color32,
    ) -> ElementType {
        ElementType::Stroke(Stroke::new(id, points, thickness, color))
    }

    /// Create a new stamp element centered at `center`
    pub fn create_stamp(
        id: usize,
        kind: StampKind,
        center: Pos2,
        color: Color32,
        stroke_width: f32,
    ) -> ElementType {
        ElementType::Stamp(Stamp::new(id, kind, center, color, stroke_width))
    }

    /// Create a new text element centered at `center`
    pub fn create_text(
        id: usize,
        content: String,
        center: Pos2,
        color: Color32,
        size: f32,
    ) -> ElementType {
        ElementType::Text(Text::new(id, content, center, color, size))
    }
}
