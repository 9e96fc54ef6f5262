use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke as EguiStroke, Vec2};

use super::Element;
use super::common;

/// Free-hand stroke element: a series of connected points
#[derive(Clone, Debug)]
pub struct Stroke {
    id: usize,
    points: Vec<Pos2>,
    color: Color32,
    thickness: f32,
}

impl Stroke {
    /// Create a new stroke with the given properties
    pub fn new(id: usize, points: Vec<Pos2>, thickness: f32, color: Color32) -> Self {
        Self {
            id,
            points,
            color,
            thickness,
        }
    }

    /// Get the points that make up this stroke
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    /// Get the stroke color
    pub fn color(&self) -> Color32 {
        self.color
    }

    /// Get the stroke thickness
    pub fn thickness(&self) -> f32 {
        self.thickness
    }
}

impl Element for Stroke {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "stroke"
    }

    fn rect(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::NOTHING;
        }

        common::calculate_bounds(&self.points, self.thickness / 2.0)
    }

    fn draw(&self, painter: &Painter, origin: Vec2) {
        match self.points.as_slice() {
            [] => {}
            // A tap without movement still leaves a visible dot
            [single] => {
                painter.circle_filled(*single + origin, self.thickness / 2.0, self.color);
            }
            points => {
                let screen_points: Vec<Pos2> = points.iter().map(|p| *p + origin).collect();
                painter.add(Shape::line(
                    screen_points,
                    EguiStroke::new(self.thickness, self.color),
                ));
            }
        }
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        if self.points.len() < 2 {
            return false;
        }

        let tolerance = (self.thickness / 2.0).max(common::HIT_TOLERANCE);
        for window in self.points.windows(2) {
            if common::distance_to_line_segment(pos, window[0], window[1]) <= tolerance {
                return true;
            }
        }

        false
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }
}

/// Accumulates pointer positions while a stroke is being drawn
pub struct StrokeBuilder {
    points: Vec<Pos2>,
    color: Color32,
    thickness: f32,
}

impl StrokeBuilder {
    pub fn new(color: Color32, thickness: f32) -> Self {
        Self {
            points: Vec::new(),
            color,
            thickness,
        }
    }

    /// Add a point to the stroke in progress; consecutive duplicates are dropped
    pub fn add_point(&mut self, point: Pos2) {
        if self.points.last() != Some(&point) {
            self.points.push(point);
        }
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    /// Draw the in-progress stroke as a live preview
    pub fn preview(&self, painter: &Painter, origin: Vec2) {
        if self.points.len() < 2 {
            return;
        }
        let screen_points: Vec<Pos2> = self.points.iter().map(|p| *p + origin).collect();
        painter.add(Shape::line(
            screen_points,
            EguiStroke::new(self.thickness, self.color),
        ));
    }

    /// Finalize into an immutable stroke; `None` if nothing was drawn
    pub fn finish(self, id: usize) -> Option<Stroke> {
        if self.points.is_empty() {
            return None;
        }
        Some(Stroke::new(id, self.points, self.thickness, self.color))
    }
}
