use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke as EguiStroke, Vec2, vec2};

use super::Element;
use super::common;

/// Fixed-geometry shapes inserted from the toolbar with one click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StampKind {
    Arrow,
    Circle,
    Rectangle,
    Cross,
}

impl StampKind {
    pub fn label(self) -> &'static str {
        match self {
            StampKind::Arrow => "arrow",
            StampKind::Circle => "circle",
            StampKind::Rectangle => "rectangle",
            StampKind::Cross => "cross",
        }
    }
}

pub const ARROW_SHAFT_LENGTH: f32 = 50.0;
pub const ARROW_HEAD_LENGTH: f32 = 15.0;
pub const ARROW_HEAD_HALF_WIDTH: f32 = 5.0;
pub const CIRCLE_RADIUS: f32 = 20.0;
// Rectangle and cross share the same 50 px box
pub const BOX_SIDE: f32 = 50.0;

/// Arrow geometry in canvas-local coordinates: a horizontal shaft ending in
/// a filled triangular head pointing right.
pub(crate) struct ArrowGeometry {
    pub tail: Pos2,
    pub head_base: Pos2,
    pub tip: Pos2,
}

pub(crate) fn arrow_geometry(center: Pos2) -> ArrowGeometry {
    let half = (ARROW_SHAFT_LENGTH + ARROW_HEAD_LENGTH) / 2.0;
    let tip = center + vec2(half, 0.0);
    ArrowGeometry {
        tail: center - vec2(half, 0.0),
        head_base: tip - vec2(ARROW_HEAD_LENGTH, 0.0),
        tip,
    }
}

/// Stamp element: one of the fixed shapes, centered on `center`
#[derive(Clone, Debug)]
pub struct Stamp {
    id: usize,
    kind: StampKind,
    center: Pos2,
    color: Color32,
    stroke_width: f32,
}

impl Stamp {
    pub fn new(id: usize, kind: StampKind, center: Pos2, color: Color32, stroke_width: f32) -> Self {
        Self {
            id,
            kind,
            center,
            color,
            stroke_width,
        }
    }

    pub fn kind(&self) -> StampKind {
        self.kind
    }

    pub fn center(&self) -> Pos2 {
        self.center
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    fn half_extent(&self) -> Vec2 {
        match self.kind {
            StampKind::Arrow => vec2(
                (ARROW_SHAFT_LENGTH + ARROW_HEAD_LENGTH) / 2.0,
                ARROW_HEAD_HALF_WIDTH,
            ),
            StampKind::Circle => Vec2::splat(CIRCLE_RADIUS),
            StampKind::Rectangle | StampKind::Cross => Vec2::splat(BOX_SIDE / 2.0),
        }
    }

    fn box_rect(&self) -> Rect {
        Rect::from_center_size(self.center, Vec2::splat(BOX_SIDE))
    }
}

impl Element for Stamp {
    fn id(&self) -> usize {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "stamp"
    }

    fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.half_extent() * 2.0)
            .expand(self.stroke_width / 2.0)
    }

    fn draw(&self, painter: &Painter, origin: Vec2) {
        let stroke = EguiStroke::new(self.stroke_width, self.color);
        match self.kind {
            StampKind::Arrow => {
                let arrow = arrow_geometry(self.center);
                painter.line_segment([arrow.tail + origin, arrow.head_base + origin], stroke);
                let head = vec![
                    arrow.tip + origin,
                    arrow.head_base + origin + vec2(0.0, -ARROW_HEAD_HALF_WIDTH),
                    arrow.head_base + origin + vec2(0.0, ARROW_HEAD_HALF_WIDTH),
                ];
                painter.add(Shape::convex_polygon(head, self.color, EguiStroke::NONE));
            }
            StampKind::Circle => {
                painter.circle_stroke(self.center + origin, CIRCLE_RADIUS, stroke);
            }
            StampKind::Rectangle => {
                painter.rect_stroke(self.box_rect().translate(origin), 0.0, stroke);
            }
            StampKind::Cross => {
                let rect = self.box_rect().translate(origin);
                painter.line_segment([rect.left_top(), rect.right_bottom()], stroke);
                painter.line_segment([rect.left_bottom(), rect.right_top()], stroke);
            }
        }
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        let tolerance = self.stroke_width / 2.0 + common::HIT_TOLERANCE;
        match self.kind {
            StampKind::Arrow => {
                let arrow = arrow_geometry(self.center);
                common::distance_to_line_segment(pos, arrow.tail, arrow.tip)
                    <= tolerance.max(ARROW_HEAD_HALF_WIDTH)
            }
            StampKind::Circle => {
                ((pos - self.center).length() - CIRCLE_RADIUS).abs() <= tolerance
            }
            StampKind::Rectangle => {
                let rect = self.box_rect();
                if !rect.expand(tolerance).contains(pos) {
                    return false;
                }
                // Only the outline is solid; the interior stays click-through
                !rect.shrink(tolerance).contains(pos)
            }
            StampKind::Cross => {
                let rect = self.box_rect();
                common::distance_to_line_segment(pos, rect.left_top(), rect.right_bottom())
                    <= tolerance
                    || common::distance_to_line_segment(pos, rect.left_bottom(), rect.right_top())
                        <= tolerance
            }
        }
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }
}
