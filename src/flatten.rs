use ab_glyph::FontArc;
use base64::{Engine as _, engine::general_purpose};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use log::{debug, warn};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke as SkiaStroke, Transform,
};

use crate::element::stamp::{self, StampKind};
use crate::element::{Element, ElementType, Stamp, Stroke, Text};
use crate::error::ExportError;
use crate::geometry::FitResult;

/// Composite the background and all annotation elements into one raster at
/// the background's natural resolution. Elements live in canvas-local
/// (fitted) coordinates and are scaled up by `natural / fitted`.
pub fn flatten(
    background: &RgbaImage,
    fitted: &FitResult,
    elements: &[ElementType],
) -> Result<RgbaImage, ExportError> {
    let (width, height) = background.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Allocation { width, height })?;

    // Background uploads are opaque, so straight RGBA and tiny-skia's
    // premultiplied bytes coincide.
    pixmap.data_mut().copy_from_slice(background.as_raw());

    let scale = if fitted.width > 0.0 {
        width as f32 / fitted.width
    } else {
        1.0
    };

    for element in elements {
        match element {
            ElementType::Stroke(stroke) => draw_stroke(&mut pixmap, stroke, scale),
            ElementType::Stamp(stamp) => draw_stamp(&mut pixmap, stamp, scale),
            // Text is rendered in a separate pass via imageproc.
            ElementType::Text(_) => {}
        }
    }

    let mut output = RgbaImage::from_raw(width, height, pixmap.data().to_vec())
        .ok_or(ExportError::Allocation { width, height })?;

    draw_text_elements(&mut output, elements, scale);

    Ok(output)
}

/// Encode a raster as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExportError> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Wrap PNG bytes in a `data:image/png;base64,…` URI.
pub fn png_data_uri(png: &[u8]) -> String {
    let mut uri = String::with_capacity(png.len() / 3 * 4 + 24);
    uri.push_str("data:image/png;base64,");
    general_purpose::STANDARD.encode_string(png, &mut uri);
    uri
}

fn color_paint(color: egui::Color32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r(), color.g(), color.b(), color.a());
    paint.anti_alias = true;
    paint
}

fn outline(width: f32) -> SkiaStroke {
    SkiaStroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn draw_stroke(pixmap: &mut Pixmap, stroke: &Stroke, scale: f32) {
    let points = stroke.points();
    if points.is_empty() {
        return;
    }

    let paint = color_paint(stroke.color());
    let mut pb = PathBuilder::new();
    pb.move_to(points[0].x * scale, points[0].y * scale);
    if points.len() == 1 {
        // Round caps turn the zero-length segment into a dot
        pb.line_to(points[0].x * scale, points[0].y * scale);
    }
    for point in &points[1..] {
        pb.line_to(point.x * scale, point.y * scale);
    }
    let Some(path) = pb.finish() else {
        debug!("skipping degenerate stroke path");
        return;
    };
    pixmap.stroke_path(
        &path,
        &paint,
        &outline(stroke.thickness() * scale),
        Transform::identity(),
        None,
    );
}

fn draw_stamp(pixmap: &mut Pixmap, stamp: &Stamp, scale: f32) {
    let paint = color_paint(stamp.color());
    let stroke = outline(stamp.stroke_width() * scale);
    let center = stamp.center();

    match stamp.kind() {
        StampKind::Arrow => {
            let arrow = stamp::arrow_geometry(center);
            stroke_segment(pixmap, arrow.tail, arrow.head_base, &paint, &stroke, scale);
            fill_arrow_head(pixmap, &arrow, &paint, scale);
        }
        StampKind::Circle => {
            let mut pb = PathBuilder::new();
            pb.push_circle(center.x * scale, center.y * scale, stamp::CIRCLE_RADIUS * scale);
            if let Some(path) = pb.finish() {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
        StampKind::Rectangle => {
            let half = stamp::BOX_SIDE / 2.0;
            let Some(rect) = tiny_skia::Rect::from_ltrb(
                (center.x - half) * scale,
                (center.y - half) * scale,
                (center.x + half) * scale,
                (center.y + half) * scale,
            ) else {
                debug!("skipping degenerate rectangle stamp");
                return;
            };
            let path = PathBuilder::from_rect(rect);
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
        StampKind::Cross => {
            let half = stamp::BOX_SIDE / 2.0;
            let top_left = egui::pos2(center.x - half, center.y - half);
            let bottom_right = egui::pos2(center.x + half, center.y + half);
            let bottom_left = egui::pos2(center.x - half, center.y + half);
            let top_right = egui::pos2(center.x + half, center.y - half);
            stroke_segment(pixmap, top_left, bottom_right, &paint, &stroke, scale);
            stroke_segment(pixmap, bottom_left, top_right, &paint, &stroke, scale);
        }
    }
}

fn stroke_segment(
    pixmap: &mut Pixmap,
    from: egui::Pos2,
    to: egui::Pos2,
    paint: &Paint<'_>,
    stroke: &SkiaStroke,
    scale: f32,
) {
    let mut pb = PathBuilder::new();
    pb.move_to(from.x * scale, from.y * scale);
    pb.line_to(to.x * scale, to.y * scale);
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, paint, stroke, Transform::identity(), None);
    }
}

fn fill_arrow_head(
    pixmap: &mut Pixmap,
    arrow: &stamp::ArrowGeometry,
    paint: &Paint<'_>,
    scale: f32,
) {
    let mut pb = PathBuilder::new();
    pb.move_to(arrow.tip.x * scale, arrow.tip.y * scale);
    pb.line_to(
        arrow.head_base.x * scale,
        (arrow.head_base.y - stamp::ARROW_HEAD_HALF_WIDTH) * scale,
    );
    pb.line_to(
        arrow.head_base.x * scale,
        (arrow.head_base.y + stamp::ARROW_HEAD_HALF_WIDTH) * scale,
    );
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    }
}

fn draw_text_elements(image: &mut RgbaImage, elements: &[ElementType], scale: f32) {
    let texts: Vec<&Text> = elements
        .iter()
        .filter_map(|element| match element {
            ElementType::Text(text) => Some(text),
            _ => None,
        })
        .collect();
    if texts.is_empty() {
        return;
    }

    let Some(font) = load_system_font() else {
        warn!("no usable system font found; text annotations omitted from export");
        return;
    };

    for text in texts {
        let color = text.color();
        let anchor = text.rect().min;
        draw_text_mut(
            image,
            Rgba([color.r(), color.g(), color.b(), color.a()]),
            (anchor.x * scale) as i32,
            (anchor.y * scale) as i32,
            text.size() * scale,
            &font,
            text.content(),
        );
    }
}

fn load_system_font() -> Option<FontArc> {
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/SFNS.ttf",
    ];

    for path in candidates {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(bytes) {
                return Some(font);
            }
        }
    }

    None
}
