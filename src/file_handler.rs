use std::path::PathBuf;

use eframe::egui;
use log::warn;

/// Payload of a drag-dropped image file
#[derive(Debug)]
pub enum DroppedImage {
    Path(PathBuf),
    Bytes { name: String, bytes: Vec<u8> },
}

/// Take the first droppable image file from this frame's input, if any.
/// Non-image drops are logged and skipped.
pub fn take_dropped_image(ctx: &egui::Context) -> Option<DroppedImage> {
    let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
    if dropped_files.is_empty() {
        return None;
    }

    for file in &dropped_files {
        let file_name = display_name(file);

        if !is_image_file(file) {
            warn!("dropped file is not a supported image type: {file_name}");
            continue;
        }

        if let Some(bytes) = &file.bytes {
            return Some(DroppedImage::Bytes {
                name: file_name,
                bytes: bytes.to_vec(),
            });
        }
        if let Some(path) = &file.path {
            return Some(DroppedImage::Path(path.clone()));
        }
        warn!("dropped file has no accessible data: {file_name}");
    }

    None
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        file.mime.starts_with("image/")
    } else if let Some(path) = &file.path {
        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
        } else {
            false
        }
    } else {
        false
    }
}

/// Preview files being dragged over the application
pub fn preview_files_being_dropped(ctx: &egui::Context) {
    use egui::{Align2, Color32, Id, LayerId, Order};

    if ctx.input(|i| i.raw.hovered_files.is_empty()) {
        return;
    }

    let text = ctx.input(|i| {
        let mut text = "Dropping image:\n".to_owned();
        for file in &i.raw.hovered_files {
            if let Some(path) = &file.path {
                text += &format!("\n{}", path.display());
            } else {
                text += "\n(Path not available)";
            }
        }
        text
    });

    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));

    let screen_rect = ctx.screen_rect();
    painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
    painter.text(
        screen_rect.center(),
        Align2::CENTER_CENTER,
        text,
        egui::TextStyle::Heading.resolve(&ctx.style()),
        Color32::WHITE,
    );
}
