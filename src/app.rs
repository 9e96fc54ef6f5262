use std::path::{Path, PathBuf};
use std::time::Duration;

use eframe::egui::{self, Pos2, TextureHandle, Vec2};
use log::{error, info};
use uuid::Uuid;

use crate::element::{ElementType, StampKind, StrokeBuilder, factory};
use crate::error::ExportError;
use crate::file_handler::{self, DroppedImage};
use crate::id_generator::generate_id;
use crate::intake::ImageIntake;
use crate::panels;
use crate::scene::{Scene, Surface};
use crate::session::CanvasSession;
use crate::settings::ToolSettings;

/// Longest side of the on-screen canvas; larger images are scaled down to fit.
pub const TARGET_LENGTH_PX: f32 = 1024.0;

pub struct MarkpadApp {
    session: CanvasSession,
    scene: Scene,
    intake: ImageIntake,
    settings: ToolSettings,
    // Used to propose unique export file names
    document_id: Uuid,
    background_texture: Option<TextureHandle>,
    active_stroke: Option<StrokeBuilder>,
    dragged_element: Option<usize>,
    text_buffer: String,
    text_focus_requested: bool,
    status: Option<String>,
}

impl MarkpadApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        Self {
            session: CanvasSession::new(TARGET_LENGTH_PX),
            scene: Scene::new(),
            intake: ImageIntake::new(),
            settings,
            document_id: Uuid::new_v4(),
            background_texture: None,
            active_stroke: None,
            dragged_element: None,
            text_buffer: String::new(),
            text_focus_requested: false,
            status: None,
        }
    }

    pub fn session(&self) -> &CanvasSession {
        &self.session
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub(crate) fn background_texture(&self) -> Option<&TextureHandle> {
        self.background_texture.as_ref()
    }

    pub(crate) fn active_stroke(&self) -> Option<&StrokeBuilder> {
        self.active_stroke.as_ref()
    }

    pub(crate) fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub(crate) fn text_buffer_mut(&mut self) -> &mut String {
        &mut self.text_buffer
    }

    /// True exactly once after typing mode was entered, so the overlay can
    /// grab keyboard focus on its first frame.
    pub(crate) fn take_text_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.text_focus_requested)
    }

    pub(crate) fn open_image_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
            .pick_file();
        match picked {
            Some(path) => self.start_loading_path(path),
            None => info!("file selection cancelled"),
        }
    }

    fn start_loading_path(&mut self, path: PathBuf) {
        let generation = self.intake.begin_file(path);
        self.start_loading(generation);
    }

    fn start_loading_bytes(&mut self, name: &str, bytes: Vec<u8>) {
        let generation = self.intake.begin_bytes(name, bytes);
        self.start_loading(generation);
    }

    fn start_loading(&mut self, generation: u64) {
        self.session.begin_loading(generation);
        self.active_stroke = None;
        self.dragged_element = None;
        self.status = None;
    }

    /// Drain intake completions; commit the background or surface the failure.
    fn poll_intake(&mut self, ctx: &egui::Context) {
        let Some(result) = self.intake.poll() else {
            return;
        };

        match result {
            Ok(image) => {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(
                    [image.width() as usize, image.height() as usize],
                    image.pixels().as_raw(),
                );
                if self
                    .session
                    .commit_background(image, &mut self.scene)
                    .is_some()
                {
                    // Replace the texture in the same frame as the scene
                    // background so a stale image is never displayed.
                    self.background_texture = Some(ctx.load_texture(
                        "background",
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                    self.status = None;
                }
            }
            Err(err) => {
                self.session.fail_loading();
                self.status = Some(format!("Could not load image: {err}"));
            }
        }
    }

    pub(crate) fn clear_canvas(&mut self) {
        self.active_stroke = None;
        self.dragged_element = None;
        self.session.clear(&mut self.scene);
    }

    pub(crate) fn toggle_drawing(&mut self) {
        self.finish_stroke();
        self.session.toggle_drawing();
    }

    pub(crate) fn toggle_typing(&mut self) {
        self.finish_stroke();
        self.session.toggle_typing();
        if self.session.is_typing() {
            self.text_buffer.clear();
            self.text_focus_requested = true;
        }
    }

    /// Stamp a fixed shape, centered on the canvas.
    pub(crate) fn insert_stamp(&mut self, kind: StampKind) {
        if !self.session.state().is_ready() {
            return;
        }
        let center = (self.scene.size() / 2.0).to_pos2();
        self.scene.add_element(factory::create_stamp(
            generate_id(),
            kind,
            center,
            self.settings.color32(),
            self.settings.stamp_stroke_width,
        ));
    }

    /// Commit the text overlay's content as a centered text element.
    pub(crate) fn commit_text(&mut self) {
        let content = self.text_buffer.trim().to_owned();
        self.text_buffer.clear();
        self.session.leave_typing();
        if content.is_empty() {
            return;
        }
        let center = (self.scene.size() / 2.0).to_pos2();
        self.scene.add_element(factory::create_text(
            generate_id(),
            content,
            center,
            self.settings.color32(),
            self.settings.text_size,
        ));
    }

    pub(crate) fn begin_stroke(&mut self, pos: Pos2) {
        let mut builder =
            StrokeBuilder::new(self.settings.color32(), self.settings.brush_thickness);
        builder.add_point(pos);
        self.active_stroke = Some(builder);
    }

    pub(crate) fn extend_stroke(&mut self, pos: Pos2) {
        if let Some(builder) = &mut self.active_stroke {
            builder.add_point(pos);
        }
    }

    pub(crate) fn finish_stroke(&mut self) {
        if let Some(builder) = self.active_stroke.take() {
            if let Some(stroke) = builder.finish(generate_id()) {
                self.scene.add_element(ElementType::Stroke(stroke));
            }
        }
    }

    pub(crate) fn begin_element_drag(&mut self, pos: Pos2) {
        self.dragged_element = self.scene.topmost_hit(pos);
    }

    pub(crate) fn drag_element_by(&mut self, delta: Vec2) {
        use crate::element::Element;
        if let Some(id) = self.dragged_element {
            if let Some(element) = self.scene.element_mut(id) {
                element.translate(delta);
            }
        }
    }

    pub(crate) fn end_element_drag(&mut self) {
        self.dragged_element = None;
    }

    pub(crate) fn export_dialog(&mut self) {
        let id = self.document_id.simple().to_string();
        let default_name = format!("markpad-{}.png", &id[..8]);
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name(default_name)
            .save_file()
        else {
            info!("export cancelled");
            return;
        };

        match self.write_png(&path) {
            Ok(()) => {
                info!("exported annotated image to {}", path.display());
                self.status = Some(format!("Saved {}", path.display()));
            }
            Err(err) => {
                error!("export failed: {err}");
                self.status = Some(format!("Export failed: {err}"));
            }
        }
    }

    fn write_png(&self, path: &Path) -> Result<(), ExportError> {
        let png = self.scene.export_png()?;
        std::fs::write(path, png).map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl eframe::App for MarkpadApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(dropped) = file_handler::take_dropped_image(ctx) {
            match dropped {
                DroppedImage::Path(path) => self.start_loading_path(path),
                DroppedImage::Bytes { name, bytes } => self.start_loading_bytes(&name, bytes),
            }
        }
        file_handler::preview_files_being_dropped(ctx);

        self.poll_intake(ctx);
        if self.session.state().is_loading() {
            // Keep polling while the decode thread works
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        panels::toolbar(self, ctx);
        panels::canvas_panel(self, ctx);
    }
}
