use eframe::egui::{self, Color32, Pos2, Rect, Vec2};

use crate::app::MarkpadApp;
use crate::element::Element;
use crate::session::{InteractionMode, SessionState};

pub fn canvas_panel(app: &mut MarkpadApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| match app.session().state() {
        SessionState::Empty => {
            ui.centered_and_justified(|ui| {
                ui.label("Open an image or drop one here to start annotating");
            });
        }
        SessionState::Loading { .. } => {
            ui.centered_and_justified(|ui| {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading image…");
                });
            });
        }
        SessionState::Ready => draw_canvas(app, ui),
    });
}

fn draw_canvas(app: &mut MarkpadApp, ui: &mut egui::Ui) {
    let canvas_size = app.scene().size();

    egui::ScrollArea::both().show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(canvas_size, egui::Sense::click_and_drag());
        let origin = response.rect.min.to_vec2();

        // Background image, stretched to the fitted canvas rect
        if let Some(texture) = app.background_texture() {
            painter.image(
                texture.id(),
                response.rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }

        for element in app.scene().elements() {
            element.draw(&painter, origin);
        }

        if let Some(builder) = app.active_stroke() {
            builder.preview(&painter, origin);
        }

        let response = if app.session().is_drawing() {
            response.on_hover_cursor(egui::CursorIcon::Crosshair)
        } else {
            response
        };

        match app.session().mode() {
            InteractionMode::Drawing => handle_drawing(app, &response, origin),
            InteractionMode::Idle => handle_dragging(app, &response, origin),
            InteractionMode::Typing => {}
        }

        if app.session().is_typing() {
            text_overlay(app, ui.ctx(), response.rect);
        }
    });
}

fn handle_drawing(app: &mut MarkpadApp, response: &egui::Response, origin: Vec2) {
    if let Some(pointer) = response.interact_pointer_pos() {
        let local = pointer - origin;
        if response.drag_started() {
            app.begin_stroke(local);
        } else if response.dragged() {
            app.extend_stroke(local);
        }
    }
    if response.drag_stopped() {
        app.finish_stroke();
    }
}

fn handle_dragging(app: &mut MarkpadApp, response: &egui::Response, origin: Vec2) {
    if response.drag_started() {
        if let Some(pointer) = response.interact_pointer_pos() {
            app.begin_element_drag(pointer - origin);
        }
    } else if response.dragged() {
        app.drag_element_by(response.drag_delta());
    }
    if response.drag_stopped() {
        app.end_element_drag();
    }
}

// The in-canvas text entry shown while typing mode is active; its content
// becomes a text element when focus leaves the field.
fn text_overlay(app: &mut MarkpadApp, ctx: &egui::Context, canvas_rect: Rect) {
    let overlay_pos = canvas_rect.center() - Vec2::new(140.0, 24.0);
    egui::Area::new(egui::Id::new("text_overlay"))
        .order(egui::Order::Foreground)
        .fixed_pos(overlay_pos)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                let response = ui.add(
                    egui::TextEdit::multiline(app.text_buffer_mut())
                        .desired_width(280.0)
                        .desired_rows(2)
                        .font(egui::TextStyle::Heading)
                        .hint_text("Type annotation text"),
                );
                if app.take_text_focus_request() {
                    response.request_focus();
                }
                if response.lost_focus() {
                    app.commit_text();
                }
            });
        });
}
