use eframe::egui;

use crate::app::MarkpadApp;
use crate::element::StampKind;

const STAMP_BUTTONS: [(StampKind, &str); 4] = [
    (StampKind::Arrow, "➡"),
    (StampKind::Circle, "⭕"),
    (StampKind::Rectangle, "⬜"),
    (StampKind::Cross, "❌"),
];

pub fn toolbar(app: &mut MarkpadApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            if ui.button("Open…").clicked() {
                app.open_image_dialog();
            }

            let ready = app.session().state().is_ready();
            if ui.add_enabled(ready, egui::Button::new("Clear")).clicked() {
                app.clear_canvas();
            }
            if ui
                .add_enabled(ready, egui::Button::new("Save PNG…"))
                .clicked()
            {
                app.export_dialog();
            }

            ui.separator();

            let drawing = app.session().is_drawing();
            if ui
                .add_enabled(ready, egui::SelectableLabel::new(drawing, "✏ Draw"))
                .on_hover_text("Free-hand drawing")
                .clicked()
            {
                app.toggle_drawing();
            }
            let typing = app.session().is_typing();
            if ui
                .add_enabled(ready, egui::SelectableLabel::new(typing, "🔤 Text"))
                .on_hover_text("Place a text annotation")
                .clicked()
            {
                app.toggle_typing();
            }

            ui.separator();

            for (kind, label) in STAMP_BUTTONS {
                if ui
                    .add_enabled(ready, egui::Button::new(label))
                    .on_hover_text(format!("Insert {}", kind.label()))
                    .clicked()
                {
                    app.insert_stamp(kind);
                }
            }

            ui.separator();

            ui.label("Color:");
            let mut color = app.settings().color32();
            if egui::color_picker::color_edit_button_srgba(
                ui,
                &mut color,
                egui::color_picker::Alpha::Opaque,
            )
            .changed()
            {
                app.settings_mut().set_color32(color);
            }

            ui.label("Brush:");
            ui.add(egui::Slider::new(
                &mut app.settings_mut().brush_thickness,
                1.0..=20.0,
            ));

            ui.label("Text size:");
            ui.add(egui::Slider::new(
                &mut app.settings_mut().text_size,
                12.0..=80.0,
            ));
        });

        if let Some(status) = app.status() {
            ui.label(egui::RichText::new(status).weak());
        }
    });
}
