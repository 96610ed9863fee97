//! Small reusable widgets for the customer form.

use client_core::{Notice, NoticeKind};
use eframe::egui;

fn banner_colors(kind: NoticeKind) -> (egui::Color32, egui::Stroke) {
    match kind {
        NoticeKind::Error => (
            egui::Color32::from_rgb(111, 53, 53),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
        ),
        NoticeKind::Warning => (
            egui::Color32::from_rgb(110, 88, 38),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(186, 150, 70)),
        ),
        NoticeKind::Success => (
            egui::Color32::from_rgb(44, 94, 60),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(88, 160, 110)),
        ),
        NoticeKind::Info => (
            egui::Color32::from_rgb(45, 70, 110),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(90, 125, 180)),
        ),
    }
}

/// Draws the notice banner. Returns true when Dismiss was clicked.
pub fn notice_banner(ui: &mut egui::Ui, notice: &Notice, hint: Option<&str>) -> bool {
    let (fill, stroke) = banner_colors(notice.kind);
    let mut dismissed = false;

    egui::Frame::NONE
        .fill(fill)
        .stroke(stroke)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(&notice.text).color(egui::Color32::WHITE));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Dismiss").clicked() {
                        dismissed = true;
                    }
                });
            });
            if let Some(hint) = hint {
                ui.small(egui::RichText::new(hint).color(egui::Color32::LIGHT_GRAY));
            }
        });

    dismissed
}

/// Plain status line for worker and queue messages that are not form notices.
pub fn status_line(ui: &mut egui::Ui, status: &str) {
    if !status.is_empty() {
        ui.small(egui::RichText::new(status).weak());
    }
}

pub fn field_label(ui: &mut egui::Ui, label: &str, required: bool) {
    let text = if required {
        format!("{label} *")
    } else {
        label.to_string()
    };
    ui.label(egui::RichText::new(text).strong());
}

pub fn text_field(
    ui: &mut egui::Ui,
    id: &'static str,
    value: &mut String,
    hint: &str,
    enabled: bool,
) -> egui::Response {
    let edit = egui::TextEdit::singleline(value)
        .id_salt(id)
        .hint_text(hint)
        .desired_width(f32::INFINITY);
    ui.add_enabled(enabled, edit)
}

pub fn multiline_field(
    ui: &mut egui::Ui,
    id: &'static str,
    value: &mut String,
    enabled: bool,
) -> egui::Response {
    let edit = egui::TextEdit::multiline(value)
        .id_salt(id)
        .desired_rows(3)
        .desired_width(f32::INFINITY);
    ui.add_enabled(enabled, edit)
}
