use std::time::Duration;

use chrono::Utc;
use client_core::{parse_count, FieldEdit, FormSnapshot, NoticeKind};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Customer, CustomerId};
use tokio::sync::watch;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{recovery_hint, UiError, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::widgets;

const SUCCESS_NOTICE_SECS: i64 = 6;
const SELECT_PLACEHOLDER: &str = "Choose a customer...";

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub caption: String,
    pub list_name: String,
    pub site_url: String,
}

/// Text the user is typing, kept locally so partial input (an empty count
/// field, say) is not overwritten by the controller's parsed value.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DraftBuffers {
    revision: u64,
    name: String,
    address: String,
    rig_count: String,
    jack_up_count: String,
    modu_count: String,
    site_url: String,
}

impl DraftBuffers {
    fn from_draft(draft: &Customer, revision: u64) -> Self {
        Self {
            revision,
            name: draft.name.clone(),
            address: draft.address.clone(),
            rig_count: draft.rig_count.to_string(),
            jack_up_count: draft.jack_up_count.to_string(),
            modu_count: draft.modu_count.to_string(),
            site_url: draft.site_url.clone().unwrap_or_default(),
        }
    }

    /// Reloads from the snapshot only when the draft was replaced wholesale.
    fn resync(&mut self, snapshot: &FormSnapshot) -> bool {
        if snapshot.draft_revision == self.revision {
            return false;
        }
        *self = Self::from_draft(&snapshot.draft, snapshot.draft_revision);
        true
    }
}

fn normalize_count(buffer: &mut String) {
    *buffer = parse_count(buffer).to_string();
}

pub struct CustomerDeskApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    config: StartupConfig,
    form_rx: Option<watch::Receiver<FormSnapshot>>,
    snapshot: FormSnapshot,
    buffers: DraftBuffers,
    status: String,
    startup_error: Option<UiError>,
    auto_dismissed_at: Option<chrono::DateTime<Utc>>,
}

impl CustomerDeskApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        config: StartupConfig,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            config,
            form_rx: None,
            snapshot: FormSnapshot::default(),
            buffers: DraftBuffers::from_draft(&Customer::default(), 0),
            status: String::new(),
            startup_error: None,
            auto_dismissed_at: None,
        };
        app.dispatch(BackendCommand::Reload);
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn process_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Attached(rx) => {
                    self.snapshot = rx.borrow().clone();
                    self.form_rx = Some(rx);
                }
                UiEvent::Info(message) => self.status = message,
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    if err.requires_credentials() {
                        self.status = "List service rejected the session credentials".to_string();
                    }
                    self.startup_error = Some(err);
                }
            }
        }

        if let Some(rx) = self.form_rx.as_mut() {
            if rx.has_changed().unwrap_or(false) {
                self.snapshot = rx.borrow_and_update().clone();
            }
        }
        self.buffers.resync(&self.snapshot);
    }

    fn expire_success_notice(&mut self) {
        let Some(notice) = &self.snapshot.notice else {
            return;
        };
        if notice.kind != NoticeKind::Success || self.auto_dismissed_at == Some(notice.raised_at) {
            return;
        }
        let age = Utc::now().signed_duration_since(notice.raised_at);
        if age >= chrono::Duration::seconds(SUCCESS_NOTICE_SECS) {
            let raised_at = notice.raised_at;
            self.auto_dismissed_at = Some(raised_at);
            self.dispatch(BackendCommand::DismissNotice { raised_at });
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(&self.config.caption);
            if self.snapshot.busy {
                ui.add(egui::Spinner::new());
            }
        });
        ui.small(
            egui::RichText::new(format!(
                "List '{}' at {}",
                self.config.list_name, self.config.site_url
            ))
            .weak(),
        );
    }

    fn show_banners(&mut self, ui: &mut egui::Ui) {
        if let Some(err) = self.startup_error.clone() {
            let notice = client_core::Notice::new(NoticeKind::Error, err.message());
            if widgets::notice_banner(ui, &notice, recovery_hint(&err)) {
                self.startup_error = None;
            }
            ui.add_space(6.0);
        }

        if let Some(notice) = self.snapshot.notice.clone() {
            let hint = UiError::from_notice(&notice)
                .as_ref()
                .and_then(recovery_hint);
            if widgets::notice_banner(ui, &notice, hint) {
                self.dispatch(BackendCommand::DismissNotice {
                    raised_at: notice.raised_at,
                });
            }
            ui.add_space(6.0);
        }
    }

    fn show_selector(&mut self, ui: &mut egui::Ui, enabled: bool) {
        let selected = self.snapshot.mode.selected();
        let selected_text = selected
            .and_then(|id| self.snapshot.options.iter().find(|option| option.id == id))
            .map(|option| option.label.clone())
            .unwrap_or_else(|| SELECT_PLACEHOLDER.to_string());

        let mut picked: Option<CustomerId> = None;
        widgets::field_label(ui, "Select Customer to Edit", false);
        ui.add_enabled_ui(enabled, |ui| {
            egui::ComboBox::from_id_salt("customer_select")
                .selected_text(selected_text)
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    for option in &self.snapshot.options {
                        let is_selected = selected == Some(option.id);
                        if ui.selectable_label(is_selected, &option.label).clicked() && !is_selected {
                            picked = Some(option.id);
                        }
                    }
                });
        });

        if let Some(id) = picked {
            self.dispatch(BackendCommand::SelectCustomer { id });
        }
    }

    fn show_fields(&mut self, ui: &mut egui::Ui, enabled: bool) -> Vec<FieldEdit> {
        let mut edits = Vec::new();
        let is_add = self.snapshot.mode.is_add();
        let buffers = &mut self.buffers;

        widgets::field_label(ui, "Customer Name", true);
        if widgets::text_field(ui, "customer_name", &mut buffers.name, "", enabled && is_add)
            .changed()
        {
            edits.push(FieldEdit::Name(buffers.name.clone()));
        }
        if is_add && self.snapshot.duplicate_name {
            ui.colored_label(
                egui::Color32::from_rgb(220, 170, 70),
                "A customer with this name already exists.",
            );
        }

        widgets::field_label(ui, "Address", true);
        if widgets::multiline_field(ui, "customer_address", &mut buffers.address, enabled)
            .changed()
        {
            edits.push(FieldEdit::Address(buffers.address.clone()));
        }

        let counts: [(&str, &'static str, &mut String, fn(String) -> FieldEdit); 3] = [
            ("Number of Rigs", "rig_count", &mut buffers.rig_count, FieldEdit::RigCount),
            (
                "Number of Jack Ups",
                "jack_up_count",
                &mut buffers.jack_up_count,
                FieldEdit::JackUpCount,
            ),
            ("Number of MODU's", "modu_count", &mut buffers.modu_count, FieldEdit::ModuCount),
        ];
        for (label, id, buffer, edit) in counts {
            widgets::field_label(ui, label, false);
            let response = widgets::text_field(ui, id, buffer, "0", enabled);
            if response.changed() {
                edits.push(edit(buffer.clone()));
            }
            if response.lost_focus() {
                normalize_count(buffer);
            }
        }

        widgets::field_label(ui, "Site URLs", false);
        if widgets::text_field(
            ui,
            "site_url",
            &mut buffers.site_url,
            "https://",
            enabled,
        )
        .changed()
        {
            edits.push(FieldEdit::SiteUrl(buffers.site_url.clone()));
        }

        edits
    }

    fn show_actions(&mut self, ui: &mut egui::Ui, enabled: bool) {
        let is_add = self.snapshot.mode.is_add();
        let (submit_label, cancel_label) = if is_add {
            ("Add Customer", "Cancel Add")
        } else {
            ("Update Customer", "Cancel Edit")
        };

        ui.horizontal(|ui| {
            if ui
                .add_enabled(
                    enabled && self.snapshot.can_submit,
                    egui::Button::new(egui::RichText::new(submit_label).strong()),
                )
                .clicked()
            {
                self.dispatch(BackendCommand::Submit);
            }
            if ui.add_enabled(enabled, egui::Button::new("Reset")).clicked() {
                self.dispatch(BackendCommand::ResetDraft);
            }
            if ui.add_enabled(enabled, egui::Button::new(cancel_label)).clicked() {
                self.dispatch(BackendCommand::Cancel);
            }
        });
    }

    fn show_form(&mut self, ui: &mut egui::Ui) {
        let enabled = self.form_rx.is_some() && !self.snapshot.busy;

        self.show_header(ui);
        ui.separator();
        self.show_banners(ui);

        let toggle_label = if self.snapshot.mode.is_add() {
            "Edit Existing Customers"
        } else {
            "Add New Customer"
        };
        if ui.add_enabled(enabled, egui::Button::new(toggle_label)).clicked() {
            self.dispatch(BackendCommand::ToggleMode);
        }
        ui.add_space(8.0);

        if !self.snapshot.mode.is_add() {
            self.show_selector(ui, enabled);
            ui.add_space(6.0);
        }

        for edit in self.show_fields(ui, enabled) {
            self.dispatch(BackendCommand::Edit(edit));
        }
        ui.add_space(10.0);
        self.show_actions(ui, enabled);

        ui.add_space(6.0);
        widgets::status_line(ui, &self.status);
    }
}

impl eframe::App for CustomerDeskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_events();
        self.expire_success_notice();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| self.show_form(ui));
        });

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use client_core::FormMode;

    use super::*;

    fn acme() -> Customer {
        Customer {
            id: Some(CustomerId(7)),
            name: "Acme".into(),
            address: "1 Dock Rd".into(),
            rig_count: 2,
            jack_up_count: 0,
            modu_count: 1,
            site_url: Some("https://acme.example".into()),
        }
    }

    #[test]
    fn buffers_follow_wholesale_draft_replacement_only() {
        let mut buffers = DraftBuffers::from_draft(&Customer::default(), 0);
        buffers.rig_count.clear();

        let mut snapshot = FormSnapshot {
            draft: acme(),
            mode: FormMode::Edit {
                selected: Some(CustomerId(7)),
            },
            ..FormSnapshot::default()
        };
        assert!(!buffers.resync(&snapshot));
        assert_eq!(buffers.rig_count, "");

        snapshot.draft_revision = 1;
        assert!(buffers.resync(&snapshot));
        assert_eq!(buffers.name, "Acme");
        assert_eq!(buffers.rig_count, "2");
        assert_eq!(buffers.site_url, "https://acme.example");
    }

    #[test]
    fn count_buffers_normalize_like_the_controller() {
        let mut buffer = " 12abc".to_string();
        normalize_count(&mut buffer);
        assert_eq!(buffer, "12");

        let mut buffer = "-3".to_string();
        normalize_count(&mut buffer);
        assert_eq!(buffer, "0");

        let mut buffer = String::new();
        normalize_count(&mut buffer);
        assert_eq!(buffer, "0");
    }
}
