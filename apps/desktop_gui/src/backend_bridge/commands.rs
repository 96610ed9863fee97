//! Backend commands queued from UI to backend worker.

use chrono::{DateTime, Utc};
use client_core::FieldEdit;
use shared::domain::CustomerId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Reload,
    SelectCustomer { id: CustomerId },
    Edit(FieldEdit),
    Submit,
    ResetDraft,
    ToggleMode,
    Cancel,
    /// Carries the notice's raise time so a late dismissal cannot clear a newer notice.
    DismissNotice { raised_at: DateTime<Utc> },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reload => "reload",
            Self::SelectCustomer { .. } => "select_customer",
            Self::Edit(_) => "edit_field",
            Self::Submit => "submit",
            Self::ResetDraft => "reset_draft",
            Self::ToggleMode => "toggle_mode",
            Self::Cancel => "cancel",
            Self::DismissNotice { .. } => "dismiss_notice",
        }
    }
}
