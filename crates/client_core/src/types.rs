use chrono::{DateTime, Utc};
use shared::domain::{Customer, CustomerId, CustomerOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
    Success,
}

/// Dismissible status banner shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, text)
    }
}

/// Add mode never carries a selection; edit mode may or may not have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit { selected: Option<CustomerId> },
}

impl FormMode {
    pub fn is_add(&self) -> bool {
        matches!(self, Self::Add)
    }

    pub fn selected(&self) -> Option<CustomerId> {
        match self {
            Self::Add => None,
            Self::Edit { selected } => *selected,
        }
    }
}

impl Default for FormMode {
    fn default() -> Self {
        Self::Edit { selected: None }
    }
}

/// A single field change, carrying the raw input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Name(String),
    Address(String),
    RigCount(String),
    JackUpCount(String),
    ModuCount(String),
    SiteUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(Customer),
    Updated(CustomerId),
}

/// Read-only view of the controller published after every state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub options: Vec<CustomerOption>,
    pub mode: FormMode,
    pub draft: Customer,
    pub busy: bool,
    pub notice: Option<Notice>,
    /// Bumped whenever the draft is replaced wholesale rather than edited.
    pub draft_revision: u64,
    pub can_submit: bool,
    pub duplicate_name: bool,
}
