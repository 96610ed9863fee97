use thiserror::Error;

use crate::types::{Notice, NoticeKind};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("request to list service failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("not authorized to access the customer list")]
    Unauthorized,
    #[error("access to the customer list was denied: {0}")]
    Forbidden(String),
    #[error("customer list resource not found: {0}")]
    NotFound(String),
    #[error("list service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response from list service: {0}")]
    InvalidResponse(String),
    #[error("invalid list service url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Customer Name and Address are required.")]
    MissingRequiredFields,
    #[error("Select a customer to edit.")]
    NoSelection,
}

/// Failures surfaced by the form controller. Each one is also recorded as the
/// controller's current notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Error loading customers: {0}")]
    Load(String),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("A customer with this name already exists.")]
    DuplicateName(String),
    #[error("Error: {0}")]
    Persist(String),
}

impl FormError {
    pub fn kind(&self) -> NoticeKind {
        match self {
            Self::Validation(_) | Self::DuplicateName(_) => NoticeKind::Warning,
            Self::Load(_) | Self::Persist(_) => NoticeKind::Error,
        }
    }

    pub fn notice(&self) -> Notice {
        Notice::new(self.kind(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_error_kind() {
        assert_eq!(
            FormError::from(ValidationError::MissingRequiredFields).kind(),
            NoticeKind::Warning
        );
        assert_eq!(
            FormError::DuplicateName("Acme".into()).kind(),
            NoticeKind::Warning
        );
        assert_eq!(FormError::Load("offline".into()).kind(), NoticeKind::Error);
        assert_eq!(FormError::Persist("offline".into()).kind(), NoticeKind::Error);
    }

    #[test]
    fn notice_text_carries_cause() {
        let notice = FormError::Persist("list service returned 500: boom".into()).notice();
        assert_eq!(notice.text, "Error: list service returned 500: boom");
        assert_eq!(notice.kind, NoticeKind::Error);
    }
}
