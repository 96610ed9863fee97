//! Backend-to-UI events and error classification for the desktop GUI.

use client_core::{FormSnapshot, Notice, NoticeKind};
use tokio::sync::watch;

pub enum UiEvent {
    /// The worker built its controller; form state is read from this receiver.
    Attached(watch::Receiver<FormSnapshot>),
    Info(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Repository,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("not authorized")
            || message_lower.contains("denied")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("invalid list service url")
            || message_lower.contains("required")
            || message_lower.contains("already exists")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timed out")
            || message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("request to list service failed")
            || message_lower.contains("dns")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Classifies an error notice raised by the form controller.
    pub fn from_notice(notice: &Notice) -> Option<Self> {
        (notice.kind == NoticeKind::Error)
            .then(|| Self::from_message(UiErrorContext::Repository, notice.text.clone()))
    }

    pub fn requires_credentials(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Extra guidance shown under an error banner, if any applies.
pub fn recovery_hint(error: &UiError) -> Option<&'static str> {
    match error.category() {
        UiErrorCategory::Auth => {
            Some("Check the access token (ACCESS_TOKEN or --access-token) and relaunch.")
        }
        UiErrorCategory::Transport => {
            Some("The list service is unreachable; check the site URL and network, then retry.")
        }
        UiErrorCategory::Validation | UiErrorCategory::Unknown => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_repository_failures() {
        let auth = UiError::from_message(
            UiErrorContext::Repository,
            "Error loading customers: not authorized to access the customer list",
        );
        assert!(auth.requires_credentials());

        let transport = UiError::from_message(
            UiErrorContext::Repository,
            "Error: request to list service failed: error sending request",
        );
        assert_eq!(transport.category(), UiErrorCategory::Transport);
        assert!(recovery_hint(&transport).is_some());

        let other = UiError::from_message(UiErrorContext::Repository, "Error: list service returned 500: boom");
        assert_eq!(other.category(), UiErrorCategory::Unknown);
        assert!(recovery_hint(&other).is_none());
    }

    #[test]
    fn only_error_notices_are_classified() {
        assert!(UiError::from_notice(&Notice::success("Customer added successfully!")).is_none());
        let warning = Notice::new(NoticeKind::Warning, "A customer with this name already exists.");
        assert!(UiError::from_notice(&warning).is_none());

        let error = Notice::new(NoticeKind::Error, "Error loading customers: access denied");
        let classified = UiError::from_notice(&error).expect("classified");
        assert_eq!(classified.context(), UiErrorContext::Repository);
        assert_eq!(classified.category(), UiErrorCategory::Auth);
    }
}
