//! User-facing notifications.
//!
//! Every failure in the core ends up as a [`Notice`] rather than a crash. The binaries print
//! them; a graphical front end would show them as toasts.

use crate::IntakeError;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Info, title, description)
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Success, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_level(NoticeLevel::Error, title, description)
    }

    fn with_level(level: NoticeLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    /// Notice for a failed dashboard action. `action` completes "Failed to ...".
    pub fn from_error(action: &str, err: &IntakeError) -> Self {
        match err {
            IntakeError::Validation(msg) | IntakeError::SubmissionRejected(msg) => {
                Notice::error("Error", msg.clone())
            }
            IntakeError::Transport(source) => {
                Notice::error("Error", format!("Failed to {action}: {source}"))
            }
            IntakeError::CapabilityUnavailable => Notice::error("Speech Not Supported", err.to_string()),
            other => Notice::error("Error", other.to_string()),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{tag}] {}: {}", self.title, self.description)
    }
}
