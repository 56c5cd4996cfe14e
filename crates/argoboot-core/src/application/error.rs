//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the collaborators
//! reached through ports, not business rules. Business rule violations are
//! `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while talking to the outside world.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Unknown template or a placeholder without a binding.
    #[error("Template '{template}' could not be rendered: {reason}")]
    RenderingFailed { template: String, reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// An external command (git, argocd, kubectl) exited unsuccessfully.
    #[error("Command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },

    /// Shared adapter state is unusable (lock poisoned).
    #[error("Adapter state lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RenderingFailed { template, .. } => vec![
                format!("Check the placeholders used by '{}'", template),
                "Templates in ARGOBOOT_TEMPLATES_DIR override the built-in ones".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Re-run from a clean staging directory".into(),
            ],
            Self::CommandFailed { command, .. } => vec![
                format!("Check that '{}' is installed and on PATH", command),
                "Verify credentials (GIT_TOKEN, ARGOCD_USERNAME, ARGOCD_PASSWORD)".into(),
            ],
            Self::StoreLockError => vec!["Try again in a moment".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RenderingFailed { .. } => ErrorCategory::Validation,
            Self::CommandFailed { .. } => ErrorCategory::External,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
        }
    }

    /// `true` for the errors worth a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreLockError | Self::CommandFailed { .. })
    }
}
