//! Unified error handling for argo-bootstrap core.
//!
//! Wraps domain and application errors, and carries the human-readable stage
//! description ("Create root-app-dev.yml") a failure happened in.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BootstrapError {
    /// Errors from the domain layer (spec validation).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (ports and collaborators).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// A failure wrapped with the stage it happened in.
    #[error("{stage}: {source}")]
    Stage {
        stage: String,
        source: Box<BootstrapError>,
    },

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl BootstrapError {
    /// Wrap `self` with a stage description.
    pub fn in_stage(self, stage: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, below every stage wrapper.
    pub fn root_cause(&self) -> &BootstrapError {
        match self {
            Self::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Stage descriptions from outermost to innermost.
    pub fn stages(&self) -> Vec<&str> {
        let mut stages = Vec::new();
        let mut current = self;
        while let Self::Stage { stage, source } = current {
            stages.push(stage.as_str());
            current = source;
        }
        stages
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Stage { source, .. } => source.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Run 'argo-bootstrap config list' to inspect the effective settings".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in argo-bootstrap".into(),
                "Please report it with the output of a -vvv run".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Configuration => ErrorCategory::Configuration,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Stage { source, .. } => source.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self.root_cause() {
            Self::Application(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Configuration,
    /// An external tool (git, argocd, kubectl) failed.
    External,
    Internal,
}

/// Convenient result type alias.
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Extension trait for wrapping errors with a stage description.
pub trait StageContext<T> {
    fn stage(self, stage: impl Into<String>) -> BootstrapResult<T>;

    /// Like [`stage`](Self::stage), building the description only on failure.
    fn with_stage<F: FnOnce() -> String>(self, f: F) -> BootstrapResult<T>;
}

impl<T, E> StageContext<T> for Result<T, E>
where
    E: Into<BootstrapError>,
{
    fn stage(self, stage: impl Into<String>) -> BootstrapResult<T> {
        self.map_err(|e| e.into().in_stage(stage))
    }

    fn with_stage<F: FnOnce() -> String>(self, f: F) -> BootstrapResult<T> {
        self.map_err(|e| e.into().in_stage(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing() -> BootstrapError {
        DomainError::MissingField {
            field: "argocd.project.name".into(),
        }
        .into()
    }

    #[test]
    fn stage_wrapping_keeps_root_cause_and_order() {
        let err = missing()
            .in_stage("Load argo_proj.yml")
            .in_stage("setup");

        assert_eq!(err.stages(), ["setup", "Load argo_proj.yml"]);
        assert_eq!(err.root_cause(), &missing());
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.suggestions(), missing().suggestions());
    }

    #[test]
    fn display_prefixes_stage() {
        let err = missing().in_stage("Create root-app-dev.yml");
        assert!(err.to_string().starts_with("Create root-app-dev.yml: "));
    }

    #[test]
    fn stage_context_wraps_foreign_errors() {
        let r: Result<(), ApplicationError> = Err(ApplicationError::StoreLockError);
        let err = r.stage("Write file").unwrap_err();
        assert_eq!(err.stages(), ["Write file"]);
        assert!(err.is_retryable());
    }

    #[test]
    fn command_failures_are_external() {
        let err: BootstrapError = ApplicationError::CommandFailed {
            command: "git push".into(),
            reason: "rejected".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::External);
    }
}
