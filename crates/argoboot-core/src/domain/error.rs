// ============================================================================
// domain/error.rs - VALIDATION ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside stage-wrapped orchestrator errors)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingField { field: String },

    #[error("Duplicate {scope} name after sanitization: '{name}'")]
    DuplicateName { scope: String, name: String },

    #[error("Child apps '{first}' and '{second}' both become '{name}' in environment '{environment}'")]
    NameCollision {
        first: String,
        second: String,
        name: String,
        environment: String,
    },

    #[error("Field '{field}' is not a valid resource name after sanitization: '{value}'")]
    InvalidName { field: String, value: String },

    #[error("No target environments configured")]
    NoEnvironments,

    #[error("Invalid environment identifier: '{0}'")]
    InvalidEnvironment(String),

    #[error("Project spec document could not be parsed: {reason}")]
    InvalidDocument { reason: String },

    // ========================================================================
    // Read-back Errors
    // ========================================================================
    #[error("Generated manifest '{path}' has no metadata.name")]
    MissingManifestName { path: String },
}

impl DomainError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingField { field } => vec![
                format!("Add '{}' to argo_proj.yml", field),
                "Every project, parent app and child app needs a name and repo_url".into(),
            ],
            Self::DuplicateName { scope, name } => vec![
                format!("Two {} entries sanitize to '{}'", scope, name),
                "Underscores become '-' and punctuation is stripped before comparison".into(),
                "Rename one of the entries".into(),
            ],
            Self::NameCollision { second, environment, .. } => vec![
                format!("'{}' already ends in '-app-{}', so no suffix is added", second, environment),
                "Rename one of the child apps".into(),
            ],
            Self::InvalidName { field, .. } => vec![
                format!("'{}' must contain letters, digits or '-'", field),
                "Non-ASCII characters are not allowed in Kubernetes resource names".into(),
            ],
            Self::NoEnvironments => vec![
                "Set 'environments' in the configuration file".into(),
                "Example: environments = [\"dev\", \"qa\", \"prod\"]".into(),
            ],
            Self::InvalidEnvironment(env) => vec![
                format!("Environment '{}' must be lowercase letters, digits or '-'", env),
                "It must also be listed in the configured environments".into(),
            ],
            Self::InvalidDocument { .. } => vec![
                "Check that argo_proj.yml is valid YAML".into(),
                "The top-level key must be 'argocd'".into(),
            ],
            Self::MissingManifestName { path } => vec![
                format!("'{}' was not produced by a setup run", path),
                "Run 'argo-bootstrap setup' before deploying or tearing down".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingManifestName { .. } => ErrorCategory::NotFound,
            Self::NoEnvironments | Self::InvalidEnvironment(_) => ErrorCategory::Configuration,
            _ => ErrorCategory::Validation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    NotFound,
    Internal,
}
