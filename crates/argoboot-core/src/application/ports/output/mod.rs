//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `argoboot-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::Bindings;
use crate::error::BootstrapResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `argoboot_adapters::filesystem::LocalFilesystem` (production)
/// - `argoboot_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> BootstrapResult<()>;

    /// Create or overwrite a file. The parent directory must already exist.
    fn write_file(&self, path: &Path, content: &str) -> BootstrapResult<()>;

    fn read_to_string(&self, path: &Path) -> BootstrapResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> BootstrapResult<()>;

    /// Remove everything inside `path`, keeping `path` itself.
    /// Creates `path` when it does not exist yet.
    fn clear_dir(&self, path: &Path) -> BootstrapResult<()>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `argoboot_adapters::renderer::SimpleRenderer` (strict placeholder substitution)
pub trait TemplateRenderer: Send + Sync {
    /// Render a named template. Any placeholder without a binding is an error.
    fn render(&self, name: &str, bindings: &Bindings) -> BootstrapResult<String>;

    /// Raw text of a named template, for files copied verbatim.
    fn source(&self, name: &str) -> BootstrapResult<String>;
}

/// Result of a commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed { hash: String },
    /// Working tree was clean; nothing was pushed.
    NothingToCommit,
}

/// Port for git repository staging.
///
/// The core only supplies paths and messages; it never inspects git state.
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryStager: Send + Sync {
    fn clone_repository(&self, url: &str, target: &Path) -> BootstrapResult<()>;

    /// Stage everything under `path`, commit and push.
    fn commit_and_push(&self, path: &Path, message: &str) -> BootstrapResult<CommitOutcome>;
}

/// Port for the GitOps controller (argocd CLI and kubectl).
#[cfg_attr(test, mockall::automock)]
pub trait GitOpsClient: Send + Sync {
    fn login(&self) -> BootstrapResult<()>;

    fn add_repository(&self, url: &str) -> BootstrapResult<()>;

    fn remove_repository(&self, url: &str) -> BootstrapResult<()>;

    /// Apply a manifest file to the cluster.
    fn apply_manifest(&self, path: &Path) -> BootstrapResult<()>;

    fn sync_app(&self, name: &str) -> BootstrapResult<()>;

    /// Sync every application matching a label selector.
    fn sync_selector(&self, selector: &str) -> BootstrapResult<()>;

    /// Delete an application and, by cascade, its children.
    fn delete_app(&self, name: &str) -> BootstrapResult<()>;

    fn delete_project(&self, name: &str) -> BootstrapResult<()>;
}
