//! Infrastructure adapters for argo-bootstrap.
//!
//! This crate implements the ports defined in `argoboot-core::application::ports`.
//! It contains all external dependencies and I/O operations: the local
//! filesystem, the template catalogue and renderer, and the `git`, `argocd`
//! and `kubectl` command-line tools.

pub mod argocd;
pub mod builtin_templates;
pub mod command;
pub mod filesystem;
pub mod git;
pub mod renderer;
pub mod template_loader;

// Re-export commonly used adapters
pub use argocd::{ArgoCdCli, ArgoCdSettings};
pub use builtin_templates::TemplateCatalog;
pub use command::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use git::{GitCli, GitSettings, GitTransport};
pub use renderer::SimpleRenderer;
