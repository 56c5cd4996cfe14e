//! Application ports (traits) for external dependencies.
//!
//! Ports define what the application needs from the outside world. Adapters
//! in `argoboot-adapters` implement them.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by services, implemented by infrastructure
//!   - `Filesystem`: staging directory reads and writes
//!   - `TemplateRenderer`: manifest templates
//!   - `RepositoryStager`: git clone / commit / push
//!   - `GitOpsClient`: argocd and kubectl
//!
//! - **Driving (Input) Ports**: the CLI calls `BootstrapService` directly

pub mod output;

pub use output::{CommitOutcome, Filesystem, GitOpsClient, RepositoryStager, TemplateRenderer};

#[cfg(test)]
pub use output::{MockGitOpsClient, MockRepositoryStager};
