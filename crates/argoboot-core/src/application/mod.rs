//! Application layer for argo-bootstrap.
//!
//! This layer contains:
//! - **Services**: the manifest generators and the workflow orchestrator
//! - **Ports**: traits for the filesystem, renderer, git and ArgoCD
//! - **Errors**: failures of the collaborators behind those ports
//!
//! Naming and validation rules live in `crate::domain`; services only
//! sequence them against the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    AppOfAppsGenerator, ApplicationDescriptorBuilder, BootstrapService, Collaborators,
    DeploymentScaffolder, GenerationReport, ProjectDescriptorGenerator, WorkflowSettings,
};

pub use ports::{CommitOutcome, Filesystem, GitOpsClient, RepositoryStager, TemplateRenderer};

pub use error::ApplicationError;
