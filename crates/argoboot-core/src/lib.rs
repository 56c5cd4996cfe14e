//! argo-bootstrap core - hexagonal architecture implementation
//!
//! This crate provides the domain and application layers of argo-bootstrap,
//! the ArgoCD "App of Apps" manifest generator, following hexagonal (ports
//! and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        argoboot-cli (argo-bootstrap)    │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (BootstrapService, AppOfAppsGenerator, │
//! │   DeploymentScaffolder, ...)            │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (Filesystem, TemplateRenderer,         │
//! │   RepositoryStager, GitOpsClient)       │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    argoboot-adapters (Infrastructure)   │
//! │  (LocalFilesystem, SimpleRenderer,      │
//! │   GitCli, ArgoCdCli)                    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (ProjectSpec, Environments, sanitize)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use argoboot_core::prelude::*;
//!
//! let spec = ProjectSpec::from_yaml(&std::fs::read_to_string("argo_proj.yml")?)?;
//! let envs = Environments::parse(["dev", "qa", "prod"])?;
//!
//! // With injected adapters:
//! // let generator = AppOfAppsGenerator::new(&renderer, &filesystem);
//! // generator.generate(&spec, &ParentLayout::new("./out"), &envs)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        AppOfAppsGenerator, ApplicationDescriptorBuilder, BootstrapService, Collaborators,
        DeploymentScaffolder, GenerationReport, ProjectDescriptorGenerator, WorkflowSettings,
        ports::{CommitOutcome, Filesystem, GitOpsClient, RepositoryStager, TemplateRenderer},
    };
    pub use crate::domain::{
        Bindings, ChildLayout, Environment, Environments, ParentLayout, ProjectDocument,
        ProjectSpec, sanitize,
    };
    pub use crate::error::{BootstrapError, BootstrapResult, StageContext};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
