//! Application services - manifest generators and the workflow orchestrator.
//!
//! Generators borrow the ports they need for one call; `BootstrapService`
//! owns the adapters and sequences the generators into workflows.

pub mod app_of_apps;
pub mod deployment_scaffolder;
pub mod descriptor_builder;
pub mod orchestrator;
pub mod project_descriptor;

#[cfg(test)]
pub(crate) mod test_support;

pub use app_of_apps::AppOfAppsGenerator;
pub use deployment_scaffolder::DeploymentScaffolder;
pub use descriptor_builder::ApplicationDescriptorBuilder;
pub use orchestrator::{
    BootstrapService, COMMIT_MESSAGE, Collaborators, GenerationReport, WorkflowSettings,
};
pub use project_descriptor::ProjectDescriptorGenerator;
