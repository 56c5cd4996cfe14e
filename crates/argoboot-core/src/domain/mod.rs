//! Core domain layer for argo-bootstrap.
//!
//! Pure logic only: the project spec model, name sanitization, environment
//! fan-out and the naming rules every generated manifest follows. All
//! filesystem, git and ArgoCD concerns are reached through the ports defined
//! in the application layer.
//!
//! - **No I/O**: nothing here touches the filesystem or spawns processes
//! - **Sanitize once**: names are normalized when the spec is loaded, never again
//! - **Immutable entities**: all domain objects are Clone + PartialEq

pub mod entities;
pub mod error;
pub mod sanitize;

mod validation;

pub use entities::layout;
pub use entities::{
    AppDetails, ApplicationDescriptor, ApplicationRequest, Bindings, ChildAppSpec, ChildLayout,
    Environment, Environments, ParentApp, ParentLayout, ProjectDescriptor, ProjectDocument,
    ProjectInfo, ProjectSpec,
    descriptor::{
        DEFAULT_NAMESPACE, IN_CLUSTER, application_name, environment_namespace, instance_selector,
        manifest_name, project_name, root_app_base_name,
    },
};
pub use error::{DomainError, ErrorCategory};
pub use sanitize::{is_cluster_safe, redact_repo_url, sanitize};
pub use validation::DomainValidator;
