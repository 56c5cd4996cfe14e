pub mod bindings;
pub mod descriptor;
pub mod environment;
pub mod layout;
pub mod project_spec;

pub use crate::domain::DomainError;
pub use bindings::Bindings;
pub use descriptor::{
    AppDetails, ApplicationDescriptor, ApplicationRequest, ProjectDescriptor,
};
pub use environment::{Environment, Environments};
pub use layout::{ChildLayout, ParentLayout};
pub use project_spec::{ChildAppSpec, ParentApp, ProjectDocument, ProjectInfo, ProjectSpec};
