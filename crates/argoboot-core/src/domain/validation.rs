use std::collections::{HashMap, HashSet};

use crate::domain::{
    entities::{
        descriptor::{application_name, root_app_base_name},
        environment::{Environment, Environments},
        project_spec::ProjectSpec,
    },
    error::DomainError,
};

/// Centralized cross-entity validation.
///
/// Per-field checks happen while the spec is built; rules that need to see
/// more than one entry at a time live here.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_spec(spec: &ProjectSpec) -> Result<(), DomainError> {
        Self::validate_unique_children(spec)?;
        Self::validate_root_not_shadowed(spec)
    }

    /// Two child apps may not share a sanitized name.
    pub fn validate_unique_children(spec: &ProjectSpec) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for child in spec.child_apps() {
            if !seen.insert(child.name()) {
                return Err(DomainError::DuplicateName {
                    scope: "child app".into(),
                    name: child.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// A child app named like the root app would produce the same
    /// Application name in every environment.
    pub fn validate_root_not_shadowed(spec: &ProjectSpec) -> Result<(), DomainError> {
        let root = root_app_base_name(spec.parent_app().name());
        match spec.child_apps().iter().find(|c| c.name() == root) {
            Some(child) => Err(DomainError::DuplicateName {
                scope: "application".into(),
                name: child.name().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Every Application generated for `env` must get its own name.
    ///
    /// A base that already ends in `-app-<env>` keeps its name, so `svc` and
    /// `svc-app-dev` would both become `svc-app-dev` in `dev`.
    pub fn validate_application_names(
        spec: &ProjectSpec,
        env: &Environment,
    ) -> Result<(), DomainError> {
        let root = root_app_base_name(spec.parent_app().name());
        let bases = std::iter::once(root.as_str()).chain(spec.child_apps().iter().map(|c| c.name()));

        let mut seen: HashMap<String, &str> = HashMap::new();
        for base in bases {
            let name = application_name(base, env);
            if let Some(first) = seen.insert(name.clone(), base) {
                return Err(DomainError::NameCollision {
                    first: first.to_string(),
                    second: base.to_string(),
                    name,
                    environment: env.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn validate_environments(
        spec: &ProjectSpec,
        environments: &Environments,
    ) -> Result<(), DomainError> {
        environments
            .iter()
            .try_for_each(|env| Self::validate_application_names(spec, env))
    }
}
