//! Built-in template catalogue.
//!
//! Every template argo-bootstrap renders ships inside the binary. A directory
//! of overrides can replace individual templates by name.
//!
//! # Override resolution order
//!
//! 1. An explicit directory passed to [`TemplateCatalog::load`] (the
//!    `templates.dir` configuration key).
//! 2. **`$ARGOBOOT_TEMPLATES_DIR`** environment variable.
//!
//! A configured directory that does not exist is an error; with neither set,
//! only the built-in templates are used.
//!
//! # Environment variable
//!
//! ```env
//! ARGOBOOT_TEMPLATES_DIR=./templates
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument, warn};

use argoboot_core::{
    application::ApplicationError,
    error::{BootstrapError, BootstrapResult},
};

use crate::template_loader::FilesystemTemplateLoader;

pub const TEMPLATES_DIR_ENV: &str = "ARGOBOOT_TEMPLATES_DIR";

/// `(name, content)` for every template compiled into the binary.
pub const BUILTIN: &[(&str, &str)] = &[
    ("application.yml", include_str!("../templates/application.yml")),
    ("project.yml", include_str!("../templates/project.yml")),
    ("namespaces.yml", include_str!("../templates/namespaces.yml")),
    ("deploy/Chart.yaml", include_str!("../templates/deploy/Chart.yaml")),
    (
        "deploy/deployment.yml",
        include_str!("../templates/deploy/deployment.yml"),
    ),
    ("deploy/service.yml", include_str!("../templates/deploy/service.yml")),
    ("deploy/mapping.yml", include_str!("../templates/deploy/mapping.yml")),
    (
        "deploy/kustomization_base.yml",
        include_str!("../templates/deploy/kustomization_base.yml"),
    ),
    (
        "deploy/kustomization_overlays.yml",
        include_str!("../templates/deploy/kustomization_overlays.yml"),
    ),
    (
        "deploy/namespace.yml",
        include_str!("../templates/deploy/namespace.yml"),
    ),
    (
        "deploy/deployment_patch.yml",
        include_str!("../templates/deploy/deployment_patch.yml"),
    ),
];

/// Named template sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, String>,
}

impl TemplateCatalog {
    /// The built-in templates only.
    pub fn builtin() -> Self {
        Self {
            templates: BUILTIN
                .iter()
                .map(|(name, content)| (name.to_string(), content.to_string()))
                .collect(),
        }
    }

    /// Built-ins plus overrides from `dir`, or from `$ARGOBOOT_TEMPLATES_DIR`
    /// when `dir` is `None`.
    #[instrument]
    pub fn load(dir: Option<&Path>) -> BootstrapResult<Self> {
        let mut catalog = Self::builtin();
        match override_dir(dir) {
            Some(dir) => {
                catalog.apply_overrides(&dir)?;
            }
            None => debug!("no template override directory, using built-in templates"),
        }
        Ok(catalog)
    }

    /// Replace or add templates from `dir`. Returns how many were loaded.
    pub fn apply_overrides(&mut self, dir: &Path) -> BootstrapResult<usize> {
        if !dir.is_dir() {
            return Err(BootstrapError::Configuration {
                message: format!("template directory '{}' does not exist", dir.display()),
            });
        }

        let overrides = FilesystemTemplateLoader::new(dir).load_all()?;
        let count = overrides.len();
        for (name, content) in overrides {
            if !self.templates.contains_key(&name) {
                warn!(template = %name, "override has no built-in counterpart");
            }
            self.templates.insert(name, content);
        }

        info!(path = %dir.display(), count, "template overrides loaded");
        Ok(count)
    }

    pub fn with_template(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.templates.insert(name.into(), content.into());
        self
    }

    pub fn get(&self, name: &str) -> BootstrapResult<&str> {
        self.templates.get(name).map(String::as_str).ok_or_else(|| {
            ApplicationError::RenderingFailed {
                template: name.to_string(),
                reason: "unknown template".into(),
            }
            .into()
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn override_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        debug!(path = %dir.display(), "template directory from configuration");
        return Some(dir.to_path_buf());
    }

    std::env::var_os(TEMPLATES_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .inspect(|p| debug!(path = %p.display(), var = TEMPLATES_DIR_ENV, "template directory from environment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builtin_catalogue_is_complete() {
        let catalog = TemplateCatalog::builtin();
        let names: Vec<_> = catalog.names().collect();

        for expected in [
            "application.yml",
            "project.yml",
            "namespaces.yml",
            "deploy/Chart.yaml",
            "deploy/deployment.yml",
            "deploy/service.yml",
            "deploy/mapping.yml",
            "deploy/kustomization_base.yml",
            "deploy/kustomization_overlays.yml",
            "deploy/namespace.yml",
            "deploy/deployment_patch.yml",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        assert_eq!(catalog.len(), BUILTIN.len());
    }

    #[test]
    fn unknown_template_is_a_rendering_error() {
        let err = TemplateCatalog::builtin().get("nope.yml").unwrap_err();
        assert!(err.to_string().contains("nope.yml"));
    }

    #[test]
    fn explicit_directory_overrides_by_name() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("deploy")).unwrap();
        std::fs::write(tmp.path().join("deploy/mapping.yml"), "custom").unwrap();

        let catalog = TemplateCatalog::load(Some(tmp.path())).unwrap();

        assert_eq!(catalog.get("deploy/mapping.yml").unwrap(), "custom");
        assert_eq!(
            catalog.get("project.yml").unwrap(),
            TemplateCatalog::builtin().get("project.yml").unwrap()
        );
    }

    #[test]
    fn missing_explicit_directory_is_a_configuration_error() {
        let tmp = TempDir::new().unwrap();
        let err = TemplateCatalog::load(Some(&tmp.path().join("nope"))).unwrap_err();
        assert!(matches!(err, BootstrapError::Configuration { .. }));
    }
}
