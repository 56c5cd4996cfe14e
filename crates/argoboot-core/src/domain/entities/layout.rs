//! On-disk layout conventions of the parent and child repositories.
//!
//! ```text
//! <parent repo>/
//! ├── argo_proj.yml
//! └── argocd/
//!     ├── root-app-<env>.yml
//!     ├── projects/project-<env>.yml
//!     ├── apps-children/<env>/<child>-app-<env>.yml
//!     └── namespaces/<env>/namespaces-<env>.yml
//!
//! <child repo>/
//! └── kustomized_helm/
//!     ├── helm_base/{Chart.yaml, kustomization.yml, templates/*}
//!     └── overlays/<env>/{namespace.yml, kustomization.yml, patch/*}
//! ```

use std::path::{Path, PathBuf};

use crate::domain::entities::environment::Environment;

pub const SPEC_FILE: &str = "argo_proj.yml";
pub const ARGOCD_DIR: &str = "argocd";
pub const KUSTOMIZED_HELM_DIR: &str = "kustomized_helm";

/// Paths inside the parent (App of Apps) repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLayout {
    root: PathBuf,
}

impl ParentLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn spec_file(&self) -> PathBuf {
        self.root.join(SPEC_FILE)
    }

    pub fn argocd_dir(&self) -> PathBuf {
        self.root.join(ARGOCD_DIR)
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.argocd_dir().join("projects")
    }

    pub fn project_file(&self, env: &Environment) -> PathBuf {
        self.projects_dir().join(project_file_name(env))
    }

    pub fn root_app_file(&self, env: &Environment) -> PathBuf {
        self.argocd_dir().join(root_app_file_name(env))
    }

    pub fn children_dir(&self, env: &Environment) -> PathBuf {
        self.root.join(children_source_path(env))
    }

    pub fn namespaces_dir(&self, env: &Environment) -> PathBuf {
        self.argocd_dir().join("namespaces").join(env.as_str())
    }

    pub fn namespaces_file(&self, env: &Environment) -> PathBuf {
        self.namespaces_dir(env).join(format!("namespaces-{env}.yml"))
    }
}

/// Paths inside one child application repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildLayout {
    root: PathBuf,
}

impl ChildLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn helm_base_dir(&self) -> PathBuf {
        self.root.join(KUSTOMIZED_HELM_DIR).join("helm_base")
    }

    pub fn helm_templates_dir(&self) -> PathBuf {
        self.helm_base_dir().join("templates")
    }

    pub fn overlay_dir(&self, env: &Environment) -> PathBuf {
        self.root.join(overlay_source_path(env))
    }

    pub fn overlay_patch_dir(&self, env: &Environment) -> PathBuf {
        self.overlay_dir(env).join("patch")
    }
}

pub fn root_app_file_name(env: &Environment) -> String {
    format!("root-app-{env}.yml")
}

pub fn project_file_name(env: &Environment) -> String {
    format!("project-{env}.yml")
}

/// Source path of the root app: the children directory, repo-relative.
pub fn children_source_path(env: &Environment) -> String {
    format!("{ARGOCD_DIR}/apps-children/{env}")
}

/// Default source path of a child app: its overlay for `env`.
pub fn overlay_source_path(env: &Environment) -> String {
    format!("{KUSTOMIZED_HELM_DIR}/overlays/{env}")
}
