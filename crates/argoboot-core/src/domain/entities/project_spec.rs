//! Project specification model and loader.
//!
//! `argo_proj.yml` is parsed in two steps:
//!
//! 1. [`ProjectDocument`] mirrors the YAML 1-to-1 with every field optional,
//!    so a missing key is a [`DomainError::MissingField`] instead of a serde
//!    error with a line number nobody can act on.
//! 2. [`ProjectSpec::load`] validates the document, sanitizes every name
//!    field exactly once, and produces the typed model that all generators
//!    consume. A `ProjectSpec` therefore never holds an unsanitized name.

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    sanitize::{is_cluster_safe, sanitize},
    validation::DomainValidator,
};

/// Destination used when the document does not name one.
pub const DEFAULT_DESTINATION_CLUSTER: &str = "in-cluster";

/// Chart version used when `parent_app.version` is omitted.
pub const DEFAULT_APP_VERSION: &str = "0.1.0";

// ── Raw document ──────────────────────────────────────────────────────────────

/// Deserialised `argo_proj.yml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(default)]
    pub argocd: Option<ArgoCdSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgoCdSection {
    #[serde(default)]
    pub project: Option<ProjectSection>,
    #[serde(default)]
    pub parent_app: Option<ParentAppSection>,
    #[serde(default)]
    pub child_apps: Option<ChildAppsSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentAppSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildAppsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_cluster: Option<String>,
    #[serde(default)]
    pub app: Vec<ChildAppEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildAppEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_plugin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_path: Option<String>,
}

impl ProjectDocument {
    /// Parse YAML text into a raw document.
    pub fn from_yaml(text: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(text).map_err(|e| DomainError::InvalidDocument {
            reason: e.to_string(),
        })
    }

    pub fn to_yaml(&self) -> Result<String, DomainError> {
        serde_yaml::to_string(self).map_err(|e| DomainError::InvalidDocument {
            reason: e.to_string(),
        })
    }
}

// ── Typed model ───────────────────────────────────────────────────────────────

/// `project` block: the AppProject every generated Application belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    name: String,
    description: String,
}

impl ProjectInfo {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// `parent_app` block: the repository holding the App of Apps manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentApp {
    name: String,
    repo_url: String,
    version: String,
}

impl ParentApp {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// One entry of `child_apps.app`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildAppSpec {
    name: String,
    namespace: String,
    repo_url: String,
    deploy_plugin: Option<String>,
    manifest_path: Option<String>,
}

impl ChildAppSpec {
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Base namespace, without any environment suffix.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }
    pub fn deploy_plugin(&self) -> Option<&str> {
        self.deploy_plugin.as_deref()
    }
    /// Explicit source path override, if the document set one.
    pub fn manifest_path(&self) -> Option<&str> {
        self.manifest_path.as_deref()
    }
}

/// Validated, sanitized project specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    project: ProjectInfo,
    parent_app: ParentApp,
    child_apps: Vec<ChildAppSpec>,
    destination_cluster: String,
}

impl ProjectSpec {
    /// Parse and validate YAML text in one step.
    pub fn from_yaml(text: &str) -> Result<Self, DomainError> {
        Self::load(&ProjectDocument::from_yaml(text)?)
    }

    /// Validate a raw document and build the typed model.
    ///
    /// Pure: nothing is written anywhere.
    pub fn load(doc: &ProjectDocument) -> Result<Self, DomainError> {
        let argocd = doc
            .argocd
            .as_ref()
            .ok_or_else(|| DomainError::missing("argocd"))?;

        let project = argocd
            .project
            .as_ref()
            .ok_or_else(|| DomainError::missing("argocd.project"))?;
        let project = ProjectInfo {
            name: required_name(project.name.as_deref(), "argocd.project.name")?,
            description: project.description.clone().unwrap_or_default(),
        };

        let parent = argocd
            .parent_app
            .as_ref()
            .ok_or_else(|| DomainError::missing("argocd.parent_app"))?;
        let parent_app = ParentApp {
            name: required_name(parent.name.as_deref(), "argocd.parent_app.name")?,
            repo_url: required_text(parent.repo_url.as_deref(), "argocd.parent_app.repo_url")?,
            version: optional_text(parent.version.as_deref())
                .unwrap_or_else(|| DEFAULT_APP_VERSION.to_string()),
        };

        let section = argocd.child_apps.clone().unwrap_or_default();
        let child_apps = section
            .app
            .iter()
            .enumerate()
            .map(|(i, entry)| load_child(i, entry))
            .collect::<Result<Vec<_>, _>>()?;

        let destination_cluster = optional_text(section.destination_cluster.as_deref())
            .unwrap_or_else(|| DEFAULT_DESTINATION_CLUSTER.to_string());

        let spec = Self {
            project,
            parent_app,
            child_apps,
            destination_cluster,
        };
        DomainValidator::validate_spec(&spec)?;
        Ok(spec)
    }

    /// Render the spec back into document form, with sanitized names.
    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            argocd: Some(ArgoCdSection {
                project: Some(ProjectSection {
                    name: Some(self.project.name.clone()),
                    description: Some(self.project.description.clone()),
                }),
                parent_app: Some(ParentAppSection {
                    name: Some(self.parent_app.name.clone()),
                    repo_url: Some(self.parent_app.repo_url.clone()),
                    version: Some(self.parent_app.version.clone()),
                }),
                child_apps: Some(ChildAppsSection {
                    destination_cluster: Some(self.destination_cluster.clone()),
                    app: self
                        .child_apps
                        .iter()
                        .map(|c| ChildAppEntry {
                            name: Some(c.name.clone()),
                            namespace: Some(c.namespace.clone()),
                            repo_url: Some(c.repo_url.clone()),
                            deploy_plugin: c.deploy_plugin.clone(),
                            manifest_path: c.manifest_path.clone(),
                        })
                        .collect(),
                }),
            }),
        }
    }

    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    pub fn parent_app(&self) -> &ParentApp {
        &self.parent_app
    }

    pub fn child_apps(&self) -> &[ChildAppSpec] {
        &self.child_apps
    }

    /// Cluster child applications are deployed to.
    pub fn destination_cluster(&self) -> &str {
        &self.destination_cluster
    }

    /// Every distinct repository URL: children first, then the parent.
    pub fn repositories(&self, children_only: bool) -> Vec<&str> {
        let mut repos: Vec<&str> = Vec::new();
        let children = self.child_apps.iter().map(ChildAppSpec::repo_url);
        let parent = (!children_only).then(|| self.parent_app.repo_url.as_str());

        for url in children.chain(parent) {
            if !repos.contains(&url) {
                repos.push(url);
            }
        }
        repos
    }
}

fn load_child(index: usize, entry: &ChildAppEntry) -> Result<ChildAppSpec, DomainError> {
    let field = |name: &str| format!("argocd.child_apps.app[{index}].{name}");

    Ok(ChildAppSpec {
        name: required_name(entry.name.as_deref(), &field("name"))?,
        namespace: required_name(entry.namespace.as_deref(), &field("namespace"))?,
        repo_url: required_text(entry.repo_url.as_deref(), &field("repo_url"))?,
        deploy_plugin: optional_text(entry.deploy_plugin.as_deref()),
        manifest_path: optional_text(entry.manifest_path.as_deref()),
    })
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required_text(value: Option<&str>, field: &str) -> Result<String, DomainError> {
    optional_text(value).ok_or_else(|| DomainError::missing(field))
}

fn required_name(value: Option<&str>, field: &str) -> Result<String, DomainError> {
    let raw = required_text(value, field)?;
    let name = sanitize(&raw);
    if is_cluster_safe(&name) {
        Ok(name)
    } else {
        Err(DomainError::InvalidName {
            field: field.to_string(),
            value: raw,
        })
    }
}
