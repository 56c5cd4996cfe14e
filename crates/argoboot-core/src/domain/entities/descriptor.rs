//! Derived, per-environment manifest descriptors.
//!
//! Descriptors are computed from the [`ProjectSpec`](super::ProjectSpec) on
//! every call and handed to a renderer; none of them is stored.

use serde_json::json;

use crate::domain::entities::{bindings::Bindings, environment::Environment};

/// Namespace the root application lives in.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Destination of the root application.
pub const IN_CLUSTER: &str = "in-cluster";

/// `root-<parent>`: base name of the root application.
pub fn root_app_base_name(parent_app: &str) -> String {
    format!("root-{parent_app}")
}

/// `<base>-app-<env>`.
///
/// A base that already carries the suffix for `env` is returned unchanged,
/// so re-deriving a name never stacks suffixes. Distinct bases can therefore
/// meet on one name; see [`DomainValidator::validate_application_names`].
///
/// [`DomainValidator::validate_application_names`]: crate::domain::DomainValidator::validate_application_names
pub fn application_name(base: &str, env: &Environment) -> String {
    let suffix = format!("-app-{env}");
    if base.ends_with(&suffix) {
        base.to_string()
    } else {
        format!("{base}{suffix}")
    }
}

/// `<project>-<env>`: AppProject name.
pub fn project_name(project: &str, env: &Environment) -> String {
    format!("{project}-{env}")
}

/// `<namespace>-<env>`.
pub fn environment_namespace(namespace: &str, env: &Environment) -> String {
    format!("{namespace}-{env}")
}

/// Label selector matching every child of a root application.
pub fn instance_selector(root_app_name: &str) -> String {
    format!("app.kubernetes.io/instance={root_app_name}")
}

/// `metadata.name` of a generated manifest, if it has one.
pub fn manifest_name(yaml: &str) -> Option<String> {
    let doc: serde_yaml::Value = serde_yaml::from_str(yaml).ok()?;
    doc.get("metadata")?
        .get("name")?
        .as_str()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// What an Application points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDetails {
    /// Base name, before the `-app-<env>` suffix.
    pub name: String,
    pub repo_url: String,
    /// Repo-relative path ArgoCD syncs from.
    pub source_path: String,
    /// Explicit output file name; otherwise `<final name>.yml`.
    pub filename: Option<String>,
}

/// Inputs for one Application manifest, before environment expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRequest {
    pub app: AppDetails,
    pub namespace: String,
    pub destination_cluster: String,
    /// Base project name, before the `-<env>` suffix.
    pub project_name: String,
    pub deploy_plugin: Option<String>,
}

/// A fully-resolved Application manifest for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDescriptor {
    pub name: String,
    pub namespace: String,
    pub destination_cluster: String,
    pub project_name: String,
    pub source_path: String,
    pub repo_url: String,
    pub deploy_plugin: Option<String>,
    pub filename: String,
}

impl ApplicationDescriptor {
    pub fn derive(request: &ApplicationRequest, env: &Environment) -> Self {
        let name = application_name(&request.app.name, env);
        let filename = request
            .app
            .filename
            .clone()
            .unwrap_or_else(|| format!("{name}.yml"));

        Self {
            project_name: project_name(&request.project_name, env),
            namespace: request.namespace.clone(),
            destination_cluster: request.destination_cluster.clone(),
            source_path: request.app.source_path.clone(),
            repo_url: request.app.repo_url.clone(),
            deploy_plugin: request.deploy_plugin.clone(),
            filename,
            name,
        }
    }

    /// Bindings for the `application.yml` template.
    ///
    /// `deploy_plugin` is omitted entirely when unset.
    pub fn bindings(&self) -> Bindings {
        Bindings::new()
            .with(
                "app",
                json!({
                    "name": self.name,
                    "repo_url": self.repo_url,
                    "source_path": self.source_path,
                }),
            )
            .with("namespace", self.namespace.as_str())
            .with("destination_cluster", self.destination_cluster.as_str())
            .with("project_name", self.project_name.as_str())
            .with_optional("deploy_plugin", self.deploy_plugin.as_deref())
    }
}

/// AppProject manifest for one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub name: String,
    pub description: String,
}

impl ProjectDescriptor {
    pub fn derive(project: &str, description: &str, env: &Environment) -> Self {
        Self {
            name: project_name(project, env),
            description: description.to_string(),
        }
    }

    pub fn bindings(&self) -> Bindings {
        Bindings::new()
            .with("project_name", self.name.as_str())
            .with("project_description", self.description.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str) -> Environment {
        Environment::new(name).unwrap()
    }

    fn request(deploy_plugin: Option<&str>) -> ApplicationRequest {
        ApplicationRequest {
            app: AppDetails {
                name: "svc".into(),
                repo_url: "https://example.com/svc.git".into(),
                source_path: "kustomized_helm/overlays/qa".into(),
                filename: None,
            },
            namespace: "payments-qa".into(),
            destination_cluster: "in-cluster".into(),
            project_name: "shop".into(),
            deploy_plugin: deploy_plugin.map(Into::into),
        }
    }

    #[test]
    fn suffix_is_applied_once() {
        let qa = env("qa");
        let once = application_name("svc", &qa);
        assert_eq!(once, "svc-app-qa");
        assert_eq!(application_name(&once, &qa), "svc-app-qa");
        // Another environment's suffix is just part of the base name.
        assert_eq!(application_name("svc-app-dev", &qa), "svc-app-dev-app-qa");
    }

    #[test]
    fn derive_computes_names_and_default_filename() {
        let d = ApplicationDescriptor::derive(&request(None), &env("qa"));
        assert_eq!(d.name, "svc-app-qa");
        assert_eq!(d.project_name, "shop-qa");
        assert_eq!(d.filename, "svc-app-qa.yml");
    }

    #[test]
    fn explicit_filename_wins() {
        let mut req = request(None);
        req.app.filename = Some("root-app-qa.yml".into());
        let d = ApplicationDescriptor::derive(&req, &env("qa"));
        assert_eq!(d.filename, "root-app-qa.yml");
    }

    #[test]
    fn deploy_plugin_binding_only_when_set() {
        let without = ApplicationDescriptor::derive(&request(None), &env("qa")).bindings();
        assert!(without.lookup("deploy_plugin").is_none());

        let with = ApplicationDescriptor::derive(&request(Some("custom")), &env("qa")).bindings();
        assert_eq!(
            with.lookup("deploy_plugin").and_then(|v| v.as_str()),
            Some("custom")
        );
    }

    #[test]
    fn project_descriptor_suffixes_environment() {
        let p = ProjectDescriptor::derive("my-app", "desc", &env("qa"));
        assert_eq!(p.name, "my-app-qa");
        assert_eq!(
            p.bindings().lookup("project_description").and_then(|v| v.as_str()),
            Some("desc")
        );
    }

    #[test]
    fn manifest_name_reads_metadata() {
        let yaml = "apiVersion: argoproj.io/v1alpha1\nkind: Application\nmetadata:\n  name: root-shop-app-dev\n  namespace: argocd\n";
        assert_eq!(manifest_name(yaml).as_deref(), Some("root-shop-app-dev"));
        assert_eq!(manifest_name("kind: Application\n"), None);
        assert_eq!(manifest_name(": not yaml ["), None);
    }

    #[test]
    fn selector_targets_instance_label() {
        assert_eq!(
            instance_selector("root-shop-app-dev"),
            "app.kubernetes.io/instance=root-shop-app-dev"
        );
    }
}
