//! Kustomized Helm scaffolding through the built-in templates.

use std::path::Path;

use argoboot_adapters::{MemoryFilesystem, SimpleRenderer};
use argoboot_core::prelude::*;

const SPEC: &str = r#"
argocd:
  project:
    name: shop
  parent_app:
    name: shop
    repo_url: https://github.com/acme/shop-argocd.git
    version: 2.0.1
  child_apps:
    app:
      - name: api
        namespace: payments
        repo_url: https://github.com/acme/api.git
"#;

fn scaffold(envs: &[&str]) -> MemoryFilesystem {
    let spec = ProjectSpec::from_yaml(SPEC).unwrap();
    let envs = Environments::parse(envs.iter().copied()).unwrap();
    let fs = MemoryFilesystem::new();
    let renderer = SimpleRenderer::default();

    DeploymentScaffolder::new(&renderer, &fs)
        .scaffold(
            &spec.child_apps()[0],
            spec.parent_app(),
            &ChildLayout::new("/child"),
            &envs,
        )
        .unwrap();
    fs
}

fn yaml(fs: &MemoryFilesystem, path: &str) -> serde_yaml::Value {
    serde_yaml::from_str(&fs.read_file(Path::new(path)).unwrap()).unwrap()
}

#[test]
fn helm_base_is_shared_and_overlays_are_per_environment() {
    let fs = scaffold(&["dev", "qa", "prod"]);

    let base = fs.files_under(Path::new("/child/kustomized_helm/helm_base"));
    assert_eq!(base.len(), 5);
    for env in ["dev", "qa", "prod"] {
        let overlay = format!("/child/kustomized_helm/overlays/{env}");
        assert_eq!(fs.files_under(Path::new(&overlay)).len(), 3, "{env}");
    }
}

#[test]
fn chart_uses_child_name_and_parent_version() {
    let fs = scaffold(&["dev"]);
    let chart = yaml(&fs, "/child/kustomized_helm/helm_base/Chart.yaml");

    assert_eq!(chart["name"].as_str(), Some("api"));
    assert_eq!(chart["version"].as_str(), Some("2.0.1"));
    assert_eq!(chart["appVersion"].as_str(), Some("2.0.1"));
}

#[test]
fn overlay_targets_suffixed_namespace() {
    let fs = scaffold(&["qa"]);

    let ns = yaml(&fs, "/child/kustomized_helm/overlays/qa/namespace.yml");
    assert_eq!(ns["metadata"]["name"].as_str(), Some("payments-qa"));

    let kustomization = yaml(&fs, "/child/kustomized_helm/overlays/qa/kustomization.yml");
    assert_eq!(kustomization["namespace"].as_str(), Some("payments-qa"));
}

#[test]
fn helm_templates_keep_helm_syntax() {
    let fs = scaffold(&["dev"]);
    let deployment = fs
        .read_file(Path::new(
            "/child/kustomized_helm/helm_base/templates/deployment.yml",
        ))
        .unwrap();
    assert!(deployment.contains("{{ .Values.replicaCount | default 1 }}"));
}
