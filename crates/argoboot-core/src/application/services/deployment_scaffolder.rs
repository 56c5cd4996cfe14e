//! Kustomized Helm scaffolding for a child application repository.
//!
//! One Helm base per child app, shared by every environment, plus one
//! overlay per (child app, environment) pair that only references and
//! patches the base.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::{
    application::ports::{Filesystem, TemplateRenderer},
    domain::{
        Bindings, ChildAppSpec, ChildLayout, Environment, Environments, ParentApp,
        environment_namespace, redact_repo_url,
    },
    error::{BootstrapResult, StageContext},
};

pub const CHART_TEMPLATE: &str = "deploy/Chart.yaml";
pub const DEPLOYMENT_TEMPLATE: &str = "deploy/deployment.yml";
pub const SERVICE_TEMPLATE: &str = "deploy/service.yml";
pub const MAPPING_TEMPLATE: &str = "deploy/mapping.yml";
pub const KUSTOMIZATION_BASE_TEMPLATE: &str = "deploy/kustomization_base.yml";
pub const KUSTOMIZATION_OVERLAY_TEMPLATE: &str = "deploy/kustomization_overlays.yml";
pub const NAMESPACE_TEMPLATE: &str = "deploy/namespace.yml";
pub const DEPLOYMENT_PATCH_TEMPLATE: &str = "deploy/deployment_patch.yml";

pub struct DeploymentScaffolder<'a> {
    renderer: &'a dyn TemplateRenderer,
    filesystem: &'a dyn Filesystem,
}

impl<'a> DeploymentScaffolder<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, filesystem: &'a dyn Filesystem) -> Self {
        Self {
            renderer,
            filesystem,
        }
    }

    /// Write the Helm base and every overlay for `child` under `layout`.
    ///
    /// Failures are reported with the child app's repository URL.
    #[instrument(skip_all, fields(child_app = %child.name()))]
    pub fn scaffold(
        &self,
        child: &ChildAppSpec,
        parent: &ParentApp,
        layout: &ChildLayout,
        environments: &Environments,
    ) -> BootstrapResult<Vec<PathBuf>> {
        let written = self
            .scaffold_inner(child, parent, layout, environments)
            .with_stage(|| {
                format!(
                    "Scaffold deployment for '{}' ({})",
                    child.name(),
                    redact_repo_url(child.repo_url())
                )
            })?;

        info!(files = written.len(), "Deployment scaffolded");
        Ok(written)
    }

    fn scaffold_inner(
        &self,
        child: &ChildAppSpec,
        parent: &ParentApp,
        layout: &ChildLayout,
        environments: &Environments,
    ) -> BootstrapResult<Vec<PathBuf>> {
        self.create_structure(layout, environments)?;

        let mut written = self.write_helm_base(child, parent, layout)?;
        environments.for_each(|env| -> BootstrapResult<()> {
            written.extend(self.write_overlay(child, layout, env)?);
            Ok(())
        })?;
        Ok(written)
    }

    fn create_structure(
        &self,
        layout: &ChildLayout,
        environments: &Environments,
    ) -> BootstrapResult<()> {
        self.filesystem
            .create_dir_all(&layout.helm_templates_dir())
            .stage("Create kustomized helm folder structure")?;
        for env in environments {
            self.filesystem
                .create_dir_all(&layout.overlay_patch_dir(env))
                .stage("Create kustomized helm folder structure")?;
        }
        Ok(())
    }

    fn write_helm_base(
        &self,
        child: &ChildAppSpec,
        parent: &ParentApp,
        layout: &ChildLayout,
    ) -> BootstrapResult<Vec<PathBuf>> {
        let base = layout.helm_base_dir();
        let templates = layout.helm_templates_dir();

        let chart = Bindings::new()
            .with("app_name", child.name())
            .with("app_version", parent.version());
        let mapping = Bindings::new().with("app_name", child.name());
        let kustomization = Bindings::new()
            .with("app_name", child.name())
            .with("parent_app", parent.name())
            .with("app_version", parent.version());

        Ok(vec![
            self.render_to(CHART_TEMPLATE, &chart, &base.join("Chart.yaml"))?,
            self.copy_to(DEPLOYMENT_TEMPLATE, &templates.join("deployment.yml"))?,
            self.copy_to(SERVICE_TEMPLATE, &templates.join("service.yml"))?,
            self.render_to(MAPPING_TEMPLATE, &mapping, &templates.join("mapping.yml"))?,
            self.render_to(
                KUSTOMIZATION_BASE_TEMPLATE,
                &kustomization,
                &base.join("kustomization.yml"),
            )?,
        ])
    }

    fn write_overlay(
        &self,
        child: &ChildAppSpec,
        layout: &ChildLayout,
        env: &Environment,
    ) -> BootstrapResult<Vec<PathBuf>> {
        let dir = layout.overlay_dir(env);
        let bindings =
            Bindings::new().with("namespace", environment_namespace(child.namespace(), env));

        Ok(vec![
            self.render_to(NAMESPACE_TEMPLATE, &bindings, &dir.join("namespace.yml"))?,
            self.render_to(
                KUSTOMIZATION_OVERLAY_TEMPLATE,
                &bindings,
                &dir.join("kustomization.yml"),
            )?,
            self.copy_to(
                DEPLOYMENT_PATCH_TEMPLATE,
                &layout.overlay_patch_dir(env).join("deployment_patch.yml"),
            )?,
        ])
    }

    fn render_to(&self, template: &str, bindings: &Bindings, path: &Path) -> BootstrapResult<PathBuf> {
        let content = self
            .renderer
            .render(template, bindings)
            .with_stage(|| create_stage(path))?;
        self.write(&content, path)
    }

    fn copy_to(&self, template: &str, path: &Path) -> BootstrapResult<PathBuf> {
        let content = self
            .renderer
            .source(template)
            .with_stage(|| create_stage(path))?;
        self.write(&content, path)
    }

    fn write(&self, content: &str, path: &Path) -> BootstrapResult<PathBuf> {
        self.filesystem
            .write_file(path, content)
            .with_stage(|| create_stage(path))?;
        Ok(path.to_path_buf())
    }
}

fn create_stage(path: &Path) -> String {
    format!("Create {}", path.display())
}
