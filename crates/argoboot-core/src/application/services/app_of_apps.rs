//! Root application plus one child application per spec entry, per environment.

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::{
    application::{
        ports::{Filesystem, TemplateRenderer},
        services::descriptor_builder::ApplicationDescriptorBuilder,
    },
    domain::{
        AppDetails, ApplicationRequest, Bindings, ChildAppSpec, DEFAULT_NAMESPACE, DomainValidator,
        Environment, Environments, IN_CLUSTER, ParentLayout, ProjectSpec, environment_namespace,
        layout::{children_source_path, overlay_source_path, root_app_file_name},
        root_app_base_name,
    },
    error::{BootstrapResult, StageContext},
};

pub const NAMESPACES_TEMPLATE: &str = "namespaces.yml";

/// Writes the App of Apps tree for every environment.
pub struct AppOfAppsGenerator<'a> {
    renderer: &'a dyn TemplateRenderer,
    filesystem: &'a dyn Filesystem,
    namespaces_manifest: bool,
}

impl<'a> AppOfAppsGenerator<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, filesystem: &'a dyn Filesystem) -> Self {
        Self {
            renderer,
            filesystem,
            namespaces_manifest: false,
        }
    }

    /// Also write `argocd/namespaces/<env>/namespaces-<env>.yml`.
    pub fn with_namespaces_manifest(mut self, enabled: bool) -> Self {
        self.namespaces_manifest = enabled;
        self
    }

    /// Generate every environment in order. Stops at the first failure.
    ///
    /// Application names are checked for every environment before anything
    /// is written.
    pub fn generate(
        &self,
        spec: &ProjectSpec,
        layout: &ParentLayout,
        environments: &Environments,
    ) -> BootstrapResult<Vec<PathBuf>> {
        DomainValidator::validate_environments(spec, environments)?;
        let mut written = Vec::new();
        environments.for_each(|env| -> BootstrapResult<()> {
            written.extend(self.generate_environment(spec, layout, env)?);
            Ok(())
        })?;
        Ok(written)
    }

    /// Root first, then children in spec order.
    ///
    /// Directories must already exist.
    #[instrument(skip_all, fields(environment = %env))]
    pub fn generate_environment(
        &self,
        spec: &ProjectSpec,
        layout: &ParentLayout,
        env: &Environment,
    ) -> BootstrapResult<Vec<PathBuf>> {
        DomainValidator::validate_application_names(spec, env)?;
        let builder = ApplicationDescriptorBuilder::new(self.renderer, self.filesystem);
        let mut written = Vec::with_capacity(spec.child_apps().len() + 1);

        let (root, path) = builder.build(&root_request(spec, env), &layout.argocd_dir(), env)?;
        info!(name = %root.name, "Root application written");
        written.push(path);

        let children_dir = layout.children_dir(env);
        for child in spec.child_apps() {
            let (_, path) = builder
                .build(&child_request(spec, child, env), &children_dir, env)
                .with_stage(|| {
                    format!(
                        "Create child app '{}' for environment '{}'",
                        child.name(),
                        env
                    )
                })?;
            written.push(path);
        }
        info!(children = spec.child_apps().len(), "Child applications written");

        if self.namespaces_manifest {
            written.push(self.write_namespaces(spec, layout, env)?);
        }

        Ok(written)
    }

    fn write_namespaces(
        &self,
        spec: &ProjectSpec,
        layout: &ParentLayout,
        env: &Environment,
    ) -> BootstrapResult<PathBuf> {
        let stage = || format!("Create namespaces-{env}.yml");
        let mut namespaces: Vec<String> = Vec::new();
        for child in spec.child_apps() {
            let ns = environment_namespace(child.namespace(), env);
            if !namespaces.contains(&ns) {
                namespaces.push(ns);
            }
        }
        let bindings = Bindings::new().with("namespaces", namespaces);

        let path = layout.namespaces_file(env);
        let content = self
            .renderer
            .render(NAMESPACES_TEMPLATE, &bindings)
            .with_stage(stage)?;
        self.filesystem
            .create_dir_all(&layout.namespaces_dir(env))
            .with_stage(stage)?;
        self.filesystem.write_file(&path, &content).with_stage(stage)?;
        Ok(path)
    }
}

fn root_request(spec: &ProjectSpec, env: &Environment) -> ApplicationRequest {
    ApplicationRequest {
        app: AppDetails {
            name: root_app_base_name(spec.parent_app().name()),
            repo_url: spec.parent_app().repo_url().to_string(),
            source_path: children_source_path(env),
            filename: Some(root_app_file_name(env)),
        },
        namespace: DEFAULT_NAMESPACE.to_string(),
        destination_cluster: IN_CLUSTER.to_string(),
        project_name: spec.project().name().to_string(),
        deploy_plugin: None,
    }
}

fn child_request(spec: &ProjectSpec, child: &ChildAppSpec, env: &Environment) -> ApplicationRequest {
    ApplicationRequest {
        app: AppDetails {
            name: child.name().to_string(),
            repo_url: child.repo_url().to_string(),
            source_path: child
                .manifest_path()
                .map_or_else(|| overlay_source_path(env), str::to_string),
            filename: None,
        },
        namespace: environment_namespace(child.namespace(), env),
        destination_cluster: spec.destination_cluster().to_string(),
        project_name: spec.project().name().to_string(),
        deploy_plugin: child.deploy_plugin().map(str::to_string),
    }
}
