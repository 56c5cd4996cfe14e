use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::{
    application::ports::{Filesystem, TemplateRenderer},
    domain::{
        Environment, Environments, ParentLayout, ProjectDescriptor, ProjectSpec,
        layout::project_file_name,
    },
    error::{BootstrapResult, StageContext},
};

pub const PROJECT_TEMPLATE: &str = "project.yml";

/// Writes one AppProject manifest per environment into `argocd/projects`.
pub struct ProjectDescriptorGenerator<'a> {
    renderer: &'a dyn TemplateRenderer,
    filesystem: &'a dyn Filesystem,
}

impl<'a> ProjectDescriptorGenerator<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, filesystem: &'a dyn Filesystem) -> Self {
        Self {
            renderer,
            filesystem,
        }
    }

    pub fn generate(
        &self,
        spec: &ProjectSpec,
        layout: &ParentLayout,
        environments: &Environments,
    ) -> BootstrapResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(environments.len());
        environments.for_each(|env| -> BootstrapResult<()> {
            written.push(self.generate_environment(spec, layout, env)?);
            Ok(())
        })?;
        Ok(written)
    }

    #[instrument(skip_all, fields(environment = %env))]
    pub fn generate_environment(
        &self,
        spec: &ProjectSpec,
        layout: &ParentLayout,
        env: &Environment,
    ) -> BootstrapResult<PathBuf> {
        let descriptor =
            ProjectDescriptor::derive(spec.project().name(), spec.project().description(), env);
        let path = layout.project_file(env);
        let stage = || format!("Create {}", project_file_name(env));

        let content = self
            .renderer
            .render(PROJECT_TEMPLATE, &descriptor.bindings())
            .with_stage(stage)?;
        self.filesystem.write_file(&path, &content).with_stage(stage)?;

        debug!(name = %descriptor.name, "AppProject manifest written");
        Ok(path)
    }
}
