//! Single ArgoCD Application manifest writer.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
    application::ports::{Filesystem, TemplateRenderer},
    domain::{ApplicationDescriptor, ApplicationRequest, Environment},
    error::{BootstrapResult, StageContext},
};

/// Template every Application manifest is rendered from.
pub const APPLICATION_TEMPLATE: &str = "application.yml";

/// Builds and writes one Application manifest.
///
/// Used by every higher-level generator. Creates or overwrites exactly one
/// file; the destination directory must already exist.
pub struct ApplicationDescriptorBuilder<'a> {
    renderer: &'a dyn TemplateRenderer,
    filesystem: &'a dyn Filesystem,
}

impl<'a> ApplicationDescriptorBuilder<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, filesystem: &'a dyn Filesystem) -> Self {
        Self {
            renderer,
            filesystem,
        }
    }

    /// Render `request` for `env` into `destination_dir`.
    ///
    /// Returns the descriptor that was written and the file path.
    #[instrument(
        skip_all,
        fields(app = %request.app.name, environment = %env, dir = %destination_dir.display())
    )]
    pub fn build(
        &self,
        request: &ApplicationRequest,
        destination_dir: &Path,
        env: &Environment,
    ) -> BootstrapResult<(ApplicationDescriptor, PathBuf)> {
        let descriptor = ApplicationDescriptor::derive(request, env);
        let path = destination_dir.join(&descriptor.filename);
        let stage = || format!("Create {}", descriptor.filename);

        let content = self
            .renderer
            .render(APPLICATION_TEMPLATE, &descriptor.bindings())
            .with_stage(stage)?;
        self.filesystem
            .write_file(&path, &content)
            .with_stage(stage)?;

        debug!(name = %descriptor.name, path = %path.display(), "Application manifest written");
        Ok((descriptor, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{FakeFilesystem, FakeRenderer};
    use crate::domain::AppDetails;

    fn request() -> ApplicationRequest {
        ApplicationRequest {
            app: AppDetails {
                name: "api".into(),
                repo_url: "https://example.com/api.git".into(),
                source_path: "kustomized_helm/overlays/dev".into(),
                filename: None,
            },
            namespace: "shop-dev".into(),
            destination_cluster: "in-cluster".into(),
            project_name: "shop".into(),
            deploy_plugin: None,
        }
    }

    #[test]
    fn writes_one_file_named_after_final_name() {
        let fs = FakeFilesystem::with_dirs(["/out"]);
        let renderer = FakeRenderer::default();
        let dev = Environment::new("dev").unwrap();

        let (descriptor, path) = ApplicationDescriptorBuilder::new(&renderer, &fs)
            .build(&request(), Path::new("/out"), &dev)
            .unwrap();

        assert_eq!(descriptor.name, "api-app-dev");
        assert_eq!(path, PathBuf::from("/out/api-app-dev.yml"));
        assert_eq!(fs.files().len(), 1);
        assert!(fs.read(&path).unwrap().contains("\"name\":\"api-app-dev\""));
    }

    #[test]
    fn missing_directory_is_not_created() {
        let fs = FakeFilesystem::default();
        let renderer = FakeRenderer::default();
        let dev = Environment::new("dev").unwrap();

        let err = ApplicationDescriptorBuilder::new(&renderer, &fs)
            .build(&request(), Path::new("/nowhere"), &dev)
            .unwrap_err();

        assert_eq!(err.stages(), ["Create api-app-dev.yml"]);
        assert!(fs.files().is_empty());
    }

    #[test]
    fn render_failure_is_staged_with_filename() {
        let fs = FakeFilesystem::with_dirs(["/out"]);
        let renderer = FakeRenderer::failing_on(APPLICATION_TEMPLATE);
        let dev = Environment::new("dev").unwrap();

        let err = ApplicationDescriptorBuilder::new(&renderer, &fs)
            .build(&request(), Path::new("/out"), &dev)
            .unwrap_err();

        assert_eq!(err.stages(), ["Create api-app-dev.yml"]);
        assert!(fs.files().is_empty());
    }
}
