//! Bootstrap Service - workflow orchestrator.
//!
//! Every workflow is a fixed pipeline of named stages run against the ports:
//!
//! ```text
//! setup:          clean → login → clone parent → load spec → persist spec
//!                 → skeleton → projects → app of apps → commit & push
//! generate:       load spec → persist spec → skeleton → projects → app of apps
//! deploy:         clean → clone parent → login → load spec → register repos
//!                 → apply project → apply root → sync root → sync children
//! remove-apps:    clean → clone parent → login → read root name → delete app
//! remove-project: clean → clone parent → login → read project name → delete project
//! remove-repos:   clean → clone parent → login → load spec → remove repos (best-effort)
//! scaffold:       clean → clone parent → load spec → per child: clean, clone,
//!                 scaffold, commit & push
//! ```
//!
//! Each stage logs `START`, `SUCCESS` or `FAIL`; failures are wrapped with the
//! stage name and re-raised, never swallowed.

use std::path::{Path, PathBuf};

use tracing::{error, info, info_span, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ports::{CommitOutcome, Filesystem, GitOpsClient, RepositoryStager, TemplateRenderer},
        services::{
            app_of_apps::AppOfAppsGenerator, deployment_scaffolder::DeploymentScaffolder,
            project_descriptor::ProjectDescriptorGenerator,
        },
    },
    domain::{
        ChildLayout, DomainError, DomainValidator, Environment, Environments, ParentLayout,
        ProjectDocument, ProjectSpec, instance_selector, manifest_name, redact_repo_url,
    },
    error::{BootstrapError, BootstrapResult},
};

pub const COMMIT_MESSAGE: &str = "ArgoCD app configs";

/// Adapters the orchestrator runs against.
pub struct Collaborators {
    pub filesystem: Box<dyn Filesystem>,
    pub renderer: Box<dyn TemplateRenderer>,
    pub stager: Box<dyn RepositoryStager>,
    pub gitops: Box<dyn GitOpsClient>,
}

/// Per-run settings resolved by the caller.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Staging root. Cleaned at the start of every remote workflow.
    pub data_dir: PathBuf,
    /// Parent (App of Apps) repository.
    pub repo_url: String,
    pub environments: Environments,
    pub namespaces_manifest: bool,
}

impl WorkflowSettings {
    pub fn parent_layout(&self) -> ParentLayout {
        ParentLayout::new(self.data_dir.join("parent_repo"))
    }

    pub fn child_layout(&self) -> ChildLayout {
        ChildLayout::new(self.data_dir.join("child_repos"))
    }
}

/// What a generation run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub projects: Vec<PathBuf>,
    /// Root apps, child apps and namespace manifests, in write order.
    pub applications: Vec<PathBuf>,
    pub commits: Vec<CommitOutcome>,
}

impl GenerationReport {
    fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            projects: Vec::new(),
            applications: Vec::new(),
            commits: Vec::new(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.projects.len() + self.applications.len()
    }
}

/// Main orchestration service.
pub struct BootstrapService {
    filesystem: Box<dyn Filesystem>,
    renderer: Box<dyn TemplateRenderer>,
    stager: Box<dyn RepositoryStager>,
    gitops: Box<dyn GitOpsClient>,
    settings: WorkflowSettings,
}

impl BootstrapService {
    pub fn new(collaborators: Collaborators, settings: WorkflowSettings) -> Self {
        Self {
            filesystem: collaborators.filesystem,
            renderer: collaborators.renderer,
            stager: collaborators.stager,
            gitops: collaborators.gitops,
            settings,
        }
    }

    pub fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    // -------------------------------------------------------------------------
    // Workflows
    // -------------------------------------------------------------------------

    /// Generate the App of Apps tree in the parent repo and push it.
    pub fn setup(&self) -> BootstrapResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        let _span = info_span!("setup", %run_id).entered();
        let layout = self.settings.parent_layout();

        self.clean_staging()?;
        self.stage("ArgoCD login", || self.gitops.login())?;
        self.clone_parent(&layout)?;
        let spec = self.load_spec(&layout.spec_file())?;

        let mut report = self.generate_into(&spec, &layout, run_id)?;
        let outcome = self.stage("Commit and push parent repo", || {
            self.stager.commit_and_push(layout.root(), COMMIT_MESSAGE)
        })?;
        log_commit(&outcome);
        report.commits.push(outcome);

        info!(files = report.file_count(), "Setup complete");
        Ok(report)
    }

    /// Offline generation from a local spec file into `output_dir`.
    pub fn generate(&self, spec_path: &Path, output_dir: &Path) -> BootstrapResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        let _span = info_span!("generate", %run_id).entered();

        let spec = self.load_spec(spec_path)?;
        let report = self.generate_into(&spec, &ParentLayout::new(output_dir), run_id)?;

        info!(files = report.file_count(), output = %output_dir.display(), "Generation complete");
        Ok(report)
    }

    /// Register repos, apply the project and root app for `env`, then sync.
    pub fn deploy(&self, env: &str) -> BootstrapResult<()> {
        let run_id = Uuid::new_v4();
        let _span = info_span!("deploy", %run_id, environment = env).entered();
        let env = self.environment(env)?;
        let layout = self.settings.parent_layout();

        self.clean_staging()?;
        self.clone_parent(&layout)?;
        self.stage("ArgoCD login", || self.gitops.login())?;
        let spec = self.load_spec(&layout.spec_file())?;

        self.stage("Register repositories", || {
            for url in spec.repositories(false) {
                info!(repo = %redact_repo_url(url), "Adding repository");
                self.gitops.add_repository(url)?;
            }
            Ok(())
        })?;

        let project_file = layout.project_file(env);
        self.stage("Apply project", || self.gitops.apply_manifest(&project_file))?;

        let namespaces_file = layout.namespaces_file(env);
        if self.filesystem.exists(&namespaces_file) {
            self.stage("Apply namespaces", || {
                self.gitops.apply_manifest(&namespaces_file)
            })?;
        }

        let root_file = layout.root_app_file(env);
        let root_name = self.stage("Read root app name", || self.read_manifest_name(&root_file))?;
        self.stage("Apply root app", || self.gitops.apply_manifest(&root_file))?;
        self.stage("Sync root app", || self.gitops.sync_app(&root_name))?;
        self.stage("Sync child apps", || {
            self.gitops.sync_selector(&instance_selector(&root_name))
        })?;

        info!(root = %root_name, "Deploy complete");
        Ok(())
    }

    /// Delete the root app for `env`; children follow by cascade.
    pub fn remove_apps(&self, env: &str) -> BootstrapResult<String> {
        let run_id = Uuid::new_v4();
        let _span = info_span!("remove_apps", %run_id, environment = env).entered();
        let env = self.environment(env)?;
        let layout = self.settings.parent_layout();

        self.prepare_teardown(&layout)?;
        let root_file = layout.root_app_file(env);
        let name = self.stage("Read root app name", || self.read_manifest_name(&root_file))?;
        self.stage("Delete root app", || self.gitops.delete_app(&name))?;

        info!(app = %name, "Applications removed");
        Ok(name)
    }

    /// Delete the AppProject for `env`.
    pub fn remove_project(&self, env: &str) -> BootstrapResult<String> {
        let run_id = Uuid::new_v4();
        let _span = info_span!("remove_project", %run_id, environment = env).entered();
        let env = self.environment(env)?;
        let layout = self.settings.parent_layout();

        self.prepare_teardown(&layout)?;
        let project_file = layout.project_file(env);
        let name = self.stage("Read project name", || {
            self.read_manifest_name(&project_file)
        })?;
        self.stage("Delete project", || self.gitops.delete_project(&name))?;

        info!(project = %name, "Project removed");
        Ok(name)
    }

    /// Unregister every repository the spec names.
    ///
    /// Best-effort: a repository that cannot be removed (for instance because
    /// it is already gone) is logged and skipped. Returns how many were removed.
    pub fn remove_repos(&self) -> BootstrapResult<usize> {
        let run_id = Uuid::new_v4();
        let _span = info_span!("remove_repos", %run_id).entered();
        let layout = self.settings.parent_layout();

        self.prepare_teardown(&layout)?;
        let spec = self.load_spec(&layout.spec_file())?;

        let mut removed = 0;
        for url in spec.repositories(false) {
            let repo = redact_repo_url(url);
            match self.gitops.remove_repository(url) {
                Ok(()) => {
                    info!(%repo, "Repository removed");
                    removed += 1;
                }
                Err(e) => warn!(%repo, error = %e, "Repository not removed, continuing"),
            }
        }
        Ok(removed)
    }

    /// Scaffold the Kustomized Helm tree in every child repo and push each.
    ///
    /// Child apps already pushed are not rolled back when a later one fails.
    pub fn scaffold(&self) -> BootstrapResult<GenerationReport> {
        let run_id = Uuid::new_v4();
        let _span = info_span!("scaffold", %run_id).entered();
        let parent = self.settings.parent_layout();
        let child_layout = self.settings.child_layout();
        let scaffolder = DeploymentScaffolder::new(self.renderer.as_ref(), self.filesystem.as_ref());

        self.clean_staging()?;
        self.clone_parent(&parent)?;
        let spec = self.load_spec(&parent.spec_file())?;

        let mut report = GenerationReport::new(run_id);
        for child in spec.child_apps() {
            let repo = redact_repo_url(child.repo_url());
            let _child_span = info_span!("child_app", child_app = child.name()).entered();
            info!(%repo, "Processing child app");

            self.stage(&format!("Clone child repo {repo}"), || {
                self.filesystem.clear_dir(child_layout.root())?;
                self.stager
                    .clone_repository(child.repo_url(), child_layout.root())
            })?;
            let written = self.stage(&format!("Scaffold {}", child.name()), || {
                scaffolder.scaffold(
                    child,
                    spec.parent_app(),
                    &child_layout,
                    &self.settings.environments,
                )
            })?;
            report.applications.extend(written);

            let outcome = self.stage(&format!("Commit and push {repo}"), || {
                self.stager
                    .commit_and_push(child_layout.root(), COMMIT_MESSAGE)
            })?;
            log_commit(&outcome);
            report.commits.push(outcome);
        }

        info!(children = spec.child_apps().len(), "Scaffold complete");
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Stages
    // -------------------------------------------------------------------------

    /// Run one named stage with START/SUCCESS/FAIL logging.
    fn stage<T>(
        &self,
        name: &str,
        f: impl FnOnce() -> BootstrapResult<T>,
    ) -> BootstrapResult<T> {
        info!(stage = name, "START");
        match f() {
            Ok(value) => {
                info!(stage = name, "SUCCESS");
                Ok(value)
            }
            Err(e) => {
                error!(stage = name, error = %e, "FAIL");
                Err(e.in_stage(name))
            }
        }
    }

    fn clean_staging(&self) -> BootstrapResult<()> {
        self.stage("Clean staging directory", || {
            self.filesystem.clear_dir(&self.settings.data_dir)
        })
    }

    fn clone_parent(&self, layout: &ParentLayout) -> BootstrapResult<()> {
        self.stage("Clone parent repo", || {
            self.stager
                .clone_repository(&self.settings.repo_url, layout.root())
        })
    }

    fn prepare_teardown(&self, layout: &ParentLayout) -> BootstrapResult<()> {
        self.clean_staging()?;
        self.clone_parent(layout)?;
        self.stage("ArgoCD login", || self.gitops.login())
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn load_spec(&self, path: &Path) -> BootstrapResult<ProjectSpec> {
        self.stage("Load argo_proj.yml", || {
            let text = self.filesystem.read_to_string(path)?;
            let doc = ProjectDocument::from_yaml(&text)?;
            let spec = ProjectSpec::load(&doc)?;
            DomainValidator::validate_environments(&spec, &self.settings.environments)?;
            Ok(spec)
        })
    }

    /// Generation stages shared by `setup` and `generate`.
    fn generate_into(
        &self,
        spec: &ProjectSpec,
        layout: &ParentLayout,
        run_id: Uuid,
    ) -> BootstrapResult<GenerationReport> {
        let envs = &self.settings.environments;
        let renderer = self.renderer.as_ref();
        let fs = self.filesystem.as_ref();

        self.stage("Persist normalized argo_proj.yml", || {
            fs.create_dir_all(layout.root())?;
            let yaml = spec.to_document().to_yaml()?;
            fs.write_file(&layout.spec_file(), &yaml)
        })?;

        self.stage("Create app of apps folder structure", || {
            fs.create_dir_all(&layout.projects_dir())?;
            for env in envs {
                fs.create_dir_all(&layout.children_dir(env))?;
            }
            Ok(())
        })?;

        let mut report = GenerationReport::new(run_id);
        report.projects = self.stage("Create AppProject manifests", || {
            ProjectDescriptorGenerator::new(renderer, fs).generate(spec, layout, envs)
        })?;
        report.applications = self.stage("Create App of Apps manifests", || {
            AppOfAppsGenerator::new(renderer, fs)
                .with_namespaces_manifest(self.settings.namespaces_manifest)
                .generate(spec, layout, envs)
        })?;
        Ok(report)
    }

    fn environment(&self, name: &str) -> BootstrapResult<&Environment> {
        self.settings
            .environments
            .get(name)
            .ok_or_else(|| DomainError::InvalidEnvironment(name.to_string()).into())
    }

    /// Names used for teardown come from what was written, not from the spec.
    fn read_manifest_name(&self, path: &Path) -> BootstrapResult<String> {
        let text = self.filesystem.read_to_string(path)?;
        manifest_name(&text).ok_or_else(|| {
            BootstrapError::from(DomainError::MissingManifestName {
                path: path.display().to_string(),
            })
        })
    }
}

fn log_commit(outcome: &CommitOutcome) {
    match outcome {
        CommitOutcome::Committed { hash } => info!(%hash, "Changes pushed"),
        CommitOutcome::NothingToCommit => info!("Nothing to commit, push skipped"),
    }
}
