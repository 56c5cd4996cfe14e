//! Wiring shared by the workflow commands.

use std::path::PathBuf;

use tracing::debug;

use argoboot_adapters::{
    ArgoCdCli, ArgoCdSettings, GitCli, GitSettings, LocalFilesystem, SimpleRenderer,
    TemplateCatalog,
};
use argoboot_core::{
    domain::Environments,
    prelude::{
        BootstrapService, Collaborators, CommitOutcome, GenerationReport, WorkflowSettings,
    },
};

use crate::{
    cli::CredentialArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Whether a command talks to remote repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Needs the parent repository URL and a safe staging directory.
    Remote,
    /// Only reads and writes local files.
    Offline,
}

/// Build a [`BootstrapService`] over the real adapters.
pub fn build_service(
    config: &AppConfig,
    credentials: &CredentialArgs,
    environments: Environments,
    mode: Mode,
    namespaces_manifest: bool,
) -> CliResult<BootstrapService> {
    let (repo_url, data_dir) = match mode {
        Mode::Remote => (
            parent_repo_url(credentials)?,
            config.data_dir()?.to_path_buf(),
        ),
        Mode::Offline => (String::new(), PathBuf::new()),
    };

    let catalog = TemplateCatalog::load(config.templates.dir.as_deref())?;
    debug!(templates = catalog.len(), "template catalog loaded");

    let git = GitSettings::new(&config.git.provider, &config.git.admin_email)
        .with_transport(config.git.transport)
        .with_credentials(
            credentials.git_username.clone(),
            credentials.git_token.clone(),
        );

    let argocd = ArgoCdSettings {
        insecure: config.argocd.insecure,
        username: credentials.argocd_username.clone(),
        password: credentials.argocd_password.clone(),
        repo_username: credentials.git_username.clone(),
        repo_token: credentials.git_token.clone(),
        ..ArgoCdSettings::new(&config.argocd.host, config.argocd.port)
    };

    let collaborators = Collaborators {
        filesystem: Box::new(LocalFilesystem::new()),
        renderer: Box::new(SimpleRenderer::new(catalog)),
        stager: Box::new(GitCli::new(git)),
        gitops: Box::new(ArgoCdCli::new(argocd)),
    };

    let settings = WorkflowSettings {
        data_dir,
        repo_url,
        environments,
        namespaces_manifest,
    };

    Ok(BootstrapService::new(collaborators, settings))
}

fn parent_repo_url(credentials: &CredentialArgs) -> CliResult<String> {
    credentials
        .repo_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .ok_or(CliError::MissingSetting {
            what: "parent repository URL",
            flag: "--repo-url",
            env: "GIT_REPO_URL",
        })
}

/// List the written manifests, then summarise them.
pub fn report_manifests(output: &OutputManager, report: &GenerationReport) -> CliResult<()> {
    for path in report.projects.iter().chain(&report.applications) {
        output.print(&format!("  {}", path.display()))?;
    }
    output.success(&format!(
        "{} project and {} application manifests written",
        report.projects.len(),
        report.applications.len(),
    ))?;
    Ok(())
}

pub fn report_commits(output: &OutputManager, report: &GenerationReport) -> CliResult<()> {
    for commit in &report.commits {
        match commit {
            CommitOutcome::Committed { hash } => output.success(&format!("Pushed commit {hash}"))?,
            CommitOutcome::NothingToCommit => {
                output.info("Nothing to commit; repository already up to date")?
            }
        }
    }
    Ok(())
}
