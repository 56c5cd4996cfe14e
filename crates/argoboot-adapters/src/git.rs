//! Git adapter over the `git` command line.
//!
//! Implements [`RepositoryStager`]: clone a repository into a staging
//! directory, then stage, commit and push whatever the generators wrote.
//!
//! Credentials never touch git configuration. Over HTTPS the token is placed
//! in the clone URL (and therefore in the clone's `origin` remote, which lives
//! only in the staging directory); over SSH the provider URL is rewritten to
//! the `git@host:path` form and the local SSH agent authenticates.

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use argoboot_core::{
    application::ports::{CommitOutcome, RepositoryStager},
    domain::redact_repo_url,
    error::{BootstrapError, BootstrapResult},
};

use crate::command::{CommandRunner, CommandSpec, ProcessRunner};

pub const DEFAULT_AUTHOR_NAME: &str = "ArgoCD Admin";

/// How repositories on the git provider are reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitTransport {
    #[default]
    Https,
    Ssh,
}

impl fmt::Display for GitTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Https => "https",
            Self::Ssh => "ssh",
        })
    }
}

impl FromStr for GitTransport {
    type Err = BootstrapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "https" => Ok(Self::Https),
            "ssh" => Ok(Self::Ssh),
            other => Err(BootstrapError::Configuration {
                message: format!("unknown git transport '{other}' (expected https or ssh)"),
            }),
        }
    }
}

/// Connection and authorship settings for [`GitCli`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSettings {
    /// Provider host, e.g. `github.com`.
    pub provider: String,
    pub transport: GitTransport,
    pub username: Option<String>,
    pub token: Option<String>,
    pub author_name: String,
    pub author_email: String,
}

impl GitSettings {
    pub fn new(provider: impl Into<String>, author_email: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            transport: GitTransport::default(),
            username: None,
            token: None,
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_email: author_email.into(),
        }
    }

    pub fn with_transport(mut self, transport: GitTransport) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_credentials(mut self, username: Option<String>, token: Option<String>) -> Self {
        self.username = username.filter(|u| !u.is_empty());
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// URL to clone `url` with, given the transport and credentials.
    ///
    /// Only URLs on the configured provider are rewritten.
    pub fn clone_url(&self, url: &str) -> String {
        let prefix = format!("https://{}/", self.provider);
        let Some(path) = url.strip_prefix(&prefix) else {
            return url.to_string();
        };

        match (self.transport, &self.token) {
            (GitTransport::Ssh, _) => format!("git@{}:{}", self.provider, path),
            (GitTransport::Https, Some(token)) => match &self.username {
                Some(user) => format!("https://{user}:{token}@{}/{path}", self.provider),
                None => format!("https://{token}@{}/{path}", self.provider),
            },
            (GitTransport::Https, None) => url.to_string(),
        }
    }
}

/// [`RepositoryStager`] backed by the `git` binary.
pub struct GitCli<R = ProcessRunner> {
    runner: R,
    settings: GitSettings,
}

impl GitCli<ProcessRunner> {
    pub fn new(settings: GitSettings) -> Self {
        Self::with_runner(ProcessRunner::new(), settings)
    }
}

impl<R: CommandRunner> GitCli<R> {
    pub fn with_runner(runner: R, settings: GitSettings) -> Self {
        Self { runner, settings }
    }

    pub fn settings(&self) -> &GitSettings {
        &self.settings
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn git(&self, repo: &Path) -> CommandSpec {
        let spec = CommandSpec::new("git").current_dir(repo);
        match &self.settings.token {
            Some(token) => spec.secret(token.as_str()),
            None => spec,
        }
    }

    fn run_git(&self, repo: &Path, args: &[&str]) -> BootstrapResult<String> {
        let output = self.runner.run_checked(&self.git(repo).args(args.iter().copied()))?;
        Ok(output.stdout.trim().to_string())
    }
}

impl<R: CommandRunner> RepositoryStager for GitCli<R> {
    #[instrument(skip_all, fields(repo = %redact_repo_url(url), target = %target.display()))]
    fn clone_repository(&self, url: &str, target: &Path) -> BootstrapResult<()> {
        let clone_url = self.settings.clone_url(url);
        let mut cmd = CommandSpec::new("git")
            .arg("clone")
            .arg(clone_url.as_str())
            .arg(target.display().to_string());
        if let Some(token) = &self.settings.token {
            cmd = cmd.secret(token.as_str());
        }

        self.runner.run_checked(&cmd)?;
        info!(transport = %self.settings.transport, "Repository cloned");
        Ok(())
    }

    #[instrument(skip_all, fields(repo = %path.display()))]
    fn commit_and_push(&self, path: &Path, message: &str) -> BootstrapResult<CommitOutcome> {
        self.run_git(path, &["add", "."])?;

        let status = self.run_git(path, &["status", "--porcelain"])?;
        if status.is_empty() {
            info!("Working tree clean, nothing to commit");
            return Ok(CommitOutcome::NothingToCommit);
        }

        let name = format!("user.name={}", self.settings.author_name);
        let email = format!("user.email={}", self.settings.author_email);
        self.run_git(path, &["-c", &name, "-c", &email, "commit", "-m", message])?;

        let hash = self.run_git(path, &["rev-parse", "--short", "HEAD"])?;
        self.run_git(path, &["push"])?;

        info!(%hash, "Changes committed and pushed");
        Ok(CommitOutcome::Committed { hash })
    }
}
