//! GitOps adapter over the `argocd` and `kubectl` command lines.

use std::path::Path;

use tracing::{info, instrument};

use argoboot_core::{
    application::ports::GitOpsClient,
    domain::redact_repo_url,
    error::{BootstrapError, BootstrapResult},
};

use crate::command::{CommandRunner, CommandSpec, ProcessRunner};

/// Where the ArgoCD API server is and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgoCdSettings {
    pub host: String,
    pub port: u16,
    /// Skip TLS verification (`--insecure`).
    pub insecure: bool,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Credentials ArgoCD uses to pull registered repositories.
    pub repo_username: Option<String>,
    pub repo_token: Option<String>,
}

impl ArgoCdSettings {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            insecure: false,
            username: None,
            password: None,
            repo_username: None,
            repo_token: None,
        }
    }

    pub fn server(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// [`GitOpsClient`] backed by the `argocd` and `kubectl` binaries.
pub struct ArgoCdCli<R = ProcessRunner> {
    runner: R,
    settings: ArgoCdSettings,
}

impl ArgoCdCli<ProcessRunner> {
    pub fn new(settings: ArgoCdSettings) -> Self {
        Self::with_runner(ProcessRunner::new(), settings)
    }
}

impl<R: CommandRunner> ArgoCdCli<R> {
    pub fn with_runner(runner: R, settings: ArgoCdSettings) -> Self {
        Self { runner, settings }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn argocd<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> BootstrapResult<()> {
        self.runner
            .run_checked(&CommandSpec::new("argocd").args(args))?;
        Ok(())
    }
}

impl<R: CommandRunner> GitOpsClient for ArgoCdCli<R> {
    #[instrument(skip_all, fields(server = %self.settings.server()))]
    fn login(&self) -> BootstrapResult<()> {
        let s = &self.settings;
        let (Some(username), Some(password)) = (&s.username, &s.password) else {
            return Err(BootstrapError::Configuration {
                message: "ArgoCD credentials missing: set ARGOCD_USERNAME and ARGOCD_PASSWORD"
                    .into(),
            });
        };

        let mut cmd = CommandSpec::new("argocd").arg("login").arg(s.server());
        if s.insecure {
            cmd = cmd.arg("--insecure");
        }
        let cmd = cmd
            .args(["--username", username.as_str(), "--password", password.as_str()])
            .secret(password.as_str());

        self.runner.run_checked(&cmd)?;
        info!(user = %username, "Logged in to ArgoCD");
        Ok(())
    }

    #[instrument(skip_all, fields(repo = %redact_repo_url(url)))]
    fn add_repository(&self, url: &str) -> BootstrapResult<()> {
        let mut cmd = CommandSpec::new("argocd").args(["repo", "add", url]);
        if let Some(user) = &self.settings.repo_username {
            cmd = cmd.args(["--username", user.as_str()]);
        }
        if let Some(token) = &self.settings.repo_token {
            cmd = cmd
                .args(["--password", token.as_str()])
                .secret(token.as_str());
        }
        self.runner.run_checked(&cmd)?;
        Ok(())
    }

    #[instrument(skip_all, fields(repo = %redact_repo_url(url)))]
    fn remove_repository(&self, url: &str) -> BootstrapResult<()> {
        self.argocd(["repo", "rm", url])
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    fn apply_manifest(&self, path: &Path) -> BootstrapResult<()> {
        let cmd = CommandSpec::new("kubectl")
            .args(["apply", "-f"])
            .arg(path.display().to_string());
        self.runner.run_checked(&cmd)?;
        Ok(())
    }

    #[instrument(skip(self))]
    fn sync_app(&self, name: &str) -> BootstrapResult<()> {
        self.argocd(["app", "sync", name])
    }

    #[instrument(skip(self))]
    fn sync_selector(&self, selector: &str) -> BootstrapResult<()> {
        self.argocd(["app", "sync", "-l", selector])
    }

    /// Non-interactive cascade delete.
    #[instrument(skip(self))]
    fn delete_app(&self, name: &str) -> BootstrapResult<()> {
        self.argocd(["app", "delete", name, "--cascade", "--yes"])
    }

    #[instrument(skip(self))]
    fn delete_project(&self, name: &str) -> BootstrapResult<()> {
        self.argocd(["proj", "delete", name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandOutput, testing::RecordingRunner};

    fn settings() -> ArgoCdSettings {
        ArgoCdSettings {
            username: Some("admin".into()),
            password: Some("s3cret".into()),
            repo_username: Some("bob".into()),
            repo_token: Some("ghp_token".into()),
            ..ArgoCdSettings::new("argocd.example.com", 443)
        }
    }

    fn client(settings: ArgoCdSettings) -> ArgoCdCli<RecordingRunner> {
        ArgoCdCli::with_runner(RecordingRunner::default(), settings)
    }

    #[test]
    fn login_masks_password() {
        let argocd = client(ArgoCdSettings {
            insecure: true,
            ..settings()
        });
        argocd.login().unwrap();

        assert_eq!(
            argocd.runner().lines(),
            ["argocd login argocd.example.com:443 --insecure --username admin --password ****"]
        );
    }

    #[test]
    fn login_without_credentials_is_a_configuration_error() {
        let argocd = client(ArgoCdSettings::new("localhost", 8080));
        let err = argocd.login().unwrap_err();

        assert!(matches!(err, BootstrapError::Configuration { .. }));
        assert!(argocd.runner().calls().is_empty());
    }

    #[test]
    fn repository_registration_passes_git_credentials() {
        let argocd = client(settings());
        argocd.add_repository("https://github.com/acme/api.git").unwrap();
        argocd.remove_repository("https://github.com/acme/api.git").unwrap();

        assert_eq!(
            argocd.runner().lines(),
            [
                "argocd repo add https://github.com/acme/api.git --username bob --password ****",
                "argocd repo rm https://github.com/acme/api.git",
            ]
        );
    }

    #[test]
    fn deploy_and_teardown_command_lines() {
        let argocd = client(settings());
        argocd
            .apply_manifest(Path::new("/data/parent_repo/argocd/root-app-dev.yml"))
            .unwrap();
        argocd.sync_app("root-shop-app-dev").unwrap();
        argocd
            .sync_selector("app.kubernetes.io/instance=root-shop-app-dev")
            .unwrap();
        argocd.delete_app("root-shop-app-dev").unwrap();
        argocd.delete_project("shop-dev").unwrap();

        assert_eq!(
            argocd.runner().lines(),
            [
                "kubectl apply -f /data/parent_repo/argocd/root-app-dev.yml",
                "argocd app sync root-shop-app-dev",
                "argocd app sync -l app.kubernetes.io/instance=root-shop-app-dev",
                "argocd app delete root-shop-app-dev --cascade --yes",
                "argocd proj delete shop-dev",
            ]
        );
    }

    #[test]
    fn failed_sync_carries_argocd_output() {
        let runner = RecordingRunner::default().reply(
            "app sync",
            CommandOutput::failed(20, "rpc error: application not found"),
        );
        let argocd = ArgoCdCli::with_runner(runner, settings());

        let err = argocd.sync_app("root-shop-app-dev").unwrap_err();
        assert!(err.to_string().contains("application not found"));
        assert!(err.is_retryable());
    }
}
