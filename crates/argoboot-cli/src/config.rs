//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `ARGOBOOT__SECTION__KEY`, e.g.
//!    `ARGOBOOT__ARGOCD__HOST=argocd.internal`
//! 3. Config file (`--config`, or the platform default path if present)
//! 4. Built-in defaults (always present)
//!
//! Credentials are deliberately absent: they come from flags or the
//! `GIT_*` / `ARGOCD_*` environment variables only.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use argoboot_adapters::GitTransport;
use argoboot_core::domain::Environments;

use crate::error::{CliError, CliResult};

pub const ENV_PREFIX: &str = "ARGOBOOT";
pub const LOCAL_CONFIG_FILE: &str = "argo-bootstrap.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Target environments, in deployment order.
    pub environments: Vec<String>,
    pub git: GitConfig,
    pub argocd: ArgoCdConfig,
    pub paths: PathsConfig,
    pub generation: GenerationConfig,
    pub templates: TemplateConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitConfig {
    /// Host of the git provider, e.g. `github.com`.
    pub provider: String,
    /// Author email for generated commits.
    pub admin_email: String,
    pub transport: GitTransport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgoCdConfig {
    pub host: String,
    pub port: u16,
    pub insecure: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Staging root. Its contents are deleted at the start of every remote
    /// workflow.
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub namespaces_manifest: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Directory of template overrides.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environments: vec!["dev".into(), "qa".into(), "prod".into()],
            git: GitConfig {
                provider: "github.com".into(),
                admin_email: "argocd-admin@example.com".into(),
                transport: GitTransport::Https,
            },
            argocd: ArgoCdConfig {
                host: "localhost".into(),
                port: 8080,
                insecure: false,
            },
            paths: PathsConfig {
                data_dir: default_data_dir(),
            },
            generation: GenerationConfig {
                namespaces_manifest: false,
            },
            templates: TemplateConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then the
    /// environment.
    ///
    /// An explicit `config_file` must exist; the default path is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = config::Config::try_from(&Self::default())
            .context("Failed to build default configuration")?;

        let file = match config_file {
            Some(path) => config::File::from(path.as_path()).required(true),
            None => config::File::from(Self::config_path()).required(false),
        };

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("environments"),
            )
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `argo-bootstrap.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("io", "argoboot", "argo-bootstrap")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Configured environments, or `overrides` when any are given.
    pub fn environments(&self, overrides: &[String]) -> CliResult<Environments> {
        let names = if overrides.is_empty() {
            self.environments.as_slice()
        } else {
            overrides
        };
        Ok(Environments::parse(names)?)
    }

    /// Staging root, refusing locations whose contents must never be wiped.
    pub fn data_dir(&self) -> CliResult<&Path> {
        let dir = self.paths.data_dir.as_path();
        let cwd = std::env::current_dir().ok();
        let home = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf());

        let unsafe_dir = dir.as_os_str().is_empty()
            || dir.parent().is_none()
            || dir == Path::new(".")
            || cwd.as_deref() == Some(dir)
            || home.as_deref() == Some(dir);
        if unsafe_dir {
            return Err(CliError::ConfigError {
                message: format!(
                    "paths.data_dir '{}' would be wiped on every run; choose a dedicated directory",
                    dir.display()
                ),
                source: None,
            });
        }
        Ok(dir)
    }
}

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("io", "argoboot", "argo-bootstrap")
        .map(|d| d.cache_dir().join("staging"))
        .unwrap_or_else(|| PathBuf::from(".argo-bootstrap/staging"))
}
