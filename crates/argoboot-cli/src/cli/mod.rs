//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "argo-bootstrap",
    bin_name = "argo-bootstrap",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate and deploy ArgoCD App of Apps manifests",
    long_about = "argo-bootstrap reads an argo_proj.yml project spec and generates \
                  AppProject, root Application and child Application manifests for \
                  every target environment, scaffolds Kustomized Helm deployments in \
                  child repositories, and drives ArgoCD to deploy or tear them down.",
    after_help = "EXAMPLES:\n\
        \x20 argo-bootstrap generate --spec argo_proj.yml --output ./parent-repo\n\
        \x20 argo-bootstrap setup --repo-url https://github.com/acme/shop-argocd.git\n\
        \x20 argo-bootstrap deploy --env dev\n\
        \x20 argo-bootstrap remove-apps --env dev --yes\n\
        \x20 argo-bootstrap completions bash > /usr/share/bash-completion/completions/argo-bootstrap",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate the App of Apps tree in the parent repository and push it.
    #[command(
        about = "Generate manifests in the parent repo and push them",
        after_help = "EXAMPLES:\n\
            \x20 argo-bootstrap setup --repo-url https://github.com/acme/shop-argocd.git\n\
            \x20 argo-bootstrap setup --environments dev,prod"
    )]
    Setup(SetupArgs),

    /// Generate manifests from a local spec without git or ArgoCD.
    #[command(
        visible_alias = "gen",
        about = "Generate manifests locally (offline)",
        after_help = "EXAMPLES:\n\
            \x20 argo-bootstrap generate\n\
            \x20 argo-bootstrap generate --spec ./argo_proj.yml --output ./out --environments dev,qa"
    )]
    Generate(GenerateArgs),

    /// Register repositories, apply project and root app, and sync.
    #[command(
        about = "Deploy one environment through ArgoCD",
        after_help = "EXAMPLES:\n\
            \x20 argo-bootstrap deploy --env dev\n\
            \x20 TARGET_ENVIRONMENT=qa argo-bootstrap deploy"
    )]
    Deploy(EnvArgs),

    /// Delete the root application of one environment (children cascade).
    #[command(
        about = "Delete the applications of one environment",
        after_help = "EXAMPLES:\n\
            \x20 argo-bootstrap remove-apps --env dev --yes"
    )]
    RemoveApps(EnvArgs),

    /// Delete the AppProject of one environment.
    #[command(
        about = "Delete the project of one environment",
        after_help = "EXAMPLES:\n\
            \x20 argo-bootstrap remove-project --env dev --yes"
    )]
    RemoveProject(EnvArgs),

    /// Unregister every repository named in the spec from ArgoCD.
    #[command(about = "Unregister repositories from ArgoCD")]
    RemoveRepos(RemoteArgs),

    /// Scaffold Kustomized Helm deployments in every child repository.
    #[command(
        about = "Scaffold Kustomized Helm in child repos and push them",
        after_help = "EXAMPLES:\n\
            \x20 argo-bootstrap scaffold --repo-url https://github.com/acme/shop-argocd.git"
    )]
    Scaffold(SetupArgs),

    /// Initialise an argo-bootstrap configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 argo-bootstrap init           # default location\n\
            \x20 argo-bootstrap init --local   # ./argo-bootstrap.toml"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 argo-bootstrap completions bash > ~/.local/share/bash-completion/completions/argo-bootstrap\n\
            \x20 argo-bootstrap completions zsh  > ~/.zfunc/_argo-bootstrap\n\
            \x20 argo-bootstrap completions fish > ~/.config/fish/completions/argo-bootstrap.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the active configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 argo-bootstrap config get argocd.host\n\
            \x20 argo-bootstrap config list\n\
            \x20 argo-bootstrap config path"
    )]
    Config(ConfigCommands),
}

// ── shared argument groups ────────────────────────────────────────────────────

/// Repository and ArgoCD credentials.
///
/// Read from flags or the environment only, never from the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct CredentialArgs {
    /// Parent (App of Apps) repository.
    #[arg(long = "repo-url", env = "GIT_REPO_URL", value_name = "URL")]
    pub repo_url: Option<String>,

    #[arg(long = "git-username", env = "GIT_USERNAME", value_name = "USER")]
    pub git_username: Option<String>,

    #[arg(
        long = "git-token",
        env = "GIT_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true
    )]
    pub git_token: Option<String>,

    #[arg(long = "argocd-username", env = "ARGOCD_USERNAME", value_name = "USER")]
    pub argocd_username: Option<String>,

    #[arg(
        long = "argocd-password",
        env = "ARGOCD_PASSWORD",
        value_name = "PASSWORD",
        hide_env_values = true
    )]
    pub argocd_password: Option<String>,
}

/// Arguments for commands that only need the remote repositories.
#[derive(Debug, Args)]
pub struct RemoteArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,
}

// ── setup / scaffold ──────────────────────────────────────────────────────────

/// Arguments for `setup` and `scaffold`.
#[derive(Debug, Args)]
pub struct SetupArgs {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Target environments, overriding the configuration.
    #[arg(
        short = 'e',
        long = "environments",
        value_name = "ENV",
        value_delimiter = ',',
        help = "Comma-separated target environments"
    )]
    pub environments: Vec<String>,
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Project spec to read.
    #[arg(
        short = 's',
        long = "spec",
        value_name = "FILE",
        default_value = "argo_proj.yml"
    )]
    pub spec: PathBuf,

    /// Directory the manifest tree is written to.
    #[arg(short = 'o', long = "output", value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Target environments, overriding the configuration.
    #[arg(
        short = 'e',
        long = "environments",
        value_name = "ENV",
        value_delimiter = ',',
        help = "Comma-separated target environments"
    )]
    pub environments: Vec<String>,

    /// Also write a Namespace manifest per environment.
    #[arg(long = "namespaces", help = "Generate per-environment namespace manifests")]
    pub namespaces: bool,
}

// ── per-environment commands ──────────────────────────────────────────────────

/// Arguments for `deploy`, `remove-apps` and `remove-project`.
#[derive(Debug, Args)]
pub struct EnvArgs {
    /// Environment to act on.
    #[arg(long = "env", env = "TARGET_ENVIRONMENT", value_name = "ENV")]
    pub env: String,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Skip the confirmation prompt for destructive commands.
    #[arg(short = 'y', long = "yes", help = "Do not ask for confirmation")]
    pub yes: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Write `argo-bootstrap.toml` in the current directory.
    #[arg(
        long = "local",
        help = "Create local configuration in current directory"
    )]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `argocd.host`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
