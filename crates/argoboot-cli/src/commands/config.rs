//! `argo-bootstrap config`: inspect the active configuration.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&value)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let value = match key {
        "environments" => config.environments.join(","),
        "git.provider" => config.git.provider.clone(),
        "git.admin_email" => config.git.admin_email.clone(),
        "git.transport" => config.git.transport.to_string(),
        "argocd.host" => config.argocd.host.clone(),
        "argocd.port" => config.argocd.port.to_string(),
        "argocd.insecure" => config.argocd.insecure.to_string(),
        "paths.data_dir" => config.paths.data_dir.display().to_string(),
        "generation.namespaces_manifest" => config.generation.namespaces_manifest.to_string(),
        "templates.dir" => config
            .templates
            .dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_default(),
        "output.no_color" => config.output.no_color.to_string(),
        _ => {
            return Err(CliError::ConfigError {
                message: format!("Unknown config key: '{key}'"),
                source: None,
            });
        }
    };
    Ok(value)
}

// ── tests ─────────────────────────────────────────────────────────────────────
