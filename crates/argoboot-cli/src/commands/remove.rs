//! Teardown commands: `remove-apps`, `remove-project` and `remove-repos`.

use std::io::IsTerminal;

use tracing::{debug, instrument};

use crate::{
    cli::{EnvArgs, RemoteArgs},
    commands::workflow::{self, Mode},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Delete the root application of one environment; its children cascade.
#[instrument(skip_all, fields(environment = %args.env))]
pub fn apps(args: EnvArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = workflow::build_service(
        &config,
        &args.credentials,
        config.environments(&[])?,
        Mode::Remote,
        false,
    )?;
    confirm(
        &format!("Delete every application of environment '{}'?", args.env),
        args.yes,
    )?;

    let spinner = output.spinner("Deleting root application...");
    let result = service.remove_apps(&args.env);
    spinner.finish_and_clear();

    let name = result.with_cli_context(|| format!("Remove apps of {}", args.env))?;
    output.success(&format!("Deleted {name} and its child applications"))?;
    Ok(())
}

/// Delete the AppProject of one environment.
#[instrument(skip_all, fields(environment = %args.env))]
pub fn project(args: EnvArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = workflow::build_service(
        &config,
        &args.credentials,
        config.environments(&[])?,
        Mode::Remote,
        false,
    )?;
    confirm(
        &format!("Delete the project of environment '{}'?", args.env),
        args.yes,
    )?;

    let spinner = output.spinner("Deleting project...");
    let result = service.remove_project(&args.env);
    spinner.finish_and_clear();

    let name = result.with_cli_context(|| format!("Remove project of {}", args.env))?;
    output.success(&format!("Deleted project {name}"))?;
    Ok(())
}

/// Unregister the spec's repositories. Failures per repository are logged
/// and skipped.
#[instrument(skip_all)]
pub fn repos(args: RemoteArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = workflow::build_service(
        &config,
        &args.credentials,
        config.environments(&[])?,
        Mode::Remote,
        false,
    )?;

    let spinner = output.spinner("Unregistering repositories...");
    let result = service.remove_repos();
    spinner.finish_and_clear();

    let removed = result.with_cli_context(|| "Remove repositories")?;
    output.success(&format!("{removed} repositories unregistered"))?;
    Ok(())
}

/// Ask before a destructive step unless `--yes` was given.
///
/// Without a terminal to ask on, `--yes` is required.
fn confirm(prompt: &str, assume_yes: bool) -> CliResult<()> {
    if assume_yes {
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::InvalidInput {
            message: "refusing to delete without confirmation; pass --yes".into(),
            source: None,
        });
    }
    ask(prompt)
}

#[cfg(feature = "interactive")]
fn ask(prompt: &str) -> CliResult<()> {
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::InvalidInput {
            message: format!("could not read confirmation: {e}"),
            source: Some(Box::new(e)),
        })?;
    debug!(confirmed, "confirmation answered");
    if confirmed { Ok(()) } else { Err(CliError::Cancelled) }
}

#[cfg(not(feature = "interactive"))]
fn ask(prompt: &str) -> CliResult<()> {
    debug!(prompt, "built without prompts");
    Err(CliError::InvalidInput {
        message: "this build cannot prompt for confirmation; pass --yes".into(),
        source: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_skips_the_prompt() {
        assert!(confirm("Delete?", true).is_ok());
    }
}
