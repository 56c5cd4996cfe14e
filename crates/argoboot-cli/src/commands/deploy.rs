//! `argo-bootstrap deploy`: register repositories, apply the project and
//! root application of one environment, and sync.

use tracing::instrument;

use crate::{
    cli::EnvArgs,
    commands::workflow::{self, Mode},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(environment = %args.env))]
pub fn execute(args: EnvArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = workflow::build_service(
        &config,
        &args.credentials,
        config.environments(&[])?,
        Mode::Remote,
        false,
    )?;

    output.header(&format!("Deploying environment {}", args.env))?;
    let spinner = output.spinner("Applying manifests and syncing applications...");
    let result = service.deploy(&args.env);
    spinner.finish_and_clear();

    result.with_cli_context(|| format!("Deploy {}", args.env))?;
    output.success(&format!("Environment {} deployed", args.env))?;
    Ok(())
}
