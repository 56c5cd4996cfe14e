//! `argo-bootstrap setup`: generate the App of Apps tree in the parent
//! repository and push it.

use tracing::instrument;

use crate::{
    cli::SetupArgs,
    commands::workflow::{self, Mode},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: SetupArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let environments = config.environments(&args.environments)?;
    let service = workflow::build_service(
        &config,
        &args.credentials,
        environments,
        Mode::Remote,
        config.generation.namespaces_manifest,
    )?;

    output.header("Setting up the App of Apps repository")?;
    let spinner = output.spinner("Generating manifests and pushing to the parent repository...");
    let result = service.setup();
    spinner.finish_and_clear();

    let report = result.with_cli_context(|| "Setup")?;
    workflow::report_manifests(&output, &report)?;
    workflow::report_commits(&output, &report)
}
