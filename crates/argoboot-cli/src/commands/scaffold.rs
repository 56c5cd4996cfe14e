//! `argo-bootstrap scaffold`: write a Kustomized Helm layout into every
//! child repository named in the parent repository's spec.

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
        false,
    )?;

    output.header("Scaffolding child repositories")?;
    let spinner = output.spinner("Cloning, scaffolding and pushing child repositories...");
    let result = service.scaffold();
    spinner.finish_and_clear();

    let report = result.with_cli_context(|| "Scaffold")?;
    for path in &report.applications {
        output.print(&format!("  {}", path.display()))?;
    }
    output.success(&format!(
        "{} files written across {} child repositories",
        report.file_count(),
        report.commits.len(),
    ))?;
    workflow::report_commits(&output, &report)
}
