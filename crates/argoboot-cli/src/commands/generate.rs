//! `argo-bootstrap generate`: render the manifest tree from a local spec,
//! without git or ArgoCD.

use std::path::PathBuf;

use serde::Serialize;
use tracing::instrument;

use argoboot_core::prelude::GenerationReport;

use crate::{
    cli::{CredentialArgs, GenerateArgs, OutputFormat},
    commands::workflow::{self, Mode},
    config::AppConfig,
    error::{CliResult, IntoCli},
    output::OutputManager,
};

/// `--output-format json` result.
#[derive(Debug, Serialize)]
struct GenerateSummary {
    run_id: String,
    output: PathBuf,
    projects: Vec<PathBuf>,
    applications: Vec<PathBuf>,
}

impl GenerateSummary {
    fn new(report: GenerationReport, output: PathBuf) -> Self {
        Self {
            run_id: report.run_id.to_string(),
            output,
            projects: report.projects,
            applications: report.applications,
        }
    }
}

#[instrument(skip_all, fields(spec = %args.spec.display(), output = %args.output.display()))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let environments = config.environments(&args.environments)?;
    let namespaces = args.namespaces || config.generation.namespaces_manifest;
    let service = workflow::build_service(
        &config,
        &CredentialArgs::default(),
        environments,
        Mode::Offline,
        namespaces,
    )?;

    let report = service
        .generate(&args.spec, &args.output)
        .with_cli_context(|| format!("Generate from {}", args.spec.display()))?;

    if output.format() == OutputFormat::Json {
        output.json(&GenerateSummary::new(report, args.output))?;
        return Ok(());
    }

    output.header(&format!("Manifests written to {}", args.output.display()))?;
    workflow::report_manifests(&output, &report)
}
