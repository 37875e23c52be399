use std::io::{self, IsTerminal};

use anyhow::{Context, Result};

use super::super::{args::RunArgs, confirm::confirm, exit_status::ExitStatus, report};
use crate::{
    config::load_config,
    error::PipelineError,
    pipeline::{self, RegionSource, Settings},
};

/// Run the whole pipeline: resolve settings, plan, confirm, execute.
pub fn extract(args: &RunArgs) -> Result<ExitStatus> {
    let root = args
        .path
        .canonicalize()
        .with_context(|| format!("Invalid path: {}", args.path.display()))
        .map_err(|e| PipelineError::config(format!("{:#}", e)))?;

    let loaded = load_config(&root)?;
    if args.verbose && !loaded.from_file {
        eprintln!("Note: No .locexpandrc.json found, using default configuration");
    }
    let mut config = loaded.config;
    args.apply_to(&mut config);

    let region_source = RegionSource {
        region: args.region.clone(),
        metadata: args.metadata.clone(),
    };
    let mut settings = Settings::resolve(&root, &config, &region_source)?;
    settings.keep_scratch = args.keep_scratch;
    settings.verbose = args.verbose;

    let plan = pipeline::plan(&settings)?;
    report::print_skipped_warning(plan.skipped_count, args.verbose);
    report::print_plan(&plan, &root);

    if !args.yes {
        if args.verbose && !io::stdin().is_terminal() {
            eprintln!("Note: stdin is not a terminal; pass --yes to skip the prompt");
        }
        if !confirm("Continue?")? {
            return Err(PipelineError::Aborted.into());
        }
    }

    let summary = pipeline::execute(&settings, plan)?;
    report::print_success(&summary, &root);

    Ok(ExitStatus::Success)
}
