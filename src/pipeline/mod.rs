//! The extraction pipeline.
//!
//! Runs strictly in order: collect, stage, strip, expand, extract. Nothing
//! outside the scratch directory is touched before [`execute`] is called, so
//! callers can show [`Plan`] to the user and stop there.
//!
//! ## Module Structure
//!
//! - `collect`: recursive source discovery
//! - `stage`: flat scratch copy of the sources
//! - `strip`: include/import directive blanking
//! - `expand`: header injection and preprocessor run
//! - `extract`: string-extraction utility invocation

pub mod collect;
pub mod expand;
pub mod extract;
pub mod stage;
pub mod strip;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use colored::Colorize;
use regex::Regex;

use crate::{
    config::{Config, ToolCommand, source_regex},
    error::PipelineError,
    metadata::{Region, resolve_region},
};
use collect::SourceCollector;
use expand::MacroExpander;
use extract::ExtractorInvoker;
use stage::{StagingArea, check_collisions};
use strip::strip_includes;

/// Everything a run needs, resolved up front and threaded through each step.
#[derive(Debug)]
pub struct Settings {
    pub root: PathBuf,
    pub header: String,
    pub cc: ToolCommand,
    pub pattern: Regex,
    pub extractor: ToolCommand,
    pub region: Region,
    pub output_root: PathBuf,
    pub table_name: String,
    /// Parent of the scratch directory. `None` means the platform temp root.
    pub scratch_parent: Option<PathBuf>,
    pub keep_scratch: bool,
    pub verbose: bool,
}

/// How the region is determined when building [`Settings`].
#[derive(Debug, Default, Clone)]
pub struct RegionSource {
    /// Use this region and skip the metadata file entirely.
    pub region: Option<String>,
    /// Read this metadata file instead of searching with the configured glob.
    pub metadata: Option<PathBuf>,
}

impl Settings {
    pub fn resolve(root: &Path, config: &Config, region_source: &RegionSource) -> Result<Self> {
        config
            .validate()
            .map_err(|e| PipelineError::config(format!("{:#}", e)))?;

        let region = match &region_source.region {
            Some(region) => Region::new(region)?,
            None => resolve_region(
                root,
                region_source.metadata.as_deref(),
                &config.metadata_pattern,
                &config.region_key,
            )?,
        };

        let output_root = Path::new(&config.output_root);
        let output_root = if output_root.is_absolute() {
            output_root.to_path_buf()
        } else {
            root.join(output_root.strip_prefix(".").unwrap_or(output_root))
        };

        Ok(Self {
            root: root.to_path_buf(),
            header: config.header.clone(),
            cc: ToolCommand::parse(&config.cc)?,
            pattern: source_regex(&config.pattern)?,
            extractor: ToolCommand::parse(&config.extractor)?,
            region,
            output_root,
            table_name: config.table_name.clone(),
            scratch_parent: None,
            keep_scratch: false,
            verbose: false,
        })
    }

    pub fn locale_dir(&self) -> PathBuf {
        self.output_root.join(self.region.lproj_dir())
    }

    pub fn destination(&self) -> PathBuf {
        self.locale_dir().join(&self.table_name)
    }
}

/// Read-only preparation: what would be staged and where output goes.
#[derive(Debug)]
pub struct Plan {
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
    pub destination_exists: bool,
    /// Paths the collector could not access.
    pub skipped_count: usize,
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunSummary {
    pub destination: PathBuf,
    pub extracted_count: usize,
    /// Set when the scratch directory was kept for inspection.
    pub scratch_dir: Option<PathBuf>,
}

/// Collect sources and check preconditions without mutating anything.
pub fn plan(settings: &Settings) -> Result<Plan> {
    let collector =
        SourceCollector::new(&settings.root, settings.pattern.clone(), settings.verbose);
    let sources: Vec<PathBuf> = collector.iter().collect();
    let skipped_count = collector.skipped_count();

    let has_header = sources.iter().any(|path| {
        path.file_name()
            .is_some_and(|name| name == settings.header.as_str())
    });
    if !has_header {
        return Err(PipelineError::config(format!(
            "Macro header {} not found among files matching \"{}\" under {}",
            settings.header,
            settings.pattern.as_str(),
            settings.root.display()
        ))
        .into());
    }
    if sources.len() < 2 {
        return Err(PipelineError::config(format!(
            "No source files besides {} matched \"{}\"",
            settings.header,
            settings.pattern.as_str()
        ))
        .into());
    }
    check_collisions(&sources)?;

    let destination = settings.destination();
    Ok(Plan {
        destination_exists: destination.exists(),
        destination,
        sources,
        skipped_count,
    })
}

/// Stage, strip, expand, and extract. Aborts on the first failure.
pub fn execute(settings: &Settings, plan: Plan) -> Result<RunSummary> {
    let mut area = match &settings.scratch_parent {
        Some(parent) => StagingArea::create_in(parent, &plan.sources)?,
        None => StagingArea::create(&plan.sources)?,
    };
    step(settings, &format!("Staged {} file(s) in {}", area.files().len(), area.path().display()));

    for file in area.files() {
        let content =
            fs::read(&file.path).map_err(|e| PipelineError::io("read", &file.source, e))?;
        fs::write(&file.path, strip_includes(&content))
            .map_err(|e| PipelineError::io("write", &file.path, e))?;
    }
    step(settings, "Stripped include and import directives");

    let expanded_count = MacroExpander {
        cc: &settings.cc,
        header: &settings.header,
        scratch_dir: area.path(),
    }
    .expand_all(area.files())?;
    step(settings, &format!("Expanded {} file(s) with {}", expanded_count, settings.cc.program));

    area.remove(&settings.header)?;

    let locale_dir = settings.locale_dir();
    ExtractorInvoker {
        extractor: &settings.extractor,
        locale_dir: &locale_dir,
    }
    .invoke(area.files())?;
    let extracted_count = area.files().len();
    step(settings, &format!("Ran {} over {} file(s)", settings.extractor.program, extracted_count));

    let scratch_dir = settings.keep_scratch.then(|| area.keep());

    Ok(RunSummary {
        destination: plan.destination,
        extracted_count,
        scratch_dir,
    })
}

fn step(settings: &Settings, message: &str) {
    if settings.verbose {
        eprintln!("{} {}", "-->".blue(), message);
    }
}
