//! CLI argument definitions using clap.
//!
//! Running without a subcommand runs the extraction pipeline. Every option
//! overrides the matching field of `.locexpandrc.json`.
//!
//! ## Commands
//!
//! - (none): expand localization macros and run the extractor
//! - `init`: write a default `.locexpandrc.json`

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Project root to scan
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// File name of the header defining the localization macros
    #[arg(long)]
    pub header: Option<String>,

    /// Preprocessor command; the staged file name is appended
    #[arg(long, env = "LOCEXPAND_CC")]
    pub cc: Option<String>,

    /// Regex matched case-insensitively against source file names
    #[arg(long)]
    pub pattern: Option<String>,

    /// String-extraction command; `-o <dir>` and the files are appended
    #[arg(long, env = "LOCEXPAND_EXTRACTOR")]
    pub extractor: Option<String>,

    /// Project metadata file to read the region from
    #[arg(long, conflicts_with = "region")]
    pub metadata: Option<PathBuf>,

    /// Base language region (skips the metadata lookup)
    #[arg(long)]
    pub region: Option<String>,

    /// Directory that receives `<region>.lproj`
    #[arg(long)]
    pub output_root: Option<PathBuf>,

    /// Keep the scratch directory after the run
    #[arg(long)]
    pub keep_scratch: bool,

    /// Do not ask before writing the destination file
    #[arg(short, long)]
    pub yes: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunArgs {
    /// Apply command-line overrides on top of file configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(header) = &self.header {
            config.header = header.clone();
        }
        if let Some(cc) = &self.cc {
            config.cc = cc.clone();
        }
        if let Some(pattern) = &self.pattern {
            config.pattern = pattern.clone();
        }
        if let Some(extractor) = &self.extractor {
            config.extractor = extractor.clone();
        }
        if let Some(output_root) = &self.output_root {
            config.output_root = output_root.to_string_lossy().into_owned();
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize a new .locexpandrc.json configuration file
    Init,
}
