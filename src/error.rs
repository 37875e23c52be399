//! Error taxonomy for the extraction pipeline.
//!
//! Every variant is fatal to the run. The CLI maps each one to a distinct
//! exit status so scripts can tell a bad setup apart from a failing tool.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::cli::ExitStatus;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing metadata, missing header, bad settings, filename collisions.
    #[error("{0}")]
    Config(String),

    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The preprocessor could not be run or exited non-zero for `file`.
    #[error("preprocessor failed on {file}{}", format_diagnostic(.diagnostic))]
    Expansion { file: String, diagnostic: String },

    /// The string-extraction utility could not be run or exited non-zero.
    #[error("string extraction failed{}", format_diagnostic(.diagnostic))]
    Extraction { diagnostic: String },

    #[error("aborted, nothing was changed")]
    Aborted,
}

impl PipelineError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::Config(_) | Self::Io { .. } | Self::Aborted => ExitStatus::Failure,
            Self::Expansion { .. } => ExitStatus::ExpansionFailed,
            Self::Extraction { .. } => ExitStatus::ExtractionFailed,
        }
    }
}

fn format_diagnostic(diagnostic: &str) -> String {
    let trimmed = diagnostic.trim_end();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{}", trimmed)
    }
}
