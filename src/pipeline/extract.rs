use std::{
    fs,
    path::{Path, PathBuf},
    process::Stdio,
};

use anyhow::Result;

use super::stage::StagedFile;
use crate::{config::ToolCommand, error::PipelineError};

/// Runs the string-extraction utility once over every expanded file.
pub struct ExtractorInvoker<'a> {
    pub extractor: &'a ToolCommand,
    /// Locale directory that receives the resource file, e.g. `./en.lproj`.
    pub locale_dir: &'a Path,
}

impl ExtractorInvoker<'_> {
    /// Create the locale directory if needed and run the extractor.
    ///
    /// `files` must no longer contain the macro header.
    pub fn invoke(&self, files: &[StagedFile]) -> Result<()> {
        fs::create_dir_all(self.locale_dir)
            .map_err(|e| PipelineError::io("create", self.locale_dir, e))?;

        let inputs: Vec<&PathBuf> = files.iter().map(|f| &f.path).collect();
        let output = self
            .extractor
            .to_command()
            .arg("-o")
            .arg(self.locale_dir)
            .args(inputs)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| PipelineError::Extraction {
                diagnostic: format!("could not run {}: {}", self.extractor.program, e),
            })?;

        if !output.status.success() {
            let mut diagnostic = String::from_utf8_lossy(&output.stderr).into_owned();
            if diagnostic.trim().is_empty() {
                diagnostic = format!("{} exited with {}", self.extractor.program, output.status);
            }
            return Err(PipelineError::Extraction { diagnostic }.into());
        }
        Ok(())
    }
}
