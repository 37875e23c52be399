use std::{
    fs,
    io::Write,
    path::Path,
    process::{Output, Stdio},
};

use anyhow::Result;
use tempfile::NamedTempFile;

use super::stage::StagedFile;
use crate::{config::ToolCommand, error::PipelineError};

/// Line injected at the top of every staged file except the header.
pub fn header_include(header: &str) -> String {
    format!("#include \"{}\"\n", header)
}

/// Runs the preprocessor over staged files, replacing each with its expansion.
pub struct MacroExpander<'a> {
    pub cc: &'a ToolCommand,
    pub header: &'a str,
    /// Working directory for the preprocessor, so the quoted header include
    /// resolves inside the scratch directory.
    pub scratch_dir: &'a Path,
}

impl MacroExpander<'_> {
    /// Expand every file except the header, stopping at the first failure.
    pub fn expand_all(&self, files: &[StagedFile]) -> Result<usize> {
        let mut expanded = 0;
        for file in files {
            if file.file_name() == self.header {
                continue;
            }
            self.expand(file)?;
            expanded += 1;
        }
        Ok(expanded)
    }

    pub fn expand(&self, file: &StagedFile) -> Result<()> {
        let content =
            fs::read(&file.path).map_err(|e| PipelineError::io("read", &file.path, e))?;

        let mut injected = header_include(self.header).into_bytes();
        injected.extend_from_slice(&content);
        self.replace(&file.path, &injected)?;

        let output = self.run(file)?;
        self.replace(&file.path, &output.stdout)?;
        Ok(())
    }

    fn run(&self, file: &StagedFile) -> Result<Output> {
        let name = file.file_name();
        let output = self
            .cc
            .to_command()
            .arg(&name)
            .current_dir(self.scratch_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| PipelineError::Expansion {
                file: source_label(file),
                diagnostic: format!("could not run {}: {}", self.cc.program, e),
            })?;

        if !output.status.success() {
            return Err(PipelineError::Expansion {
                file: source_label(file),
                diagnostic: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }
        Ok(output)
    }

    /// Write `content` to a fresh temp file beside `path`, then rename it
    /// over `path`. A crash leaves either the old or the new file, never a
    /// truncated one.
    fn replace(&self, path: &Path, content: &[u8]) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(self.scratch_dir)
            .map_err(|e| PipelineError::io("create temp file in", self.scratch_dir, e))?;
        tmp.write_all(content)
            .map_err(|e| PipelineError::io("write", tmp.path().to_path_buf(), e))?;
        tmp.persist(path)
            .map_err(|e| PipelineError::io("replace", path, e.error))?;
        Ok(())
    }
}

fn source_label(file: &StagedFile) -> String {
    file.source.display().to_string()
}
