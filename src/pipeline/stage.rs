use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use tempfile::TempDir;

use crate::error::PipelineError;

const SCRATCH_PREFIX: &str = "locexpand-";

/// A source file copied into the scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub source: PathBuf,
}

impl StagedFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Flat scratch copy of the collected sources.
///
/// The directory is removed when the area is dropped unless [`StagingArea::keep`]
/// is called first.
pub struct StagingArea {
    dir: TempDir,
    files: Vec<StagedFile>,
}

/// Fail if two sources would land on the same scratch file name.
///
/// Names are compared case-insensitively: on a case-insensitive filesystem
/// `Foo.m` and `FOO.M` are the same scratch file.
pub fn check_collisions(sources: &[PathBuf]) -> Result<(), PipelineError> {
    let mut seen: HashMap<String, &Path> = HashMap::new();
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        if let Some(previous) = seen.insert(name.to_string_lossy().to_lowercase(), source) {
            return Err(PipelineError::config(format!(
                "{} and {} share the file name {}; rename one of them",
                previous.display(),
                source.display(),
                name.to_string_lossy()
            )));
        }
    }
    Ok(())
}

impl StagingArea {
    /// Create a fresh scratch directory under the platform temp root and
    /// copy every source into it by file name.
    pub fn create(sources: &[PathBuf]) -> Result<Self> {
        Self::create_in(&std::env::temp_dir(), sources)
    }

    pub fn create_in(parent: &Path, sources: &[PathBuf]) -> Result<Self> {
        check_collisions(sources)?;

        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| PipelineError::io("create scratch directory in", parent, e))?;

        let mut files = Vec::with_capacity(sources.len());
        for source in sources {
            let Some(name) = source.file_name() else {
                continue;
            };
            let path = dir.path().join(name);
            fs::copy(source, &path).map_err(|e| PipelineError::io("copy", source, e))?;
            files.push(StagedFile {
                path,
                source: source.clone(),
            });
        }

        Ok(Self { dir, files })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// Delete a staged file from disk and from the staged set.
    pub fn remove(&mut self, file_name: &str) -> Result<Option<StagedFile>> {
        let Some(index) = self.files.iter().position(|f| f.file_name() == file_name) else {
            return Ok(None);
        };
        let removed = self.files.remove(index);
        fs::remove_file(&removed.path).map_err(|e| PipelineError::io("remove", &removed.path, e))?;
        Ok(Some(removed))
    }

    /// Persist the scratch directory and return its path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}
