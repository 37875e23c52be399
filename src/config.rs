use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

pub const CONFIG_FILE_NAME: &str = ".locexpandrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// File name of the header that defines the localization macros.
    #[serde(default = "default_header")]
    pub header: String,
    /// Preprocessor invocation, split on whitespace. The file name is appended.
    #[serde(default = "default_cc")]
    pub cc: String,
    /// Regex matched case-insensitively against source file names.
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_extractor")]
    pub extractor: String,
    /// Glob for the project metadata file, relative to the working directory.
    #[serde(default = "default_metadata_pattern")]
    pub metadata_pattern: String,
    #[serde(default = "default_region_key")]
    pub region_key: String,
    #[serde(default = "default_table_name")]
    pub table_name: String,
    #[serde(default = "default_output_root")]
    pub output_root: String,
}

fn default_header() -> String {
    "Localization.h".to_string()
}

fn default_cc() -> String {
    "clang -E -P".to_string()
}

fn default_pattern() -> String {
    r"\.(h|m|mm|c)$".to_string()
}

fn default_extractor() -> String {
    "genstrings".to_string()
}

fn default_metadata_pattern() -> String {
    "*Info.plist".to_string()
}

fn default_region_key() -> String {
    "CFBundleDevelopmentRegion".to_string()
}

fn default_table_name() -> String {
    "Localizable.strings".to_string()
}

fn default_output_root() -> String {
    "./".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header: default_header(),
            cc: default_cc(),
            pattern: default_pattern(),
            extractor: default_extractor(),
            metadata_pattern: default_metadata_pattern(),
            region_key: default_region_key(),
            table_name: default_table_name(),
            output_root: default_output_root(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error naming the offending field if the source pattern is
    /// not a valid regex, the metadata glob is invalid, or a command is empty.
    pub fn validate(&self) -> Result<()> {
        source_regex(&self.pattern)
            .with_context(|| format!("Invalid regex in 'pattern': \"{}\"", self.pattern))?;

        Pattern::new(&self.metadata_pattern).with_context(|| {
            format!(
                "Invalid glob pattern in 'metadataPattern': \"{}\"",
                self.metadata_pattern
            )
        })?;

        ToolCommand::parse(&self.cc).context("Invalid 'cc'")?;
        ToolCommand::parse(&self.extractor).context("Invalid 'extractor'")?;

        if self.header.trim().is_empty() {
            anyhow::bail!("'header' must not be empty");
        }

        Ok(())
    }
}

/// Compile a source-file pattern. Matching is always case-insensitive.
pub fn source_regex(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(Into::into)
}

/// An external tool invocation: program plus leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn parse(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let Some(program) = parts.next() else {
            return Err(PipelineError::config("command must not be empty").into());
        };
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn to_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .map_err(|e| PipelineError::io("read", &path, e))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| {
                    PipelineError::config(format!(
                        "Failed to parse config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            config
                .validate()
                .map_err(|e| PipelineError::config(format!("{:#}", e)))?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
