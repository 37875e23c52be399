//! Project metadata lookup.
//!
//! The base language region lives in the project's `Info.plist` under
//! `CFBundleDevelopmentRegion`. Only the XML plist format is understood;
//! binary plists are reported so the user can pass `--region` instead.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::Result;
use glob::{MatchOptions, Pattern, glob_with};
use quick_xml::{Reader, events::Event};

use crate::error::PipelineError;

const BINARY_PLIST_MAGIC: &[u8] = b"bplist";

/// Base language designator, used to name `<region>.lproj`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region(String);

impl Region {
    pub fn new(value: &str) -> Result<Self, PipelineError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(PipelineError::config("region must not be empty"));
        }
        if value.contains(['/', '\\']) {
            return Err(PipelineError::config(format!(
                "region \"{}\" must not contain path separators",
                value
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the locale directory, e.g. `en.lproj`.
    pub fn lproj_dir(&self) -> String {
        format!("{}.lproj", self.0)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First file in `dir` matching `pattern`, in lexical order.
pub fn find_metadata_file(dir: &Path, pattern: &str) -> Result<Option<PathBuf>> {
    let full_pattern = Path::new(&Pattern::escape(&dir.to_string_lossy())).join(pattern);
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let mut matches: Vec<PathBuf> = glob_with(&full_pattern.to_string_lossy(), options)
        .map_err(|e| {
            PipelineError::config(format!("Invalid metadata pattern \"{}\": {}", pattern, e))
        })?
        .flatten()
        .filter(|path| path.is_file())
        .collect();
    matches.sort();
    Ok(matches.into_iter().next())
}

/// Read the string value stored under `key` in the top-level dictionary of
/// an XML property list.
///
/// Returns `Ok(None)` when the key is absent or holds something other than
/// a `<string>`. Comments and nested dictionaries are never matched.
pub fn read_plist_string(content: &str, key: &str) -> Result<Option<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut text = String::new();
    let mut found_key = false;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                if found_key && is_top_level(&path) && element.name().as_ref() != b"string" {
                    return Ok(None);
                }
                path.push(element.name().as_ref().to_vec());
                text.clear();
            }
            Event::Empty(element) => {
                if found_key && is_top_level(&path) {
                    return Ok((element.name().as_ref() == b"string").then(String::new));
                }
            }
            Event::Text(chunk) => text.push_str(&chunk.unescape()?),
            Event::CData(chunk) => text.push_str(&String::from_utf8_lossy(&chunk)),
            Event::End(_) => {
                let name = path.pop().unwrap_or_default();
                if is_top_level(&path) {
                    match name.as_slice() {
                        b"key" => found_key = text.trim() == key,
                        b"string" if found_key => return Ok(Some(text.trim().to_string())),
                        _ => {}
                    }
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Inside `<plist><dict>`, where the top-level keys and values live.
fn is_top_level(path: &[Vec<u8>]) -> bool {
    matches!(path, [plist, dict] if plist == b"plist" && dict == b"dict")
}

/// Locate the metadata file and read the region from it.
///
/// `explicit` bypasses the glob lookup when the user named a file.
pub fn resolve_region(
    root: &Path,
    explicit: Option<&Path>,
    pattern: &str,
    key: &str,
) -> Result<Region> {
    let path = match explicit {
        Some(path) => {
            let path = root.join(path);
            if !path.is_file() {
                return Err(PipelineError::config(format!(
                    "Metadata file {} does not exist",
                    path.display()
                ))
                .into());
            }
            path
        }
        None => find_metadata_file(root, pattern)?.ok_or_else(|| {
            PipelineError::config(format!(
                "No metadata file matching \"{}\" found in {}",
                pattern,
                root.display()
            ))
        })?,
    };

    let bytes = fs::read(&path).map_err(|e| PipelineError::io("read", &path, e))?;
    if bytes.starts_with(BINARY_PLIST_MAGIC) {
        return Err(PipelineError::config(format!(
            "{} is a binary property list; convert it to XML or pass --region",
            path.display()
        ))
        .into());
    }
    let content = String::from_utf8_lossy(&bytes);
    let value = read_plist_string(&content, key)
        .map_err(|e| {
            PipelineError::config(format!("Could not parse {}: {}", path.display(), e))
        })?
        .unwrap_or_default();
    if value.is_empty() {
        return Err(PipelineError::config(format!(
            "Key \"{}\" is missing or empty in {}",
            key,
            path.display()
        ))
        .into());
    }
    if value.starts_with("$(") || value.starts_with("${") {
        return Err(PipelineError::config(format!(
            "Key \"{}\" in {} is the unresolved build setting {}; pass --region instead",
            key,
            path.display(),
            value
        ))
        .into());
    }

    Ok(Region::new(&value)?)
}
