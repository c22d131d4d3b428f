//! Module descriptor loading
//!
//! A module directory carries exactly one YAML descriptor, anywhere below it:
//!
//! ```yaml
//! module:
//!   name: Introduction to Rust
//!   description: Ownership, borrowing and lifetimes
//! ```

use crate::discovery::has_extension;
use crate::error::{Result, UploadError};
use modlink_common::Module;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recognized descriptor extensions (case-sensitive)
pub const DESCRIPTOR_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// Top-level key holding the module section
pub const MODULE_KEY: &str = "module";

const NAME_KEY: &str = "name";
const DESCRIPTION_KEY: &str = "description";
const ALLOWED_KEYS: &[&str] = &[NAME_KEY, DESCRIPTION_KEY];

/// Find the single descriptor file under `dir` (recursive)
pub fn find_descriptor(dir: &Path) -> Result<PathBuf> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        let is_descriptor = DESCRIPTOR_EXTENSIONS
            .iter()
            .any(|ext| has_extension(entry.path(), ext));
        if entry.file_type().is_file() && is_descriptor {
            found.push(entry.into_path());
        }
    }

    match found.len() {
        0 => Err(UploadError::DescriptorNotFound {
            dir: dir.to_path_buf(),
        }),
        1 => Ok(found.remove(0)),
        _ => Err(UploadError::AmbiguousDescriptor {
            dir: dir.to_path_buf(),
            found,
        }),
    }
}

/// Locate, parse and validate the module descriptor under `dir`
pub fn load_module(dir: &Path) -> Result<Module> {
    let path = find_descriptor(dir)?;
    tracing::debug!(path = %path.display(), "Using module descriptor");

    let text = std::fs::read_to_string(&path).map_err(|e| UploadError::io(&path, e))?;
    parse_module(&text, &path)
}

/// Validate descriptor text. `path` is only used for error context.
pub fn parse_module(text: &str, path: &Path) -> Result<Module> {
    let document: Value = serde_yaml::from_str(text)
        .map_err(|e| UploadError::invalid_descriptor(path, format!("Failed to parse YAML: {}", e)))?;

    let section = match &document {
        Value::Mapping(root) => root
            .get(MODULE_KEY)
            .ok_or_else(|| UploadError::missing_field(MODULE_KEY, path))?,
        // An empty file parses to null and has no module section either
        Value::Null => return Err(UploadError::missing_field(MODULE_KEY, path)),
        _ => {
            return Err(UploadError::invalid_descriptor(
                path,
                "top level must be a mapping",
            ))
        },
    };

    let Value::Mapping(section) = section else {
        return Err(UploadError::invalid_descriptor(
            path,
            format!("'{}' must be a mapping of name and description", MODULE_KEY),
        ));
    };

    for key in section.keys() {
        match key.as_str() {
            Some(key) if ALLOWED_KEYS.contains(&key) => {},
            _ => {
                return Err(UploadError::invalid_field(
                    format!("{}.{}", MODULE_KEY, display_key(key)),
                    "only 'name' and 'description' are allowed",
                    path,
                ))
            },
        }
    }

    let name = required_string(section, NAME_KEY, path)?;
    let description = required_string(section, DESCRIPTION_KEY, path)?;

    Ok(Module::new(name, description))
}

fn required_string(section: &Mapping, key: &str, path: &Path) -> Result<String> {
    let field = format!("{}.{}", MODULE_KEY, key);
    match section.get(key) {
        None => Err(UploadError::missing_field(field, path)),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(UploadError::invalid_field(field, "expected a string", path)),
    }
}

fn display_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| "<non-string key>".to_string()),
    }
}
