//! Error types for the modlink CLI
//!
//! Every variant names the offending path or key so the operator can fix the
//! input and re-run.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for upload operations
pub type Result<T> = std::result::Result<T, UploadError>;

#[derive(Error, Debug)]
pub enum UploadError {
    /// No descriptor file under the metadata directory
    #[error("No module descriptor (.yml/.yaml) found under '{}'. Add one with a 'module' section.", .dir.display())]
    DescriptorNotFound { dir: PathBuf },

    /// More than one descriptor file under the metadata directory
    #[error("Multiple module descriptors found under '{}': {}. Keep exactly one.", .dir.display(), format_paths(.found))]
    AmbiguousDescriptor { dir: PathBuf, found: Vec<PathBuf> },

    /// Required descriptor key is absent
    #[error("Field '{field}' missing in module descriptor '{}'", .path.display())]
    MissingField { field: String, path: PathBuf },

    /// Descriptor key is not allowed or has the wrong type
    #[error("Invalid field '{field}' in module descriptor '{}': {reason}", .path.display())]
    InvalidField {
        field: String,
        reason: String,
        path: PathBuf,
    },

    /// Descriptor could not be parsed or has the wrong shape
    #[error("Invalid module descriptor '{}': {reason}", .path.display())]
    InvalidDescriptor { path: PathBuf, reason: String },

    /// Connection configuration is missing or invalid
    #[error("Configuration error: {0}. Check your database.ini file or DATABASE_URL.")]
    Config(String),

    /// Database operation failed (SQLx)
    #[error("Database error: {0}. Check your database connection settings.")]
    Database(#[from] sqlx::Error),

    /// Bundled schema migrations failed
    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// File system operation failed
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl UploadError {
    pub fn missing_field(field: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self::MissingField {
            field: field.into(),
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn invalid_field(
        field: impl Into<String>,
        reason: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn invalid_descriptor(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_lists_every_path() {
        let err = UploadError::AmbiguousDescriptor {
            dir: PathBuf::from("course"),
            found: vec![PathBuf::from("course/a.yml"), PathBuf::from("course/b.yaml")],
        };
        let message = err.to_string();
        assert!(message.contains("'course/a.yml'"));
        assert!(message.contains("'course/b.yaml'"));
    }

    #[test]
    fn test_missing_field_names_key_and_path() {
        let err = UploadError::missing_field("module", "course/module.yml");
        assert_eq!(
            err.to_string(),
            "Field 'module' missing in module descriptor 'course/module.yml'"
        );
    }
}
