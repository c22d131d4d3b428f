//! Fragment discovery
//!
//! Reads every `.html` file of a module directory into a [`Fragment`].

use crate::error::{Result, UploadError};
use modlink_common::Fragment;
use std::path::Path;
use walkdir::WalkDir;

/// Extension of content fragment files (case-sensitive)
pub const FRAGMENT_EXTENSION: &str = "html";

/// How far below the module directory fragments are searched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryPolicy {
    /// Only files directly inside the directory
    #[default]
    Flat,
    /// Files at any depth
    Recursive,
}

/// List the fragments of `dir`.
///
/// The returned order carries no meaning; use
/// [`FragmentChain`](modlink_common::FragmentChain) to order them.
pub fn discover_fragments(dir: &Path, policy: DiscoveryPolicy) -> Result<Vec<Fragment>> {
    let mut walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    if policy == DiscoveryPolicy::Flat {
        walker = walker.max_depth(1);
    }

    let mut fragments = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_extension(entry.path(), FRAGMENT_EXTENSION) {
            continue;
        }

        let content = std::fs::read_to_string(entry.path())
            .map_err(|e| UploadError::io(entry.path(), e))?;
        let name = entry.file_name().to_string_lossy().into_owned();

        tracing::trace!(path = %entry.path().display(), bytes = content.len(), "Discovered fragment");
        fragments.push(Fragment { content, name });
    }

    tracing::debug!(dir = %dir.display(), count = fragments.len(), "Fragment discovery finished");
    Ok(fragments)
}

pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}
