//! Source file enumeration
//!
//! Lists the eligible files of a flat source directory. Subdirectories are
//! never descended into.

use crate::error::{ConvertError, ConvertResult};
use crate::formats::Transcoder;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Eligible source file names found at enumeration time
///
/// Names carry no directory prefix and are kept sorted. Processing order is
/// not tied to this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    names: Vec<String>,
}

impl FileSet {
    /// Build a set from arbitrary names (sorted, deduplicated)
    #[must_use]
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        let mut names: Vec<String> = names.into_iter().collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// Number of eligible files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no file is eligible
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check membership
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    /// Iterate over names
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

/// Decide whether a directory entry is eligible for conversion
///
/// Filters apply in order: directories, hidden names, unknown extensions.
#[must_use]
pub fn is_eligible<T: Transcoder + ?Sized>(file_name: &str, is_dir: bool, transcoder: &T) -> bool {
    !is_dir && !file_name.starts_with('.') && transcoder.accepts(file_name)
}

/// List eligible files of `dir`
///
/// # Errors
/// - `ConvertError::DirectoryRead` if the directory or one of its entries
///   cannot be read
pub async fn enumerate_sources<T: Transcoder + ?Sized>(
    dir: &Path,
    transcoder: &T,
) -> ConvertResult<FileSet> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| ConvertError::directory_read(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ConvertError::directory_read(dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| ConvertError::directory_read(entry.path(), e))?;

        let Ok(name) = entry.file_name().into_string() else {
            warn!(path = %entry.path().display(), "Skipping entry with non UTF-8 name");
            continue;
        };

        if is_eligible(&name, file_type.is_dir(), transcoder) {
            names.push(name);
        } else {
            debug!(name = %name, "Skipping ineligible entry");
        }
    }

    Ok(FileSet::from_names(names))
}
