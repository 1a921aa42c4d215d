//! Testing utilities for confconv workspace
//!
//! Shared fixtures for building source trees and inspecting output.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SIMPLE_YAML: &str = "name: demo\ncount: 3\n";
pub const SIMPLE_JSON: &str = "{\n  \"count\": 3,\n  \"name\": \"demo\"\n}";
pub const BROKEN_YAML: &str = "services: [web, db\nports: {http: 80\n";

pub const NESTED_YAML: &str = r"
server:
  host: localhost
  ports:
    - 80
    - 443
  tls: true
features: []
owner: ~
";

/// Temporary workspace holding a source directory and a target path
///
/// The target directory is not created; staging does that.
pub struct Workspace {
    root: TempDir,
    source: PathBuf,
    target: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let source = root.path().join("src");
        let target = root.path().join("dist");
        fs::create_dir(&source).unwrap();
        Self {
            root,
            source,
            target,
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Write a file into the source directory
    pub fn with_source(self, name: &str, contents: &str) -> Self {
        fs::write(self.source.join(name), contents).unwrap();
        self
    }

    /// Create a subdirectory inside the source directory
    pub fn with_source_dir(self, name: &str) -> Self {
        fs::create_dir_all(self.source.join(name)).unwrap();
        self
    }

    /// Pre-populate the target directory
    pub fn with_target_file(self, name: &str, contents: &str) -> Self {
        fs::create_dir_all(&self.target).unwrap();
        fs::write(self.target.join(name), contents).unwrap();
        self
    }

    pub fn read_target(&self, name: &str) -> String {
        fs::read_to_string(self.target.join(name)).unwrap()
    }

    pub fn target_entries(&self) -> Vec<String> {
        list_dir(&self.target)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Sorted entry names of a directory
pub fn list_dir(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
