use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Library identifier → resolved path for every library reachable from the inputs.
///
/// Keys are unique and iterate in sorted order. Every path was checked to exist
/// when it was inserted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LibraryClosure {
    libraries: BTreeMap<String, PathBuf>,
}

impl LibraryClosure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.libraries.contains_key(identifier)
    }

    /// Record `identifier` unless it is already known. Returns `true` on insert.
    pub fn insert(&mut self, identifier: &str, path: &Path) -> bool {
        if self.contains(identifier) {
            return false;
        }
        self.libraries
            .insert(identifier.to_string(), path.to_path_buf());
        true
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.libraries
            .iter()
            .map(|(name, path)| (name.as_str(), path.as_path()))
    }
}

/// A user-declared input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A single file, analysed whatever its permission bits.
    File(PathBuf),
    /// A directory root, scanned recursively for executables.
    Directory(PathBuf),
}

impl Source {
    /// Classify a declared path by what is on disk right now.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Source::Directory(path)
        } else {
            Source::File(path)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Source::File(p) | Source::Directory(p) => p,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(p) => write!(f, "file {}", p.display()),
            Source::Directory(p) => write!(f, "directory {}", p.display()),
        }
    }
}

/// One `name => /path (0xaddr)` line reported by the inspection utility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedLibrary {
    pub identifier: String,
    pub path: PathBuf,
    pub address: String,
}

/// A closure entry that was written into the output directory.
#[derive(Debug, Clone, Serialize)]
pub struct CopiedLibrary {
    pub identifier: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub outcome: CopyOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyOutcome {
    Copied,
    /// Written over a file copied earlier in the same pass.
    Overwrote,
    /// Left out because an earlier entry already claimed the file name.
    Skipped,
}

impl std::fmt::Display for CopyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CopyOutcome::Copied => write!(f, "copied"),
            CopyOutcome::Overwrote => write!(f, "overwrote"),
            CopyOutcome::Skipped => write!(f, "skipped"),
        }
    }
}
