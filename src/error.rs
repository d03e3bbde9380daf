use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Fatal conditions raised while collecting a library closure.
///
/// Every variant aborts the run. Conditions that are absorbed locally (an
/// inspector reporting no dependencies, a resolved path missing on disk, an
/// unreadable entry inside a directory walk) never surface as a `CollectError`.
#[derive(Debug, Error)]
pub enum CollectError {
    /// A declared source cannot be opened or listed.
    #[error("not readable: {}", .path.display())]
    NotReadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory is missing, not a directory, or not writable.
    #[error("not a writable directory: {} ({reason})", .path.display())]
    InvalidOutputDirectory { path: PathBuf, reason: String },

    /// A dependency chain went past the configured depth bound.
    #[error("recursion too deep: {} at depth {depth} (limit {limit})", .path.display())]
    RecursionTooDeep {
        path: PathBuf,
        depth: usize,
        limit: usize,
    },

    /// Copying one closure entry failed; earlier copies stay on disk.
    #[error("failed to copy {} into {}", .path.display(), .target.display())]
    Copy {
        path: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two resolved paths share a base name and the policy forbids overwriting.
    #[error(
        "{} and {} would both be copied as {file_name}",
        .first.display(),
        .second.display()
    )]
    NameCollision {
        file_name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// The inspection utility did not exit within its time bound.
    #[error("{program} timed out after {}s on {}", .timeout.as_secs(), .path.display())]
    Timeout {
        program: String,
        path: PathBuf,
        timeout: Duration,
    },

    /// The inspection utility could not be run at all.
    #[error("failed to run {program} on {}", .path.display())]
    Inspector {
        program: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, CollectError>;
