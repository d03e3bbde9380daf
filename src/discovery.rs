use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{CollectError, Result};
use crate::models::Source;

/// Fail with [`CollectError::NotReadable`] unless `source` can be opened (file)
/// or listed (directory).
pub fn ensure_readable(source: &Source) -> Result<()> {
    let probe = match source {
        Source::File(path) => fs::File::open(path).map(drop),
        Source::Directory(path) => fs::read_dir(path).map(drop),
    };

    probe.map_err(|e| CollectError::NotReadable {
        path: source.path().to_path_buf(),
        source: e,
    })
}

/// Candidate files for analysis under `source`.
///
/// A file source yields itself. A directory source yields every regular file
/// with an executable bit set, walking the tree lazily. Entries that cannot be
/// read mid-walk are logged and skipped.
pub fn candidates(source: &Source) -> Box<dyn Iterator<Item = PathBuf>> {
    match source {
        Source::File(path) => Box::new(std::iter::once(path.clone())),
        Source::Directory(root) => {
            let walk = WalkDir::new(root).follow_links(false).into_iter();
            Box::new(walk.filter_map(|entry| match entry {
                Ok(entry) => {
                    let path = entry.into_path();
                    is_executable_file(&path).then_some(path)
                }
                Err(e) => {
                    warn!("skipping unreadable entry: {e}");
                    None
                }
            }))
        }
    }
}

/// Regular file (after following symlinks) with any of the `x` bits set.
fn is_executable_file(path: &Path) -> bool {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            debug!("cannot stat {}: {e}", path.display());
            return false;
        }
    };

    metadata.is_file() && has_exec_bit(&metadata)
}

#[cfg(unix)]
fn has_exec_bit(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_exec_bit(_metadata: &fs::Metadata) -> bool {
    true
}
