use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::config::CollisionPolicy;
use crate::error::{CollectError, Result};
use crate::models::{CopiedLibrary, CopyOutcome, LibraryClosure};

/// Copy every closure entry into `target` under its base name, keeping
/// permission bits and modification time.
///
/// Entries are copied in closure order. The first failure aborts the pass and
/// files already written stay on disk. Files left by an earlier run are simply
/// replaced; only two entries of *this* pass sharing a base name count as a
/// collision, resolved by `policy`.
pub fn copy_closure(
    closure: &LibraryClosure,
    target: &Path,
    policy: CollisionPolicy,
    progress: &ProgressBar,
) -> Result<Vec<CopiedLibrary>> {
    let mut claimed: HashMap<OsString, PathBuf> = HashMap::new();
    let mut copied = Vec::with_capacity(closure.len());

    for (identifier, source) in closure.iter() {
        progress.set_message(identifier.to_string());

        let file_name = source
            .file_name()
            .ok_or_else(|| CollectError::Copy {
                path: source.to_path_buf(),
                target: target.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            })?
            .to_os_string();
        let destination = target.join(&file_name);

        let mut outcome = CopyOutcome::Copied;
        if let Some(first) = claimed.get(&file_name).filter(|first| *first != source) {
            match policy {
                CollisionPolicy::Error => {
                    return Err(CollectError::NameCollision {
                        file_name: file_name.to_string_lossy().into_owned(),
                        first: first.clone(),
                        second: source.to_path_buf(),
                    });
                }
                CollisionPolicy::Warn => {
                    warn!(
                        "{} overwrites {} (both named {})",
                        source.display(),
                        first.display(),
                        file_name.to_string_lossy()
                    );
                    outcome = CopyOutcome::Overwrote;
                }
                CollisionPolicy::Skip => {
                    warn!(
                        "skipping {}: {} already copied as {}",
                        source.display(),
                        first.display(),
                        file_name.to_string_lossy()
                    );
                    copied.push(CopiedLibrary {
                        identifier: identifier.to_string(),
                        source: source.to_path_buf(),
                        destination,
                        outcome: CopyOutcome::Skipped,
                    });
                    progress.inc(1);
                    continue;
                }
            }
        }

        info!("copy {} => {}", source.display(), target.display());
        copy_preserving(source, &destination).map_err(|e| CollectError::Copy {
            path: source.to_path_buf(),
            target: target.to_path_buf(),
            source: e,
        })?;

        claimed.insert(file_name, source.to_path_buf());
        copied.push(CopiedLibrary {
            identifier: identifier.to_string(),
            source: source.to_path_buf(),
            destination,
            outcome,
        });
        progress.inc(1);
    }

    Ok(copied)
}

/// `cp -p` for one file: bytes, permission bits, access and modification time.
/// Symlinked sources are dereferenced.
fn copy_preserving(source: &Path, destination: &Path) -> io::Result<()> {
    let mut reader = File::open(source)?;
    let metadata = reader.metadata()?;

    // Replace rather than write through: the old copy may be read-only or a symlink.
    if fs::symlink_metadata(destination).is_ok_and(|m| !m.is_dir()) {
        fs::remove_file(destination)?;
    }

    let times = FileTimes::new()
        .set_accessed(metadata.accessed()?)
        .set_modified(metadata.modified()?);
    write_preserving(&mut reader, destination, times, metadata.permissions())
}

/// Write the copy and stamp it through the handle that created it. The mode
/// goes on last, so a source without owner permission bits still copies.
fn write_preserving(
    reader: &mut File,
    destination: &Path,
    times: FileTimes,
    permissions: fs::Permissions,
) -> io::Result<()> {
    let mut writer = File::create(destination)?;
    io::copy(reader, &mut writer)?;
    writer.set_times(times)?;
    writer.set_permissions(permissions)
}
