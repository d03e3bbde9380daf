use std::path::Path;

use tracing::{debug, trace};

use crate::error::{CollectError, Result};
use crate::models::{LibraryClosure, LinkedLibrary};

use super::ldd::parse_ldd_output;
use super::Inspector;

/// Depth bound used when no configuration overrides it.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// An inspected binary whose reported libraries are still being walked.
struct Frame {
    depth: usize,
    remaining: std::vec::IntoIter<LinkedLibrary>,
}

/// Builds the library closure by inspecting candidates and, transitively,
/// every newly discovered library.
///
/// Traversal uses an explicit stack of frames, one per binary being walked.
/// Each library a binary reports is claimed and fully explored before the
/// next one on its list is looked at, so the first path seen for an
/// identifier along that order wins. The closure doubles as the visited set:
/// an identifier is inspected at most once no matter how many binaries link
/// it, which is also what ends cycles.
pub struct ClosureBuilder<I> {
    inspector: I,
    max_depth: usize,
    closure: LibraryClosure,
}

impl<I: Inspector> ClosureBuilder<I> {
    pub fn new(inspector: I, max_depth: usize) -> Self {
        Self {
            inspector,
            max_depth,
            closure: LibraryClosure::new(),
        }
    }

    pub fn closure(&self) -> &LibraryClosure {
        &self.closure
    }

    #[cfg(test)]
    pub fn inspector(&self) -> &I {
        &self.inspector
    }

    /// Add everything `candidate` links against, directly or transitively.
    ///
    /// Fails with [`CollectError::RecursionTooDeep`] as soon as a library
    /// deeper than the bound is reached; whatever was resolved before that
    /// stays in the closure.
    pub async fn analyse(&mut self, candidate: &Path) -> Result<()> {
        let mut stack: Vec<Frame> = self.expand(candidate, 0).await?.into_iter().collect();

        while let Some(frame) = stack.last_mut() {
            let Some(library) = frame.remaining.next() else {
                stack.pop();
                continue;
            };
            let depth = frame.depth + 1;

            trace!(
                "{} => {} ({})",
                library.identifier,
                library.path.display(),
                library.address
            );
            if self.closure.contains(&library.identifier) {
                continue;
            }
            if !library.path.exists() {
                debug!(
                    "{} resolves to missing {}, dropping",
                    library.identifier,
                    library.path.display()
                );
                continue;
            }

            self.closure.insert(&library.identifier, &library.path);
            if let Some(child) = self.expand(&library.path, depth).await? {
                stack.push(child);
            }
        }

        Ok(())
    }

    /// Inspect `path` and open a frame over what it links against.
    /// `None` means the binary has no dynamic dependencies.
    async fn expand(&self, path: &Path, depth: usize) -> Result<Option<Frame>> {
        if depth > self.max_depth {
            return Err(CollectError::RecursionTooDeep {
                path: path.to_path_buf(),
                depth,
                limit: self.max_depth,
            });
        }

        debug!("checking {}", path.display());
        let inspection = self.inspector.inspect(path).await?;
        if !inspection.success {
            trace!(
                "no dynamic dependencies: {} ({})",
                path.display(),
                inspection.stderr.trim()
            );
            return Ok(None);
        }

        Ok(Some(Frame {
            depth,
            remaining: parse_ldd_output(&inspection.stdout).into_iter(),
        }))
    }
}
