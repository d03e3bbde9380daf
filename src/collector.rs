use std::fs;
use std::path::Path;

use indicatif::ProgressBar;
use tracing::info;

use crate::analyzer::closure::ClosureBuilder;
use crate::analyzer::Inspector;
use crate::config::CollisionPolicy;
use crate::discovery;
use crate::error::{CollectError, Result};
use crate::materializer::copy_closure;
use crate::models::{CopiedLibrary, LibraryClosure, Source};

/// Entry point tying discovery, analysis and copying together.
///
/// The closure starts empty, is filled by [`analyse`](Self::analyse) and is
/// only read afterwards.
pub struct LibraryCollector<I> {
    sources: Vec<Source>,
    builder: ClosureBuilder<I>,
    on_collision: CollisionPolicy,
    analysed: bool,
}

impl<I: Inspector> LibraryCollector<I> {
    pub fn new(
        sources: Vec<Source>,
        inspector: I,
        max_depth: usize,
        on_collision: CollisionPolicy,
    ) -> Self {
        Self {
            sources,
            builder: ClosureBuilder::new(inspector, max_depth),
            on_collision,
            analysed: false,
        }
    }

    pub fn closure(&self) -> &LibraryClosure {
        self.builder.closure()
    }

    /// Resolve the library closure of every source. Runs at most once.
    ///
    /// All sources are checked for readability before any analysis starts.
    /// Any later error aborts the pass; libraries resolved up to that point
    /// stay in the closure.
    pub async fn analyse(&mut self) -> Result<()> {
        if self.analysed {
            return Ok(());
        }

        for source in &self.sources {
            discovery::ensure_readable(source)?;
        }

        for source in &self.sources {
            discovery::ensure_readable(source)?;
            info!("scanning {source}");
            for candidate in discovery::candidates(source) {
                self.builder.analyse(&candidate).await?;
            }
        }

        self.analysed = true;
        info!("resolved {} libraries", self.closure().len());
        Ok(())
    }

    /// Copy the closure into `target`, analysing first if that has not happened yet.
    pub async fn copy(&mut self, target: &Path, progress: &ProgressBar) -> Result<Vec<CopiedLibrary>> {
        ensure_writable_dir(target)?;
        self.analyse().await?;

        progress.set_length(self.closure().len() as u64);
        let copied = copy_closure(self.closure(), target, self.on_collision, progress)?;
        progress.finish_and_clear();

        Ok(copied)
    }
}

/// The output directory must already exist and accept new files.
fn ensure_writable_dir(path: &Path) -> Result<()> {
    let invalid = |reason: String| CollectError::InvalidOutputDirectory {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(path).map_err(|e| invalid(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(invalid("not a directory".to_string()));
    }

    tempfile::Builder::new()
        .prefix(".copy-libs-probe")
        .tempfile_in(path)
        .map_err(|e| invalid(format!("not writable: {e}")))?;

    Ok(())
}
