//! Dependency analysis.
//!
//! - [`ldd`] — runs the dynamic-linker inspection utility and parses its output.
//! - [`closure`] — walks the dependency graph and owns the resulting closure.

use std::future::Future;
use std::path::Path;

use crate::error::Result;

pub mod closure;
pub mod ldd;

/// Captured result of one inspection-utility run.
#[derive(Debug, Clone, Default)]
pub struct Inspection {
    /// `false` when the utility exited non-zero, meaning "no dependencies".
    pub success: bool,
    /// Raw bytes: library paths need not be valid UTF-8.
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Lists the direct dynamic dependencies of one binary.
pub trait Inspector {
    fn inspect(&self, path: &Path) -> impl Future<Output = Result<Inspection>>;
}
