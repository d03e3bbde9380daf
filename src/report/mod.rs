//! Report renderers for a collection run.
//!
//! - [`terminal`] — colored summary plus a table of libraries; respects `--verbose` / `--quiet`.
//! - [`json`] — machine-readable closure and copy results.

pub mod json;
pub mod terminal;
