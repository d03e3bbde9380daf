use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::models::{CopiedLibrary, LibraryClosure};

#[derive(Serialize)]
struct Report<'a> {
    libraries: &'a LibraryClosure,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_directory: Option<&'a Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    copied: Option<&'a [CopiedLibrary]>,
}

/// Serialize the run as pretty-printed JSON.
pub fn render(
    closure: &LibraryClosure,
    target: Option<&Path>,
    copied: Option<&[CopiedLibrary]>,
) -> Result<String> {
    let report = Report {
        libraries: closure,
        output_directory: target,
        copied,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
