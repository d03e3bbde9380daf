use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use regex::bytes::Regex;
use tokio::process::Command;

use crate::config::InspectorConfig;
use crate::error::{CollectError, Result};
use crate::models::LinkedLibrary;

use super::{Inspection, Inspector};

/// Runs `ldd` (or a configured stand-in) as a child process, one path at a time.
pub struct LddInspector {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl LddInspector {
    pub fn new(config: &InspectorConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl Inspector for LddInspector {
    async fn inspect(&self, path: &Path) -> Result<Inspection> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| CollectError::Timeout {
                program: self.program.clone(),
                path: path.to_path_buf(),
                timeout: self.timeout,
            })?
            .map_err(|e| CollectError::Inspector {
                program: self.program.clone(),
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(Inspection {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?-u)^(?P<identifier>\S.*?) => (?P<path>/.*?) \((?P<address>[0-9a-fx]+)\)")
            .expect("ldd line pattern is a valid regex")
    })
}

/// Extract every `name => /absolute/path (0xaddr)` entry from `ldd` output.
///
/// Works on raw bytes so that paths which are not valid UTF-8 survive intact.
/// Whitespace is normalized first, so indentation and tab/space runs do not
/// matter. Lines without a resolved absolute path (the vdso, the interpreter,
/// `not found` entries, "statically linked") are ignored.
pub fn parse_ldd_output(output: &[u8]) -> Vec<LinkedLibrary> {
    let pattern = line_pattern();

    output
        .split(|&b| b == b'\n')
        .filter_map(|line| {
            let line = line
                .split(|b| b.is_ascii_whitespace())
                .filter(|word| !word.is_empty())
                .collect::<Vec<_>>()
                .join(&b' ');
            let caps = pattern.captures(&line)?;
            Some(LinkedLibrary {
                identifier: String::from_utf8_lossy(&caps["identifier"]).into_owned(),
                path: path_from_bytes(&caps["path"]),
                address: String::from_utf8_lossy(&caps["address"]).into_owned(),
            })
        })
        .collect()
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
