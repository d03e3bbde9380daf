//! Scripted inspector and filesystem helpers shared by unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyzer::{Inspection, Inspector};
use crate::error::Result;

/// Answers inspections from a fixed table and records every path it was asked about.
///
/// Paths missing from the table behave like a static binary: the inspection
/// reports a non-zero exit.
#[derive(Default)]
pub struct FakeInspector {
    outputs: HashMap<PathBuf, Inspection>,
    calls: RefCell<Vec<PathBuf>>,
}

impl FakeInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `binary` report each `(identifier, path)` pair as an `ldd` line.
    pub fn with_deps<P: AsRef<Path>>(
        self,
        binary: impl AsRef<Path>,
        deps: &[(&str, P)],
    ) -> Self {
        let mut stdout = Vec::new();
        for (i, (name, path)) in deps.iter().enumerate() {
            stdout.extend_from_slice(format!("\t{name} => ").as_bytes());
            stdout.extend_from_slice(path.as_ref().as_os_str().as_encoded_bytes());
            stdout.extend_from_slice(format!(" (0x{:x})\n", i + 1).as_bytes());
        }
        self.with_output(binary, true, stdout)
    }

    /// Make `binary` report raw `stdout` with the given exit status.
    pub fn with_output(
        mut self,
        binary: impl AsRef<Path>,
        success: bool,
        stdout: impl AsRef<[u8]>,
    ) -> Self {
        self.outputs.insert(
            binary.as_ref().to_path_buf(),
            Inspection {
                success,
                stdout: stdout.as_ref().to_vec(),
                stderr: String::new(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, path: &Path) -> usize {
        self.calls.borrow().iter().filter(|p| p.as_path() == path).count()
    }
}

impl Inspector for FakeInspector {
    async fn inspect(&self, path: &Path) -> Result<Inspection> {
        self.calls.borrow_mut().push(path.to_path_buf());
        Ok(self.outputs.get(path).cloned().unwrap_or_default())
    }
}

/// Create `path` (and its parents) with some bytes and the given mode.
pub fn write_file(path: &Path, mode: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, path.display().to_string()).unwrap();
    set_mode(path, mode);
}

#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) {}

#[cfg(unix)]
pub fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o7777
}
