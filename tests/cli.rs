//! Runs the `copy-libs` binary end to end against a scripted `ldd` stand-in.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A tool linking libx and liby, where liby links libz.
struct Fixture {
    root: TempDir,
    tool: PathBuf,
    out: PathBuf,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let tool = root.path().join("bin/toolA");
        let libx = root.path().join("lib/libx.so");
        let liby = root.path().join("lib/liby.so");
        let libz = root.path().join("lib/libz.so");
        let out = root.path().join("out");
        fs::create_dir_all(root.path().join("bin")).unwrap();
        fs::create_dir_all(root.path().join("lib")).unwrap();
        fs::create_dir(&out).unwrap();

        for (path, mode) in [(&tool, 0o755), (&libx, 0o644), (&liby, 0o755), (&libz, 0o600)] {
            fs::write(path, path.display().to_string()).unwrap();
            fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
        }

        // Run through `sh` so the script itself never needs to be executable.
        let script = root.path().join("fake-ldd.sh");
        fs::write(
            &script,
            format!(
                "case \"$1\" in\n\
                 '{tool}') printf '\\tlibx.so => %s (0x1)\\n\\tliby.so => %s (0x2)\\n' '{libx}' '{liby}' ;;\n\
                 '{liby}') printf '\\tlibz.so => %s (0x3)\\n' '{libz}' ;;\n\
                 *) echo 'not a dynamic executable' >&2; exit 1 ;;\n\
                 esac\n",
                tool = tool.display(),
                libx = libx.display(),
                liby = liby.display(),
                libz = libz.display(),
            ),
        )
        .unwrap();

        let config = root.path().join("config.toml");
        fs::write(
            &config,
            format!("[inspector]\nargs = [{:?}]\ntimeout_secs = 10\n", script.display().to_string()),
        )
        .unwrap();

        Self {
            root,
            tool,
            out,
            config,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("copy-libs").unwrap();
        cmd.current_dir(self.root.path())
            .env("HOME", self.root.path())
            .env("NO_COLOR", "1")
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config)
            .args(["--inspector", "sh"]);
        cmd
    }

    fn lib(&self, name: &str) -> PathBuf {
        self.root.path().join("lib").join(name)
    }
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn mode_of(path: &Path) -> u32 {
    fs::metadata(path).unwrap().permissions().mode() & 0o7777
}

#[test]
fn test_copies_transitive_closure_into_last_argument() {
    let fx = Fixture::new();

    fx.command()
        .args(["--report", "json"])
        .arg(&fx.tool)
        .arg(&fx.out)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"libz.so\""));

    assert_eq!(listing(&fx.out), vec!["libx.so", "liby.so", "libz.so"]);
    for name in ["libx.so", "liby.so", "libz.so"] {
        assert_eq!(mode_of(&fx.out.join(name)), mode_of(&fx.lib(name)));
        assert_eq!(
            fs::read(fx.out.join(name)).unwrap(),
            fs::read(fx.lib(name)).unwrap()
        );
    }
}

#[test]
fn test_verbose_run_logs_each_inspection() {
    let fx = Fixture::new();

    fx.command()
        .args(["--verbose", "--quiet"])
        .arg(&fx.tool)
        .arg(&fx.out)
        .assert()
        .success()
        .stderr(predicate::str::contains(format!("checking {}", fx.lib("liby.so").display())));
}

#[test]
fn test_missing_source_exits_with_status_one() {
    let fx = Fixture::new();
    let missing = fx.root.path().join("bin/nope");

    fx.command()
        .arg(&missing)
        .arg(&fx.out)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not readable"))
        .stderr(predicate::str::contains(missing.display().to_string()));

    assert!(listing(&fx.out).is_empty());
}

#[test]
fn test_missing_output_directory_exits_with_status_one() {
    let fx = Fixture::new();
    let missing = fx.root.path().join("no-such-dir");

    fx.command()
        .arg(&fx.tool)
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a writable directory"));

    assert!(!missing.exists());
}
