use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::analyzer::closure::DEFAULT_MAX_DEPTH;

/// Root configuration structure, deserialized from `.copy-libs/config.toml`.
///
/// Every section and field is optional; anything left out keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How the dynamic-linker inspection utility is run.
    pub inspector: InspectorConfig,
    /// Traversal limits.
    pub analysis: AnalysisConfig,
    /// Output handling.
    pub copy: CopyConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Program invoked once per analysed file. Defaults to `ldd`.
    pub program: String,
    /// Extra arguments placed before the file path.
    pub args: Vec<String>,
    /// Seconds to wait for one run before giving up.
    pub timeout_secs: u64,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            program: "ldd".to_string(),
            args: Vec::new(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Longest dependency chain followed before the run is aborted.
    pub max_depth: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    pub on_collision: CollisionPolicy,
}

/// What to do when two different libraries would land on the same file name.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Log a warning; the later library replaces the earlier one.
    #[default]
    Warn,
    /// Abort the copy pass.
    Error,
    /// Log a warning and keep the earlier library.
    Skip,
}

/// Load configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<working_dir>/.copy-libs/config.toml`
/// 3. `~/.config/copy-libs/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(working_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = working_dir.join(".copy-libs").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("copy-libs").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}
