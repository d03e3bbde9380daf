use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::CollisionPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "copy-libs",
    about = "Copy the shared libraries that binaries depend on into a directory",
    version
)]
pub struct Cli {
    /// Sources (files or directories) followed by the output directory
    #[arg(required = true, num_args = 2.., value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Config file [default: ./.copy-libs/config.toml, fallback ~/.config/copy-libs/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Inspection utility to run on each binary [default: ldd]
    #[arg(long, value_name = "PROGRAM")]
    pub inspector: Option<String>,

    /// Seconds to wait for one inspection before aborting [default: 30]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Longest dependency chain to follow [default: 100]
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// What to do when two libraries share a file name [default: warn]
    #[arg(long, value_name = "POLICY")]
    pub on_collision: Option<CollisionPolicy>,

    /// Resolve and print the library closure without copying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Show every library and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Split the positional arguments into sources and the trailing output directory.
    pub fn sources_and_output(&self) -> Result<(&[PathBuf], &PathBuf)> {
        let (output, sources) = self
            .paths
            .split_last()
            .context("missing output directory")?;
        Ok((sources, output))
    }
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
