//! `copy-libs` — collect the shared libraries that binaries need into one directory.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and apply CLI overrides.
//! 3. Find candidate binaries in each source ([`discovery`]).
//! 4. Resolve the transitive library closure with the inspection utility ([`analyzer`]).
//! 5. Copy the closure into the output directory ([`materializer`]), unless `--dry-run`.
//! 6. Render the requested report ([`report`]).
//! 7. Exit `0`, or `1` with a message on stderr for any fatal error ([`error::CollectError`]).

mod analyzer;
mod cli;
mod collector;
mod config;
mod discovery;
mod error;
mod materializer;
mod models;
mod report;
#[cfg(test)]
mod test_utils;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use analyzer::ldd::LddInspector;
use cli::{Cli, ReportFormat};
use collector::LibraryCollector;
use config::{load_config, Config};
use models::Source;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let working_dir = std::env::current_dir()?;
    let mut config = load_config(&working_dir, cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);

    let (sources, output) = cli.sources_and_output()?;
    let sources: Vec<Source> = sources.iter().map(Source::from_path).collect();

    let inspector = LddInspector::new(&config.inspector);
    let mut collector = LibraryCollector::new(
        sources,
        inspector,
        config.analysis.max_depth,
        config.copy.on_collision,
    );

    let (target, copied) = if cli.dry_run {
        collector.analyse().await?;
        (None, None)
    } else {
        let progress = progress_bar(cli.quiet || matches!(cli.report, ReportFormat::Json))?;
        let copied = collector.copy(output, &progress).await?;
        (Some(output.as_path()), Some(copied))
    };

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(
                collector.closure(),
                target,
                copied.as_deref(),
                cli.verbose,
                cli.quiet,
            );
        }
        ReportFormat::Json => {
            println!(
                "{}",
                report::json::render(collector.closure(), target, copied.as_deref())?
            );
        }
    }

    Ok(())
}

/// CLI flags win over whatever the config file says.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(program) = &cli.inspector {
        config.inspector.program = program.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.inspector.timeout_secs = timeout;
    }
    if let Some(max_depth) = cli.max_depth {
        config.analysis.max_depth = max_depth;
    }
    if let Some(policy) = cli.on_collision {
        config.copy.on_collision = policy;
    }
}

/// `RUST_LOG` takes precedence; otherwise warnings only, or debug with `--verbose`.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("copy_libs=debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn progress_bar(hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
