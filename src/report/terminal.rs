use std::path::Path;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{CopiedLibrary, CopyOutcome, LibraryClosure};

/// Render a colored terminal report.
///
/// `copied` is `None` for a dry run. The full library table is only printed
/// with `verbose`, or when some copy needs attention.
pub fn render(
    closure: &LibraryClosure,
    target: Option<&Path>,
    copied: Option<&[CopiedLibrary]>,
    verbose: bool,
    quiet: bool,
) {
    let total = closure.len();
    let count = |outcome: CopyOutcome| {
        copied
            .map(|c| c.iter().filter(|l| l.outcome == outcome).count())
            .unwrap_or(0)
    };
    let copied_count = count(CopyOutcome::Copied);
    let overwrote_count = count(CopyOutcome::Overwrote);
    let skipped_count = count(CopyOutcome::Skipped);

    if quiet {
        match copied {
            Some(_) => println!(
                "Libraries: {}  Copied: {}  Overwrote: {}  Skipped: {}",
                total,
                copied_count.to_string().green(),
                overwrote_count.to_string().yellow(),
                skipped_count.to_string().red(),
            ),
            None => println!("Libraries: {}", total),
        }
        return;
    }

    println!("\n {} v{}", "copy-libs".bold(), env!("CARGO_PKG_VERSION"));
    if let Some(target) = target {
        println!(" Output: {}\n", target.display());
    } else {
        println!(" Dry run, nothing copied\n");
    }

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Libraries resolved : {}", total));
    if copied.is_some() {
        println!(
            " │  {:<48} │",
            format!("{}  Copied          : {:>4}", "✓".green(), copied_count)
        );
        println!(
            " │  {:<48} │",
            format!("{}  Overwrote       : {:>4}", "⚠".yellow(), overwrote_count)
        );
        println!(
            " │  {:<48} │",
            format!("{}  Skipped         : {:>4}", "✗".red(), skipped_count)
        );
    }
    println!(" └────────────────────────────────────────────────────┘\n");

    let needs_attention = overwrote_count + skipped_count > 0;
    match copied {
        Some(copied) if verbose || needs_attention => {
            println!(" {} Copied libraries:\n", "[COPY]".green().bold());
            println!("{}", copy_table(copied, verbose));
            println!();
        }
        None if verbose || !closure.is_empty() => {
            println!(" {} Resolved libraries:\n", "[LIBS]".cyan().bold());
            println!("{}", closure_table(closure));
            println!();
        }
        _ => {}
    }
}

fn closure_table(closure: &LibraryClosure) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Library").add_attribute(Attribute::Bold),
            Cell::new("Resolved path").add_attribute(Attribute::Bold),
        ]);

    for (identifier, path) in closure.iter() {
        table.add_row(vec![Cell::new(identifier), Cell::new(path.display())]);
    }

    table
}

/// Rows for every copy when `all`, otherwise only overwritten or skipped ones.
fn copy_table(copied: &[CopiedLibrary], all: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Library").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Destination").add_attribute(Attribute::Bold),
            Cell::new("Outcome").add_attribute(Attribute::Bold),
        ]);

    for lib in copied
        .iter()
        .filter(|l| all || l.outcome != CopyOutcome::Copied)
    {
        let color = match lib.outcome {
            CopyOutcome::Copied => Color::Green,
            CopyOutcome::Overwrote => Color::Yellow,
            CopyOutcome::Skipped => Color::Red,
        };

        table.add_row(vec![
            Cell::new(&lib.identifier),
            Cell::new(lib.source.display()),
            Cell::new(lib.destination.display()),
            Cell::new(lib.outcome.to_string()).fg(color),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn copy(identifier: &str, outcome: CopyOutcome) -> CopiedLibrary {
        CopiedLibrary {
            identifier: identifier.to_string(),
            source: PathBuf::from(format!("/lib/{identifier}")),
            destination: PathBuf::from(format!("/out/{identifier}")),
            outcome,
        }
    }

    #[test]
    fn test_copy_table_hides_plain_copies_unless_verbose() {
        let copied = vec![
            copy("liba.so", CopyOutcome::Copied),
            copy("libb.so", CopyOutcome::Overwrote),
        ];

        let terse = copy_table(&copied, false).to_string();
        assert!(!terse.contains("liba.so"));
        assert!(terse.contains("libb.so"));

        let full = copy_table(&copied, true).to_string();
        assert!(full.contains("liba.so"));
    }

    #[test]
    fn test_closure_table_lists_every_library() {
        let mut closure = LibraryClosure::new();
        closure.insert("libx.so", Path::new("/lib/libx.so"));
        closure.insert("liby.so", Path::new("/lib/liby.so"));

        let table = closure_table(&closure).to_string();
        assert!(table.contains("libx.so"));
        assert!(table.contains("/lib/liby.so"));
    }
}
