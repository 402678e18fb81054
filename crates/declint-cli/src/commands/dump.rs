//! Dump-conventions command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use declint_core::{Catalog, RuleDb};

/// Prints every convention with its node kind and effective pattern,
/// in catalog order. Honors the same style resolution as `check`, so
/// the output shows exactly what a check run would enforce.
pub fn run(style_path: Option<&Path>) -> Result<()> {
    let style = super::check::load_style(style_path)?;
    let catalog = Catalog::builtin();
    let db =
        RuleDb::build(&catalog, Some(&style.patterns)).context("failed to build rule database")?;

    println!("{:<28} {:<20} Pattern", "Convention", "Node kind");
    println!("{}", "-".repeat(76));
    for entry in catalog.entries() {
        if let Some(rule) = db.rule(entry.name) {
            println!(
                "{:<28} {:<20} {}",
                entry.name,
                entry.kind.to_string(),
                rule.pattern_str()
            );
        }
    }

    Ok(())
}
