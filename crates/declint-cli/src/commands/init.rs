//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

use super::check::DEFAULT_STYLE_FILE;

const DEFAULT_STYLE: &str = r#"# declint style file
#
# Each entry maps a convention to a regular expression its identifiers
# must match. Patterns are anchored at the start of the identifier; add
# a trailing $ to anchor the end. Conventions left out keep a
# match-anything default. Run `declint dump-conventions` for the full
# list.

[patterns]
# ClassName = "^[A-Z][a-zA-Z0-9]*$"
# StructName = "^[A-Z][a-zA-Z0-9]*$"
# FunctionName = "^[a-z_][a-z0-9_]*$"
# VariableName = "^[a-z_][a-z0-9_]*$"
# ClassMemberVariable = "^m_.*$"
# EnumConstantName = "^[A-Z][A-Z0-9_]*$"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let style_path = Path::new(DEFAULT_STYLE_FILE);

    if style_path.exists() && !force {
        bail!(
            "style file already exists at {}; use --force to overwrite",
            style_path.display()
        );
    }

    std::fs::write(style_path, DEFAULT_STYLE)?;

    println!("Created {DEFAULT_STYLE_FILE}");
    println!("\nNext steps:");
    println!("  1. Uncomment and adjust the patterns you want to enforce");
    println!("  2. Run: declint check --recurse");

    Ok(())
}
