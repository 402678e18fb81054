//! Check command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use declint_core::{Catalog, Checker, JsonSink, ReportSink, RuleDb, Style, TextSink};
use declint_cpp::CppParser;

use crate::OutputFormat;

/// Style file picked up from the working directory when `--style` is
/// not given.
pub const DEFAULT_STYLE_FILE: &str = "declint.toml";

const DEFAULT_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "h", "hh", "hpp"];

/// Runs the check command. Exits the process with status 1 when any
/// violation was reported.
pub fn run(
    paths: &[PathBuf],
    style_path: Option<&Path>,
    recurse: bool,
    exclude: &[String],
    filetypes: &[String],
    format: OutputFormat,
) -> Result<()> {
    let style = load_style(style_path)?;
    let catalog = Catalog::builtin();
    let db =
        RuleDb::build(&catalog, Some(&style.patterns)).context("failed to build rule database")?;

    let excludes = compile_excludes(exclude)?;
    let extensions = effective_extensions(filetypes);
    let files = discover(paths, recurse, &excludes, &extensions);

    tracing::info!(files = files.len(), "checking");

    // Diagnostics go to stderr; stdout stays machine-readable for the
    // JSON format and carries only the final total for text.
    let total = match format {
        OutputFormat::Text => {
            let mut sink = TextSink::new(std::io::stderr().lock());
            check_files(&files, &db, &mut sink)
        }
        OutputFormat::Json => {
            let mut sink = JsonSink::new(std::io::stdout().lock());
            check_files(&files, &db, &mut sink)
        }
    };

    if total > 0 {
        println!("Total number of violations: {total}");
        std::process::exit(1);
    }

    Ok(())
}

/// Resolves the style: an explicit `--style` must load, a
/// `declint.toml` in the working directory is picked up when present,
/// and otherwise every convention keeps its default pattern.
pub(crate) fn load_style(explicit: Option<&Path>) -> Result<Style> {
    if let Some(path) = explicit {
        return Style::from_file(path)
            .with_context(|| format!("failed to load style file {}", path.display()));
    }

    let default = Path::new(DEFAULT_STYLE_FILE);
    if default.exists() {
        tracing::info!("using style file {}", default.display());
        return Style::from_file(default)
            .with_context(|| format!("failed to load style file {}", default.display()));
    }

    Ok(Style::default())
}

fn check_files(files: &[PathBuf], db: &RuleDb, sink: &mut dyn ReportSink) -> usize {
    let parser = CppParser::new();
    let mut total = 0;

    for file in files {
        let source = match std::fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("skipping {}: {e}", file.display());
                continue;
            }
        };
        match parser.parse(&source, file) {
            Ok(root) => {
                let mut checker = Checker::new(db, sink);
                total += checker.check_file(&root, file);
            }
            Err(e) => tracing::warn!("skipping: {e}"),
        }
    }

    total
}

fn compile_excludes(patterns: &[String]) -> Result<Vec<glob::Pattern>> {
    patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p).with_context(|| format!("invalid exclude pattern '{p}'"))
        })
        .collect()
}

fn effective_extensions(filetypes: &[String]) -> Vec<String> {
    if filetypes.is_empty() {
        return DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect();
    }
    filetypes
        .iter()
        .map(|ft| ft.trim_start_matches('.').to_string())
        .collect()
}

/// Collects the files to check. Files named explicitly are taken as
/// given; directories are walked, keeping only the configured
/// extensions. A missing path is reported and skipped.
fn discover(
    paths: &[PathBuf],
    recurse: bool,
    excludes: &[glob::Pattern],
    extensions: &[String],
) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            tracing::warn!("path does not exist: {}", path.display());
            continue;
        }
        if path.is_file() {
            if !is_excluded(path, excludes) {
                files.push(path.clone());
            }
            continue;
        }

        let mut builder = ignore::WalkBuilder::new(path);
        if !recurse {
            builder.max_depth(Some(1));
        }
        for entry in builder.build().flatten() {
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let candidate = entry.path();
            if !has_extension(candidate, extensions) || is_excluded(candidate, excludes) {
                continue;
            }
            files.push(candidate.to_path_buf());
        }
    }

    files.sort();
    files
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|wanted| wanted == e))
}

fn is_excluded(path: &Path, excludes: &[glob::Pattern]) -> bool {
    excludes.iter().any(|pattern| pattern.matches_path(path))
}
