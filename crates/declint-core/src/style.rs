//! Style file: per-convention pattern overrides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Parsed style configuration.
///
/// A style file is a TOML document with one `[patterns]` table mapping
/// convention names to regular expressions:
///
/// ```toml
/// [patterns]
/// ClassName = "^[A-Z][a-zA-Z0-9]*$"
/// FunctionName = "^[a-z_][a-z0-9_]*$"
/// ```
///
/// Conventions absent from the table keep their default match-anything
/// pattern. Key validity and pattern syntax are checked when the rule
/// database is built, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Style {
    /// Convention name to pattern override.
    #[serde(default)]
    pub patterns: BTreeMap<String, String>,
}

/// Errors when loading a style file.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// Failed to read the style file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML document.
    #[error("invalid style file: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },
}

impl Style {
    /// Loads a style file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, StyleError> {
        let content = std::fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses a style document from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, StyleError> {
        toml::from_str(content).map_err(|e| StyleError::Parse {
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_patterns_table() {
        let style = Style::parse(
            r#"
[patterns]
ClassName = "^[A-Z][a-zA-Z0-9]*$"
FunctionName = "^[a-z_][a-z0-9_]*$"
"#,
        )
        .expect("parse failed");
        assert_eq!(style.patterns.len(), 2);
        assert_eq!(
            style.patterns.get("ClassName").map(String::as_str),
            Some("^[A-Z][a-zA-Z0-9]*$")
        );
    }

    #[test]
    fn empty_document_means_no_overrides() {
        let style = Style::parse("").expect("parse failed");
        assert!(style.patterns.is_empty());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Style::parse("[patterns\nClassName = 1").expect_err("should fail");
        assert!(matches!(err, StyleError::Parse { .. }));
    }

    #[test]
    fn from_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[patterns]\nEnumName = \"^E[A-Z].*$\"").expect("write");
        let style = Style::from_file(file.path()).expect("load failed");
        assert_eq!(
            style.patterns.get("EnumName").map(String::as_str),
            Some("^E[A-Z].*$")
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Style::from_file(Path::new("/nonexistent/style.toml")).expect_err("should fail");
        assert!(matches!(err, StyleError::Io { .. }));
    }
}
