//! Parsing entry point for C and C++ sources.

use std::path::{Path, PathBuf};

use tree_sitter::{Language, Parser};

use declint_core::{DeclNode, Location, NodeKind};

use crate::lower::Lowerer;

/// Errors raised by the C/C++ front-end.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load the C++ grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    /// The parser returned no tree for this source.
    #[error("could not parse {path}")]
    Failed {
        /// File the source was read from.
        path: PathBuf,
    },
}

/// Parses C/C++ sources into declaration trees.
///
/// The same C++ grammar handles plain C sources; C constructs are a
/// subset of what the grammar accepts.
pub struct CppParser {
    language: Language,
}

impl CppParser {
    /// Creates a parser backed by the bundled C++ grammar.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_cpp::LANGUAGE.into(),
        }
    }

    /// Parses `source` into a declaration tree.
    ///
    /// The returned root is a [`NodeKind::TranslationUnit`] located at
    /// line 1 of `path`; its children are the file's top-level
    /// declarations. `path` is stamped into every declaration location
    /// so the engine can tell locally spelled declarations from
    /// included ones.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the grammar cannot be loaded or the
    /// parser gives up on the source.
    pub fn parse(&self, source: &str, path: &Path) -> Result<DeclNode, ParseError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        let tree = parser.parse(source, None).ok_or_else(|| ParseError::Failed {
            path: path.to_path_buf(),
        })?;

        let mut root = DeclNode::new(
            NodeKind::TranslationUnit,
            "",
            Some(Location::new(path, 1, 1)),
        );
        Lowerer::new(source.as_bytes(), path).lower_translation_unit(tree.root_node(), &mut root);
        tracing::debug!(
            path = %path.display(),
            declarations = root.children.len(),
            "parsed translation unit"
        );
        Ok(root)
    }
}

impl Default for CppParser {
    fn default() -> Self {
        Self::new()
    }
}
