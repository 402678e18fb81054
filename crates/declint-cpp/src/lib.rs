//! C/C++ front-end for declint.
//!
//! Parses sources with the tree-sitter C++ grammar and lowers the
//! syntax tree into the declaration tree consumed by
//! `declint_core::Checker`. The lowering reconstructs the pieces the
//! checker needs that the grammar does not hand over directly, such as
//! which declarators name functions and how `typedef struct` couples a
//! record to its alias.

mod lower;
mod parser;

pub use parser::{CppParser, ParseError};
