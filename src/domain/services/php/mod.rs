//! Minimal PHP syntax support
//!
//! Just enough structure to patch known files without touching text that
//! merely looks similar: a lossless tokenizer and a delimiter tree on top.

mod lexer;
mod tree;

use thiserror::Error;

pub use lexer::{tokenize, Token, TokenKind};
pub use tree::{next_significant, Delimiter, Group, Node, SourceFile};

/// Source that could not be tokenized or grouped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} on line {line}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}
