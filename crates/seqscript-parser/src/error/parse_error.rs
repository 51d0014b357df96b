//! The error returned by the parsing pipeline.

use std::fmt;

use thiserror::Error;

use crate::error::Diagnostic;

/// A type alias for `Result<T, Diagnostic>`.
pub type Result<T> = std::result::Result<T, Diagnostic>;

/// Which stage rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The character stream could not be split into tokens.
    Lexical,
    /// The token stream did not match the grammar.
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => f.write_str("lexical error"),
            ErrorKind::Syntax => f.write_str("syntax error"),
        }
    }
}

/// The first error encountered while parsing one input.
///
/// Displays as `<source>:<line>: <diagnostic>`.
#[derive(Debug, Error)]
#[error("{source_name}:{line}: {diagnostic}")]
pub struct ParseError {
    source_name: String,
    line: usize,
    column: usize,
    kind: ErrorKind,
    diagnostic: Diagnostic,
}

impl ParseError {
    /// Wrap a diagnostic, resolving its primary span to a line and column
    /// in `source`.
    pub fn new(source_name: impl Into<String>, source: &str, diagnostic: Diagnostic) -> Self {
        let offset = diagnostic.primary_span().map_or(0, |span| span.start());
        let (line, column) = line_column(source, offset);
        let kind = match diagnostic.code() {
            Some(code) if code.is_lexical() => ErrorKind::Lexical,
            _ => ErrorKind::Syntax,
        };

        Self {
            source_name: source_name.into(),
            line,
            column,
            kind,
            diagnostic,
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// 1-based line of the error.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the error, in characters.
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    pub fn message(&self) -> &str {
        self.diagnostic.message()
    }
}

/// Convert a byte offset into a 1-based line and column.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(source.len());
    while !source.is_char_boundary(end) {
        end -= 1;
    }

    let before = &source[..end];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
