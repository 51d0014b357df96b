//! Error codes for the seqscript diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A quoted or backquoted string was opened but never closed on the
    /// same line.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that cannot start any token.
    E002,

    /// Invalid escape sequence.
    ///
    /// Messages accept only `\n` and `\\`. Quoted strings accept `\n`, `\r`,
    /// `\t`, `\b`, `\f`, `\\`, `\/`, `\'`, `\"`, `\0` and `\u{...}`.
    E003,

    /// Invalid unicode escape format.
    ///
    /// Unicode escapes must use the format `\u{XXXX}` with 1-6 hexadecimal
    /// digits.
    E004,

    /// Invalid unicode codepoint.
    ///
    /// Valid codepoints are 0x0000-0xD7FF and 0xE000-0x10FFFF.
    E005,

    /// Empty unicode escape.
    E006,

    /// Unrecognized operator.
    ///
    /// A run of operator characters did not match the operator table, for
    /// example a lone `*`, `/` or `\`.
    E007,

    /// Empty processing instruction.
    ///
    /// A `#!` line had nothing after the marker.
    E008,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    E100,

    /// Unexpected end of input.
    ///
    /// The input ended before a complete construct was parsed, usually a
    /// block missing its `end`.
    E101,

    /// Blocks nested too deeply.
    E102,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E007 => "E007",
            ErrorCode::E008 => "E008",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "invalid unicode escape",
            ErrorCode::E005 => "invalid unicode codepoint",
            ErrorCode::E006 => "empty unicode escape",
            ErrorCode::E007 => "unrecognized operator",
            ErrorCode::E008 => "empty processing instruction",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of input",
            ErrorCode::E102 => "blocks nested too deeply",
        }
    }

    /// Whether this code is raised while scanning characters, as opposed to
    /// while matching the grammar.
    pub fn is_lexical(&self) -> bool {
        self.as_str().starts_with("E0")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
