//! Error and diagnostic system for the seqscript parser.
//!
//! Parsing stops at the first problem. That problem is described by a
//! single [`Diagnostic`] (error code, labelled spans, help text), which the
//! pipeline wraps in a [`ParseError`] carrying the source label and the
//! line it occurred on.
//!
//! # Example
//!
//! ```
//! # use seqscript_parser::error::{Diagnostic, ErrorCode};
//! # use seqscript_parser::Span;
//!
//! let diag = Diagnostic::error("expected `end`, found end of input")
//!     .with_code(ErrorCode::E101)
//!     .with_label(Span::new(40..40), "input ends here")
//!     .with_secondary_label(Span::new(0..3), "block opened here")
//!     .with_help("close the block with `end`");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::{ErrorKind, ParseError};
