//! # Seqscript Parser
//!
//! Front end for the seqscript sequence diagram language. This crate turns
//! source text into a [`seqscript_core::semantic::Diagram`].
//!
//! ## Usage
//!
//! ```
//! # use seqscript_parser::{parse, ParseConfig, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "
//!         title: Login
//!         participant user: End User
//!         user -> server: credentials
//!         server --> user: session token
//!     ";
//!
//!     let diagram = parse(source, ParseConfig::default())?;
//!     assert_eq!(diagram.title(), "Login");
//!     assert_eq!(diagram.actors().len(), 2);
//!     Ok(())
//! }
//! ```

mod config;
mod elaborate;
pub mod error;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;

pub use config::ParseConfig;
pub use elaborate::Builder;
pub use error::ParseError;
pub use lexer::{Lexer, tokenize};
pub use parser::Parser;
pub use parser_types::{
    ActorRef, Attribute, Block, BlockSegment, Declaration, Program, PseudoActor, StyleTarget,
};
pub use span::{Span, Spanned};
pub use tokens::{PositionedToken, Token};

use log::{debug, info};

use seqscript_core::semantic::Diagram;

/// Parse source text into a semantic diagram.
///
/// The pipeline has two stages:
///
/// 1. **Parse** - Pull tokens from the [`Lexer`] and build the declaration
///    list. The first lexical or syntax error ends parsing.
/// 2. **Build** - Register actors, resolve references, merge styles and
///    hoist processing instructions.
///
/// # Errors
///
/// Returns a [`ParseError`] for the first problem in source order, labelled
/// with `config.source_name()` and the 1-based line it occurred on.
pub fn parse(source: &str, config: ParseConfig) -> Result<Diagram, ParseError> {
    info!(source = config.source_name(), bytes = source.len(); "Parsing diagram");

    let parser = Parser::new(Lexer::new(source), config.max_block_depth());
    let program = parser.parse().map_err(|diagnostic| {
        debug!(code:? = diagnostic.code(); "Parsing failed");
        ParseError::new(config.source_name(), source, diagnostic)
    })?;

    Ok(Builder::new().build(program))
}
