//! Semantic sequence diagram model.
//!
//! This module contains the resolved representation of a diagram after
//! parsing and tree building. It is what a renderer consumes.
//!
//! # Pipeline Position
//!
//! ```text
//! Source Text
//!     ↓ lexer (pulled on demand)
//! Tokens
//!     ↓ parser
//! Parse tree (parser_types) - declarations with spans
//!     ↓ tree builder
//! Semantic Model (these types) - registered actors, resolved participants
//! ```
//!
//! # Organization
//!
//! - [`diagram`] - The top-level [`Diagram`] and its [`StyleDirective`]s
//! - [`element`] - Sequence items: [`Action`], [`Note`], [`Divider`], [`Block`], etc.

pub mod diagram;
pub mod element;

pub use diagram::*;
pub use element::*;
