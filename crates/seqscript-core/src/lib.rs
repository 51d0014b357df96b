//! seqscript core types
//!
//! This crate provides the foundational types shared by the seqscript front
//! end and any consumer of its output:
//!
//! - **Identifiers**: String-interned actor identifiers ([`identifier::Id`])
//! - **Semantic**: The resolved sequence diagram model ([`semantic`] module)

pub mod identifier;
pub mod semantic;
