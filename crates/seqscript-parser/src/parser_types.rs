//! Parse tree types
//!
//! These types form the output of the parser and the input of the tree
//! builder. They record what was written, in source order, without
//! resolving any actor references.
//!
//! ## Source Location Tracking
//!
//! Leaf values are wrapped in [`Spanned<T>`] to preserve source location
//! information. Composite types derive their spans from their contents.

use std::fmt;

use seqscript_core::semantic::{
    Arrow, BlockKind, DividerKind, NoteAlign, ProcessInstruction, SegmentRole,
};

use crate::span::{Span, Spanned};

/// A `name = value` pair inside an attribute block.
///
/// Values written as identifiers are stored as their text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'src> {
    pub name: Spanned<&'src str>,
    pub value: Spanned<String>,
}

impl Attribute<'_> {
    pub fn span(&self) -> Span {
        self.name.span().union(self.value.span())
    }
}

impl fmt::Display for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name.inner(), self.value.inner())
    }
}

/// The fixed pseudo-actors at the diagram margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoActor {
    Left,
    Right,
}

/// An actor as written in an action or note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRef<'src> {
    Named(&'src str),
    Pseudo(PseudoActor),
}

impl fmt::Display for ActorRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRef::Named(name) => f.write_str(name),
            ActorRef::Pseudo(PseudoActor::Left) => f.write_str("left"),
            ActorRef::Pseudo(PseudoActor::Right) => f.write_str("right"),
        }
    }
}

/// Target of a `style` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTarget<'src> {
    /// `style participant (...)`
    Participants,
    /// `style name (...)`
    Named(&'src str),
}

/// One clause of a block: the opening clause or an `elsealt`, `elsepar`,
/// `else` or `whilst` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSegment<'src> {
    pub role: SegmentRole,
    /// Span of the keyword that opened this clause.
    pub keyword: Span,
    pub label: Option<Spanned<String>>,
    pub declarations: Vec<Declaration<'src>>,
}

/// A nested control block. Always has at least one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'src> {
    pub kind: BlockKind,
    pub segments: Vec<BlockSegment<'src>>,
}

/// A top-level or nested declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration<'src> {
    /// `title: text`
    Title(Spanned<String>),
    /// `style target (attr = "value", ...)`
    Style {
        target: Spanned<StyleTarget<'src>>,
        attributes: Vec<Attribute<'src>>,
    },
    /// `participant name [as alias] [(attrs)] [: alias]`
    Actor {
        name: Spanned<&'src str>,
        alias: Option<Spanned<String>>,
        /// `None` when no attribute block was written; `Some(vec![])` for `()`.
        attributes: Option<Vec<Attribute<'src>>>,
    },
    /// `from arrow to: message`
    Action {
        from: Spanned<ActorRef<'src>>,
        to: Spanned<ActorRef<'src>>,
        arrow: Spanned<Arrow>,
        message: Spanned<String>,
    },
    /// `note (left of|right of|over) subject[, second]: message`
    Note {
        align: NoteAlign,
        subject: Spanned<ActorRef<'src>>,
        second: Option<Spanned<ActorRef<'src>>>,
        message: Spanned<String>,
    },
    /// `[horizontal] (spacer|gap|line|frame)[: label]`
    Gap {
        kind: Spanned<DividerKind>,
        label: Option<Spanned<String>>,
    },
    Block(Block<'src>),
    /// A `#!name value` line, hoisted in front of every other declaration.
    ProcessInstruction(ProcessInstruction),
}

/// The parser's output: the full declaration list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program<'src> {
    pub declarations: Vec<Declaration<'src>>,
}
