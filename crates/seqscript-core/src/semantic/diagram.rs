//! Top-level diagram types for the semantic model.

use serde::Serialize;

use crate::{
    identifier::Id,
    semantic::element::{Actor, Attribute, ProcessInstruction, SequenceItem},
};

/// The resolved sequence diagram.
///
/// Produced once per parse and never mutated afterwards. Actors appear in
/// the order they were first declared or referenced, and every
/// [`SequenceItem::ProcessInstruction`] precedes all other top-level items.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagram {
    title: String,
    actors: Vec<Actor>,
    styles: Vec<StyleDirective>,
    items: Vec<SequenceItem>,
}

impl Diagram {
    /// Create a new diagram from its resolved parts.
    pub fn new(
        title: String,
        actors: Vec<Actor>,
        styles: Vec<StyleDirective>,
        items: Vec<SequenceItem>,
    ) -> Self {
        Self {
            title,
            actors,
            styles,
            items,
        }
    }

    /// The diagram title, empty when none was given.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Registered actors in first-appearance order.
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Look up a registered actor by identifier.
    pub fn actor(&self, id: Id) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id() == id)
    }

    /// Style directives in first-appearance order, one per target.
    pub fn styles(&self) -> &[StyleDirective] {
        &self.styles
    }

    /// Top-level sequence items in display order.
    pub fn items(&self) -> &[SequenceItem] {
        &self.items
    }

    /// Processing instructions, in the order they appeared in the source.
    pub fn process_instructions(&self) -> impl Iterator<Item = &ProcessInstruction> {
        self.items.iter().map_while(|item| match item {
            SequenceItem::ProcessInstruction(pi) => Some(pi),
            _ => None,
        })
    }
}

/// What a `style` directive applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleTarget {
    /// `style participant (...)`: every actor box.
    Participants,
    /// `style name (...)`: a named element class.
    Named(Id),
}

/// A global styling directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleDirective {
    target: StyleTarget,
    attributes: Vec<Attribute>,
}

impl StyleDirective {
    pub fn new(target: StyleTarget, attributes: Vec<Attribute>) -> Self {
        Self { target, attributes }
    }

    pub fn target(&self) -> StyleTarget {
        self.target
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Replace the attribute list, keeping the directive's position.
    pub fn set_attributes(&mut self, attributes: Vec<Attribute>) {
        self.attributes = attributes;
    }
}
