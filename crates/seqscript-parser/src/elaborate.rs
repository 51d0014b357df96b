//! Tree building for the seqscript parse tree
//!
//! This module turns the parser's declaration list into the semantic
//! [`Diagram`](semantic::Diagram). It owns the actor registry: every actor
//! is registered the first time it is declared or referenced, in that
//! order, and declaring an alias later only changes its display name.
//!
//! Building cannot fail. Every declaration form has exactly one meaning and
//! all references resolve by registering what they name.

use indexmap::{IndexMap, map::Entry};
use log::{debug, info, trace};

use seqscript_core::{
    identifier::Id,
    semantic::{self, Participant, ProcessInstruction, SequenceItem},
};

use crate::{
    parser_types::{self, ActorRef, Declaration, Program, PseudoActor},
    span::Spanned,
};

/// Builds one diagram from one parse tree.
#[derive(Debug, Default)]
pub struct Builder {
    title: String,
    actors: IndexMap<Id, semantic::Actor>,
    styles: IndexMap<semantic::StyleTarget, semantic::StyleDirective>,
    process_instructions: Vec<ProcessInstruction>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================================
    // Main Entry Methods
    // ============================================================================

    /// Resolve `program` into a diagram.
    ///
    /// Processing instructions are collected during the walk and placed
    /// ahead of every other top-level item afterwards.
    pub fn build(mut self, program: Program<'_>) -> semantic::Diagram {
        debug!(declarations = program.declarations.len(); "Building diagram");

        let body = self.build_items(program.declarations);

        let mut items = Vec::with_capacity(self.process_instructions.len() + body.len());
        items.extend(
            self.process_instructions
                .drain(..)
                .map(SequenceItem::ProcessInstruction),
        );
        items.extend(body);

        info!(
            actors = self.actors.len(),
            styles = self.styles.len(),
            items = items.len();
            "Diagram built"
        );
        semantic::Diagram::new(
            self.title,
            self.actors.into_values().collect(),
            self.styles.into_values().collect(),
            items,
        )
    }

    fn build_items(&mut self, declarations: Vec<Declaration<'_>>) -> Vec<SequenceItem> {
        let mut items = Vec::new();

        for declaration in declarations {
            match declaration {
                Declaration::Title(text) => {
                    trace!(title = text.inner().as_str(); "Setting title");
                    self.title = text.into_inner();
                }
                Declaration::Style { target, attributes } => {
                    self.apply_style(target.into_inner(), attributes);
                }
                Declaration::Actor {
                    name,
                    alias,
                    attributes,
                } => {
                    let actor = self.register(name.inner());
                    if let Some(alias) = alias {
                        actor.set_display_name(alias.into_inner());
                    }
                    if let Some(attributes) = attributes {
                        actor.set_attributes(convert_attributes(attributes));
                    }
                }
                Declaration::Action {
                    from,
                    to,
                    arrow,
                    message,
                } => {
                    let from = self.resolve(*from.inner());
                    let to = self.resolve(*to.inner());
                    items.push(SequenceItem::Action(semantic::Action::new(
                        from,
                        to,
                        arrow.into_inner(),
                        message.into_inner(),
                    )));
                }
                Declaration::Note {
                    align,
                    subject,
                    second,
                    message,
                } => {
                    let subject = self.resolve(*subject.inner());
                    let second = second.map(|second| self.resolve(*second.inner()));
                    items.push(SequenceItem::Note(semantic::Note::new(
                        align,
                        subject,
                        second,
                        message.into_inner(),
                    )));
                }
                Declaration::Gap { kind, label } => {
                    items.push(SequenceItem::Divider(semantic::Divider::new(
                        kind.into_inner(),
                        label.map(Spanned::into_inner),
                    )));
                }
                Declaration::Block(block) => {
                    items.push(SequenceItem::Block(self.build_block(block)));
                }
                Declaration::ProcessInstruction(instruction) => {
                    self.process_instructions.push(instruction);
                }
            }
        }

        items
    }

    fn build_block(&mut self, block: parser_types::Block<'_>) -> semantic::Block {
        let segments = block
            .segments
            .into_iter()
            .map(|segment| {
                let items = self.build_items(segment.declarations);
                semantic::Segment::new(segment.role, segment.label.map(Spanned::into_inner), items)
            })
            .collect();

        semantic::Block::new(block.kind, segments)
    }

    // ============================================================================
    // Registry
    // ============================================================================

    /// Get the actor named `name`, registering it on first sight.
    fn register(&mut self, name: &str) -> &mut semantic::Actor {
        let id = Id::new(name);
        self.actors.entry(id).or_insert_with(|| {
            debug!(actor = name; "Registered actor");
            semantic::Actor::new(id)
        })
    }

    /// Resolve an actor reference. Margins never touch the registry.
    fn resolve(&mut self, actor: ActorRef<'_>) -> Participant {
        match actor {
            ActorRef::Named(name) => Participant::Actor(self.register(name).id()),
            ActorRef::Pseudo(PseudoActor::Left) => Participant::LeftMargin,
            ActorRef::Pseudo(PseudoActor::Right) => Participant::RightMargin,
        }
    }

    /// Insert a style directive, or replace the attributes of an existing
    /// one for the same target.
    fn apply_style(
        &mut self,
        target: parser_types::StyleTarget<'_>,
        attributes: Vec<parser_types::Attribute<'_>>,
    ) {
        let target = match target {
            parser_types::StyleTarget::Participants => semantic::StyleTarget::Participants,
            parser_types::StyleTarget::Named(name) => semantic::StyleTarget::Named(Id::new(name)),
        };
        let attributes = convert_attributes(attributes);

        match self.styles.entry(target) {
            Entry::Occupied(mut entry) => entry.get_mut().set_attributes(attributes),
            Entry::Vacant(entry) => {
                entry.insert(semantic::StyleDirective::new(target, attributes));
            }
        }
    }
}

fn convert_attributes(attributes: Vec<parser_types::Attribute<'_>>) -> Vec<semantic::Attribute> {
    attributes
        .into_iter()
        .map(|attr| semantic::Attribute::new(*attr.name.inner(), attr.value.into_inner()))
        .collect()
}
