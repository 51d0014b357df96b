//! Sequence item types for the semantic model.

use std::fmt;

use serde::Serialize;

use crate::identifier::Id;

/// A `name = value` pair from an attribute block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A registered lifeline.
///
/// The display name starts out as the identifier and is replaced whenever
/// an alias is declared for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    id: Id,
    display_name: String,
    attributes: Vec<Attribute>,
}

impl Actor {
    /// Create an actor whose display name is its identifier.
    pub fn new(id: Id) -> Self {
        Self {
            id,
            display_name: id.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name.into();
    }

    pub fn set_attributes(&mut self, attributes: Vec<Attribute>) {
        self.attributes = attributes;
    }
}

/// A resolved actor reference.
///
/// The margins are fixed positions at the diagram edges. They are never
/// registered as actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    Actor(Id),
    LeftMargin,
    RightMargin,
}

impl Participant {
    /// The actor identifier, or `None` for a margin.
    pub fn actor_id(&self) -> Option<Id> {
        match self {
            Participant::Actor(id) => Some(*id),
            Participant::LeftMargin | Participant::RightMargin => None,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Actor(id) => write!(f, "{id}"),
            Participant::LeftMargin => f.write_str("left"),
            Participant::RightMargin => f.write_str("right"),
        }
    }
}

/// Line style of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowStem {
    /// `-`
    Solid,
    /// `--`
    Dashed,
    /// `=`
    Thick,
}

impl ArrowStem {
    pub const ALL: [ArrowStem; 3] = [ArrowStem::Solid, ArrowStem::Dashed, ArrowStem::Thick];

    /// Source syntax of this stem.
    pub fn symbol(&self) -> &'static str {
        match self {
            ArrowStem::Solid => "-",
            ArrowStem::Dashed => "--",
            ArrowStem::Thick => "=",
        }
    }
}

/// Head style of an arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrowHead {
    /// `>`
    Solid,
    /// `>>`
    Open,
    /// `\>`
    Barbed,
    /// `/>`
    LowerBarbed,
}

impl ArrowHead {
    pub const ALL: [ArrowHead; 4] = [
        ArrowHead::Solid,
        ArrowHead::Open,
        ArrowHead::Barbed,
        ArrowHead::LowerBarbed,
    ];

    /// Source syntax of this head.
    pub fn symbol(&self) -> &'static str {
        match self {
            ArrowHead::Solid => ">",
            ArrowHead::Open => ">>",
            ArrowHead::Barbed => "\\>",
            ArrowHead::LowerBarbed => "/>",
        }
    }
}

/// An arrow: one stem paired with one head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Arrow {
    stem: ArrowStem,
    head: ArrowHead,
}

impl Arrow {
    pub fn new(stem: ArrowStem, head: ArrowHead) -> Self {
        Self { stem, head }
    }

    pub fn stem(&self) -> ArrowStem {
        self.stem
    }

    pub fn head(&self) -> ArrowHead {
        self.head
    }

    /// Every stem/head combination, stems outermost.
    pub fn combinations() -> impl Iterator<Item = Arrow> {
        ArrowStem::ALL
            .into_iter()
            .flat_map(|stem| ArrowHead::ALL.into_iter().map(move |head| Arrow::new(stem, head)))
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem.symbol(), self.head.symbol())
    }
}

/// A message sent from one participant to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    from: Participant,
    to: Participant,
    arrow: Arrow,
    message: String,
}

impl Action {
    pub fn new(from: Participant, to: Participant, arrow: Arrow, message: String) -> Self {
        Self {
            from,
            to,
            arrow,
            message,
        }
    }

    /// The sending participant.
    pub fn source(&self) -> Participant {
        self.from
    }

    /// The receiving participant.
    pub fn target(&self) -> Participant {
        self.to
    }

    pub fn arrow(&self) -> Arrow {
        self.arrow
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Placement of a note relative to its subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteAlign {
    LeftOf,
    RightOf,
    Over,
}

impl fmt::Display for NoteAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteAlign::LeftOf => f.write_str("left of"),
            NoteAlign::RightOf => f.write_str("right of"),
            NoteAlign::Over => f.write_str("over"),
        }
    }
}

/// A note attached to one participant, or stretched across two.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    align: NoteAlign,
    subject: Participant,
    span_to: Option<Participant>,
    message: String,
}

impl Note {
    pub fn new(
        align: NoteAlign,
        subject: Participant,
        span_to: Option<Participant>,
        message: String,
    ) -> Self {
        Self {
            align,
            subject,
            span_to,
            message,
        }
    }

    pub fn align(&self) -> NoteAlign {
        self.align
    }

    pub fn subject(&self) -> Participant {
        self.subject
    }

    /// The second participant for notes written `over a, b`.
    pub fn span_to(&self) -> Option<Participant> {
        self.span_to
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Visual form of a horizontal divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DividerKind {
    Spacer,
    Gap,
    Line,
    Frame,
}

impl DividerKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            DividerKind::Spacer => "spacer",
            DividerKind::Gap => "gap",
            DividerKind::Line => "line",
            DividerKind::Frame => "frame",
        }
    }
}

/// A horizontal divider with an optional label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Divider {
    kind: DividerKind,
    label: Option<String>,
}

impl Divider {
    pub fn new(kind: DividerKind, label: Option<String>) -> Self {
        Self { kind, label }
    }

    pub fn kind(&self) -> DividerKind {
        self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Kind of a nested control block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// `alt ... elsealt ... else ... end`
    Conditional,
    /// `par ... elsepar ... end`
    Parallel,
    /// `opt ... end`
    Optional,
    /// `loop ... end`
    Loop,
    /// `concurrent ... whilst ... end`
    Concurrent,
}

impl BlockKind {
    /// The keyword that opens a block of this kind.
    pub fn keyword(&self) -> &'static str {
        match self {
            BlockKind::Conditional => "alt",
            BlockKind::Parallel => "par",
            BlockKind::Optional => "opt",
            BlockKind::Loop => "loop",
            BlockKind::Concurrent => "concurrent",
        }
    }
}

/// Position of a segment within its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentRole {
    /// The opening clause.
    Primary,
    /// Any `elsealt`, `elsepar`, `else` or `whilst` clause.
    Alternate,
}

/// One clause of a block with its own nested items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    role: SegmentRole,
    label: Option<String>,
    items: Vec<SequenceItem>,
}

impl Segment {
    pub fn new(role: SegmentRole, label: Option<String>, items: Vec<SequenceItem>) -> Self {
        Self { role, label, items }
    }

    pub fn role(&self) -> SegmentRole {
        self.role
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn items(&self) -> &[SequenceItem] {
        &self.items
    }
}

/// A nested control block.
///
/// Segments are kept in clause order; the first one is always
/// [`SegmentRole::Primary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    kind: BlockKind,
    segments: Vec<Segment>,
}

impl Block {
    pub fn new(kind: BlockKind, segments: Vec<Segment>) -> Self {
        Self { kind, segments }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// A `#!name value` line, passed through to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessInstruction {
    name: String,
    value: String,
}

impl ProcessInstruction {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The text after the name; empty when the line had only a name.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An entry in a diagram's (or segment's) item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SequenceItem {
    ProcessInstruction(ProcessInstruction),
    Action(Action),
    Note(Note),
    Divider(Divider),
    Block(Block),
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_arrow_combinations_cover_product() {
        let arrows: HashSet<Arrow> = Arrow::combinations().collect();
        assert_eq!(arrows.len(), ArrowStem::ALL.len() * ArrowHead::ALL.len());
    }

    #[test]
    fn test_arrow_display_uses_source_syntax() {
        assert_eq!(Arrow::new(ArrowStem::Solid, ArrowHead::Solid).to_string(), "->");
        assert_eq!(Arrow::new(ArrowStem::Dashed, ArrowHead::Open).to_string(), "-->>");
        assert_eq!(Arrow::new(ArrowStem::Thick, ArrowHead::Barbed).to_string(), "=\\>");
        assert_eq!(
            Arrow::new(ArrowStem::Solid, ArrowHead::LowerBarbed).to_string(),
            "-/>"
        );
    }

    #[test]
    fn test_actor_display_name_defaults_to_id() {
        let mut actor = Actor::new(Id::new("svc"));
        assert_eq!(actor.display_name(), "svc");

        actor.set_display_name("Service");
        assert_eq!(actor.display_name(), "Service");
        assert_eq!(actor.id(), "svc");
    }

    #[test]
    fn test_margins_have_no_actor_id() {
        assert_eq!(Participant::LeftMargin.actor_id(), None);
        assert_eq!(Participant::RightMargin.actor_id(), None);
        assert_eq!(
            Participant::Actor(Id::new("a")).actor_id(),
            Some(Id::new("a"))
        );
    }

    #[test]
    fn test_sequence_item_serializes_with_type_tag() {
        let item = SequenceItem::Divider(Divider::new(DividerKind::Line, None));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "divider");
        assert_eq!(json["kind"], "line");
    }
}
