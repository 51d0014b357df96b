//! Outline output: a diagram written back as canonical seqscript.
//!
//! Every declaration is written on its own line in its explicit form
//! (`participant` keyword, quoted aliases and attribute values, two-space
//! indentation inside blocks). Parsing the outline yields the same diagram.

use std::fmt::{self, Write};

use seqscript_core::semantic::{
    Actor, Attribute, BlockKind, Diagram, SegmentRole, SequenceItem, StyleDirective, StyleTarget,
};

const INDENT: &str = "  ";

/// Render `diagram` as outline text, ending with a newline when non-empty.
pub fn render(diagram: &Diagram) -> String {
    let mut out = String::new();
    write_diagram(&mut out, diagram).expect("Writing to String buffer is infallible");
    out
}

fn write_diagram(out: &mut String, diagram: &Diagram) -> fmt::Result {
    let (instructions, body) = diagram.items().split_at(diagram.process_instructions().count());
    write_items(out, instructions, 0)?;

    if !diagram.title().is_empty() {
        write!(out, "title")?;
        write_message(out, diagram.title())?;
        writeln!(out)?;
    }

    for actor in diagram.actors() {
        write_actor(out, actor)?;
    }

    for style in diagram.styles() {
        write_style(out, style)?;
    }

    write_items(out, body, 0)
}

fn write_actor(out: &mut String, actor: &Actor) -> fmt::Result {
    write!(out, "participant {}", actor.id())?;
    if actor.id() != actor.display_name() {
        out.push_str(" as ");
        write_quoted(out, actor.display_name());
    }
    if !actor.attributes().is_empty() {
        write_attributes(out, actor.attributes())?;
    }
    writeln!(out)
}

fn write_style(out: &mut String, style: &StyleDirective) -> fmt::Result {
    match style.target() {
        StyleTarget::Participants => write!(out, "style participant")?,
        StyleTarget::Named(id) => write!(out, "style {id}")?,
    }
    write_attributes(out, style.attributes())?;
    writeln!(out)
}

fn write_items(out: &mut String, items: &[SequenceItem], depth: usize) -> fmt::Result {
    for item in items {
        write_item(out, item, depth)?;
    }
    Ok(())
}

fn write_item(out: &mut String, item: &SequenceItem, depth: usize) -> fmt::Result {
    let indent = INDENT.repeat(depth);

    match item {
        SequenceItem::ProcessInstruction(pi) => {
            write!(out, "{indent}#!{}", pi.name())?;
            if !pi.value().is_empty() {
                write!(out, " {}", pi.value())?;
            }
        }
        SequenceItem::Action(action) => {
            write!(
                out,
                "{indent}{} {} {}",
                action.source(),
                action.arrow(),
                action.target()
            )?;
            write_message(out, action.message())?;
        }
        SequenceItem::Note(note) => {
            write!(out, "{indent}note {} {}", note.align(), note.subject())?;
            if let Some(span_to) = note.span_to() {
                write!(out, ", {span_to}")?;
            }
            write_message(out, note.message())?;
        }
        SequenceItem::Divider(divider) => {
            write!(out, "{indent}{}", divider.kind().keyword())?;
            if let Some(label) = divider.label() {
                write_message(out, label)?;
            }
        }
        SequenceItem::Block(block) => {
            for segment in block.segments() {
                let keyword = match segment.role() {
                    SegmentRole::Primary => block.kind().keyword(),
                    SegmentRole::Alternate => clause_keyword(block.kind()),
                };
                write!(out, "{indent}{keyword}")?;
                if let Some(label) = segment.label() {
                    write_message(out, label)?;
                }
                writeln!(out)?;
                write_items(out, segment.items(), depth + 1)?;
            }
            write!(out, "{indent}end")?;
        }
    }

    writeln!(out)
}

/// Keyword that opens a further segment of a block of `kind`.
fn clause_keyword(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Conditional => "elsealt",
        BlockKind::Parallel => "elsepar",
        BlockKind::Concurrent => "whilst",
        // Single-segment blocks
        BlockKind::Optional | BlockKind::Loop => "else",
    }
}

fn write_attributes(out: &mut String, attributes: &[Attribute]) -> fmt::Result {
    out.push_str(" (");
    for (i, attr) in attributes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write!(out, "{}=", attr.name())?;
        write_quoted(out, attr.value());
    }
    out.push(')');
    Ok(())
}

/// Write `text` as a double-quoted string literal.
fn write_quoted(out: &mut String, text: &str) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Write `: text`, escaping what a message cannot hold literally.
fn write_message(out: &mut String, text: &str) -> fmt::Result {
    out.push(':');
    if text.is_empty() {
        return Ok(());
    }
    out.push(' ');
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    Ok(())
}
