use seqscript_core::identifier::Id;
use seqscript_core::semantic::{
    Arrow, ArrowHead, ArrowStem, BlockKind, DividerKind, NoteAlign, Participant, SegmentRole,
    SequenceItem, StyleTarget,
};
use seqscript_parser::{ParseConfig, error::ErrorCode, error::ErrorKind, parse};

fn actor_ids(diagram: &seqscript_core::semantic::Diagram) -> Vec<String> {
    diagram
        .actors()
        .iter()
        .map(|actor| actor.id().to_string())
        .collect()
}

#[test]
fn test_complete_diagram() {
    let source = r##"
        #!autonumber
        title: Password reset
        participant user: End User
        participant api as "Auth API" (color="#2255aa")
        style participant (shape=box)

        user -> api: POST /reset
        api --> mailer: send link
        note over api, mailer: async
        horizontal line: later

        alt: link clicked
            user -> api: GET /reset/token
            api ->> user: new password form
        else
            api -\> left: expire token
        end
    "##;

    let diagram = parse(source, ParseConfig::default()).expect("Failed to parse");

    assert_eq!(diagram.title(), "Password reset");
    assert_eq!(actor_ids(&diagram), vec!["user", "api", "mailer"]);
    assert_eq!(diagram.actors()[0].display_name(), "End User");
    assert_eq!(diagram.actors()[1].display_name(), "Auth API");
    assert_eq!(diagram.actors()[1].attributes()[0].name(), "color");
    assert_eq!(diagram.actors()[2].display_name(), "mailer");
    assert_eq!(diagram.styles().len(), 1);

    let items = diagram.items();
    assert_eq!(items.len(), 6);
    assert!(matches!(&items[0], SequenceItem::ProcessInstruction(pi) if pi.name() == "autonumber"));

    match &items[1] {
        SequenceItem::Action(action) => {
            assert_eq!(action.source(), Participant::Actor(Id::new("user")));
            assert_eq!(action.target(), Participant::Actor(Id::new("api")));
            assert_eq!(action.message(), "POST /reset");
        }
        other => panic!("Expected Action, got {other:?}"),
    }

    match &items[2] {
        SequenceItem::Action(action) => {
            assert_eq!(
                action.arrow(),
                Arrow::new(ArrowStem::Dashed, ArrowHead::Solid)
            );
        }
        other => panic!("Expected Action, got {other:?}"),
    }

    match &items[3] {
        SequenceItem::Note(note) => {
            assert_eq!(note.align(), NoteAlign::Over);
            assert_eq!(note.span_to(), Some(Participant::Actor(Id::new("mailer"))));
            assert_eq!(note.message(), "async");
        }
        other => panic!("Expected Note, got {other:?}"),
    }

    match &items[4] {
        SequenceItem::Divider(divider) => {
            assert_eq!(divider.kind(), DividerKind::Line);
            assert_eq!(divider.label(), Some("later"));
        }
        other => panic!("Expected Divider, got {other:?}"),
    }

    match &items[5] {
        SequenceItem::Block(block) => {
            assert_eq!(block.kind(), BlockKind::Conditional);
            assert_eq!(block.segments().len(), 2);
            assert_eq!(block.segments()[0].label(), Some("link clicked"));
            assert_eq!(block.segments()[0].items().len(), 2);
            match &block.segments()[1].items()[0] {
                SequenceItem::Action(action) => {
                    assert_eq!(action.target(), Participant::LeftMargin);
                    assert_eq!(
                        action.arrow(),
                        Arrow::new(ArrowStem::Solid, ArrowHead::Barbed)
                    );
                }
                other => panic!("Expected Action, got {other:?}"),
            }
        }
        other => panic!("Expected Block, got {other:?}"),
    }
}

#[test]
fn test_every_arrow_reaches_the_diagram() {
    for arrow in Arrow::combinations() {
        let source = format!("a {arrow} b: m");
        let diagram = parse(&source, ParseConfig::default())
            .unwrap_or_else(|e| panic!("Failed to parse {source:?}: {e}"));
        match &diagram.items()[0] {
            SequenceItem::Action(action) => assert_eq!(action.arrow(), arrow),
            other => panic!("Expected Action, got {other:?}"),
        }
    }
}

#[test]
fn test_greedy_operator_lexing() {
    let diagram = parse("a ->> b: m\nb -->b: n", ParseConfig::default()).expect("Failed to parse");
    let arrows: Vec<_> = diagram
        .items()
        .iter()
        .filter_map(|item| match item {
            SequenceItem::Action(action) => Some(action.arrow()),
            _ => None,
        })
        .collect();
    assert_eq!(
        arrows,
        vec![
            Arrow::new(ArrowStem::Solid, ArrowHead::Open),
            Arrow::new(ArrowStem::Dashed, ArrowHead::Solid),
        ]
    );
}

#[test]
fn test_implicit_declaration_order() {
    let source = "note over c: first\nb -> a: second\nparticipant d\nparticipant b: Bee";
    let diagram = parse(source, ParseConfig::default()).expect("Failed to parse");
    assert_eq!(actor_ids(&diagram), vec!["c", "b", "a", "d"]);
    assert_eq!(diagram.actors()[1].display_name(), "Bee");
}

#[test]
fn test_margins_are_not_actors() {
    let diagram = parse(
        "left -> right: across\nnote right of right: edge",
        ParseConfig::default(),
    )
    .expect("Failed to parse");
    assert!(diagram.actors().is_empty());
    assert_eq!(diagram.items().len(), 2);
}

#[test]
fn test_process_instructions_lead_the_item_list() {
    let source = "a -> b: x\nloop\n  b -> a: y\nend\n#!theme dark\n#!scale 2";
    let diagram = parse(source, ParseConfig::default()).expect("Failed to parse");

    let instructions: Vec<_> = diagram
        .process_instructions()
        .map(|pi| (pi.name(), pi.value()))
        .collect();
    assert_eq!(instructions, vec![("theme", "dark"), ("scale", "2")]);
    assert!(matches!(diagram.items()[2], SequenceItem::Action(_)));
    assert!(matches!(diagram.items()[3], SequenceItem::Block(_)));
}

#[test]
fn test_message_escapes() {
    let diagram = parse(
        "a -> b: line one\\nline two\na -> b: back\\\\slash\na -> b: trailing\\n",
        ParseConfig::default(),
    )
    .expect("Failed to parse");
    let messages: Vec<_> = diagram
        .items()
        .iter()
        .filter_map(|item| match item {
            SequenceItem::Action(action) => Some(action.message().to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(
        messages,
        vec!["line one\nline two", "back\\slash", "trailing\n"]
    );
}

#[test]
fn test_bad_message_escape() {
    let err = parse("a -> b: tab\\t", ParseConfig::default()).expect_err("\\t is not a message escape");
    assert_eq!(err.diagnostic().code(), Some(ErrorCode::E003));
    assert_eq!(err.kind(), ErrorKind::Lexical);
}

#[test]
fn test_error_reports_line_of_first_problem() {
    let source = "title: ok\na -> b: fine\n\nb ~ a: broken\na -> : later problem\n";
    let err = parse(source, ParseConfig::new("flow.seq")).expect_err("Expected failure");

    assert_eq!(err.line(), 4);
    assert_eq!(err.column(), 3);
    assert_eq!(err.kind(), ErrorKind::Lexical);
    assert_eq!(err.diagnostic().code(), Some(ErrorCode::E002));
    assert!(err.to_string().starts_with("flow.seq:4: "));
}

#[test]
fn test_syntax_error_reports_line_of_unfinished_declaration() {
    let source = "title: t\na -> b: 1\nb -> a: 2\na -> b: 3\na -> b\nb -> a: 6\n";
    let err = parse(source, ParseConfig::new("flow.seq")).expect_err("Expected failure");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.diagnostic().code(), Some(ErrorCode::E100));
    assert_eq!((err.line(), err.column()), (5, 7));
    assert!(err.to_string().starts_with("flow.seq:5: "));

    let source = "a -> b: 1\n\n\n\nnote over a\n\n\nb -> a: x\n";
    let err = parse(source, ParseConfig::default()).expect_err("Expected failure");
    assert_eq!(err.line(), 5);

    // A lexical error further down does not hide the unfinished line.
    let source = "a -> b: 1\nb -> a\n\"open\n";
    let err = parse(source, ParseConfig::default()).expect_err("Expected failure");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.line(), 2);

    let err = parse("title: t\nnote over\n", ParseConfig::default()).expect_err("Expected failure");
    assert_eq!(err.diagnostic().code(), Some(ErrorCode::E101));
    assert_eq!(err.line(), 2);
}

#[test]
fn test_syntax_error_kind() {
    let err = parse("alt\n  a -> b: x\n", ParseConfig::default()).expect_err("Expected failure");
    assert_eq!(err.kind(), ErrorKind::Syntax);
    assert_eq!(err.line(), 3);
    assert_eq!(err.source_name(), "<input>");
}

#[test]
fn test_block_depth_limit() {
    let source = "loop\n".repeat(5) + &"end\n".repeat(5);

    assert!(parse(&source, ParseConfig::default().with_max_block_depth(5)).is_ok());

    let err = parse(&source, ParseConfig::default().with_max_block_depth(4))
        .expect_err("Expected depth failure");
    assert_eq!(err.diagnostic().code(), Some(ErrorCode::E102));
    assert_eq!(err.line(), 5);
}

#[test]
fn test_style_upsert() {
    let source = "style a (color=red)\nstyle participant (shape=box)\nstyle a (color=blue, width=\"2\")";
    let diagram = parse(source, ParseConfig::default()).expect("Failed to parse");

    let targets: Vec<_> = diagram.styles().iter().map(|s| s.target()).collect();
    assert_eq!(
        targets,
        vec![StyleTarget::Named(Id::new("a")), StyleTarget::Participants]
    );
    let values: Vec<_> = diagram.styles()[0]
        .attributes()
        .iter()
        .map(|attr| attr.value())
        .collect();
    assert_eq!(values, vec!["blue", "2"]);
    // Styling a name does not declare an actor.
    assert!(diagram.actors().is_empty());
}

#[test]
fn test_empty_attribute_block_clears_attributes() {
    let source = "participant a (color=red)\nparticipant a\nparticipant b (color=red)\nparticipant b ()";
    let diagram = parse(source, ParseConfig::default()).expect("Failed to parse");
    assert_eq!(diagram.actors()[0].attributes().len(), 1);
    assert!(diagram.actors()[1].attributes().is_empty());
}

#[test]
fn test_concurrent_whilst_segments() {
    let source = "concurrent: workers\n  a -> b: one\nwhilst: watchdog\n  c -> d: two\nwhilst\nend";
    let diagram = parse(source, ParseConfig::default()).expect("Failed to parse");

    let SequenceItem::Block(block) = &diagram.items()[0] else {
        panic!("Expected Block");
    };
    assert_eq!(block.kind(), BlockKind::Concurrent);
    let segments: Vec<_> = block
        .segments()
        .iter()
        .map(|s| (s.role(), s.label(), s.items().len()))
        .collect();
    assert_eq!(
        segments,
        vec![
            (SegmentRole::Primary, Some("workers"), 1),
            (SegmentRole::Alternate, Some("watchdog"), 1),
            (SegmentRole::Alternate, None, 0),
        ]
    );
}

#[test]
fn test_keywords_are_case_insensitive() {
    let diagram = parse(
        "TITLE: Loud\nParticipant A\nOPT\n  A -> B: x\nEND",
        ParseConfig::default(),
    )
    .expect("Failed to parse");
    assert_eq!(diagram.title(), "Loud");
    assert_eq!(actor_ids(&diagram), vec!["A", "B"]);
}

#[test]
fn test_empty_source() {
    let diagram = parse("", ParseConfig::default()).expect("Failed to parse");
    assert_eq!(diagram.title(), "");
    assert!(diagram.actors().is_empty());
    assert!(diagram.items().is_empty());
}

#[test]
fn test_reference_scenarios() {
    let diagram = parse("A->B: hi", ParseConfig::default()).expect("Failed to parse");
    let registry: Vec<_> = diagram
        .actors()
        .iter()
        .map(|actor| (actor.id().to_string(), actor.display_name().to_string()))
        .collect();
    assert_eq!(
        registry,
        vec![
            ("A".to_string(), "A".to_string()),
            ("B".to_string(), "B".to_string())
        ]
    );

    let diagram = parse("participant A as \"Alice\"\nA->B: hi", ParseConfig::default())
        .expect("Failed to parse");
    assert_eq!(diagram.actors()[0].display_name(), "Alice");
    assert_eq!(diagram.actors()[1].display_name(), "B");

    let diagram = parse(
        "alt cond1\nA->B: x\nelse cond2\nA->B: y\nend",
        ParseConfig::default(),
    )
    .expect("Failed to parse");
    assert_eq!(diagram.items().len(), 1);
    let SequenceItem::Block(block) = &diagram.items()[0] else {
        panic!("Expected Block");
    };
    let labels: Vec<_> = block.segments().iter().map(|s| s.label()).collect();
    assert_eq!(labels, vec![Some("cond1"), Some("cond2")]);
    assert!(block.segments().iter().all(|s| s.items().len() == 1));
    assert_eq!(actor_ids(&diagram), vec!["A", "B"]);

    let diagram = parse("A->B: x\n#!name val\nB->A: y", ParseConfig::default())
        .expect("Failed to parse");
    match &diagram.items()[0] {
        SequenceItem::ProcessInstruction(pi) => {
            assert_eq!((pi.name(), pi.value()), ("name", "val"));
        }
        other => panic!("Expected ProcessInstruction, got {other:?}"),
    }
    assert_eq!(diagram.items().len(), 3);
}
