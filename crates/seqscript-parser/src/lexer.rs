//! Lexical analyzer for seqscript source text.
//!
//! The lexer is pull-based: the parser asks for one token at a time through
//! [`Lexer::next_token`], and nothing past that token is scanned. Whitespace,
//! `#` comments and `#!` processing instructions never reach the parser;
//! instructions are appended to a log owned by the lexer instead.
//!
//! A `:` switches the lexer into message mode for the rest of the line.

use std::char;

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{alt, cut_err, delimited, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{none_of, one_of, take_while},
};

use seqscript_core::semantic::ProcessInstruction;

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Characters that make up operator runs.
const OPERATOR_CHARS: [char; 8] = ['-', '>', '*', '=', '/', '\\', '.', ','];

fn cut_with<'a, O>(input: &mut Input<'a>, diagnostic: LexerDiagnostic) -> IResult<'a, O> {
    Err(ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        diagnostic,
    )))
}

/// Characters up to, but not including, the end of the line.
fn rest_of_line<'a>(input: &mut Input<'a>) -> IResult<'a, &'a str> {
    take_while(0.., |c: char| c != '\n').parse_next(input)
}

/// Whitespace, including newlines.
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, ()> {
    take_while(1.., char::is_whitespace)
        .void()
        .parse_next(input)
}

/// `# ...` up to the end of the line.
fn comment<'a>(input: &mut Input<'a>) -> IResult<'a, ()> {
    preceded('#', rest_of_line).void().parse_next(input)
}

/// `#!name value` up to the end of the line.
///
/// The first whitespace run separates the name from the value. A line with
/// only a name yields an empty value.
fn process_instruction<'a>(input: &mut Input<'a>) -> IResult<'a, ProcessInstruction> {
    let start = input.current_token_start();

    preceded(
        "#!",
        cut_err(rest_of_line.map(str::trim).verify(|text: &str| !text.is_empty())).context(
            LexerDiagnostic {
                code: ErrorCode::E008,
                message: "empty processing instruction",
                help: Some("write the instruction as `#!name value`"),
                start,
            },
        ),
    )
    .map(|text: &str| match text.split_once(char::is_whitespace) {
        Some((name, value)) => ProcessInstruction::new(name, value.trim_start()),
        None => ProcessInstruction::new(text, ""),
    })
    .parse_next(input)
}

/// Anything the parser never sees. Yields the instruction when one was read.
fn trivia<'a>(input: &mut Input<'a>) -> IResult<'a, Option<ProcessInstruction>> {
    alt((
        whitespace.value(None),
        process_instruction.map(Some), // Must come before comment
        comment.value(None),
    ))
    .parse_next(input)
}

/// Parse an escape sequence inside a message: only `\n` and `\\`.
fn message_escape<'a>(input: &mut Input<'a>) -> IResult<'a, char> {
    let escape_start = input.current_token_start();

    preceded(
        '\\',
        cut_err(one_of(['n', '\\']).map(|c| if c == 'n' { '\n' } else { '\\' })).context(
            LexerDiagnostic {
                code: ErrorCode::E003,
                message: "invalid escape sequence in message",
                help: Some("messages accept only `\\n` and `\\\\`"),
                start: escape_start,
            },
        ),
    )
    .parse_next(input)
}

/// One message character, flagged when it came from an escape.
fn message_char<'a>(input: &mut Input<'a>) -> IResult<'a, (char, bool)> {
    alt((
        message_escape.map(|c| (c, true)),
        none_of(['\n', '\\']).map(|c| (c, false)),
    ))
    .parse_next(input)
}

/// Whitespace that stays on the current line.
fn inline_space<'a>(input: &mut Input<'a>) -> IResult<'a, &'a str> {
    take_while(0.., |c: char| c.is_whitespace() && c != '\n').parse_next(input)
}

/// Message text up to the end of the line, without trailing whitespace.
///
/// Escaped characters are kept even when they are whitespace, so
/// `hello\n` keeps its trailing newline.
fn message_text<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    repeat(0.., message_char)
        .fold(
            || (String::new(), 0),
            |(mut text, mut keep), (ch, escaped)| {
                text.push(ch);
                if escaped || !ch.is_whitespace() {
                    keep = text.len();
                }
                (text, keep)
            },
        )
        .map(|(mut text, keep): (String, usize)| {
            text.truncate(keep);
            Token::Message(text)
        })
        .parse_next(input)
}

/// Parse a message: `:` followed by the rest of the line.
///
/// Surrounding whitespace is dropped.
fn message<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded((':', inline_space), message_text).parse_next(input)
}

/// Parse a unicode escape sequence in a string: `\u{XXXX}` where XXXX is 1-6 hex digits.
///
/// Takes `escape_start` position (before `\`) for error span calculation.
fn string_escape_unicode<'a>(input: &mut Input<'a>, escape_start: usize) -> IResult<'a, char> {
    preceded(
        'u',
        cut_err(
            delimited(
                '{',
                take_while(1..=6, |c: char| c.is_ascii_hexdigit()).context(LexerDiagnostic {
                    code: ErrorCode::E006,
                    message: "empty unicode escape",
                    help: Some("provide 1-6 hex digits: `\\u{1F602}`"),
                    start: escape_start,
                }),
                '}',
            )
            .context(LexerDiagnostic {
                code: ErrorCode::E004,
                message: "invalid unicode escape",
                help: Some("use format `\\u{XXXX}` with 1-6 hex digits"),
                start: escape_start,
            })
            .try_map(|hex_str: &str| {
                u32::from_str_radix(hex_str, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(InvalidCodepoint)
            })
            .context(LexerDiagnostic {
                code: ErrorCode::E005,
                message: "invalid unicode codepoint",
                help: Some("valid range: `0x0000`-`0xD7FF` or `0xE000`-`0x10FFFF`"),
                start: escape_start,
            }),
        ),
    )
    .parse_next(input)
}

#[derive(Debug)]
struct InvalidCodepoint;

impl std::fmt::Display for InvalidCodepoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("invalid unicode codepoint")
    }
}

impl std::error::Error for InvalidCodepoint {}

/// Parse a standard escape character in a string after the backslash.
fn string_escape_char<'a>(input: &mut Input<'a>) -> IResult<'a, char> {
    one_of(['n', 'r', 't', 'b', 'f', '\\', '/', '\'', '"', '0'])
        .map(|c| match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            '0' => '\0',
            other => other,
        })
        .parse_next(input)
}

/// Parse an escape sequence in a quoted string starting with backslash.
fn string_escape<'a>(input: &mut Input<'a>) -> IResult<'a, char> {
    let escape_start = input.current_token_start();

    preceded('\\', |input: &mut Input<'a>| {
        string_escape_body(input, escape_start)
    })
    .parse_next(input)
}

/// The part of a string escape after the backslash.
fn string_escape_body<'a>(input: &mut Input<'a>, escape_start: usize) -> IResult<'a, char> {
    let checkpoint = input.checkpoint();
    match string_escape_unicode(input, escape_start) {
        Ok(ch) => return Ok(ch),
        Err(ErrMode::Backtrack(_)) => input.reset(&checkpoint),
        Err(e) => return Err(e), // E004, E005, E006
    }

    if let Ok(ch) = string_escape_char(input) {
        return Ok(ch);
    }

    cut_with(
        input,
        LexerDiagnostic {
            code: ErrorCode::E003,
            message: "invalid escape sequence",
            help: Some(
                "valid escapes: `\\n`, `\\r`, `\\t`, `\\b`, `\\f`, `\\\\`, `\\/`, `\\'`, `\\\"`, `\\0`, `\\u{}`",
            ),
            start: escape_start,
        },
    )
}

/// Parse a double-quoted string literal on a single line.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let string_char = none_of(['"', '\\', '\n']);
    let string_content =
        repeat(0.., alt((string_escape, string_char))).fold(String::new, |mut acc, ch| {
            acc.push(ch);
            acc
        });

    let start_pos = input.current_token_start();

    // Commit after the opening quote so the error spans from it
    preceded(
        '"',
        cut_err(terminated(string_content, '"')).context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add closing `\"` before the end of the line"),
            start: start_pos,
        }),
    )
    .map(Token::StringLiteral)
    .parse_next(input)
}

/// Parse a backquoted raw string. No escapes are recognized.
fn raw_string_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start_pos = input.current_token_start();

    preceded(
        '`',
        cut_err(terminated(
            take_while(0.., |c: char| c != '`' && c != '\n'),
            '`',
        ))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated raw string literal",
            help: Some("add closing `` ` `` before the end of the line"),
            start: start_pos,
        }),
    )
    .map(|text: &str| Token::StringLiteral(text.to_string()))
    .parse_next(input)
}

/// Parse an operator with a greedy two-character lookup, falling back to a
/// single character.
///
/// `->>` therefore lexes as `-` then `>>`, and `-->` as `--` then `>`.
fn operator<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start = input.current_token_start();
    let run = operator_run(input)?;

    // Operator characters are ASCII, so byte and char lengths agree
    for len in (1..=run.len()).rev() {
        if let Some(token) = Token::operator(&run[..len]) {
            input.next_slice(len);
            return Ok(token);
        }
    }

    cut_with(
        input,
        LexerDiagnostic {
            code: ErrorCode::E007,
            message: "unrecognized operator",
            help: Some("operators are `-`, `--`, `=`, `>`, `>>`, `\\>`, `/>`, `.` and `,`"),
            start,
        },
    )
}

/// Peek at up to two operator characters.
fn operator_run<'a>(input: &mut Input<'a>) -> IResult<'a, &'a str> {
    peek(take_while(1..=2, OPERATOR_CHARS)).parse_next(input)
}

/// Parse `(` or `)`.
fn paren<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt(('('.value(Token::LeftParen), ')'.value(Token::RightParen))).parse_next(input)
}

/// Parse an identifier or keyword.
///
/// Keywords are recognized regardless of case; identifiers keep theirs.
fn word<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_')
        .verify(|s: &str| s.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_'))
        .map(|s: &'a str| Token::keyword(s).unwrap_or(Token::Identifier(s)))
        .parse_next(input)
}

/// Parse a single token with position tracking.
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        message,            // Must come before any other token
        string_literal,
        raw_string_literal,
        paren,
        operator,
        word,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Pull-based lexer over one source text.
///
/// Owns the processing instruction log for that text. Once the end of
/// input is reached every further call to [`Lexer::next_token`] returns
/// [`Token::Eof`].
#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    input: Input<'src>,
    process_instructions: Vec<ProcessInstruction>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            input: LocatingSlice::new(source),
            process_instructions: Vec::new(),
        }
    }

    /// The full source text being scanned.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Processing instructions read so far, in source order.
    pub fn process_instructions(&self) -> &[ProcessInstruction] {
        &self.process_instructions
    }

    /// Give up the processing instruction log.
    pub fn into_process_instructions(self) -> Vec<ProcessInstruction> {
        self.process_instructions
    }

    /// Scan and return the next token.
    ///
    /// # Errors
    ///
    /// Returns a lexical [`Diagnostic`] (codes `E0xx`) when the characters
    /// at the current position do not form a token.
    pub fn next_token(&mut self) -> Result<PositionedToken<'src>> {
        self.skip_trivia()?;

        if self.input.is_empty() {
            let end = self.source.len();
            return Ok(PositionedToken::new(Token::Eof, Span::new(end..end)));
        }

        let start = self.input.current_token_start();
        let checkpoint = self.input.checkpoint();
        match positioned_token(&mut self.input) {
            Ok(token) => {
                trace!(token:? = token.token, start = token.span.start(); "Lexed token");
                Ok(token)
            }
            Err(err) => {
                let error_pos = self.input.current_token_start();
                self.input.reset(&checkpoint);
                Err(self.convert_err_mode(err, start, error_pos))
            }
        }
    }

    /// Scan the rest of the current line as a message, without a leading `:`.
    ///
    /// Used for block labels such as `alt cache hit`. Returns `None`, and
    /// consumes nothing, when the line ends first or continues with `:` or
    /// `#`; those are left to [`Lexer::next_token`].
    ///
    /// # Errors
    ///
    /// Returns E003 for an invalid escape in the label.
    pub fn next_line_label(&mut self) -> Result<Option<PositionedToken<'src>>> {
        let checkpoint = self.input.checkpoint();
        let _ = inline_space(&mut self.input);

        let start = self.input.current_token_start();
        let rest = &self.source[start..];
        if rest.is_empty() || rest.starts_with(['\n', ':', '#']) {
            self.input.reset(&checkpoint);
            return Ok(None);
        }

        match message_text(&mut self.input) {
            Ok(token) => {
                let end = self.input.current_token_start();
                trace!(token:? = token, start = start; "Lexed line label");
                Ok(Some(PositionedToken::new(token, Span::new(start..end))))
            }
            Err(err) => {
                let error_pos = self.input.current_token_start();
                self.input.reset(&checkpoint);
                Err(self.convert_err_mode(err, start, error_pos))
            }
        }
    }

    /// Skip whitespace and comments, logging any processing instructions.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            let start = self.input.current_token_start();
            let checkpoint = self.input.checkpoint();
            match trivia(&mut self.input) {
                Ok(Some(instruction)) => {
                    debug!(
                        name = instruction.name(),
                        value = instruction.value();
                        "Read processing instruction"
                    );
                    self.process_instructions.push(instruction);
                }
                Ok(None) => {}
                Err(ErrMode::Backtrack(_)) => {
                    self.input.reset(&checkpoint);
                    return Ok(());
                }
                Err(err) => {
                    let error_pos = self.input.current_token_start();
                    self.input.reset(&checkpoint);
                    return Err(self.convert_err_mode(err, start, error_pos));
                }
            }
        }
    }

    /// Convert an ErrMode into a Diagnostic.
    ///
    /// Uses the `LexerDiagnostic` context when present. Otherwise no token
    /// could start at `token_start`, reported as E002.
    fn convert_err_mode(
        &self,
        err: ErrMode<ContextError<LexerDiagnostic>>,
        token_start: usize,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let end = error_pos.max(self.char_end(*start));
            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(Span::new(*start..end), code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(token_start..self.char_end(token_start));
        let found = &self.source[span.start()..span.end()];
        Diagnostic::error(format!("unexpected character `{}`", found.escape_debug()))
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }

    /// Byte offset just past the character starting at `pos`.
    fn char_end(&self, pos: usize) -> usize {
        self.source
            .get(pos..)
            .and_then(|rest| rest.chars().next())
            .map_or(pos, |c| pos + c.len_utf8())
    }
}

/// Scan a whole source text, returning every token before end of input.
///
/// Processing instructions are dropped; use [`Lexer`] directly to read them.
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        if token.token == Token::Eof {
            return Ok(tokens);
        }
        tokens.push(token);
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    /// Strategy for identifier strings that are not keywords.
    fn valid_identifier_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z_][A-Za-z0-9_]{0,20}".prop_filter("avoid keywords", |s| {
            Token::keyword(s).is_none()
        })
    }

    /// Strategy for runs of operator characters, valid or not.
    fn operator_run_strategy() -> impl Strategy<Value = String> {
        proptest::collection::vec(proptest::sample::select(OPERATOR_CHARS.to_vec()), 1..8)
            .prop_map(|chars| chars.into_iter().collect())
    }

    /// Strategy for message bodies without escapes or line breaks.
    fn message_body_strategy() -> impl Strategy<Value = String> {
        "[^\\\\\n\r]{0,40}"
    }

    // ===================
    // Property Test Functions
    // ===================

    fn check_identifier_round_trips(id: &str) -> std::result::Result<(), TestCaseError> {
        let tokens = tokenize(id).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(&tokens[0].token, &Token::Identifier(id));
        Ok(())
    }

    /// Every operator run either fails with E007 or lexes into table
    /// operators whose concatenation is the run itself.
    fn check_operator_run(run: &str) -> std::result::Result<(), TestCaseError> {
        match tokenize(run) {
            Ok(tokens) => {
                let mut rebuilt = String::new();
                for positioned in &tokens {
                    let text = &run[positioned.span.start()..positioned.span.end()];
                    prop_assert_eq!(Token::operator(text), Some(positioned.token.clone()));
                    rebuilt.push_str(text);
                }
                prop_assert_eq!(rebuilt, run);
            }
            Err(diag) => {
                prop_assert!(run.contains('*') || run.contains('/') || run.contains('\\'));
                prop_assert_eq!(diag.code(), Some(ErrorCode::E007));
            }
        }
        Ok(())
    }

    fn check_message_is_trimmed(body: &str) -> std::result::Result<(), TestCaseError> {
        let source = format!(":{body}");
        let tokens = tokenize(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(&tokens[0].token, &Token::Message(body.trim().to_string()));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn identifiers_round_trip(id in valid_identifier_strategy()) {
            check_identifier_round_trips(&id)?;
        }

        #[test]
        fn operator_runs_split_into_table_entries(run in operator_run_strategy()) {
            check_operator_run(&run)?;
        }

        #[test]
        fn messages_are_trimmed(body in message_body_strategy()) {
            check_message_is_trimmed(&body)?;
        }
    }
}
