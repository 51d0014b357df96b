//! Recursive descent parser for seqscript.
//!
//! The parser pulls tokens from a [`Lexer`] one at a time and keeps a single
//! token of lookahead. Whichever fails first, lexer or grammar, produces the
//! only error; there is no recovery.

use std::fmt;

use log::{debug, trace};

use seqscript_core::semantic::{
    Arrow, ArrowHead, ArrowStem, BlockKind, DividerKind, NoteAlign, SegmentRole,
};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    lexer::Lexer,
    parser_types::{
        ActorRef, Attribute, Block, BlockSegment, Declaration, Program, PseudoActor, StyleTarget,
    },
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Parser over one source text.
#[derive(Debug)]
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    lookahead: Option<PositionedToken<'src>>,
    /// End offset of the last consumed token.
    previous_end: usize,
    depth: usize,
    max_block_depth: usize,
}

impl<'src> Parser<'src> {
    /// Create a parser that rejects blocks nested deeper than
    /// `max_block_depth`.
    pub fn new(lexer: Lexer<'src>, max_block_depth: usize) -> Self {
        Self {
            lexer,
            lookahead: None,
            previous_end: 0,
            depth: 0,
            max_block_depth,
        }
    }

    /// Parse the whole input.
    ///
    /// ## Grammar:
    ///   `program := declaration* EOF`
    ///
    /// Processing instructions logged by the lexer are placed in front of
    /// the declarations, in the order they were read.
    ///
    /// # Errors
    ///
    /// Returns the first lexical or syntax [`Diagnostic`] in source order.
    pub fn parse(mut self) -> Result<Program<'src>> {
        let body = self.declarations()?;
        if !self.at(&Token::Eof)? {
            return Err(self.unexpected("a declaration"));
        }

        let instructions = self.lexer.into_process_instructions();
        debug!(
            declarations = body.len(),
            process_instructions = instructions.len();
            "Parsed program"
        );

        let mut declarations = Vec::with_capacity(instructions.len() + body.len());
        declarations.extend(instructions.into_iter().map(Declaration::ProcessInstruction));
        declarations.extend(body);
        Ok(Program { declarations })
    }

    // =========================================================================
    // Token handling
    // =========================================================================

    fn peek(&mut self) -> Result<&PositionedToken<'src>> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(self.lookahead.insert(token))
    }

    fn advance(&mut self) -> Result<PositionedToken<'src>> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        self.previous_end = token.span.end();
        Ok(token)
    }

    fn at(&mut self, expected: &Token<'_>) -> Result<bool> {
        Ok(&self.peek()?.token == expected)
    }

    fn expect(&mut self, expected: Token<'static>) -> Result<Span> {
        if self.at(&expected)? {
            return Ok(self.advance()?.span);
        }
        Err(self.incomplete(expected))
    }

    /// Build an error describing the lookahead token.
    fn unexpected(&mut self, expected: impl fmt::Display) -> Diagnostic {
        match self.peek() {
            Ok(found) => unexpected_token(found, expected),
            Err(diag) => diag,
        }
    }

    /// Build an error for a declaration that stops short of `expected`.
    ///
    /// When the next token (or lexical error) is on a later line, the error
    /// is placed at the end of the last consumed token so it reports the
    /// line of the unfinished declaration.
    fn incomplete(&mut self, expected: impl fmt::Display) -> Diagnostic {
        let source = self.lexer.source();
        let previous_end = self.previous_end;
        let on_later_line = |at: usize| source[previous_end..at].contains('\n');
        let here = Span::new(previous_end..previous_end);

        match self.peek() {
            Ok(found) if on_later_line(found.span.start()) => {
                let (code, found_text) = if found.token == Token::Eof {
                    (ErrorCode::E101, "end of input".to_string())
                } else {
                    (ErrorCode::E100, found.token.to_string())
                };
                Diagnostic::error(format!("expected {expected}, found {found_text}"))
                    .with_code(code)
                    .with_label(here, format!("expected {expected} here"))
                    .with_secondary_label(found.span, "next token")
            }
            Ok(found) => unexpected_token(found, expected),
            Err(diag) => match diag.primary_span() {
                Some(span) if on_later_line(span.start()) => {
                    Diagnostic::error(format!("expected {expected} before the end of the line"))
                        .with_code(ErrorCode::E100)
                        .with_label(here, format!("expected {expected} here"))
                }
                _ => diag,
            },
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// ## Grammar:
    ///   `declaration*` up to `end`, a clause keyword, or end of input
    fn declarations(&mut self) -> Result<Vec<Declaration<'src>>> {
        let mut declarations = Vec::new();
        while !self.at_clause_end()? {
            declarations.push(self.declaration()?);
        }
        Ok(declarations)
    }

    fn at_clause_end(&mut self) -> Result<bool> {
        Ok(matches!(
            self.peek()?.token,
            Token::End
                | Token::Else
                | Token::ElseAlt
                | Token::ElsePar
                | Token::Whilst
                | Token::Eof
        ))
    }

    /// ## Grammar:
    ///   `declaration := title | style | actor | action | note | gap | block`
    fn declaration(&mut self) -> Result<Declaration<'src>> {
        match self.peek()?.token {
            Token::Title => self.title(),
            Token::Style => self.style(),
            Token::Participant => {
                self.advance()?;
                let name = self.identifier("a participant name")?;
                self.actor(name)
            }
            Token::Identifier(_) => {
                let name = self.identifier("an actor name")?;
                if self.at_arrow_stem()? {
                    let from = Spanned::new(ActorRef::Named(*name.inner()), name.span());
                    self.action(from)
                } else {
                    self.actor(name)
                }
            }
            Token::Left | Token::Right => {
                let from = self.actor_ref()?;
                self.action(from)
            }
            Token::Note => self.note(),
            Token::Horizontal | Token::Spacer | Token::Gap | Token::Line | Token::Frame => {
                self.gap()
            }
            Token::Alt => self.block(BlockKind::Conditional),
            Token::Par => self.block(BlockKind::Parallel),
            Token::Opt => self.block(BlockKind::Optional),
            Token::Loop => self.block(BlockKind::Loop),
            Token::Concurrent => self.block(BlockKind::Concurrent),
            _ => Err(self.unexpected("a declaration")),
        }
    }

    /// ## Grammar:
    ///   `title := 'title' MESSAGE`
    fn title(&mut self) -> Result<Declaration<'src>> {
        self.expect(Token::Title)?;
        let text = self.message("after `title`")?;
        trace!(title = text.inner().as_str(); "Parsed title");
        Ok(Declaration::Title(text))
    }

    /// ## Grammar:
    ///   `style := 'style' (IDENT | 'participant') attr-block?`
    fn style(&mut self) -> Result<Declaration<'src>> {
        self.expect(Token::Style)?;

        let target = match self.peek()?.token {
            Token::Participant => StyleTarget::Participants,
            Token::Identifier(name) => StyleTarget::Named(name),
            _ => return Err(self.incomplete("`participant` or a style name")),
        };
        let target = Spanned::new(target, self.advance()?.span);

        let attributes = if self.at(&Token::LeftParen)? {
            self.attribute_block()?
        } else {
            Vec::new()
        };

        Ok(Declaration::Style { target, attributes })
    }

    /// The part of an actor declaration after its name.
    ///
    /// ## Grammar:
    ///   `actor := 'participant'? IDENT ('as' (IDENT | STRING))? attr-block? MESSAGE?`
    ///
    /// ## Notes:
    /// - `as` is only recognized on the same line as the name.
    /// - A trailing MESSAGE is an alias too, unless `as` already gave one.
    fn actor(&mut self, name: Spanned<&'src str>) -> Result<Declaration<'src>> {
        let mut alias = None;
        if self.at_alias_keyword()? {
            self.advance()?;
            alias = Some(self.alias()?);
        }

        let attributes = if self.at(&Token::LeftParen)? {
            Some(self.attribute_block()?)
        } else {
            None
        };

        if alias.is_none() {
            alias = self
                .optional_message()?
                .filter(|message| !message.inner().is_empty());
        }

        trace!(name = *name.inner(), aliased = alias.is_some(); "Parsed actor");
        Ok(Declaration::Actor {
            name,
            alias,
            attributes,
        })
    }

    fn at_alias_keyword(&mut self) -> Result<bool> {
        let source = self.lexer.source();
        let previous_end = self.previous_end;
        let next = self.peek()?;
        let is_as = matches!(next.token, Token::Identifier(word) if word.eq_ignore_ascii_case("as"));
        Ok(is_as && !source[previous_end..next.span.start()].contains('\n'))
    }

    fn alias(&mut self) -> Result<Spanned<String>> {
        let text = match &self.peek()?.token {
            Token::Identifier(name) => name.to_string(),
            Token::StringLiteral(text) => text.clone(),
            _ => return Err(self.incomplete("an alias name or string after `as`")),
        };
        Ok(Spanned::new(text, self.advance()?.span))
    }

    /// ## Grammar:
    ///   `action := actor-ref arrow actor-ref MESSAGE`
    fn action(&mut self, from: Spanned<ActorRef<'src>>) -> Result<Declaration<'src>> {
        let arrow = self.arrow()?;
        let to = self.actor_ref()?;
        let message = self.message("after the receiving actor")?;

        trace!(
            from = from.inner().to_string(),
            arrow = arrow.inner().to_string(),
            to = to.inner().to_string();
            "Parsed action"
        );
        Ok(Declaration::Action {
            from,
            to,
            arrow,
            message,
        })
    }

    /// ## Grammar:
    ///   `note := 'note' ('left' 'of' | 'right' 'of' | 'over') actor-ref (',' actor-ref)? MESSAGE`
    fn note(&mut self) -> Result<Declaration<'src>> {
        self.expect(Token::Note)?;

        let align = match self.peek()?.token {
            Token::Left => {
                self.advance()?;
                self.expect(Token::Of)?;
                NoteAlign::LeftOf
            }
            Token::Right => {
                self.advance()?;
                self.expect(Token::Of)?;
                NoteAlign::RightOf
            }
            Token::Over => {
                self.advance()?;
                NoteAlign::Over
            }
            _ => return Err(self.incomplete("`left of`, `right of` or `over`")),
        };

        let subject = self.actor_ref()?;
        let second = if self.at(&Token::Comma)? {
            self.advance()?;
            Some(self.actor_ref()?)
        } else {
            None
        };
        let message = self.message("after the note target")?;

        Ok(Declaration::Note {
            align,
            subject,
            second,
            message,
        })
    }

    /// ## Grammar:
    ///   `gap := 'horizontal'? ('spacer' | 'gap' | 'line' | 'frame') MESSAGE?`
    fn gap(&mut self) -> Result<Declaration<'src>> {
        if self.at(&Token::Horizontal)? {
            self.advance()?;
        }

        let kind = match self.peek()?.token {
            Token::Spacer => DividerKind::Spacer,
            Token::Gap => DividerKind::Gap,
            Token::Line => DividerKind::Line,
            Token::Frame => DividerKind::Frame,
            _ => return Err(self.incomplete("`spacer`, `gap`, `line` or `frame`")),
        };
        let kind = Spanned::new(kind, self.advance()?.span);
        let label = self.optional_message()?;

        Ok(Declaration::Gap { kind, label })
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    /// ## Grammar:
    ///   `alt        := 'alt' MESSAGE? declaration* (('elsealt' | 'else') MESSAGE? declaration*)* 'end'`
    ///   `par        := 'par' MESSAGE? declaration* (('elsepar' | 'else') MESSAGE? declaration*)* 'end'`
    ///   `opt        := 'opt' MESSAGE? declaration* 'end'`
    ///   `loop       := 'loop' MESSAGE? declaration* 'end'`
    ///   `concurrent := 'concurrent' MESSAGE? declaration* ('whilst' MESSAGE? declaration*)* 'end'`
    fn block(&mut self, kind: BlockKind) -> Result<Declaration<'src>> {
        let opener = self.advance()?.span;

        if self.depth >= self.max_block_depth {
            return Err(Diagnostic::error(format!(
                "blocks nested deeper than {} levels",
                self.max_block_depth
            ))
            .with_code(ErrorCode::E102)
            .with_label(opener, ErrorCode::E102.description())
            .with_help("flatten the diagram or raise `max_block_depth`"));
        }

        self.depth += 1;
        let segments = self.block_segments(kind, opener);
        self.depth -= 1;
        let segments = segments?;

        debug!(kind = kind.keyword(), segments = segments.len(); "Parsed block");
        Ok(Declaration::Block(Block { kind, segments }))
    }

    fn block_segments(&mut self, kind: BlockKind, opener: Span) -> Result<Vec<BlockSegment<'src>>> {
        let mut segments = Vec::new();
        let mut role = SegmentRole::Primary;
        let mut keyword = opener;

        loop {
            let label = self.block_label()?;
            let declarations = self.declarations()?;
            segments.push(BlockSegment {
                role,
                keyword,
                label,
                declarations,
            });

            if self.at(&Token::End)? {
                self.advance()?;
                return Ok(segments);
            }

            if continues_block(kind, &self.peek()?.token) {
                keyword = self.advance()?.span;
                role = SegmentRole::Alternate;
                continue;
            }

            return Err(self
                .unexpected(clause_keywords(kind))
                .with_secondary_label(opener, format!("`{}` block opened here", kind.keyword()))
                .with_help("close the block with `end`"));
        }
    }

    // =========================================================================
    // Leaves
    // =========================================================================

    fn identifier(&mut self, expected: &str) -> Result<Spanned<&'src str>> {
        if let Token::Identifier(name) = self.peek()?.token {
            let span = self.advance()?.span;
            return Ok(Spanned::new(name, span));
        }
        Err(self.incomplete(expected))
    }

    /// ## Grammar:
    ///   `actor-ref := IDENT | 'left' | 'right'`
    fn actor_ref(&mut self) -> Result<Spanned<ActorRef<'src>>> {
        let actor = match self.peek()?.token {
            Token::Identifier(name) => ActorRef::Named(name),
            Token::Left => ActorRef::Pseudo(PseudoActor::Left),
            Token::Right => ActorRef::Pseudo(PseudoActor::Right),
            _ => return Err(self.incomplete("an actor name, `left` or `right`")),
        };
        Ok(Spanned::new(actor, self.advance()?.span))
    }

    fn at_arrow_stem(&mut self) -> Result<bool> {
        Ok(matches!(
            self.peek()?.token,
            Token::Dash | Token::DoubleDash | Token::Equals
        ))
    }

    /// ## Grammar:
    ///   `arrow := ('-' | '--' | '=') ('>' | '>>' | '\>' | '/>')`
    fn arrow(&mut self) -> Result<Spanned<Arrow>> {
        let stem = match self.peek()?.token {
            Token::Dash => ArrowStem::Solid,
            Token::DoubleDash => ArrowStem::Dashed,
            Token::Equals => ArrowStem::Thick,
            _ => return Err(self.incomplete("an arrow").with_help(ARROW_HELP)),
        };
        let stem_span = self.advance()?.span;

        let head = match self.peek()?.token {
            Token::Angle => ArrowHead::Solid,
            Token::DoubleAngle => ArrowHead::Open,
            Token::BackslashAngle => ArrowHead::Barbed,
            Token::SlashAngle => ArrowHead::LowerBarbed,
            _ => return Err(self.incomplete("an arrow head").with_help(ARROW_HELP)),
        };
        let head_span = self.advance()?.span;

        Ok(Spanned::new(
            Arrow::new(stem, head),
            stem_span.union(head_span),
        ))
    }

    /// ## Grammar:
    ///   `attr-block := '(' (attribute (',' attribute)* ','?)? ')'`
    ///   `attribute  := IDENT '=' (STRING | IDENT)`
    fn attribute_block(&mut self) -> Result<Vec<Attribute<'src>>> {
        self.expect(Token::LeftParen)?;

        let mut attributes = Vec::new();
        loop {
            if self.at(&Token::RightParen)? {
                self.advance()?;
                return Ok(attributes);
            }

            let name = self.identifier("an attribute name or `)`")?;
            self.expect(Token::Equals)?;
            let value = self.attribute_value()?;
            attributes.push(Attribute { name, value });

            if self.at(&Token::Comma)? {
                self.advance()?;
            } else if !self.at(&Token::RightParen)? {
                return Err(self.incomplete("`,` or `)`"));
            }
        }
    }

    fn attribute_value(&mut self) -> Result<Spanned<String>> {
        let value = match &self.peek()?.token {
            Token::StringLiteral(text) => text.clone(),
            Token::Identifier(name) => name.to_string(),
            _ => return Err(self.incomplete("a string or identifier value")),
        };
        Ok(Spanned::new(value, self.advance()?.span))
    }

    /// The label after a block or clause keyword: a MESSAGE, or the rest of
    /// the keyword's line as in `alt cache hit`.
    fn block_label(&mut self) -> Result<Option<Spanned<String>>> {
        if self.lookahead.is_some() {
            return self.optional_message();
        }
        match self.lexer.next_line_label()? {
            Some(PositionedToken {
                token: Token::Message(text),
                span,
            }) => {
                self.previous_end = span.end();
                Ok(Some(Spanned::new(text, span)))
            }
            _ => self.optional_message(),
        }
    }

    fn optional_message(&mut self) -> Result<Option<Spanned<String>>> {
        if !matches!(self.peek()?.token, Token::Message(_)) {
            return Ok(None);
        }
        let PositionedToken { token, span } = self.advance()?;
        Ok(match token {
            Token::Message(text) => Some(Spanned::new(text, span)),
            _ => None,
        })
    }

    fn message(&mut self, context: &str) -> Result<Spanned<String>> {
        match self.optional_message()? {
            Some(message) => Ok(message),
            None => Err(self
                .incomplete(format_args!("a message (`: text`) {context}"))
                .with_help("a message is everything after `:` up to the end of the line")),
        }
    }
}

const ARROW_HELP: &str =
    "arrows are a stem (`-`, `--`, `=`) followed by a head (`>`, `>>`, `\\>`, `/>`)";

/// Whether `token` opens another clause of a block of `kind`.
fn continues_block(kind: BlockKind, token: &Token<'_>) -> bool {
    matches!(
        (kind, token),
        (BlockKind::Conditional, Token::ElseAlt | Token::Else)
            | (BlockKind::Parallel, Token::ElsePar | Token::Else)
            | (BlockKind::Concurrent, Token::Whilst)
    )
}

/// The keywords that may follow a clause of a block of `kind`.
fn clause_keywords(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Conditional => "`elsealt`, `else` or `end`",
        BlockKind::Parallel => "`elsepar`, `else` or `end`",
        BlockKind::Concurrent => "`whilst` or `end`",
        BlockKind::Optional | BlockKind::Loop => "`end`",
    }
}

fn unexpected_token(found: &PositionedToken<'_>, expected: impl fmt::Display) -> Diagnostic {
    if found.token == Token::Eof {
        return Diagnostic::error(format!("expected {expected}, found end of input"))
            .with_code(ErrorCode::E101)
            .with_label(found.span, "input ends here");
    }

    Diagnostic::error(format!("expected {expected}, found {}", found.token))
        .with_code(ErrorCode::E100)
        .with_label(found.span, ErrorCode::E100.description())
}
