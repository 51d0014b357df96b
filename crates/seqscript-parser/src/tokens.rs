//! Token definitions for the seqscript language.

use std::fmt;

use crate::span::Span;

/// A lexical token.
///
/// Keywords are matched case-insensitively; identifiers keep the case they
/// were written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    // Keywords
    Title,
    Participant,
    Note,
    Style,
    Left,
    Right,
    Over,
    Of,
    Horizontal,
    Spacer,
    Gap,
    Line,
    Frame,
    Alt,
    ElseAlt,
    Else,
    End,
    Loop,
    Opt,
    Par,
    ElsePar,
    Concurrent,
    Whilst,

    // Operators
    /// `-`
    Dash,
    /// `--`
    DoubleDash,
    /// `=`
    Equals,
    /// `>`
    Angle,
    /// `>>`
    DoubleAngle,
    /// `/>`
    SlashAngle,
    /// `\>`
    BackslashAngle,
    /// `.`
    Dot,
    /// `,`
    Comma,

    // Grouping
    LeftParen,
    RightParen,

    // Values
    /// A quoted (`"..."`) or raw (`` `...` ``) string, unquoted and unescaped.
    StringLiteral(String),
    /// Text after a `:` up to the end of the line, unescaped and trimmed.
    Message(String),
    Identifier(&'src str),

    /// End of input. Returned forever once reached.
    Eof,
}

impl Token<'_> {
    /// Look up a keyword by name, ignoring ASCII case.
    pub fn keyword<'a>(word: &str) -> Option<Token<'a>> {
        let token = match word.to_ascii_lowercase().as_str() {
            "title" => Token::Title,
            "participant" => Token::Participant,
            "note" => Token::Note,
            "style" => Token::Style,
            "left" => Token::Left,
            "right" => Token::Right,
            "over" => Token::Over,
            "of" => Token::Of,
            "horizontal" => Token::Horizontal,
            "spacer" => Token::Spacer,
            "gap" => Token::Gap,
            "line" => Token::Line,
            "frame" => Token::Frame,
            "alt" => Token::Alt,
            "elsealt" => Token::ElseAlt,
            "else" => Token::Else,
            "end" => Token::End,
            "loop" => Token::Loop,
            "opt" => Token::Opt,
            "par" => Token::Par,
            "elsepar" => Token::ElsePar,
            "concurrent" => Token::Concurrent,
            "whilst" => Token::Whilst,
            _ => return None,
        };
        Some(token)
    }

    /// Look up an operator in the fixed operator table.
    pub fn operator<'a>(text: &str) -> Option<Token<'a>> {
        let token = match text {
            "-" => Token::Dash,
            "--" => Token::DoubleDash,
            "=" => Token::Equals,
            ">" => Token::Angle,
            ">>" => Token::DoubleAngle,
            "/>" => Token::SlashAngle,
            "\\>" => Token::BackslashAngle,
            "." => Token::Dot,
            "," => Token::Comma,
            _ => return None,
        };
        Some(token)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Title => write!(f, "`title`"),
            Token::Participant => write!(f, "`participant`"),
            Token::Note => write!(f, "`note`"),
            Token::Style => write!(f, "`style`"),
            Token::Left => write!(f, "`left`"),
            Token::Right => write!(f, "`right`"),
            Token::Over => write!(f, "`over`"),
            Token::Of => write!(f, "`of`"),
            Token::Horizontal => write!(f, "`horizontal`"),
            Token::Spacer => write!(f, "`spacer`"),
            Token::Gap => write!(f, "`gap`"),
            Token::Line => write!(f, "`line`"),
            Token::Frame => write!(f, "`frame`"),
            Token::Alt => write!(f, "`alt`"),
            Token::ElseAlt => write!(f, "`elsealt`"),
            Token::Else => write!(f, "`else`"),
            Token::End => write!(f, "`end`"),
            Token::Loop => write!(f, "`loop`"),
            Token::Opt => write!(f, "`opt`"),
            Token::Par => write!(f, "`par`"),
            Token::ElsePar => write!(f, "`elsepar`"),
            Token::Concurrent => write!(f, "`concurrent`"),
            Token::Whilst => write!(f, "`whilst`"),
            Token::Dash => write!(f, "`-`"),
            Token::DoubleDash => write!(f, "`--`"),
            Token::Equals => write!(f, "`=`"),
            Token::Angle => write!(f, "`>`"),
            Token::DoubleAngle => write!(f, "`>>`"),
            Token::SlashAngle => write!(f, "`/>`"),
            Token::BackslashAngle => write!(f, "`\\>`"),
            Token::Dot => write!(f, "`.`"),
            Token::Comma => write!(f, "`,`"),
            Token::LeftParen => write!(f, "`(`"),
            Token::RightParen => write!(f, "`)`"),
            Token::StringLiteral(s) => write!(f, "string \"{s}\""),
            Token::Message(_) => write!(f, "message"),
            Token::Identifier(name) => write!(f, "identifier `{name}`"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_ignores_case() {
        assert_eq!(Token::keyword("participant"), Some(Token::Participant));
        assert_eq!(Token::keyword("PARTICIPANT"), Some(Token::Participant));
        assert_eq!(Token::keyword("ElseAlt"), Some(Token::ElseAlt));
        assert_eq!(Token::keyword("participants"), None);
    }

    #[test]
    fn test_operator_table() {
        assert_eq!(Token::operator("--"), Some(Token::DoubleDash));
        assert_eq!(Token::operator("\\>"), Some(Token::BackslashAngle));
        assert_eq!(Token::operator("*"), None);
        assert_eq!(Token::operator("->"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::End.to_string(), "`end`");
        assert_eq!(Token::Identifier("db").to_string(), "identifier `db`");
        assert_eq!(Token::Eof.to_string(), "end of input");
    }
}
