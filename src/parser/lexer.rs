//! Logos-based lexer for chart templates
//!
//! A template is plain text with embedded `{{ … }}` actions. Outside an
//! action the lexer emits one `TEXT` token per run of text; inside an action
//! it hands the input to the logos-generated [`ActionToken`] lexer until the
//! closing delimiter.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer switching between text and action mode
pub struct Lexer<'a> {
    source: &'a str,
    offset: usize,
    action: Option<logos::Lexer<'a, ActionToken>>,
    action_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            action: None,
            action_start: 0,
        }
    }

    fn token(&self, kind: SyntaxKind, start: usize, end: usize) -> Token<'a> {
        Token {
            kind,
            text: &self.source[start..end],
            offset: TextSize::new(start as u32),
        }
    }

    fn next_in_text(&mut self) -> Option<Token<'a>> {
        let start = self.offset;
        let rest = self.source.get(start..).filter(|rest| !rest.is_empty())?;

        match rest.find("{{") {
            Some(0) => {
                let len = left_delim_len(rest);
                self.offset = start + len;
                self.action_start = self.offset;
                self.action = Some(ActionToken::lexer(&self.source[self.offset..]));
                Some(self.token(SyntaxKind::L_DELIM, start, start + len))
            }
            Some(n) => {
                self.offset = start + n;
                Some(self.token(SyntaxKind::TEXT, start, start + n))
            }
            None => {
                self.offset = self.source.len();
                Some(self.token(SyntaxKind::TEXT, start, self.source.len()))
            }
        }
    }
}

/// `{{- ` trims preceding whitespace; the dash only counts when followed by a space.
fn left_delim_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    match (bytes.get(2), bytes.get(3)) {
        (Some(b'-'), Some(b' ' | b'\t' | b'\r' | b'\n')) => 3,
        _ => 2,
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(inner) = self.action.as_mut() {
            if let Some(result) = inner.next() {
                let span = inner.span();
                let text = inner.slice();
                let kind = result.map(SyntaxKind::from).unwrap_or(SyntaxKind::ERROR);
                let start = self.action_start + span.start;
                if kind == SyntaxKind::R_DELIM {
                    self.offset = self.action_start + span.end;
                    self.action = None;
                }
                return Some(Token {
                    kind,
                    text,
                    offset: TextSize::new(start as u32),
                });
            }
            // Unterminated action: the inner lexer consumed the rest of the input.
            self.action = None;
            self.offset = self.source.len();
            return None;
        }

        self.next_in_text()
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum for the inside of an action - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum ActionToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    // =========================================================================
    // DELIMITERS AND PUNCTUATION
    // =========================================================================
    #[token("{{")]
    LDelim,

    #[token("}}")]
    #[token("-}}")]
    RDelim,

    #[token("|")]
    Pipe,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token(":=")]
    ColonEq,

    #[token("=")]
    Eq,

    #[token(".")]
    Dot,

    // =========================================================================
    // NAMES AND LITERALS
    // =========================================================================
    #[regex(r"\.[A-Za-z_][A-Za-z0-9_]*")]
    Field,

    #[regex(r"\$[A-Za-z0-9_]*")]
    Var,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"`[^`]*`")]
    String,

    #[regex(r"'([^'\\]|\\.)+'")]
    Char,

    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"-?0[xX][0-9a-fA-F]+")]
    Number,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("if")]
    IfKw,
    #[token("else")]
    ElseKw,
    #[token("end")]
    EndKw,
    #[token("range")]
    RangeKw,
    #[token("with")]
    WithKw,
    #[token("define")]
    DefineKw,
    #[token("template")]
    TemplateKw,
    #[token("block")]
    BlockKw,
    #[token("break")]
    BreakKw,
    #[token("continue")]
    ContinueKw,
    #[token("true")]
    TrueKw,
    #[token("false")]
    FalseKw,
    #[token("nil")]
    NilKw,

    #[regex(r"[^\x00-\x7F]+")]
    NonAscii,
}

impl From<ActionToken> for SyntaxKind {
    fn from(token: ActionToken) -> Self {
        match token {
            ActionToken::Whitespace => SyntaxKind::WHITESPACE,
            ActionToken::Comment => SyntaxKind::COMMENT,
            ActionToken::LDelim => SyntaxKind::L_DELIM,
            ActionToken::RDelim => SyntaxKind::R_DELIM,
            ActionToken::Pipe => SyntaxKind::PIPE,
            ActionToken::LParen => SyntaxKind::L_PAREN,
            ActionToken::RParen => SyntaxKind::R_PAREN,
            ActionToken::Comma => SyntaxKind::COMMA,
            ActionToken::ColonEq => SyntaxKind::COLON_EQ,
            ActionToken::Eq => SyntaxKind::EQ,
            ActionToken::Dot => SyntaxKind::DOT,
            ActionToken::Field => SyntaxKind::FIELD,
            ActionToken::Var => SyntaxKind::VAR,
            ActionToken::Ident => SyntaxKind::IDENT,
            ActionToken::String => SyntaxKind::STRING,
            ActionToken::Char => SyntaxKind::CHAR,
            ActionToken::Number => SyntaxKind::NUMBER,
            ActionToken::IfKw => SyntaxKind::IF_KW,
            ActionToken::ElseKw => SyntaxKind::ELSE_KW,
            ActionToken::EndKw => SyntaxKind::END_KW,
            ActionToken::RangeKw => SyntaxKind::RANGE_KW,
            ActionToken::WithKw => SyntaxKind::WITH_KW,
            ActionToken::DefineKw => SyntaxKind::DEFINE_KW,
            ActionToken::TemplateKw => SyntaxKind::TEMPLATE_KW,
            ActionToken::BlockKw => SyntaxKind::BLOCK_KW,
            ActionToken::BreakKw => SyntaxKind::BREAK_KW,
            ActionToken::ContinueKw => SyntaxKind::CONTINUE_KW,
            ActionToken::TrueKw => SyntaxKind::TRUE_KW,
            ActionToken::FalseKw => SyntaxKind::FALSE_KW,
            ActionToken::NilKw => SyntaxKind::NIL_KW,
            ActionToken::NonAscii => SyntaxKind::ERROR,
        }
    }
}
