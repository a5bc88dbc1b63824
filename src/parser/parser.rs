//! Recursive descent parser for chart templates
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse template source into a CST
pub fn parse_template(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_root();
    parser.finish()
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> Option<SyntaxKind> {
        self.current().map(|t| t.kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Look ahead, skipping trivia
    fn nth(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map(|t| t.kind)
    }

    /// At `{{` whose first keyword is `keyword`.
    fn at_action(&self, keyword: SyntaxKind) -> bool {
        self.at(SyntaxKind::L_DELIM) && self.nth(1) == Some(keyword)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {}", kind.name()));
            false
        }
    }

    fn skip_trivia(&mut self) {
        while self.current().is_some_and(|t| t.kind.is_trivia()) {
            self.bump();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = match self.current() {
            Some(t) => TextRange::at(t.offset, TextSize::of(t.text)),
            None => {
                let end = self
                    .tokens
                    .last()
                    .map(|t| t.offset + TextSize::of(t.text))
                    .unwrap_or_default();
                TextRange::empty(end)
            }
        };
        self.errors.push(SyntaxError::new(message, range));
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// Template = Item*
    fn parse_root(&mut self) {
        self.start_node(SyntaxKind::TEMPLATE);
        while !self.at_eof() {
            if self.at_action(SyntaxKind::END_KW) || self.at_action(SyntaxKind::ELSE_KW) {
                self.parse_stray_action();
            } else {
                self.parse_item();
            }
        }
        self.finish_node();
    }

    /// List = Item* (up to the enclosing block's `else` or `end`)
    fn parse_list(&mut self) {
        self.start_node(SyntaxKind::LIST);
        while !self.at_eof()
            && !self.at_action(SyntaxKind::END_KW)
            && !self.at_action(SyntaxKind::ELSE_KW)
        {
            self.parse_item();
        }
        self.finish_node();
    }

    fn parse_item(&mut self) {
        match self.current_kind() {
            Some(SyntaxKind::L_DELIM) => self.parse_action(),
            Some(SyntaxKind::TEXT) => self.bump(),
            Some(_) => {
                self.error("unexpected token outside of an action");
                self.start_node(SyntaxKind::ERROR);
                self.bump();
                self.finish_node();
            }
            None => {}
        }
    }

    fn parse_action(&mut self) {
        match self.nth(1) {
            Some(SyntaxKind::IF_KW) => self.parse_control(SyntaxKind::IF_BLOCK),
            Some(SyntaxKind::RANGE_KW) => self.parse_control(SyntaxKind::RANGE_BLOCK),
            Some(SyntaxKind::WITH_KW) => self.parse_control(SyntaxKind::WITH_BLOCK),
            Some(SyntaxKind::DEFINE_KW) => self.parse_define(),
            Some(SyntaxKind::BLOCK_KW) => self.parse_named_block(),
            Some(SyntaxKind::TEMPLATE_KW) => self.parse_template_call(),
            Some(SyntaxKind::BREAK_KW | SyntaxKind::CONTINUE_KW) => {
                self.start_node(SyntaxKind::ACTION);
                self.bump();
                self.skip_trivia();
                self.bump();
                self.close_action();
                self.finish_node();
            }
            _ => {
                self.start_node(SyntaxKind::ACTION);
                self.bump();
                if !self.at_pipeline_end() {
                    self.parse_pipeline();
                }
                self.close_action();
                self.finish_node();
            }
        }
    }

    /// `{{ end }}` or `{{ else }}` without an open block
    fn parse_stray_action(&mut self) {
        self.start_node(SyntaxKind::ACTION);
        self.bump();
        self.skip_trivia();
        let keyword = self.current().map(|t| t.text).unwrap_or_default();
        self.error(format!("unexpected {keyword} without an open block"));
        self.bump();
        self.close_action();
        self.finish_node();
    }

    /// If/Range/With = `{{ kw Pipeline }}` List ElseClause* EndAction
    fn parse_control(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.skip_trivia();
        self.bump();
        if self.at_pipeline_end() {
            self.error(format!("missing pipeline in {}", kind.name()));
        } else {
            self.parse_pipeline();
        }
        self.close_action();
        self.parse_list();
        while self.at_action(SyntaxKind::ELSE_KW) {
            self.parse_else_clause();
        }
        self.parse_end();
        self.finish_node();
    }

    /// ElseClause = `{{ else (if|with Pipeline)? }}` List
    fn parse_else_clause(&mut self) {
        self.start_node(SyntaxKind::ELSE_CLAUSE);
        self.bump();
        self.skip_trivia();
        self.bump();
        if matches!(self.nth(0), Some(SyntaxKind::IF_KW | SyntaxKind::WITH_KW)) {
            self.skip_trivia();
            self.bump();
            if self.at_pipeline_end() {
                self.error("missing pipeline in else clause");
            } else {
                self.parse_pipeline();
            }
        }
        self.close_action();
        self.parse_list();
        self.finish_node();
    }

    fn parse_end(&mut self) {
        if !self.at_action(SyntaxKind::END_KW) {
            self.error("missing {{ end }}");
            return;
        }
        self.start_node(SyntaxKind::END_ACTION);
        self.bump();
        self.skip_trivia();
        self.bump();
        self.close_action();
        self.finish_node();
    }

    /// Define = `{{ define "name" }}` List EndAction
    fn parse_define(&mut self) {
        self.start_node(SyntaxKind::DEFINE_BLOCK);
        self.bump();
        self.skip_trivia();
        self.bump();
        self.skip_trivia();
        self.expect(SyntaxKind::STRING);
        self.close_action();
        self.parse_list();
        self.parse_end();
        self.finish_node();
    }

    /// Block = `{{ block "name" Pipeline }}` List EndAction
    fn parse_named_block(&mut self) {
        self.start_node(SyntaxKind::NAMED_BLOCK);
        self.bump();
        self.skip_trivia();
        self.bump();
        self.skip_trivia();
        self.expect(SyntaxKind::STRING);
        if !self.at_pipeline_end() {
            self.parse_pipeline();
        }
        self.close_action();
        self.parse_list();
        self.parse_end();
        self.finish_node();
    }

    /// TemplateCall = `{{ template "name" Pipeline? }}`
    fn parse_template_call(&mut self) {
        self.start_node(SyntaxKind::TEMPLATE_CALL);
        self.bump();
        self.skip_trivia();
        self.bump();
        self.skip_trivia();
        self.expect(SyntaxKind::STRING);
        if !self.at_pipeline_end() {
            self.parse_pipeline();
        }
        self.close_action();
        self.finish_node();
    }

    /// Consume the closing `}}`, recovering up to it if anything is left over.
    fn close_action(&mut self) {
        self.skip_trivia();
        if self.eat(SyntaxKind::R_DELIM) {
            return;
        }
        self.error("expected }}");
        if self.at_eof() || self.at(SyntaxKind::L_DELIM) {
            return;
        }
        self.start_node(SyntaxKind::ERROR);
        while !self.at_eof() && !self.at(SyntaxKind::R_DELIM) && !self.at(SyntaxKind::L_DELIM) {
            self.bump();
        }
        self.finish_node();
        self.eat(SyntaxKind::R_DELIM);
    }

    // =========================================================================
    // Pipelines
    // =========================================================================

    fn at_pipeline_end(&self) -> bool {
        matches!(
            self.nth(0),
            None | Some(
                SyntaxKind::R_DELIM | SyntaxKind::R_PAREN | SyntaxKind::L_DELIM | SyntaxKind::PIPE
            )
        )
    }

    fn at_declaration(&self) -> bool {
        let assign = |k| matches!(k, Some(SyntaxKind::COLON_EQ | SyntaxKind::EQ));
        self.nth(0) == Some(SyntaxKind::VAR)
            && (assign(self.nth(1))
                || (self.nth(1) == Some(SyntaxKind::COMMA)
                    && self.nth(2) == Some(SyntaxKind::VAR)
                    && assign(self.nth(3))))
    }

    /// Pipeline = Declaration? Command (`|` Command)*
    fn parse_pipeline(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::PIPELINE);
        if self.at_declaration() {
            self.parse_declaration();
        }
        self.parse_command();
        while self.nth(0) == Some(SyntaxKind::PIPE) {
            self.skip_trivia();
            self.bump();
            self.parse_command();
        }
        self.finish_node();
    }

    /// Declaration = Variable (`,` Variable)? (`:=` | `=`)
    fn parse_declaration(&mut self) {
        self.start_node(SyntaxKind::DECLARATION);
        self.parse_variable();
        self.skip_trivia();
        if self.eat(SyntaxKind::COMMA) {
            self.skip_trivia();
            self.parse_variable();
            self.skip_trivia();
        }
        if !self.eat(SyntaxKind::COLON_EQ) {
            self.expect(SyntaxKind::EQ);
        }
        self.finish_node();
    }

    fn parse_variable(&mut self) {
        self.start_node(SyntaxKind::VARIABLE);
        self.bump();
        self.finish_node();
    }

    /// Command = Operand+
    fn parse_command(&mut self) {
        if self.at_pipeline_end() {
            self.skip_trivia();
            self.error("missing value for command");
            return;
        }
        self.skip_trivia();
        self.start_node(SyntaxKind::COMMAND);
        loop {
            match self.current_kind() {
                Some(kind) if starts_operand(kind) => self.parse_operand(),
                Some(_) => {
                    self.error("unexpected token in command");
                    self.start_node(SyntaxKind::ERROR);
                    self.bump();
                    self.finish_node();
                }
                None => break,
            }
            if self.at_pipeline_end() {
                break;
            }
            self.skip_trivia();
        }
        self.finish_node();
    }

    /// Operand = (Variable | `.` | Field | `(` Pipeline `)` | Ident | Literal) Field*
    fn parse_operand(&mut self) {
        let checkpoint = self.builder.checkpoint();
        match self.current_kind() {
            Some(SyntaxKind::VAR) => self.parse_variable(),
            Some(SyntaxKind::L_PAREN) => {
                self.start_node(SyntaxKind::PAREN_PIPELINE);
                self.bump();
                self.parse_pipeline();
                self.skip_trivia();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            // A chain with an implicit `.` head starts at its first field.
            Some(SyntaxKind::FIELD) => {}
            _ => self.bump(),
        }
        if self.at(SyntaxKind::FIELD) {
            self.builder
                .start_node_at(checkpoint, SyntaxKind::FIELD_CHAIN.into());
            while self.at(SyntaxKind::FIELD) {
                self.bump();
            }
            self.finish_node();
        }
    }
}

fn starts_operand(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::VAR
            | SyntaxKind::DOT
            | SyntaxKind::FIELD
            | SyntaxKind::L_PAREN
            | SyntaxKind::IDENT
            | SyntaxKind::STRING
            | SyntaxKind::CHAR
            | SyntaxKind::NUMBER
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::NIL_KW
    )
}
