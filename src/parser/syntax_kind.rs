//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree
//! of a chart template (YAML text with embedded `{{ … }}` actions).

/// All syntax kinds (tokens and nodes) of a chart template
///
/// Tokens are leaf nodes (text, identifiers, keywords, punctuation).
/// Nodes are composite (actions, pipelines, control blocks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,
    COMMENT, // /* … */ inside an action

    // =========================================================================
    // TEXT AND LITERALS
    // =========================================================================
    TEXT,      // raw document text between actions
    IDENT,     // function name
    FIELD,     // .name
    VAR,       // $name or $
    STRING,    // "…" or `…`
    CHAR,      // 'a'
    NUMBER,    // 42, 0x1F, -1.5e3

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_DELIM,   // {{ or {{-
    R_DELIM,   // }} or -}}
    PIPE,      // |
    L_PAREN,   // (
    R_PAREN,   // )
    COMMA,     // ,
    COLON_EQ,  // :=
    EQ,        // =
    DOT,       // .

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    IF_KW,
    ELSE_KW,
    END_KW,
    RANGE_KW,
    WITH_KW,
    DEFINE_KW,
    TEMPLATE_KW,
    BLOCK_KW,
    BREAK_KW,
    CONTINUE_KW,
    TRUE_KW,
    FALSE_KW,
    NIL_KW,

    // =========================================================================
    // COMPOSITE NODES
    // =========================================================================
    TEMPLATE,       // root
    LIST,           // body of a control block
    ACTION,         // {{ pipeline }}, {{/* comment */}}, {{ break }}
    PIPELINE,       // declaration? command (| command)*
    DECLARATION,    // $a, $b := / $a =
    COMMAND,        // operand+
    VARIABLE,       // wraps VAR
    FIELD_CHAIN,    // (.|$x|(…))? .a.b
    PAREN_PIPELINE, // ( pipeline )
    IF_BLOCK,
    RANGE_BLOCK,
    WITH_BLOCK,
    DEFINE_BLOCK,
    NAMED_BLOCK,    // {{ block "name" pipeline }}
    TEMPLATE_CALL,  // {{ template "name" pipeline }}
    ELSE_CLAUSE,    // {{ else }} / {{ else if … }} / {{ else with … }} + LIST
    END_ACTION,     // {{ end }}

    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::IF_KW as u16) && (self as u16) <= (Self::NIL_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_DELIM as u16) && (self as u16) <= (Self::DOT as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::STRING | Self::CHAR | Self::NUMBER | Self::TRUE_KW | Self::FALSE_KW | Self::NIL_KW
        )
    }

    /// Control structures that open a scope closed by `{{ end }}`.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Self::IF_BLOCK
                | Self::RANGE_BLOCK
                | Self::WITH_BLOCK
                | Self::DEFINE_BLOCK
                | Self::NAMED_BLOCK
        )
    }

    /// Human-readable name of the kind.
    ///
    /// Punctuation and keywords are named by their canonical spelling,
    /// everything else by a snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::WHITESPACE => "whitespace",
            Self::COMMENT => "comment",
            Self::TEXT => "text",
            Self::IDENT => "identifier",
            Self::FIELD => "field",
            Self::VAR => "variable",
            Self::STRING => "string",
            Self::CHAR => "char",
            Self::NUMBER => "number",
            Self::L_DELIM => "{{",
            Self::R_DELIM => "}}",
            Self::PIPE => "|",
            Self::L_PAREN => "(",
            Self::R_PAREN => ")",
            Self::COMMA => ",",
            Self::COLON_EQ => ":=",
            Self::EQ => "=",
            Self::DOT => ".",
            Self::IF_KW => "if",
            Self::ELSE_KW => "else",
            Self::END_KW => "end",
            Self::RANGE_KW => "range",
            Self::WITH_KW => "with",
            Self::DEFINE_KW => "define",
            Self::TEMPLATE_KW => "template",
            Self::BLOCK_KW => "block",
            Self::BREAK_KW => "break",
            Self::CONTINUE_KW => "continue",
            Self::TRUE_KW => "true",
            Self::FALSE_KW => "false",
            Self::NIL_KW => "nil",
            Self::TEMPLATE => "template_file",
            Self::LIST => "list",
            Self::ACTION => "action",
            Self::PIPELINE => "pipeline",
            Self::DECLARATION => "declaration",
            Self::COMMAND => "command",
            Self::VARIABLE => "variable_reference",
            Self::FIELD_CHAIN => "field_chain",
            Self::PAREN_PIPELINE => "parenthesized_pipeline",
            Self::IF_BLOCK => "if_action",
            Self::RANGE_BLOCK => "range_action",
            Self::WITH_BLOCK => "with_action",
            Self::DEFINE_BLOCK => "define_action",
            Self::NAMED_BLOCK => "block_action",
            Self::TEMPLATE_CALL => "template_action",
            Self::ELSE_CLAUSE => "else_clause",
            Self::END_ACTION => "end_action",
            Self::ERROR => "ERROR",
            Self::__LAST => "__LAST",
        }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateLanguage {}

impl rowan::Language for TemplateLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<TemplateLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<TemplateLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<TemplateLanguage>;
