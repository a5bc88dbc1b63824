//! Template lexer and parser tests.

pub mod tests_template_parser;
