//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `statements`: Parsing statements, declarations and imports
//! - `expressions`: Parsing expressions, one method per precedence level
//!
//! # Automatic Semicolon Insertion
//!
//! A statement terminator may be omitted before `}`, at end of input, or when
//! the next token starts on a later line than the previous one. Tokens only
//! carry their start position, which is all the line-break test needs.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use std::fmt;

/// Parser error type
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Nesting budget for one parse. Exceeding it is a [`ParseError`], so deep
/// input fails cleanly instead of exhausting the stack later in the pipeline.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Charge for entering a nested statement or expression: each one runs
/// the whole precedence ladder
pub(crate) const LEVEL_COST: usize = 16;

/// Recursive descent parser for the JavaScript subset
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Nesting charged so far; binary and member chains add one per link
    /// because every link deepens the tree
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
        })
    }

    /// Parse the entire program (top-level statements)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_statement(true)?);
        }

        Ok(Program::new(body))
    }

    // ===== Helper methods =====

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.peek().clone()
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    /// True if a line break separates the previous token from the current one
    pub(crate) fn newline_before(&self) -> bool {
        self.position > 0 && self.current_location().line > self.previous_location().line
    }

    pub(crate) fn error<T>(&self, message: impl Into<String>) -> Result<T, ParseError> {
        Err(ParseError {
            message: message.into(),
            location: self.current_location(),
        })
    }

    /// Charge `cost` against the nesting budget. Callers restore `depth`
    /// once the nested construct is done; after an error it is meaningless.
    pub(crate) fn deepen(&mut self, cost: usize) -> Result<(), ParseError> {
        self.depth += cost;
        if self.depth > MAX_NESTING_DEPTH {
            return self.error("Nesting too deep");
        }
        Ok(())
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RBrace(self.current_location()),
            &format!("Expected '}}' {ctx}"),
        )
    }

    /// Consume a statement terminator, inserting one where the grammar allows
    pub(crate) fn consume_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        if self.match_token(&Token::Semicolon(self.current_location())) {
            return Ok(());
        }
        if self.is_at_end()
            || self.check(&Token::RBrace(self.current_location()))
            || self.newline_before()
        {
            return Ok(());
        }
        self.error(format!("Expected ';' {ctx}, found {}", self.peek()))
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            self.error(format!("Expected identifier, found {}", self.peek()))
        }
    }

    /// Identifier or keyword used as a property name (`a.new`, `{ if: 1 }`)
    pub(crate) fn expect_property_name(&mut self) -> Result<String, ParseError> {
        let token = self.peek_token();
        let name = match token {
            Token::Ident(name, _) => name,
            Token::NumberLiteral(..)
            | Token::StringLiteral(..)
            | Token::Eof(_) => {
                return self.error(format!("Expected property name, found {}", token));
            }
            keyword => {
                let text = keyword.text();
                if text.is_empty() || !text.chars().all(|c| c.is_ascii_alphabetic()) {
                    return self.error(format!("Expected property name, found {}", keyword));
                }
                text.to_string()
            }
        };
        self.advance();
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_program().unwrap()
    }

    #[test]
    fn test_parse_simple_function() {
        let program = parse("function main() { return 0; }");

        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Stmt::FunctionDecl {
                name, params, body, ..
            } => {
                assert_eq!(name, "main");
                assert_eq!(params.len(), 0);
                assert_eq!(body.len(), 1);
            }
            _ => panic!("Expected function declaration"),
        }
    }

    #[test]
    fn test_parse_expression() {
        let program = parse("let x = 1 + 2 * 3;");
        assert_eq!(program.body.len(), 1);
        assert_eq!(program.revision(), 0);
    }

    #[test]
    fn test_semicolon_insertion_on_newline() {
        let program = parse("let a = 1\nlet b = 2\na + b");
        assert_eq!(program.body.len(), 3);
    }

    #[test]
    fn test_semicolon_insertion_before_brace() {
        let program = parse("if (x > 0) { y = 1 } else { y = 0 }");
        assert_eq!(program.body.len(), 1);
    }

    #[test]
    fn test_missing_semicolon_on_same_line_is_an_error() {
        let mut parser = Parser::new("let a = 1 let b = 2").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.message.contains("Expected ';'"));
        assert_eq!(err.location, SourceLocation::new(1, 11));
    }

    fn chain(terms: usize) -> String {
        let names: Vec<String> = (0..terms).map(|i| format!("a{}", i)).collect();
        format!("x = {};", names.join(" + "))
    }

    #[test]
    fn test_deep_parentheses_are_an_error() {
        let source = format!("{}a{};", "(".repeat(300), ")".repeat(300));
        let err = Parser::new(&source).unwrap().parse_program().unwrap_err();
        assert_eq!(err.message, "Nesting too deep");
    }

    #[test]
    fn test_moderate_nesting_is_accepted() {
        let source = format!("{}a{} + 1;", "(".repeat(20), ")".repeat(20));
        assert_eq!(parse(&source).body.len(), 1);
    }

    #[test]
    fn test_long_operator_chain_is_an_error() {
        let err = Parser::new(&chain(20_000)).unwrap().parse_program().unwrap_err();
        assert_eq!(err.message, "Nesting too deep");
    }

    #[test]
    fn test_chain_budget_is_released_per_statement() {
        let source = format!("{}\n{}\n{}", chain(400), chain(400), chain(400));
        assert_eq!(parse(&source).body.len(), 3);
    }

    #[test]
    fn test_deep_blocks_are_an_error() {
        let source = format!("{}x;{}", "{".repeat(200), "}".repeat(200));
        let err = Parser::new(&source).unwrap().parse_program().unwrap_err();
        assert_eq!(err.message, "Nesting too deep");
    }

    #[test]
    fn test_deep_unary_and_member_chains_are_errors() {
        let unary = format!("{}a;", "!".repeat(1000));
        assert!(Parser::new(&unary).unwrap().parse_program().is_err());
        let members = format!("a{};", ".b".repeat(1000));
        assert!(Parser::new(&members).unwrap().parse_program().is_err());
    }

    #[test]
    fn test_keyword_property_names() {
        let program = parse("a.new = { if: 1 };");
        assert_eq!(program.body.len(), 1);
    }
}
