//! JavaScript source parser and printer
//!
//! This module transforms JavaScript source text into an Abstract Syntax Tree
//! (AST) and back:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), extended by `statements` and `expressions`
//! - [`ast`]: AST node definitions
//! - [`printer`]: Printing (AST → source text)
//! - [`visit`]: Mutable traversal used by rewrite passes
//!
//! # Supported Subset
//!
//! - Statements: `import`, `var`/`let`/`const` (with destructuring),
//!   function declarations, `if`, `while`, `for`, `return`, `break`,
//!   `continue`, blocks and expression statements
//! - Expressions: every ES operator except the ones listed below, object,
//!   array and function literals, calls and `new`
//! - Automatic semicolon insertion at line breaks and before `}`
//! - No classes, arrow functions, template literals, regular expressions,
//!   spread, labels, `switch`, `try` or `do`/`while`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one method per precedence level.
//! No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
pub mod printer;
mod statements;
pub mod visit;

pub use parse::{ParseError, Parser, MAX_NESTING_DEPTH};

/// Parse a complete source unit.
pub fn parse_program(source: &str) -> Result<ast::Program, ParseError> {
    Parser::new(source)?.parse_program()
}
