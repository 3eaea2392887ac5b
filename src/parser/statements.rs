//! Statement parsing implementation
//!
//! This module handles parsing of all supported statement types:
//!
//! - Imports (top level only): `import x, { a as b } from 'm';`, `import * as ns from 'm';`
//! - Variable declarations: `var`, `let`, `const`, with array/object binding patterns
//! - Function declarations
//! - Control flow: `if`, `while`, `for`
//! - Jump statements: `return`, `break`, `continue`
//! - Blocks, empty statements and expression statements
//!
//! # Grammar
//!
//! ```text
//! statement ::= import_decl | var_decl | function_decl | if_stmt
//!             | while_stmt | for_stmt | return_stmt | break_stmt
//!             | continue_stmt | block | ';' | expr_stmt
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser, LEVEL_COST};

impl Parser {
    /// Parse block statements (inside braces, excluding the braces themselves)
    pub(crate) fn parse_block_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            statements.push(self.parse_statement(false)?);
        }

        Ok(statements)
    }

    /// Parse a statement; imports are only accepted at the top level
    pub(crate) fn parse_statement(&mut self, top_level: bool) -> Result<Stmt, ParseError> {
        let mark = self.depth;
        self.deepen(LEVEL_COST)?;
        let stmt = self.parse_statement_unguarded(top_level);
        self.depth = mark;
        stmt
    }

    fn parse_statement_unguarded(&mut self, top_level: bool) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        match self.peek() {
            Token::Import(_) => {
                if !top_level {
                    return self.error("Import declarations may only appear at top level");
                }
                self.advance();
                self.parse_import(loc)
            }
            Token::Var(_) | Token::Let(_) | Token::Const(_) => {
                let (kind, declarators) = self.parse_var_declarators()?;
                self.consume_semicolon("after variable declaration")?;
                Ok(Stmt::VarDecl {
                    kind,
                    declarators,
                    location: loc,
                })
            }
            Token::Function(_) => {
                self.advance();
                let name = self.expect_identifier()?;
                let (params, body) = self.parse_function_rest()?;
                Ok(Stmt::FunctionDecl {
                    name,
                    params,
                    body,
                    location: loc,
                })
            }
            Token::Return(_) => {
                self.advance();
                self.parse_return_statement(loc)
            }
            Token::If(_) => {
                self.advance();
                self.parse_if_statement(loc)
            }
            Token::While(_) => {
                self.advance();
                self.parse_while_statement(loc)
            }
            Token::For(_) => {
                self.advance();
                self.parse_for_statement(loc)
            }
            Token::Break(_) => {
                self.advance();
                self.consume_semicolon("after 'break'")?;
                Ok(Stmt::Break(loc))
            }
            Token::Continue(_) => {
                self.advance();
                self.consume_semicolon("after 'continue'")?;
                Ok(Stmt::Continue(loc))
            }
            Token::LBrace(_) => {
                self.advance();
                let body = self.parse_block_statements()?;
                self.expect_rbrace("after block")?;
                Ok(Stmt::Block {
                    body,
                    location: loc,
                })
            }
            Token::Semicolon(_) => {
                self.advance();
                Ok(Stmt::Empty(loc))
            }
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon("after expression")?;
                Ok(Stmt::Expression {
                    expr,
                    location: loc,
                })
            }
        }
    }

    /// Parse the rest of an import declaration after `import`
    fn parse_import(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        // Side-effect import: import 'module';
        if let Token::StringLiteral(source, _, _) = self.peek_token() {
            self.advance();
            self.consume_semicolon("after import")?;
            return Ok(Stmt::Import {
                specifiers: Vec::new(),
                source,
                location,
            });
        }

        let mut specifiers = Vec::new();

        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            specifiers.push(ImportSpecifier::Default(name));
            if !self.match_token(&Token::Comma(self.current_location())) {
                return self.finish_import(specifiers, location);
            }
        }

        if self.match_token(&Token::Star(self.current_location())) {
            self.expect_contextual("as")?;
            let local = self.expect_identifier()?;
            specifiers.push(ImportSpecifier::Namespace(local));
        } else if self.match_token(&Token::LBrace(self.current_location())) {
            while !self.check(&Token::RBrace(self.current_location())) {
                let imported = self.expect_property_name()?;
                let local = if self.check_contextual("as") {
                    self.advance();
                    self.expect_identifier()?
                } else {
                    imported.clone()
                };
                specifiers.push(ImportSpecifier::Named { imported, local });
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
            self.expect_rbrace("after import specifiers")?;
        } else {
            return self.error(format!("Unexpected {} in import declaration", self.peek()));
        }

        self.finish_import(specifiers, location)
    }

    /// `from 'module';`
    fn finish_import(
        &mut self,
        specifiers: Vec<ImportSpecifier>,
        location: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        self.expect_contextual("from")?;
        let source = match self.peek_token() {
            Token::StringLiteral(value, _, _) => {
                self.advance();
                value
            }
            other => return self.error(format!("Expected module name, found {}", other)),
        };
        self.consume_semicolon("after import")?;
        Ok(Stmt::Import {
            specifiers,
            source,
            location,
        })
    }

    fn check_contextual(&self, word: &str) -> bool {
        matches!(self.peek(), Token::Ident(name, _) if name == word)
    }

    fn expect_contextual(&mut self, word: &str) -> Result<(), ParseError> {
        if self.check_contextual(word) {
            self.advance();
            Ok(())
        } else {
            self.error(format!("Expected '{}', found {}", word, self.peek()))
        }
    }

    /// Parse `var|let|const` and its declarators, without the terminator
    fn parse_var_declarators(&mut self) -> Result<(VarKind, Vec<Declarator>), ParseError> {
        let kind = match self.peek() {
            Token::Var(_) => VarKind::Var,
            Token::Let(_) => VarKind::Let,
            _ => VarKind::Const,
        };
        self.advance();

        let mut declarators = Vec::new();
        loop {
            let target = self.parse_binding_pattern()?;
            let init = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_assignment()?)
            } else {
                None
            };

            if kind == VarKind::Const && init.is_none() {
                return self.error("Missing initializer in const declaration");
            }
            if init.is_none() && !matches!(target, Pattern::Ident(..)) {
                return self.error("Destructuring declaration requires an initializer");
            }

            declarators.push(Declarator { target, init });
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok((kind, declarators))
    }

    /// Parse a binding: `name`, `[a, , b]` or `{ a, b: c }`
    fn parse_binding_pattern(&mut self) -> Result<Pattern, ParseError> {
        let location = self.current_location();

        match self.peek_token() {
            Token::Ident(name, _) => {
                self.advance();
                Ok(Pattern::Ident(name, location))
            }
            Token::LBracket(_) => {
                self.advance();
                let mut elements = Vec::new();
                while !self.check(&Token::RBracket(self.current_location())) {
                    if self.match_token(&Token::Comma(self.current_location())) {
                        elements.push(None);
                        continue;
                    }
                    elements.push(Some(self.parse_binding_pattern()?));
                    if !self.match_token(&Token::Comma(self.current_location())) {
                        break;
                    }
                }
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after array pattern",
                )?;
                Ok(Pattern::Array { elements, location })
            }
            Token::LBrace(_) => {
                self.advance();
                let mut properties = Vec::new();
                while !self.check(&Token::RBrace(self.current_location())) {
                    let key_loc = self.current_location();
                    let key = self.expect_property_name()?;
                    let value = if self.match_token(&Token::Colon(self.current_location())) {
                        self.parse_binding_pattern()?
                    } else {
                        Pattern::Ident(key.clone(), key_loc)
                    };
                    properties.push((key, value));
                    if !self.match_token(&Token::Comma(self.current_location())) {
                        break;
                    }
                }
                self.expect_rbrace("after object pattern")?;
                Ok(Pattern::Object {
                    properties,
                    location,
                })
            }
            other => self.error(format!("Expected binding pattern, found {}", other)),
        }
    }

    /// Parse `(params) { body }` of a function declaration or expression
    pub(crate) fn parse_function_rest(&mut self) -> Result<(Vec<String>, Vec<Stmt>), ParseError> {
        self.expect_lparen("before parameters")?;
        let mut params = Vec::new();
        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                params.push(self.expect_identifier()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
            }
        }
        self.expect_rparen("after parameters")?;

        self.expect_lbrace("before function body")?;
        let body = self.parse_block_statements()?;
        self.expect_rbrace("after function body")?;

        Ok((params, body))
    }

    /// Parse return statement; a line break after `return` ends it
    fn parse_return_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let ends_here = self.check(&Token::Semicolon(self.current_location()))
            || self.check(&Token::RBrace(self.current_location()))
            || self.is_at_end()
            || self.newline_before();

        let value = if ends_here {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.consume_semicolon("after return")?;
        Ok(Stmt::Return { value, location })
    }

    /// Parse if statement
    fn parse_if_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'if'")?;
        let test = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let consequent = Box::new(self.parse_statement(false)?);

        let alternate = if self.match_token(&Token::Else(self.current_location())) {
            Some(Box::new(self.parse_statement(false)?))
        } else {
            None
        };

        Ok(Stmt::If {
            test,
            consequent,
            alternate,
            location,
        })
    }

    /// Parse while statement
    fn parse_while_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'while'")?;
        let test = self.parse_expression()?;
        self.expect_rparen("after while condition")?;

        let body = Box::new(self.parse_statement(false)?);

        Ok(Stmt::While {
            test,
            body,
            location,
        })
    }

    /// Parse for statement: `for (init; test; update) body`
    fn parse_for_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'for'")?;

        let init = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else if matches!(self.peek(), Token::Var(_) | Token::Let(_) | Token::Const(_)) {
            let (kind, declarators) = self.parse_var_declarators()?;
            Some(ForInit::Var { kind, declarators })
        } else {
            Some(ForInit::Expr(self.parse_expression()?))
        };
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            "Expected ';' after for initializer",
        )?;

        let test = if self.check(&Token::Semicolon(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_token(
            &Token::Semicolon(self.current_location()),
            "Expected ';' after for condition",
        )?;

        let update = if self.check(&Token::RParen(self.current_location())) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_rparen("after for clauses")?;

        let body = Box::new(self.parse_statement(false)?);

        Ok(Stmt::For {
            init,
            test,
            update,
            body,
            location,
        })
    }
}
