//! Expression parsing implementation
//!
//! This module handles parsing of JavaScript expressions with one recursive
//! descent method per precedence level, lowest first.
//!
//! # Supported Expressions
//!
//! - Literals: numbers, strings, booleans, `null`, arrays, objects, functions
//! - Identifiers and `this`
//! - Binary operators: arithmetic, `**`, comparison, equality, bitwise, shifts,
//!   `in`, `instanceof`
//! - Logical operators: `&&`, `||`, `??`
//! - Unary operators: `-`, `+`, `!`, `~`, `typeof`, `void`, `delete`
//! - Update operators: prefix and postfix `++`, `--`
//! - Assignment: `=`, every compound form, destructuring on plain `=`
//! - Postfix: `.name`, `[expr]`, `(args)`, `new Callee(args)`
//! - Conditional `? :` and the comma sequence
//!
//! Parentheses do not produce a node; the printer reinserts them from
//! precedence.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser, LEVEL_COST};

impl Parser {
    /// Parse expression including the comma operator (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let first = self.parse_assignment()?;
        if !self.check(&Token::Comma(self.current_location())) {
            return Ok(first);
        }

        let location = first.location();
        let mut exprs = vec![first];
        while self.match_token(&Token::Comma(self.current_location())) {
            exprs.push(self.parse_assignment()?);
        }
        Ok(Expr::Sequence { exprs, location })
    }

    /// Parse assignment or conditional (right-associative).
    ///
    /// Every nested expression (parentheses, arguments, elements, branches)
    /// comes through here, so this is where nesting is charged.
    pub(crate) fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        self.deepen(LEVEL_COST)?;
        let expr = self.parse_assignment_unguarded();
        self.depth = mark;
        expr
    }

    fn parse_assignment_unguarded(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_conditional()?;

        let loc = self.current_location();
        let op = match self.peek() {
            Token::Eq(_) => AssignOp::Assign,
            Token::PlusEq(_) => AssignOp::Add,
            Token::MinusEq(_) => AssignOp::Sub,
            Token::StarEq(_) => AssignOp::Mul,
            Token::SlashEq(_) => AssignOp::Div,
            Token::PercentEq(_) => AssignOp::Mod,
            Token::StarStarEq(_) => AssignOp::Exp,
            Token::LtLtEq(_) => AssignOp::Shl,
            Token::GtGtEq(_) => AssignOp::Shr,
            Token::GtGtGtEq(_) => AssignOp::UShr,
            Token::AmpEq(_) => AssignOp::BitAnd,
            Token::PipeEq(_) => AssignOp::BitOr,
            Token::CaretEq(_) => AssignOp::BitXor,
            Token::AndAndEq(_) => AssignOp::And,
            Token::OrOrEq(_) => AssignOp::Or,
            Token::QuestionQuestionEq(_) => AssignOp::Nullish,
            _ => return Ok(expr),
        };
        self.advance();

        let target = self.expr_to_pattern(expr, op == AssignOp::Assign)?;
        let value = Box::new(self.parse_assignment()?);
        Ok(Expr::Assign {
            op,
            target,
            value,
            location: loc,
        })
    }

    /// Reinterpret an already parsed expression as an assignment target
    fn expr_to_pattern(&self, expr: Expr, allow_destructuring: bool) -> Result<Pattern, ParseError> {
        let location = expr.location();
        match expr {
            Expr::Ident(name, loc) => Ok(Pattern::Ident(name, loc)),
            member @ Expr::Member { .. } => Ok(Pattern::Member(Box::new(member))),
            Expr::Array { elements, location } if allow_destructuring => {
                let elements = elements
                    .into_iter()
                    .map(|e| self.expr_to_pattern(e, true).map(Some))
                    .collect::<Result<_, _>>()?;
                Ok(Pattern::Array { elements, location })
            }
            Expr::Object {
                properties,
                location,
            } if allow_destructuring => {
                let properties = properties
                    .into_iter()
                    .map(|p| Ok((p.key, self.expr_to_pattern(p.value, true)?)))
                    .collect::<Result<_, ParseError>>()?;
                Ok(Pattern::Object {
                    properties,
                    location,
                })
            }
            _ => Err(ParseError {
                message: "Invalid assignment target".to_string(),
                location,
            }),
        }
    }

    /// Parse conditional: test ? consequent : alternate
    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_logical_or()?;

        if self.match_token(&Token::Question(self.current_location())) {
            let loc = self.previous_location();
            let consequent = Box::new(self.parse_assignment()?);
            self.expect_token(
                &Token::Colon(self.current_location()),
                "Expected ':' in conditional expression",
            )?;
            let alternate = Box::new(self.parse_assignment()?);

            return Ok(Expr::Conditional {
                test: Box::new(expr),
                consequent,
                alternate,
                location: loc,
            });
        }

        Ok(expr)
    }

    /// Parse logical OR (||) and nullish coalescing (??)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut left = self.parse_logical_and()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::OrOr(loc)) {
                LogicalOp::Or
            } else if self.match_token(&Token::QuestionQuestion(loc)) {
                LogicalOp::Nullish
            } else {
                break;
            };

            self.deepen(1)?;
            let right = Box::new(self.parse_logical_and()?);
            left = Expr::Logical {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.depth = mark;
        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut left = self.parse_bitwise_or()?;

        while self.match_token(&Token::AndAnd(self.current_location())) {
            let loc = self.previous_location();
            self.deepen(1)?;
            let right = Box::new(self.parse_bitwise_or()?);
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.depth = mark;
        Ok(left)
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr, location: SourceLocation) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            location,
        }
    }

    /// Parse bitwise OR (|)
    fn parse_bitwise_or(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut left = self.parse_bitwise_xor()?;

        while self.match_token(&Token::Pipe(self.current_location())) {
            let loc = self.previous_location();
            self.deepen(1)?;
            let right = self.parse_bitwise_xor()?;
            left = Self::binary(BinaryOp::BitOr, left, right, loc);
        }

        self.depth = mark;
        Ok(left)
    }

    /// Parse bitwise XOR (^)
    fn parse_bitwise_xor(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut left = self.parse_bitwise_and()?;

        while self.match_token(&Token::Caret(self.current_location())) {
            let loc = self.previous_location();
            self.deepen(1)?;
            let right = self.parse_bitwise_and()?;
            left = Self::binary(BinaryOp::BitXor, left, right, loc);
        }

        self.depth = mark;
        Ok(left)
    }

    /// Parse bitwise AND (&)
    fn parse_bitwise_and(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut left = self.parse_equality()?;

        while self.match_token(&Token::Amp(self.current_location())) {
            let loc = self.previous_location();
            self.deepen(1)?;
            let right = self.parse_equality()?;
            left = Self::binary(BinaryOp::BitAnd, left, right, loc);
        }

        self.depth = mark;
        Ok(left)
    }

    /// Parse equality (== != === !==)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut left = self.parse_relational()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                Token::EqEq(_) => BinaryOp::Eq,
                Token::NotEq(_) => BinaryOp::Ne,
                Token::EqEqEq(_) => BinaryOp::StrictEq,
                Token::NotEqEq(_) => BinaryOp::StrictNe,
                _ => break,
            };
            self.advance();

            self.deepen(1)?;
            let right = self.parse_relational()?;
            left = Self::binary(op, left, right, loc);
        }

        self.depth = mark;
        Ok(left)
    }

    /// Parse relational (< <= > >= instanceof in)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut left = self.parse_shift()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                Token::Lt(_) => BinaryOp::Lt,
                Token::Le(_) => BinaryOp::Le,
                Token::Gt(_) => BinaryOp::Gt,
                Token::Ge(_) => BinaryOp::Ge,
                Token::Instanceof(_) => BinaryOp::InstanceOf,
                Token::In(_) => BinaryOp::In,
                _ => break,
            };
            self.advance();

            self.deepen(1)?;
            let right = self.parse_shift()?;
            left = Self::binary(op, left, right, loc);
        }

        self.depth = mark;
        Ok(left)
    }

    /// Parse bitwise shift (<< >> >>>)
    fn parse_shift(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut left = self.parse_additive()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek() {
                Token::LtLt(_) => BinaryOp::Shl,
                Token::GtGt(_) => BinaryOp::Shr,
                Token::GtGtGt(_) => BinaryOp::UShr,
                _ => break,
            };
            self.advance();

            self.deepen(1)?;
            let right = self.parse_additive()?;
            left = Self::binary(op, left, right, loc);
        }

        self.depth = mark;
        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut left = self.parse_multiplicative()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Plus(loc)) {
                BinaryOp::Add
            } else if self.match_token(&Token::Minus(loc)) {
                BinaryOp::Sub
            } else {
                break;
            };

            self.deepen(1)?;
            let right = self.parse_multiplicative()?;
            left = Self::binary(op, left, right, loc);
        }

        self.depth = mark;
        Ok(left)
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut left = self.parse_exponent()?;

        loop {
            let loc = self.current_location();
            let op = if self.match_token(&Token::Star(loc)) {
                BinaryOp::Mul
            } else if self.match_token(&Token::Slash(loc)) {
                BinaryOp::Div
            } else if self.match_token(&Token::Percent(loc)) {
                BinaryOp::Mod
            } else {
                break;
            };

            self.deepen(1)?;
            let right = self.parse_exponent()?;
            left = Self::binary(op, left, right, loc);
        }

        self.depth = mark;
        Ok(left)
    }

    /// Parse exponentiation (**), right-associative.
    ///
    /// An unparenthesized unary expression may not be the base: `-a ** b`
    /// is a syntax error, `(-a) ** b` is fine.
    fn parse_exponent(&mut self) -> Result<Expr, ParseError> {
        let starts_with_unary = matches!(
            self.peek(),
            Token::Minus(_)
                | Token::Plus(_)
                | Token::Bang(_)
                | Token::Tilde(_)
                | Token::Typeof(_)
                | Token::Void(_)
                | Token::Delete(_)
        );
        let base = self.parse_unary()?;

        if self.check(&Token::StarStar(self.current_location())) {
            if starts_with_unary {
                return self.error("Unary operator before '**' must be parenthesized");
            }
            let loc = self.current_location();
            self.advance();
            let mark = self.depth;
            self.deepen(1)?;
            let exponent = self.parse_exponent()?;
            self.depth = mark;
            return Ok(Self::binary(BinaryOp::Exp, base, exponent, loc));
        }

        Ok(base)
    }

    /// Parse unary operators and prefix updates
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        let op = match self.peek() {
            Token::Minus(_) => Some(UnaryOp::Neg),
            Token::Plus(_) => Some(UnaryOp::Plus),
            Token::Bang(_) => Some(UnaryOp::Not),
            Token::Tilde(_) => Some(UnaryOp::BitNot),
            Token::Typeof(_) => Some(UnaryOp::Typeof),
            Token::Void(_) => Some(UnaryOp::Void),
            Token::Delete(_) => Some(UnaryOp::Delete),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let mark = self.depth;
            self.deepen(1)?;
            let operand = Box::new(self.parse_unary()?);
            self.depth = mark;
            return Ok(Expr::Unary {
                op,
                operand,
                location: loc,
            });
        }

        let update = match self.peek() {
            Token::PlusPlus(_) => Some(UpdateOp::Increment),
            Token::MinusMinus(_) => Some(UpdateOp::Decrement),
            _ => None,
        };
        if let Some(op) = update {
            self.advance();
            let mark = self.depth;
            self.deepen(1)?;
            let target = self.parse_unary()?;
            self.depth = mark;
            if !target.is_simple_target() {
                return Err(ParseError {
                    message: format!("Invalid operand for prefix '{}'", op.as_str()),
                    location: target.location(),
                });
            }
            return Ok(Expr::Update {
                op,
                prefix: true,
                target: Box::new(target),
                location: loc,
            });
        }

        self.parse_postfix()
    }

    /// Parse postfix `++` / `--`; a line break before the operator ends the expression
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_call_member()?;

        let op = match self.peek() {
            Token::PlusPlus(_) if !self.newline_before() => UpdateOp::Increment,
            Token::MinusMinus(_) if !self.newline_before() => UpdateOp::Decrement,
            _ => return Ok(expr),
        };
        let loc = self.current_location();
        self.advance();

        if !expr.is_simple_target() {
            return Err(ParseError {
                message: format!("Invalid operand for postfix '{}'", op.as_str()),
                location: expr.location(),
            });
        }

        Ok(Expr::Update {
            op,
            prefix: false,
            target: Box::new(expr),
            location: loc,
        })
    }

    /// Parse calls and member accesses: `a.b`, `a[b]`, `a(b)`
    fn parse_call_member(&mut self) -> Result<Expr, ParseError> {
        let mark = self.depth;
        let mut expr = if self.check(&Token::New(self.current_location())) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        loop {
            let loc = self.current_location();
            if self.check(&Token::LParen(loc)) {
                let args = self.parse_arguments()?;
                expr = Expr::call(expr, args, loc);
            } else if let Some(member) = self.parse_member_suffix(&expr)? {
                expr = member;
            } else {
                break;
            }
            self.deepen(1)?;
        }

        self.depth = mark;
        Ok(expr)
    }

    /// `.name` or `[expr]` after `object`, if present
    fn parse_member_suffix(&mut self, object: &Expr) -> Result<Option<Expr>, ParseError> {
        let loc = self.current_location();
        if self.match_token(&Token::Dot(loc)) {
            let name = self.expect_property_name()?;
            return Ok(Some(Expr::member(object.clone(), name, loc)));
        }
        if self.match_token(&Token::LBracket(loc)) {
            let key = self.parse_expression()?;
            self.expect_token(
                &Token::RBracket(self.current_location()),
                "Expected ']' after computed property",
            )?;
            return Ok(Some(Expr::Member {
                object: Box::new(object.clone()),
                property: MemberProperty::Computed(Box::new(key)),
                location: loc,
            }));
        }
        Ok(None)
    }

    /// Parse `new Callee(args)`; the argument list is optional
    fn parse_new(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();
        self.advance(); // consume 'new'

        let mark = self.depth;
        self.deepen(1)?;
        let mut callee = if self.check(&Token::New(self.current_location())) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        while let Some(member) = self.parse_member_suffix(&callee)? {
            callee = member;
            self.deepen(1)?;
        }
        self.depth = mark;

        let args = if self.check(&Token::LParen(self.current_location())) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Expr::New {
            callee: Box::new(callee),
            args,
            location: loc,
        })
    }

    /// Parse a parenthesized, comma separated argument list
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect_lparen("before arguments")?;
        let mut args = Vec::new();

        if !self.check(&Token::RParen(self.current_location())) {
            loop {
                args.push(self.parse_assignment()?);
                if !self.match_token(&Token::Comma(self.current_location())) {
                    break;
                }
                // Trailing comma
                if self.check(&Token::RParen(self.current_location())) {
                    break;
                }
            }
        }

        self.expect_rparen("after arguments")?;
        Ok(args)
    }

    /// Parse primary expressions
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek_token();
        let location = token.location();

        match token {
            Token::NumberLiteral(raw, _) => {
                self.advance();
                Ok(Expr::Number { raw, location })
            }
            Token::StringLiteral(value, raw, _) => {
                self.advance();
                Ok(Expr::Str {
                    value,
                    raw,
                    location,
                })
            }
            Token::True(_) => {
                self.advance();
                Ok(Expr::Bool(true, location))
            }
            Token::False(_) => {
                self.advance();
                Ok(Expr::Bool(false, location))
            }
            Token::Null(_) => {
                self.advance();
                Ok(Expr::Null(location))
            }
            Token::This(_) => {
                self.advance();
                Ok(Expr::This(location))
            }
            Token::Ident(name, _) => {
                self.advance();
                Ok(Expr::Ident(name, location))
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            Token::LBracket(_) => self.parse_array_literal(),
            Token::LBrace(_) => self.parse_object_literal(),
            Token::Function(_) => self.parse_function_expression(),
            _ => self.error(format!("Unexpected token {}", token)),
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        self.advance(); // consume '['
        let mut elements = Vec::new();

        while !self.check(&Token::RBracket(self.current_location())) {
            elements.push(self.parse_assignment()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_token(
            &Token::RBracket(self.current_location()),
            "Expected ']' after array elements",
        )?;
        Ok(Expr::Array { elements, location })
    }

    fn parse_object_literal(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        self.expect_lbrace("to start object literal")?;
        let mut properties = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) {
            let key_loc = self.current_location();
            let (key, may_be_shorthand) = match self.peek_token() {
                Token::StringLiteral(value, _, _) => {
                    self.advance();
                    (value, false)
                }
                Token::NumberLiteral(raw, _) => {
                    self.advance();
                    (raw, false)
                }
                Token::Ident(..) => (self.expect_property_name()?, true),
                _ => (self.expect_property_name()?, false),
            };

            if self.match_token(&Token::Colon(self.current_location())) {
                let value = self.parse_assignment()?;
                properties.push(Property {
                    key,
                    value,
                    shorthand: false,
                });
            } else if may_be_shorthand {
                properties.push(Property {
                    value: Expr::Ident(key.clone(), key_loc),
                    key,
                    shorthand: true,
                });
            } else {
                return self.error(format!("Expected ':' after property name '{}'", key));
            }

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_rbrace("after object literal")?;
        Ok(Expr::Object {
            properties,
            location,
        })
    }

    fn parse_function_expression(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();
        self.advance(); // consume 'function'

        let name = if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Some(name)
        } else {
            None
        };
        let (params, body) = self.parse_function_rest()?;

        Ok(Expr::Function {
            name,
            params,
            body,
            location,
        })
    }
}
