//! Lexer (tokenizer) for JavaScript source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Numeric and string literals keep their raw source text so the printer can
//! reproduce them verbatim. Regular-expression and template literals are not
//! part of the supported subset: `/` always lexes as division.

use super::ast::SourceLocation;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    NumberLiteral(String, SourceLocation),
    /// Cooked value and raw text (including quotes)
    StringLiteral(String, String, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    Var(SourceLocation),
    Let(SourceLocation),
    Const(SourceLocation),
    Function(SourceLocation),
    Return(SourceLocation),
    If(SourceLocation),
    Else(SourceLocation),
    While(SourceLocation),
    For(SourceLocation),
    Break(SourceLocation),
    Continue(SourceLocation),
    New(SourceLocation),
    This(SourceLocation),
    Null(SourceLocation),
    True(SourceLocation),
    False(SourceLocation),
    Typeof(SourceLocation),
    Void(SourceLocation),
    Delete(SourceLocation),
    Instanceof(SourceLocation),
    In(SourceLocation),
    Import(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),    // +
    Minus(SourceLocation),   // -
    Star(SourceLocation),    // *
    StarStar(SourceLocation), // **
    Slash(SourceLocation),   // /
    Percent(SourceLocation), // %

    // Comparison
    EqEq(SourceLocation),     // ==
    EqEqEq(SourceLocation),   // ===
    NotEq(SourceLocation),    // !=
    NotEqEq(SourceLocation),  // !==
    Lt(SourceLocation),       // <
    Le(SourceLocation),       // <=
    Gt(SourceLocation),       // >
    Ge(SourceLocation),       // >=

    // Logical
    AndAnd(SourceLocation),           // &&
    OrOr(SourceLocation),             // ||
    QuestionQuestion(SourceLocation), // ??
    Bang(SourceLocation),             // !

    // Bitwise
    Amp(SourceLocation),    // &
    Pipe(SourceLocation),   // |
    Caret(SourceLocation),  // ^
    Tilde(SourceLocation),  // ~
    LtLt(SourceLocation),   // <<
    GtGt(SourceLocation),   // >>
    GtGtGt(SourceLocation), // >>>

    // Assignment
    Eq(SourceLocation),                 // =
    PlusEq(SourceLocation),             // +=
    MinusEq(SourceLocation),            // -=
    StarEq(SourceLocation),             // *=
    StarStarEq(SourceLocation),         // **=
    SlashEq(SourceLocation),            // /=
    PercentEq(SourceLocation),          // %=
    LtLtEq(SourceLocation),             // <<=
    GtGtEq(SourceLocation),             // >>=
    GtGtGtEq(SourceLocation),           // >>>=
    AmpEq(SourceLocation),              // &=
    PipeEq(SourceLocation),             // |=
    CaretEq(SourceLocation),            // ^=
    AndAndEq(SourceLocation),           // &&=
    OrOrEq(SourceLocation),             // ||=
    QuestionQuestionEq(SourceLocation), // ??=

    // Increment/Decrement
    PlusPlus(SourceLocation),   // ++
    MinusMinus(SourceLocation), // --

    // Member access
    Dot(SourceLocation), // .

    // Ternary
    Question(SourceLocation), // ?
    Colon(SourceLocation),    // :

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    LBracket(SourceLocation),  // [
    RBracket(SourceLocation),  // ]
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::NumberLiteral(_, loc)
            | Token::StringLiteral(_, _, loc)
            | Token::Ident(_, loc)
            | Token::Var(loc)
            | Token::Let(loc)
            | Token::Const(loc)
            | Token::Function(loc)
            | Token::Return(loc)
            | Token::If(loc)
            | Token::Else(loc)
            | Token::While(loc)
            | Token::For(loc)
            | Token::Break(loc)
            | Token::Continue(loc)
            | Token::New(loc)
            | Token::This(loc)
            | Token::Null(loc)
            | Token::True(loc)
            | Token::False(loc)
            | Token::Typeof(loc)
            | Token::Void(loc)
            | Token::Delete(loc)
            | Token::Instanceof(loc)
            | Token::In(loc)
            | Token::Import(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::StarStar(loc)
            | Token::Slash(loc)
            | Token::Percent(loc)
            | Token::EqEq(loc)
            | Token::EqEqEq(loc)
            | Token::NotEq(loc)
            | Token::NotEqEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::AndAnd(loc)
            | Token::OrOr(loc)
            | Token::QuestionQuestion(loc)
            | Token::Bang(loc)
            | Token::Amp(loc)
            | Token::Pipe(loc)
            | Token::Caret(loc)
            | Token::Tilde(loc)
            | Token::LtLt(loc)
            | Token::GtGt(loc)
            | Token::GtGtGt(loc)
            | Token::Eq(loc)
            | Token::PlusEq(loc)
            | Token::MinusEq(loc)
            | Token::StarEq(loc)
            | Token::StarStarEq(loc)
            | Token::SlashEq(loc)
            | Token::PercentEq(loc)
            | Token::LtLtEq(loc)
            | Token::GtGtEq(loc)
            | Token::GtGtGtEq(loc)
            | Token::AmpEq(loc)
            | Token::PipeEq(loc)
            | Token::CaretEq(loc)
            | Token::AndAndEq(loc)
            | Token::OrOrEq(loc)
            | Token::QuestionQuestionEq(loc)
            | Token::PlusPlus(loc)
            | Token::MinusMinus(loc)
            | Token::Dot(loc)
            | Token::Question(loc)
            | Token::Colon(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    /// Source text of keyword and punctuator tokens
    pub(crate) fn text(&self) -> &'static str {
        match self {
            Token::Var(_) => "var",
            Token::Let(_) => "let",
            Token::Const(_) => "const",
            Token::Function(_) => "function",
            Token::Return(_) => "return",
            Token::If(_) => "if",
            Token::Else(_) => "else",
            Token::While(_) => "while",
            Token::For(_) => "for",
            Token::Break(_) => "break",
            Token::Continue(_) => "continue",
            Token::New(_) => "new",
            Token::This(_) => "this",
            Token::Null(_) => "null",
            Token::True(_) => "true",
            Token::False(_) => "false",
            Token::Typeof(_) => "typeof",
            Token::Void(_) => "void",
            Token::Delete(_) => "delete",
            Token::Instanceof(_) => "instanceof",
            Token::In(_) => "in",
            Token::Import(_) => "import",
            Token::Plus(_) => "+",
            Token::Minus(_) => "-",
            Token::Star(_) => "*",
            Token::StarStar(_) => "**",
            Token::Slash(_) => "/",
            Token::Percent(_) => "%",
            Token::EqEq(_) => "==",
            Token::EqEqEq(_) => "===",
            Token::NotEq(_) => "!=",
            Token::NotEqEq(_) => "!==",
            Token::Lt(_) => "<",
            Token::Le(_) => "<=",
            Token::Gt(_) => ">",
            Token::Ge(_) => ">=",
            Token::AndAnd(_) => "&&",
            Token::OrOr(_) => "||",
            Token::QuestionQuestion(_) => "??",
            Token::Bang(_) => "!",
            Token::Amp(_) => "&",
            Token::Pipe(_) => "|",
            Token::Caret(_) => "^",
            Token::Tilde(_) => "~",
            Token::LtLt(_) => "<<",
            Token::GtGt(_) => ">>",
            Token::GtGtGt(_) => ">>>",
            Token::Eq(_) => "=",
            Token::PlusEq(_) => "+=",
            Token::MinusEq(_) => "-=",
            Token::StarEq(_) => "*=",
            Token::StarStarEq(_) => "**=",
            Token::SlashEq(_) => "/=",
            Token::PercentEq(_) => "%=",
            Token::LtLtEq(_) => "<<=",
            Token::GtGtEq(_) => ">>=",
            Token::GtGtGtEq(_) => ">>>=",
            Token::AmpEq(_) => "&=",
            Token::PipeEq(_) => "|=",
            Token::CaretEq(_) => "^=",
            Token::AndAndEq(_) => "&&=",
            Token::OrOrEq(_) => "||=",
            Token::QuestionQuestionEq(_) => "??=",
            Token::PlusPlus(_) => "++",
            Token::MinusMinus(_) => "--",
            Token::Dot(_) => ".",
            Token::Question(_) => "?",
            Token::Colon(_) => ":",
            Token::LParen(_) => "(",
            Token::RParen(_) => ")",
            Token::LBrace(_) => "{",
            Token::RBrace(_) => "}",
            Token::LBracket(_) => "[",
            Token::RBracket(_) => "]",
            Token::Semicolon(_) => ";",
            Token::Comma(_) => ",",
            Token::NumberLiteral(..)
            | Token::StringLiteral(..)
            | Token::Ident(..)
            | Token::Eof(_) => "",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::NumberLiteral(raw, _) => write!(f, "number literal {}", raw),
            Token::StringLiteral(_, raw, _) => write!(f, "string literal {}", raw),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::Eof(_) => write!(f, "end of file"),
            other => write!(f, "'{}'", other.text()),
        }
    }
}

/// Lexer error type
#[derive(Debug)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Lexer for JavaScript source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '"' | '\'' => self.string_literal(ch, loc),

            '0'..='9' => self.number_literal(ch, loc),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal(ch, loc)
            }

            c if is_identifier_start(c) => Ok(self.identifier_or_keyword(ch, loc)),

            '+' => Ok(if self.eat('+') {
                Token::PlusPlus(loc)
            } else if self.eat('=') {
                Token::PlusEq(loc)
            } else {
                Token::Plus(loc)
            }),
            '-' => Ok(if self.eat('-') {
                Token::MinusMinus(loc)
            } else if self.eat('=') {
                Token::MinusEq(loc)
            } else {
                Token::Minus(loc)
            }),
            '*' => Ok(if self.eat('*') {
                if self.eat('=') {
                    Token::StarStarEq(loc)
                } else {
                    Token::StarStar(loc)
                }
            } else if self.eat('=') {
                Token::StarEq(loc)
            } else {
                Token::Star(loc)
            }),
            '/' => Ok(if self.eat('=') {
                Token::SlashEq(loc)
            } else {
                Token::Slash(loc)
            }),
            '%' => Ok(if self.eat('=') {
                Token::PercentEq(loc)
            } else {
                Token::Percent(loc)
            }),
            '=' => Ok(if self.eat('=') {
                if self.eat('=') {
                    Token::EqEqEq(loc)
                } else {
                    Token::EqEq(loc)
                }
            } else if self.peek() == Some('>') {
                return Err(LexError {
                    message: "Arrow functions are not supported".to_string(),
                    location: loc,
                });
            } else {
                Token::Eq(loc)
            }),
            '!' => Ok(if self.eat('=') {
                if self.eat('=') {
                    Token::NotEqEq(loc)
                } else {
                    Token::NotEq(loc)
                }
            } else {
                Token::Bang(loc)
            }),
            '<' => Ok(if self.eat('<') {
                if self.eat('=') {
                    Token::LtLtEq(loc)
                } else {
                    Token::LtLt(loc)
                }
            } else if self.eat('=') {
                Token::Le(loc)
            } else {
                Token::Lt(loc)
            }),
            '>' => Ok(if self.eat('>') {
                if self.eat('>') {
                    if self.eat('=') {
                        Token::GtGtGtEq(loc)
                    } else {
                        Token::GtGtGt(loc)
                    }
                } else if self.eat('=') {
                    Token::GtGtEq(loc)
                } else {
                    Token::GtGt(loc)
                }
            } else if self.eat('=') {
                Token::Ge(loc)
            } else {
                Token::Gt(loc)
            }),
            '&' => Ok(if self.eat('&') {
                if self.eat('=') {
                    Token::AndAndEq(loc)
                } else {
                    Token::AndAnd(loc)
                }
            } else if self.eat('=') {
                Token::AmpEq(loc)
            } else {
                Token::Amp(loc)
            }),
            '|' => Ok(if self.eat('|') {
                if self.eat('=') {
                    Token::OrOrEq(loc)
                } else {
                    Token::OrOr(loc)
                }
            } else if self.eat('=') {
                Token::PipeEq(loc)
            } else {
                Token::Pipe(loc)
            }),
            '^' => Ok(if self.eat('=') {
                Token::CaretEq(loc)
            } else {
                Token::Caret(loc)
            }),
            '?' => Ok(if self.eat('?') {
                if self.eat('=') {
                    Token::QuestionQuestionEq(loc)
                } else {
                    Token::QuestionQuestion(loc)
                }
            } else {
                Token::Question(loc)
            }),
            '~' => Ok(Token::Tilde(loc)),
            '.' => Ok(Token::Dot(loc)),
            ':' => Ok(Token::Colon(loc)),
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            '{' => Ok(Token::LBrace(loc)),
            '}' => Ok(Token::RBrace(loc)),
            '[' => Ok(Token::LBracket(loc)),
            ']' => Ok(Token::RBracket(loc)),
            ';' => Ok(Token::Semicolon(loc)),
            ',' => Ok(Token::Comma(loc)),

            '`' => Err(LexError {
                message: "Template literals are not supported".to_string(),
                location: loc,
            }),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse string literal; the opening quote is already consumed
    fn string_literal(&mut self, quote: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut value = String::new();
        let mut raw = String::new();
        raw.push(quote);

        while let Some(ch) = self.peek() {
            if ch == quote {
                self.advance();
                raw.push(quote);
                return Ok(Token::StringLiteral(value, raw, loc));
            }

            if ch == '\n' {
                break;
            }

            if ch == '\\' {
                self.advance();
                raw.push('\\');
                let escaped = self.advance().ok_or_else(|| LexError {
                    message: "Unexpected end of file in string literal".to_string(),
                    location: self.current_location(),
                })?;
                raw.push(escaped);

                let unescaped = match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'v' => '\u{b}',
                    '0' => '\0',
                    'x' => {
                        let code = self.hex_digits(2, &mut raw)?;
                        char::from_u32(code).unwrap_or('\u{fffd}')
                    }
                    'u' => {
                        let code = self.hex_digits(4, &mut raw)?;
                        char::from_u32(code).unwrap_or('\u{fffd}')
                    }
                    // Line continuation
                    '\n' => continue,
                    other => other,
                };
                value.push(unescaped);
            } else {
                value.push(ch);
                raw.push(ch);
                self.advance();
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    fn hex_digits(&mut self, count: usize, raw: &mut String) -> Result<u32, LexError> {
        let mut code = 0u32;
        for _ in 0..count {
            let digit = self
                .advance()
                .and_then(|c| {
                    raw.push(c);
                    c.to_digit(16)
                })
                .ok_or_else(|| LexError {
                    message: "Invalid hexadecimal escape sequence".to_string(),
                    location: self.current_location(),
                })?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    /// Parse numeric literal, keeping its raw text
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut raw = String::new();
        raw.push(first);

        let radix_prefix = first == '0'
            && matches!(self.peek(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'));
        if radix_prefix {
            raw.extend(self.advance());
            while let Some(ch) = self.peek() {
                if ch.is_ascii_alphanumeric() {
                    raw.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            return Ok(Token::NumberLiteral(raw, loc));
        }

        let mut seen_dot = first == '.';
        let mut seen_exp = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                raw.push(ch);
                self.advance();
            } else if ch == '.' && !seen_dot && !seen_exp {
                seen_dot = true;
                raw.push(ch);
                self.advance();
            } else if matches!(ch, 'e' | 'E') && !seen_exp {
                seen_exp = true;
                raw.push(ch);
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.peek() {
                    raw.push(sign);
                    self.advance();
                }
                if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    return Err(LexError {
                        message: format!("Invalid number literal: {}", raw),
                        location: loc,
                    });
                }
            } else {
                break;
            }
        }

        if self
            .peek()
            .is_some_and(is_identifier_start)
        {
            return Err(LexError {
                message: format!("Identifier directly after number literal: {}", raw),
                location: loc,
            });
        }

        Ok(Token::NumberLiteral(raw, loc))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if is_identifier_part(ch) {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "var" => Token::Var(loc),
            "let" => Token::Let(loc),
            "const" => Token::Const(loc),
            "function" => Token::Function(loc),
            "return" => Token::Return(loc),
            "if" => Token::If(loc),
            "else" => Token::Else(loc),
            "while" => Token::While(loc),
            "for" => Token::For(loc),
            "break" => Token::Break(loc),
            "continue" => Token::Continue(loc),
            "new" => Token::New(loc),
            "this" => Token::This(loc),
            "null" => Token::Null(loc),
            "true" => Token::True(loc),
            "false" => Token::False(loc),
            "typeof" => Token::Typeof(loc),
            "void" => Token::Void(loc),
            "delete" => Token::Delete(loc),
            "instanceof" => Token::Instanceof(loc),
            "in" => Token::In(loc),
            "import" => Token::Import(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    /// Consume `expected` if it is the next character
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// First character of an identifier: any letter, `_` or `$`
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Later identifier characters also admit digits and combining marks
pub fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '\u{200c}' || c == '\u{200d}'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("function main() { return 0; }");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Function(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "main"));
        assert!(matches!(tokens[2], Token::LParen(_)));
        assert!(matches!(tokens[3], Token::RParen(_)));
        assert!(matches!(tokens[4], Token::LBrace(_)));
        assert!(matches!(tokens[5], Token::Return(_)));
        assert!(matches!(tokens[6], Token::NumberLiteral(ref s, _) if s == "0"));
        assert!(matches!(tokens[7], Token::Semicolon(_)));
        assert!(matches!(tokens[8], Token::RBrace(_)));
        assert!(matches!(tokens[9], Token::Eof(_)));
    }

    #[test]
    fn test_operators() {
        let mut lexer = Lexer::new("++ -- += **= === !== >>> >>>= ?? &&= ** <<=");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::PlusPlus(_)));
        assert!(matches!(tokens[1], Token::MinusMinus(_)));
        assert!(matches!(tokens[2], Token::PlusEq(_)));
        assert!(matches!(tokens[3], Token::StarStarEq(_)));
        assert!(matches!(tokens[4], Token::EqEqEq(_)));
        assert!(matches!(tokens[5], Token::NotEqEq(_)));
        assert!(matches!(tokens[6], Token::GtGtGt(_)));
        assert!(matches!(tokens[7], Token::GtGtGtEq(_)));
        assert!(matches!(tokens[8], Token::QuestionQuestion(_)));
        assert!(matches!(tokens[9], Token::AndAndEq(_)));
        assert!(matches!(tokens[10], Token::StarStar(_)));
        assert!(matches!(tokens[11], Token::LtLtEq(_)));
    }

    #[test]
    fn test_comments() {
        let mut lexer = Lexer::new("let x; // comment\nlet y; /* block\ncomment */ let z;");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Let(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[2], Token::Semicolon(_)));
        assert!(matches!(tokens[3], Token::Let(_)));
        assert!(matches!(tokens[4], Token::Ident(ref s, _) if s == "y"));
        assert!(matches!(tokens[5], Token::Semicolon(_)));
        assert!(matches!(tokens[6], Token::Let(_)));
        assert!(matches!(tokens[7], Token::Ident(ref s, _) if s == "z"));
        assert_eq!(tokens[6].location(), SourceLocation::new(3, 12));
    }

    #[test]
    fn test_string_literal_keeps_raw_text() {
        let mut lexer = Lexer::new(r#"'it\'s' "a\nb""#);
        let tokens = lexer.tokenize().unwrap();

        match &tokens[0] {
            Token::StringLiteral(value, raw, _) => {
                assert_eq!(value, "it's");
                assert_eq!(raw, r"'it\'s'");
            }
            other => panic!("Expected string literal, got {other:?}"),
        }
        match &tokens[1] {
            Token::StringLiteral(value, raw, _) => {
                assert_eq!(value, "a\nb");
                assert_eq!(raw, r#""a\nb""#);
            }
            other => panic!("Expected string literal, got {other:?}"),
        }
    }

    #[test]
    fn test_number_literals() {
        let mut lexer = Lexer::new("1 2.5 .5 1e3 1.5E-2 0xFF 0b101");
        let tokens = lexer.tokenize().unwrap();
        let raws: Vec<_> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::NumberLiteral(raw, _) => Some(raw.as_str()),
                _ => None,
            })
            .collect();

        assert_eq!(raws, ["1", "2.5", ".5", "1e3", "1.5E-2", "0xFF", "0b101"]);
    }

    #[test]
    fn test_member_dot_is_not_a_number() {
        let mut lexer = Lexer::new("cat.a");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "cat"));
        assert!(matches!(tokens[1], Token::Dot(_)));
        assert!(matches!(tokens[2], Token::Ident(ref s, _) if s == "a"));
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let mut lexer = Lexer::new("'abc");
        let err = lexer.tokenize().unwrap_err();
        assert!(err.message.contains("Unterminated"));
    }

    #[test]
    fn test_unicode_identifiers() {
        let mut lexer = Lexer::new("var é = naïve + Δx2;");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Var(_)));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "é"));
        assert!(matches!(tokens[2], Token::Eq(_)));
        assert!(matches!(tokens[3], Token::Ident(ref s, _) if s == "naïve"));
        assert!(matches!(tokens[4], Token::Plus(_)));
        assert!(matches!(tokens[5], Token::Ident(ref s, _) if s == "Δx2"));
    }

    #[test]
    fn test_symbols_are_still_unexpected() {
        let mut lexer = Lexer::new("a € b");
        let err = lexer.tokenize().unwrap_err();
        assert!(err.message.contains("Unexpected character"));

        let mut lexer = Lexer::new("1é");
        let err = lexer.tokenize().unwrap_err();
        assert!(err.message.contains("Identifier directly after number"));
    }
}
