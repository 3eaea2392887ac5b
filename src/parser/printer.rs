//! Source printer
//!
//! Turns an AST back into JavaScript text. Parentheses are derived from
//! operator precedence, so a tree built by hand (or rewritten) prints as
//! source that parses back to the same tree.
//!
//! # Layout
//!
//! - One statement per line, blocks indented by two spaces
//! - Literals keep their original raw text
//! - Import sources are printed with single quotes

use crate::parser::ast::*;
use crate::parser::lexer::{is_identifier_part, is_identifier_start};

/// Binding power of each expression form, loosest first
mod prec {
    pub const SEQUENCE: u8 = 1;
    pub const ASSIGN: u8 = 2;
    pub const CONDITIONAL: u8 = 3;
    pub const OR: u8 = 4;
    pub const AND: u8 = 5;
    pub const BIT_OR: u8 = 6;
    pub const BIT_XOR: u8 = 7;
    pub const BIT_AND: u8 = 8;
    pub const EQUALITY: u8 = 9;
    pub const RELATIONAL: u8 = 10;
    pub const SHIFT: u8 = 11;
    pub const ADDITIVE: u8 = 12;
    pub const MULTIPLICATIVE: u8 = 13;
    pub const EXPONENT: u8 = 14;
    pub const UNARY: u8 = 15;
    pub const POSTFIX: u8 = 16;
    pub const CALL: u8 = 17;
    pub const MEMBER: u8 = 18;
    pub const PRIMARY: u8 = 19;
}

fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::BitOr => prec::BIT_OR,
        BinaryOp::BitXor => prec::BIT_XOR,
        BinaryOp::BitAnd => prec::BIT_AND,
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::StrictEq | BinaryOp::StrictNe => prec::EQUALITY,
        BinaryOp::Lt
        | BinaryOp::Le
        | BinaryOp::Gt
        | BinaryOp::Ge
        | BinaryOp::In
        | BinaryOp::InstanceOf => prec::RELATIONAL,
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => prec::SHIFT,
        BinaryOp::Add | BinaryOp::Sub => prec::ADDITIVE,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => prec::MULTIPLICATIVE,
        BinaryOp::Exp => prec::EXPONENT,
    }
}

fn logical_precedence(op: LogicalOp) -> u8 {
    match op {
        LogicalOp::Or | LogicalOp::Nullish => prec::OR,
        LogicalOp::And => prec::AND,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Sequence { .. } => prec::SEQUENCE,
        Expr::Assign { .. } => prec::ASSIGN,
        Expr::Conditional { .. } => prec::CONDITIONAL,
        Expr::Logical { op, .. } => logical_precedence(*op),
        Expr::Binary { op, .. } => binary_precedence(*op),
        Expr::Unary { .. } => prec::UNARY,
        Expr::Update { prefix: true, .. } => prec::UNARY,
        Expr::Update { prefix: false, .. } => prec::POSTFIX,
        Expr::Call { .. } => prec::CALL,
        Expr::Member { .. } | Expr::New { .. } => prec::MEMBER,
        Expr::Number { .. }
        | Expr::Str { .. }
        | Expr::Bool(..)
        | Expr::Null(_)
        | Expr::This(_)
        | Expr::Ident(..)
        | Expr::Array { .. }
        | Expr::Object { .. }
        | Expr::Function { .. } => prec::PRIMARY,
    }
}

/// `??` cannot be mixed with `&&` / `||` without parentheses
fn mixes_nullish(parent: LogicalOp, child: &Expr) -> bool {
    match child {
        Expr::Logical { op, .. } => (parent == LogicalOp::Nullish) != (*op == LogicalOp::Nullish),
        _ => false,
    }
}

/// True if a member chain contains a call, which would bind to `new`
fn chain_has_call(expr: &Expr) -> bool {
    match expr {
        Expr::Call { .. } => true,
        Expr::Member { object, .. } => chain_has_call(object),
        _ => false,
    }
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => {}
        _ => return false,
    }
    chars.all(is_identifier_part)
}

/// Quote `value` as a single-quoted string literal
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn property_key(key: &str) -> String {
    let numeric = !key.is_empty() && key.chars().all(|c| c.is_ascii_digit() || c == '.');
    if is_identifier_name(key) || numeric {
        key.to_string()
    } else {
        quote_string(key)
    }
}

/// Print a whole program; the result ends with a newline unless empty
pub fn print_program(program: &Program) -> String {
    let mut printer = Printer::new();
    for stmt in &program.body {
        printer.statement(stmt);
    }
    printer.out
}

/// Print a single expression
pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::new();
    printer.expr(expr, prec::SEQUENCE);
    printer.out
}

struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn new() -> Self {
        Printer {
            out: String::new(),
            indent: 0,
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn statement(&mut self, stmt: &Stmt) {
        self.write_indent();
        self.statement_inline(stmt);
        self.out.push('\n');
    }

    /// Print a statement at the current position, without leading indent or
    /// trailing newline
    fn statement_inline(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Import {
                specifiers, source, ..
            } => self.import(specifiers, source),
            Stmt::VarDecl {
                kind, declarators, ..
            } => {
                self.var_declaration(*kind, declarators);
                self.out.push(';');
            }
            Stmt::FunctionDecl {
                name, params, body, ..
            } => self.function(Some(name), params, body),
            Stmt::Return { value, .. } => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.expr(value, prec::SEQUENCE);
                }
                self.out.push(';');
            }
            Stmt::If {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.out.push_str("if (");
                self.expr(test, prec::SEQUENCE);
                self.out.push_str(") ");
                self.statement_inline(consequent);
                if let Some(alternate) = alternate {
                    self.out.push_str(" else ");
                    self.statement_inline(alternate);
                }
            }
            Stmt::While { test, body, .. } => {
                self.out.push_str("while (");
                self.expr(test, prec::SEQUENCE);
                self.out.push_str(") ");
                self.statement_inline(body);
            }
            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => {
                self.out.push_str("for (");
                match init {
                    Some(ForInit::Var { kind, declarators }) => {
                        self.var_declaration(*kind, declarators)
                    }
                    Some(ForInit::Expr(expr)) => self.expr(expr, prec::SEQUENCE),
                    None => {}
                }
                self.out.push(';');
                if let Some(test) = test {
                    self.out.push(' ');
                    self.expr(test, prec::SEQUENCE);
                }
                self.out.push(';');
                if let Some(update) = update {
                    self.out.push(' ');
                    self.expr(update, prec::SEQUENCE);
                }
                self.out.push_str(") ");
                self.statement_inline(body);
            }
            Stmt::Block { body, .. } => self.block(body),
            Stmt::Break(_) => self.out.push_str("break;"),
            Stmt::Continue(_) => self.out.push_str("continue;"),
            Stmt::Empty(_) => self.out.push(';'),
            Stmt::Expression { expr, .. } => {
                let mut inner = Printer::new();
                inner.indent = self.indent;
                inner.expr(expr, prec::SEQUENCE);
                let text = inner.out;
                let ambiguous = text.starts_with('{')
                    || text.starts_with("function ")
                    || text.starts_with("function(");
                if ambiguous {
                    self.out.push('(');
                    self.out.push_str(&text);
                    self.out.push(')');
                } else {
                    self.out.push_str(&text);
                }
                self.out.push(';');
            }
        }
    }

    fn block(&mut self, body: &[Stmt]) {
        if body.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push_str("{\n");
        self.indent += 1;
        for stmt in body {
            self.statement(stmt);
        }
        self.indent -= 1;
        self.write_indent();
        self.out.push('}');
    }

    fn import(&mut self, specifiers: &[ImportSpecifier], source: &str) {
        self.out.push_str("import ");
        if specifiers.is_empty() {
            self.out.push_str(&quote_string(source));
            self.out.push(';');
            return;
        }

        let mut parts = Vec::new();
        let mut named = Vec::new();
        for specifier in specifiers {
            match specifier {
                ImportSpecifier::Default(local) => parts.push(local.clone()),
                ImportSpecifier::Namespace(local) => parts.push(format!("* as {}", local)),
                ImportSpecifier::Named { imported, local } if imported == local => {
                    named.push(local.clone())
                }
                ImportSpecifier::Named { imported, local } => {
                    named.push(format!("{} as {}", imported, local))
                }
            }
        }
        if !named.is_empty() {
            parts.push(format!("{{ {} }}", named.join(", ")));
        }

        self.out.push_str(&parts.join(", "));
        self.out.push_str(" from ");
        self.out.push_str(&quote_string(source));
        self.out.push(';');
    }

    fn var_declaration(&mut self, kind: VarKind, declarators: &[Declarator]) {
        self.out.push_str(kind.as_str());
        self.out.push(' ');
        for (i, declarator) in declarators.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.pattern(&declarator.target);
            if let Some(init) = &declarator.init {
                self.out.push_str(" = ");
                self.expr(init, prec::ASSIGN);
            }
        }
    }

    fn function(&mut self, name: Option<&String>, params: &[String], body: &[Stmt]) {
        self.out.push_str("function");
        if let Some(name) = name {
            self.out.push(' ');
            self.out.push_str(name);
        } else {
            self.out.push(' ');
        }
        self.out.push('(');
        self.out.push_str(&params.join(", "));
        self.out.push_str(") ");
        self.block(body);
    }

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Ident(name, _) => self.out.push_str(name),
            Pattern::Member(expr) => self.expr(expr, prec::CALL),
            Pattern::Array { elements, .. } => {
                self.out.push('[');
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    if let Some(element) = element {
                        self.pattern(element);
                    }
                }
                // A trailing hole needs its own comma
                if matches!(elements.last(), Some(None)) {
                    self.out.push(',');
                }
                self.out.push(']');
            }
            Pattern::Object { properties, .. } => {
                if properties.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push_str("{ ");
                for (i, (key, value)) in properties.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    match value {
                        Pattern::Ident(name, _) if name == key => self.out.push_str(name),
                        _ => {
                            self.out.push_str(&property_key(key));
                            self.out.push_str(": ");
                            self.pattern(value);
                        }
                    }
                }
                self.out.push_str(" }");
            }
        }
    }

    /// Print `expr`, parenthesized if it binds looser than `min`
    fn expr(&mut self, expr: &Expr, min: u8) {
        let wrap = precedence(expr) < min;
        if wrap {
            self.out.push('(');
        }
        self.expr_unwrapped(expr);
        if wrap {
            self.out.push(')');
        }
    }

    fn expr_unwrapped(&mut self, expr: &Expr) {
        match expr {
            Expr::Number { raw, .. } => self.out.push_str(raw),
            Expr::Str { raw, .. } => self.out.push_str(raw),
            Expr::Bool(value, _) => self.out.push_str(if *value { "true" } else { "false" }),
            Expr::Null(_) => self.out.push_str("null"),
            Expr::This(_) => self.out.push_str("this"),
            Expr::Ident(name, _) => self.out.push_str(name),
            Expr::Array { elements, .. } => {
                self.out.push('[');
                self.list(elements);
                self.out.push(']');
            }
            Expr::Object { properties, .. } => {
                if properties.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push_str("{ ");
                for (i, property) in properties.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    let shorthand = property.shorthand
                        && matches!(&property.value, Expr::Ident(name, _) if *name == property.key);
                    if shorthand {
                        self.out.push_str(&property.key);
                    } else {
                        self.out.push_str(&property_key(&property.key));
                        self.out.push_str(": ");
                        self.expr(&property.value, prec::ASSIGN);
                    }
                }
                self.out.push_str(" }");
            }
            Expr::Function {
                name, params, body, ..
            } => self.function(name.as_ref(), params, body),
            Expr::Member {
                object, property, ..
            } => {
                // `1.x` would lex as a number
                let bare_integer = matches!(
                    &**object,
                    Expr::Number { raw, .. } if raw.chars().all(|c| c.is_ascii_digit())
                );
                if bare_integer {
                    self.out.push('(');
                    self.expr(object, prec::CALL);
                    self.out.push(')');
                } else {
                    self.expr(object, prec::CALL);
                }
                match property {
                    MemberProperty::Named(name) => {
                        self.out.push('.');
                        self.out.push_str(name);
                    }
                    MemberProperty::Computed(key) => {
                        self.out.push('[');
                        self.expr(key, prec::SEQUENCE);
                        self.out.push(']');
                    }
                }
            }
            Expr::Call { callee, args, .. } => {
                self.expr(callee, prec::CALL);
                self.out.push('(');
                self.list(args);
                self.out.push(')');
            }
            Expr::New { callee, args, .. } => {
                self.out.push_str("new ");
                if chain_has_call(callee) {
                    self.out.push('(');
                    self.expr(callee, prec::SEQUENCE);
                    self.out.push(')');
                } else {
                    self.expr(callee, prec::MEMBER);
                }
                self.out.push('(');
                self.list(args);
                self.out.push(')');
            }
            Expr::Unary { op, operand, .. } => {
                self.out.push_str(op.as_str());
                let mut inner = Printer::new();
                inner.indent = self.indent;
                inner.expr(operand, prec::UNARY);
                // `- -a`, `+ +a`, `- --a`, `typeof a`
                let needs_space = op.is_keyword()
                    || (*op == UnaryOp::Neg && inner.out.starts_with('-'))
                    || (*op == UnaryOp::Plus && inner.out.starts_with('+'));
                if needs_space {
                    self.out.push(' ');
                }
                self.out.push_str(&inner.out);
            }
            Expr::Update {
                op, prefix, target, ..
            } => {
                if *prefix {
                    self.out.push_str(op.as_str());
                    self.expr(target, prec::POSTFIX);
                } else {
                    self.expr(target, prec::CALL);
                    self.out.push_str(op.as_str());
                }
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                let p = binary_precedence(*op);
                if *op == BinaryOp::Exp {
                    // Right-associative, and the base may not be a bare unary
                    self.expr(left, prec::POSTFIX);
                    self.out.push_str(" ** ");
                    self.expr(right, p);
                } else {
                    self.expr(left, p);
                    self.out.push(' ');
                    self.out.push_str(op.as_str());
                    self.out.push(' ');
                    self.expr(right, p + 1);
                }
            }
            Expr::Logical {
                op, left, right, ..
            } => {
                let p = logical_precedence(*op);
                let left_min = if mixes_nullish(*op, left) { prec::PRIMARY } else { p };
                let right_min = if mixes_nullish(*op, right) {
                    prec::PRIMARY
                } else {
                    p + 1
                };
                self.expr(left, left_min);
                self.out.push(' ');
                self.out.push_str(op.as_str());
                self.out.push(' ');
                self.expr(right, right_min);
            }
            Expr::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.expr(test, prec::OR);
                self.out.push_str(" ? ");
                self.expr(consequent, prec::ASSIGN);
                self.out.push_str(" : ");
                self.expr(alternate, prec::ASSIGN);
            }
            Expr::Assign {
                op, target, value, ..
            } => {
                self.pattern(target);
                self.out.push(' ');
                self.out.push_str(op.as_str());
                self.out.push(' ');
                self.expr(value, prec::ASSIGN);
            }
            Expr::Sequence { exprs, .. } => {
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(expr, prec::ASSIGN);
                }
            }
        }
    }

    fn list(&mut self, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(item, prec::ASSIGN);
        }
    }
}
