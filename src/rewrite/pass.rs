//! The operator rewrite visitor
//!
//! Traversal is post-order: an operator node is considered only after its
//! operands have been rewritten. Generated calls are therefore never
//! revisited, and the literal check always sees the untouched literal
//! subtrees.

use crate::operators::RuntimeMethod;
use crate::parser::ast::{
    BinaryOp, Expr, MemberProperty, Pattern, SourceLocation, Stmt, UnaryOp, UpdateOp,
};
use crate::parser::visit::{walk_expr, walk_function, VisitMut};
use crate::rewrite::config::RewriteConfig;
use crate::rewrite::imports::hoist_declarations;
use crate::rewrite::names::NameGenerator;
use tracing::{debug, trace};

/// Runtime method for a two-operand operator; `None` if it is never rewritten
pub fn binary_method(op: BinaryOp) -> Option<RuntimeMethod> {
    let method = match op {
        BinaryOp::Add => RuntimeMethod::Add,
        BinaryOp::Sub => RuntimeMethod::Subtract,
        BinaryOp::Mul => RuntimeMethod::Multiply,
        BinaryOp::Div => RuntimeMethod::Divide,
        BinaryOp::Mod => RuntimeMethod::Modulo,
        BinaryOp::Exp => RuntimeMethod::Power,
        BinaryOp::Lt => RuntimeMethod::LessThan,
        BinaryOp::Le => RuntimeMethod::LessOrEqual,
        BinaryOp::Gt => RuntimeMethod::GreaterThan,
        BinaryOp::Ge => RuntimeMethod::GreaterOrEqual,
        BinaryOp::Eq => RuntimeMethod::LooseEqual,
        BinaryOp::Ne => RuntimeMethod::LooseNotEqual,
        BinaryOp::StrictEq => RuntimeMethod::StrictEqual,
        BinaryOp::StrictNe => RuntimeMethod::StrictNotEqual,
        BinaryOp::BitAnd => RuntimeMethod::LogicalAnd,
        BinaryOp::BitOr => RuntimeMethod::LogicalOr,
        BinaryOp::BitXor => RuntimeMethod::LogicalXor,
        BinaryOp::Shl => RuntimeMethod::LeftShift,
        BinaryOp::Shr => RuntimeMethod::RightShift,
        BinaryOp::UShr | BinaryOp::In | BinaryOp::InstanceOf => return None,
    };
    Some(method)
}

pub fn unary_method(op: UnaryOp) -> Option<RuntimeMethod> {
    match op {
        UnaryOp::Neg => Some(RuntimeMethod::Negate),
        UnaryOp::Plus => Some(RuntimeMethod::Positive),
        UnaryOp::Not => Some(RuntimeMethod::Not),
        UnaryOp::BitNot => Some(RuntimeMethod::LogicalNot),
        UnaryOp::Typeof | UnaryOp::Void | UnaryOp::Delete => None,
    }
}

pub fn update_method(op: UpdateOp) -> RuntimeMethod {
    match op {
        UpdateOp::Increment => RuntimeMethod::Increment,
        UpdateOp::Decrement => RuntimeMethod::Decrement,
    }
}

/// Numeric literals joined only by rewritable two-operand operators
pub fn is_literal_only(expr: &Expr) -> bool {
    match expr {
        Expr::Number { .. } => true,
        Expr::Binary {
            op, left, right, ..
        } => binary_method(*op).is_some() && is_literal_only(left) && is_literal_only(right),
        _ => false,
    }
}

fn target_pattern(target: Expr) -> Pattern {
    match target {
        Expr::Ident(name, location) => Pattern::Ident(name, location),
        member => Pattern::Member(Box::new(member)),
    }
}

/// What the pass leaves behind once the tree has been walked
pub(crate) struct Finished {
    pub rewrites: usize,
    /// Hidden names declared at the top level of the unit
    pub top_level: Vec<String>,
    /// Every hidden name, in generation order
    pub hidden_names: Vec<String>,
}

pub(crate) struct Rewriter<'a> {
    config: &'a RewriteConfig,
    names: NameGenerator,
    /// Hidden names per enclosing function; the first entry is the unit itself
    scopes: Vec<Vec<String>>,
    hidden_names: Vec<String>,
    rewrites: usize,
}

impl VisitMut for Rewriter<'_> {
    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);

        let Some(method) = self.plan(expr) else {
            return;
        };
        let location = expr.location();
        let original = std::mem::replace(expr, Expr::Null(location));
        *expr = self.rewrite(method, original);
        self.rewrites += 1;
        debug!(
            line = location.line,
            column = location.column,
            method = method.name(),
            "rewrote operator"
        );
    }

    fn visit_function(&mut self, name: Option<&str>, params: &mut [String], body: &mut Vec<Stmt>) {
        self.scopes.push(Vec::new());
        walk_function(self, name, params, body);
        let hidden = self.scopes.pop().unwrap_or_default();
        hoist_declarations(body, hidden);
    }
}

impl<'a> Rewriter<'a> {
    pub(crate) fn new(config: &'a RewriteConfig, mut names: NameGenerator) -> Self {
        names.reserve(&config.runtime_binding);
        Rewriter {
            config,
            names,
            scopes: vec![Vec::new()],
            hidden_names: Vec::new(),
            rewrites: 0,
        }
    }

    pub(crate) fn finish(mut self) -> Finished {
        Finished {
            rewrites: self.rewrites,
            top_level: self.scopes.pop().unwrap_or_default(),
            hidden_names: self.hidden_names,
        }
    }

    /// Decide whether `expr` gets rewritten, and into which runtime call
    fn plan(&self, expr: &Expr) -> Option<RuntimeMethod> {
        let location = expr.location();
        match expr {
            Expr::Binary { op, .. } => {
                let method = binary_method(*op)?;
                if is_literal_only(expr) {
                    trace!(line = location.line, "literal-only arithmetic left native");
                    return None;
                }
                Some(method)
            }
            Expr::Assign { op, target, .. } => {
                let method = binary_method(op.binary()?)?;
                if !target.is_simple() {
                    trace!(line = location.line, "destructuring target left alone");
                    return None;
                }
                Some(method)
            }
            Expr::Unary { op, operand, .. } => {
                let method = unary_method(*op)?;
                if !operand.is_simple_target() {
                    trace!(line = location.line, "unary operand is not a name or property");
                    return None;
                }
                Some(method)
            }
            Expr::Update { op, target, .. } => {
                target.is_simple_target().then_some(update_method(*op))
            }
            _ => None,
        }
    }

    fn rewrite(&mut self, method: RuntimeMethod, expr: Expr) -> Expr {
        match expr {
            Expr::Binary {
                left,
                right,
                location,
                ..
            } => self.runtime_call(method, vec![*left, *right], location),
            Expr::Assign {
                op,
                target,
                value,
                location,
            } => match target.to_expr() {
                Some(current) => {
                    let call = self.runtime_call(method, vec![current, *value], location);
                    Expr::assign(target, call, location)
                }
                None => Expr::Assign {
                    op,
                    target,
                    value,
                    location,
                },
            },
            Expr::Unary {
                operand, location, ..
            } => self.runtime_call(method, vec![*operand], location),
            Expr::Update {
                prefix: true,
                target,
                location,
                ..
            } => {
                let call = self.runtime_call(method, vec![(*target).clone()], location);
                Expr::assign(target_pattern(*target), call, location)
            }
            Expr::Update {
                prefix: false,
                target,
                location,
                ..
            } => self.postfix(method, *target, location),
            other => other,
        }
    }

    /// `(_temp = t, t = Operator.op(_temp), _temp)`.
    ///
    /// A property target whose object or computed key could have side
    /// effects has those parts captured first, so `t` is evaluated once.
    fn postfix(&mut self, method: RuntimeMethod, target: Expr, location: SourceLocation) -> Expr {
        let mut steps = Vec::new();

        let target = match target {
            Expr::Member {
                object,
                property,
                location: member_location,
            } => {
                let object = match *object {
                    plain @ (Expr::Ident(..) | Expr::This(_)) => plain,
                    other => self.capture("obj", other, &mut steps),
                };
                let property = match property {
                    MemberProperty::Computed(key)
                        if !matches!(*key, Expr::Number { .. } | Expr::Str { .. }) =>
                    {
                        MemberProperty::Computed(Box::new(self.capture("key", *key, &mut steps)))
                    }
                    other => other,
                };
                Expr::Member {
                    object: Box::new(object),
                    property,
                    location: member_location,
                }
            }
            other => other,
        };

        let temp = self.hidden("temp");
        let old_value = Expr::ident(temp.as_str(), location);
        steps.push(Expr::assign(
            Pattern::Ident(temp.clone(), location),
            target.clone(),
            location,
        ));
        let call = self.runtime_call(method, vec![old_value.clone()], location);
        steps.push(Expr::assign(target_pattern(target), call, location));
        steps.push(old_value);

        Expr::Sequence {
            exprs: steps,
            location,
        }
    }

    /// Evaluate `value` into a new hidden variable; returns a read of it
    fn capture(&mut self, base: &str, value: Expr, steps: &mut Vec<Expr>) -> Expr {
        let location = value.location();
        let name = self.hidden(base);
        steps.push(Expr::assign(
            Pattern::Ident(name.clone(), location),
            value,
            location,
        ));
        Expr::ident(name, location)
    }

    fn hidden(&mut self, base: &str) -> String {
        let name = self.names.fresh(base);
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(name.clone());
        }
        self.hidden_names.push(name.clone());
        name
    }

    fn runtime_call(&self, method: RuntimeMethod, args: Vec<Expr>, location: SourceLocation) -> Expr {
        let callee = Expr::member(
            Expr::ident(self.config.runtime_binding.as_str(), location),
            method.name(),
            location,
        );
        Expr::call(callee, args, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_program;

    fn expr(source: &str) -> Expr {
        let mut program = parse_program(source).unwrap();
        match program.body.remove(0) {
            Stmt::Expression { expr, .. } => expr,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_only_detection() {
        assert!(is_literal_only(&expr("1 + 2 * 3;")));
        assert!(is_literal_only(&expr("(1 << 2) ** 0x10;")));
        assert!(!is_literal_only(&expr("1 + a;")));
        assert!(!is_literal_only(&expr("1 + -2;")));
        assert!(!is_literal_only(&expr("1 >>> 2;")));
        assert!(!is_literal_only(&expr("'a' + 1;")));
    }

    #[test]
    fn test_method_tables() {
        assert_eq!(binary_method(BinaryOp::Ne), Some(RuntimeMethod::LooseNotEqual));
        assert_eq!(binary_method(BinaryOp::BitXor), Some(RuntimeMethod::LogicalXor));
        assert_eq!(binary_method(BinaryOp::In), None);
        assert_eq!(unary_method(UnaryOp::BitNot), Some(RuntimeMethod::LogicalNot));
        assert_eq!(unary_method(UnaryOp::Typeof), None);
    }
}
