//! Mutable AST traversal.
//!
//! A single [`VisitMut`] trait is provided. Every method has a default that
//! forwards to the matching `walk_*` function, which recurses into the
//! children. Implementors override only the hooks they care about and call
//! the `walk_*` function themselves to continue the descent, before or after
//! their own work, which decides between pre-order and post-order.
//!
//! ```rust,ignore
//! struct CountIdents(usize);
//!
//! impl VisitMut for CountIdents {
//!     fn visit_expr(&mut self, expr: &mut Expr) {
//!         if matches!(expr, Expr::Ident(..)) {
//!             self.0 += 1;
//!         }
//!         walk_expr(self, expr);
//!     }
//! }
//! ```

use crate::parser::ast::*;

/// Mutable AST visitor.
pub trait VisitMut {
    fn visit_program(&mut self, program: &mut Program) {
        walk_program(self, program);
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);
    }

    fn visit_pattern(&mut self, pattern: &mut Pattern) {
        walk_pattern(self, pattern);
    }

    /// Body of a function declaration or expression.
    fn visit_function(&mut self, name: Option<&str>, params: &mut [String], body: &mut Vec<Stmt>) {
        walk_function(self, name, params, body);
    }

    /// Binding name introduced by a declaration, parameter or import.
    fn visit_binding(&mut self, _name: &str) {}
}

pub fn walk_program<V: VisitMut + ?Sized>(visitor: &mut V, program: &mut Program) {
    for stmt in &mut program.body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_function<V: VisitMut + ?Sized>(
    visitor: &mut V,
    name: Option<&str>,
    params: &mut [String],
    body: &mut Vec<Stmt>,
) {
    if let Some(name) = name {
        visitor.visit_binding(name);
    }
    for param in params.iter() {
        visitor.visit_binding(param);
    }
    for stmt in body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: VisitMut + ?Sized>(visitor: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Import { specifiers, .. } => {
            for specifier in specifiers.iter() {
                visitor.visit_binding(specifier.local());
            }
        }
        Stmt::VarDecl { declarators, .. } => walk_declarators(visitor, declarators),
        Stmt::FunctionDecl {
            name, params, body, ..
        } => {
            visitor.visit_binding(name);
            visitor.visit_function(Some(name.as_str()), params, body);
        }
        Stmt::Return { value, .. } => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::If {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(consequent);
            if let Some(alternate) = alternate {
                visitor.visit_stmt(alternate);
            }
        }
        Stmt::While { test, body, .. } => {
            visitor.visit_expr(test);
            visitor.visit_stmt(body);
        }
        Stmt::For {
            init,
            test,
            update,
            body,
            ..
        } => {
            match init {
                Some(ForInit::Var { declarators, .. }) => walk_declarators(visitor, declarators),
                Some(ForInit::Expr(expr)) => visitor.visit_expr(expr),
                None => {}
            }
            if let Some(test) = test {
                visitor.visit_expr(test);
            }
            if let Some(update) = update {
                visitor.visit_expr(update);
            }
            visitor.visit_stmt(body);
        }
        Stmt::Block { body, .. } => {
            for stmt in body {
                visitor.visit_stmt(stmt);
            }
        }
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty(_) => {}
        Stmt::Expression { expr, .. } => visitor.visit_expr(expr),
    }
}

fn walk_declarators<V: VisitMut + ?Sized>(visitor: &mut V, declarators: &mut [Declarator]) {
    for declarator in declarators {
        visitor.visit_pattern(&mut declarator.target);
        if let Some(init) = &mut declarator.init {
            visitor.visit_expr(init);
        }
    }
}

pub fn walk_pattern<V: VisitMut + ?Sized>(visitor: &mut V, pattern: &mut Pattern) {
    match pattern {
        Pattern::Ident(name, _) => visitor.visit_binding(name),
        Pattern::Member(expr) => visitor.visit_expr(expr),
        Pattern::Array { elements, .. } => {
            for element in elements.iter_mut().flatten() {
                visitor.visit_pattern(element);
            }
        }
        Pattern::Object { properties, .. } => {
            for (_, value) in properties {
                visitor.visit_pattern(value);
            }
        }
    }
}

pub fn walk_expr<V: VisitMut + ?Sized>(visitor: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Number { .. }
        | Expr::Str { .. }
        | Expr::Bool(..)
        | Expr::Null(_)
        | Expr::This(_)
        | Expr::Ident(..) => {}
        Expr::Array { elements, .. } => {
            for element in elements {
                visitor.visit_expr(element);
            }
        }
        Expr::Object { properties, .. } => {
            for property in properties {
                visitor.visit_expr(&mut property.value);
            }
        }
        Expr::Function {
            name, params, body, ..
        } => visitor.visit_function(name.as_deref(), params, body),
        Expr::Member {
            object, property, ..
        } => {
            visitor.visit_expr(object);
            if let MemberProperty::Computed(key) = property {
                visitor.visit_expr(key);
            }
        }
        Expr::Call { callee, args, .. } | Expr::New { callee, args, .. } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Unary { operand, .. } => visitor.visit_expr(operand),
        Expr::Update { target, .. } => visitor.visit_expr(target),
        Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expr(test);
            visitor.visit_expr(consequent);
            visitor.visit_expr(alternate);
        }
        Expr::Assign { target, value, .. } => {
            visitor.visit_pattern(target);
            visitor.visit_expr(value);
        }
        Expr::Sequence { exprs, .. } => {
            for expr in exprs {
                visitor.visit_expr(expr);
            }
        }
    }
}
