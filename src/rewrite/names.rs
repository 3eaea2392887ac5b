//! Hidden variable names
//!
//! Every identifier in the unit is collected up front, so a generated name
//! never shadows or captures a user binding no matter which scope it is
//! hoisted into.

use crate::parser::ast::{Expr, Program};
use crate::parser::visit::{walk_expr, VisitMut};
use rustc_hash::FxHashSet;

#[derive(Debug, Default)]
pub(crate) struct NameGenerator {
    used: FxHashSet<String>,
}

struct Collector<'a>(&'a mut FxHashSet<String>);

impl VisitMut for Collector<'_> {
    fn visit_expr(&mut self, expr: &mut Expr) {
        if let Expr::Ident(name, _) = expr {
            self.0.insert(name.clone());
        }
        walk_expr(self, expr);
    }

    fn visit_binding(&mut self, name: &str) {
        self.0.insert(name.to_string());
    }
}

impl NameGenerator {
    pub(crate) fn for_program(program: &mut Program) -> Self {
        let mut used = FxHashSet::default();
        Collector(&mut used).visit_program(program);
        NameGenerator { used }
    }

    /// Reserve a name that is not used anywhere in the unit yet
    pub(crate) fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }

    /// `_base`, then `_base2`, `_base3`, ...
    pub(crate) fn fresh(&mut self, base: &str) -> String {
        let mut candidate = format!("_{}", base);
        let mut n = 1;
        while self.used.contains(&candidate) {
            n += 1;
            candidate = format!("_{}{}", base, n);
        }
        self.used.insert(candidate.clone());
        candidate
    }
}
