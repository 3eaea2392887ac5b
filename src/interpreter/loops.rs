//! Loop statement execution (`while`, `for`).
//!
//! `break` and `continue` are reported through `LoopBodyResult` so the loop
//! drivers can react without inspecting `control_flow` directly. `return`
//! inside a loop body is reported as `LoopBodyResult::Exit`, which unwinds
//! the loop and leaves the signal for the enclosing function.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::EvalError;
use crate::interpreter::scope::Scope;
use crate::parser::ast::{Expr, ForInit, Stmt};
use crate::runtime::coerce::truthy;

/// How a loop body ended
pub(crate) enum LoopBodyResult {
    /// Ran to completion or hit `continue`
    Continue,
    Break,
    /// `return`; the loop unwinds and the caller sees `self.control_flow`
    Exit,
}

impl Interpreter {
    pub(crate) fn execute_loop_body(&mut self, body: &Stmt) -> Result<LoopBodyResult, EvalError> {
        self.execute_statement(body)?;
        Ok(match self.control_flow {
            ControlFlow::Normal => LoopBodyResult::Continue,
            ControlFlow::Continue => {
                self.control_flow = ControlFlow::Normal;
                LoopBodyResult::Continue
            }
            ControlFlow::Break => {
                self.control_flow = ControlFlow::Normal;
                LoopBodyResult::Break
            }
            ControlFlow::Return => LoopBodyResult::Exit,
        })
    }

    pub(crate) fn execute_while(&mut self, test: &Expr, body: &Stmt) -> Result<(), EvalError> {
        loop {
            let condition = self.evaluate_expr(test)?;
            if !truthy(&condition) {
                return Ok(());
            }
            match self.execute_loop_body(body)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break | LoopBodyResult::Exit => return Ok(()),
            }
        }
    }

    /// `for (init; test; update) body`.
    ///
    /// The head gets its own block scope. `let` bindings are shared by all
    /// iterations rather than copied per iteration.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&ForInit>,
        test: Option<&Expr>,
        update: Option<&Expr>,
        body: &Stmt,
    ) -> Result<(), EvalError> {
        let head = Scope::block(&self.scope);
        let saved = std::mem::replace(&mut self.scope, head);
        let result = self.run_for(init, test, update, body);
        self.scope = saved;
        result
    }

    fn run_for(
        &mut self,
        init: Option<&ForInit>,
        test: Option<&Expr>,
        update: Option<&Expr>,
        body: &Stmt,
    ) -> Result<(), EvalError> {
        match init {
            Some(ForInit::Var { kind, declarators }) => {
                let location = self.current_location;
                self.execute_var_decl(*kind, declarators, location)?;
            }
            Some(ForInit::Expr(expr)) => {
                self.evaluate_expr(expr)?;
            }
            None => {}
        }

        loop {
            if let Some(test) = test {
                let condition = self.evaluate_expr(test)?;
                if !truthy(&condition) {
                    return Ok(());
                }
            }
            match self.execute_loop_body(body)? {
                LoopBodyResult::Continue => {}
                LoopBodyResult::Break | LoopBodyResult::Exit => return Ok(()),
            }
            if let Some(update) = update {
                self.evaluate_expr(update)?;
            }
        }
    }
}
