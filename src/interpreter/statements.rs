//! Statement execution
//!
//! All statement execution methods are `pub(crate)` methods on
//! [`Interpreter`]. Non-local exits (`return`, `break`, `continue`) are
//! signalled through `self.control_flow`; callers check it after every
//! statement and unwind.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::EvalError;
use crate::interpreter::scope::{function_scope_of, Scope};
use crate::parser::ast::*;
use crate::runtime::coerce::truthy;
use crate::runtime::property::get_property;
use crate::runtime::value::Value;

impl Interpreter {
    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), EvalError> {
        self.current_location = stmt.location();

        match stmt {
            Stmt::Import {
                specifiers,
                source,
                location,
            } => self.execute_import(specifiers, source, *location),

            Stmt::VarDecl {
                kind,
                declarators,
                location,
            } => self.execute_var_decl(*kind, declarators, *location),

            // Bound when the enclosing body was entered
            Stmt::FunctionDecl { .. } => Ok(()),

            Stmt::Return { value, .. } => {
                self.return_value = match value {
                    Some(expr) => self.evaluate_expr(expr)?,
                    None => Value::Undefined,
                };
                self.control_flow = ControlFlow::Return;
                Ok(())
            }

            Stmt::If {
                test,
                consequent,
                alternate,
                ..
            } => {
                let test = self.evaluate_expr(test)?;
                if truthy(&test) {
                    self.execute_statement(consequent)
                } else if let Some(alternate) = alternate {
                    self.execute_statement(alternate)
                } else {
                    Ok(())
                }
            }

            Stmt::While { test, body, .. } => self.execute_while(test, body),

            Stmt::For {
                init,
                test,
                update,
                body,
                ..
            } => self.execute_for(init.as_ref(), test.as_ref(), update.as_ref(), body),

            Stmt::Block { body, .. } => self.execute_block(body),

            Stmt::Break(_) => {
                self.control_flow = ControlFlow::Break;
                Ok(())
            }

            Stmt::Continue(_) => {
                self.control_flow = ControlFlow::Continue;
                Ok(())
            }

            Stmt::Empty(_) => Ok(()),

            Stmt::Expression { expr, .. } => {
                self.completion = self.evaluate_expr(expr)?;
                Ok(())
            }
        }
    }

    /// Run `body` in a fresh block scope
    pub(crate) fn execute_block(&mut self, body: &[Stmt]) -> Result<(), EvalError> {
        let block = Scope::block(&self.scope);
        let saved = std::mem::replace(&mut self.scope, block);
        let result = self.execute_in_current_scope(body);
        self.scope = saved;
        result
    }

    fn execute_in_current_scope(&mut self, body: &[Stmt]) -> Result<(), EvalError> {
        self.hoist_functions(body);
        for stmt in body {
            self.execute_statement(stmt)?;
            if self.control_flow != ControlFlow::Normal {
                break;
            }
        }
        Ok(())
    }

    pub(crate) fn execute_var_decl(
        &mut self,
        kind: VarKind,
        declarators: &[Declarator],
        location: SourceLocation,
    ) -> Result<(), EvalError> {
        for declarator in declarators {
            let value = match &declarator.init {
                Some(init) => Some(self.evaluate_expr(init)?),
                None => None,
            };

            // `var x;` leaves an existing (hoisted) value alone
            if kind == VarKind::Var && value.is_none() {
                continue;
            }
            self.bind_pattern(kind, &declarator.target, value.unwrap_or_default(), location)?;
        }
        Ok(())
    }

    /// Bind every name of a declaration pattern
    fn bind_pattern(
        &mut self,
        kind: VarKind,
        pattern: &Pattern,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), EvalError> {
        match pattern {
            Pattern::Ident(name, _) => self.declare(kind, name, value, location),
            Pattern::Object { properties, .. } => {
                for (key, target) in properties {
                    let property = get_property(&value, key)?;
                    self.bind_pattern(kind, target, property, location)?;
                }
                Ok(())
            }
            Pattern::Array { .. } => Err(EvalError::Unsupported {
                feature: "array destructuring",
                location,
            }),
            Pattern::Member(_) => Err(EvalError::InvalidAssignmentTarget { location }),
        }
    }

    fn declare(
        &mut self,
        kind: VarKind,
        name: &str,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), EvalError> {
        match kind {
            VarKind::Var => {
                function_scope_of(&self.scope)
                    .borrow_mut()
                    .declare(name, value, true);
            }
            VarKind::Let | VarKind::Const => {
                let mut scope = self.scope.borrow_mut();
                if scope.has_own(name) {
                    return Err(EvalError::Redeclaration {
                        name: name.to_string(),
                        location,
                    });
                }
                scope.declare(name, value, kind == VarKind::Let);
            }
        }
        Ok(())
    }

    fn execute_import(
        &mut self,
        specifiers: &[ImportSpecifier],
        source: &str,
        location: SourceLocation,
    ) -> Result<(), EvalError> {
        let module = self.module(source).ok_or_else(|| EvalError::UnknownModule {
            name: source.to_string(),
            location,
        })?;

        for specifier in specifiers {
            let value = match specifier {
                ImportSpecifier::Named { imported, .. } => get_property(&module, imported)?,
                ImportSpecifier::Default(_) | ImportSpecifier::Namespace(_) => module.clone(),
            };
            // Re-running a unit re-imports; not a redeclaration
            self.scope
                .borrow_mut()
                .declare(specifier.local(), value, false);
        }
        Ok(())
    }
}
