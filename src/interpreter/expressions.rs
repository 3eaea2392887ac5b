//! Expression evaluation
//!
//! Operators evaluate with their native semantics through the same primitive
//! table the dispatch runtime falls back to, so an unrewritten `a + b` and a
//! rewritten `Operator.add(a, b)` agree on primitives. Property reads and
//! writes go through [`get_property`] / [`set_property`] and therefore
//! through any proxy in the way.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::EvalError;
use crate::interpreter::scope::{self, AssignResult};
use crate::operators::Primitive;
use crate::parser::ast::*;
use crate::parser::printer::print_expr;
use crate::rewrite::{binary_method, unary_method};
use crate::runtime::coerce::{self, to_number, truthy};
use crate::runtime::primitive;
use crate::runtime::property::{construct_with, get_property, set_property};
use crate::runtime::value::{Object, Value};
use std::rc::Rc;

/// Something that can be read and assigned
enum Reference {
    Binding(String),
    Property { object: Value, key: Rc<str> },
}

/// Native two-operand operator
fn binary_native(op: BinaryOp, a: &Value, b: &Value, location: SourceLocation) -> Result<Value, EvalError> {
    if op == BinaryOp::UShr {
        return Ok(primitive::unsigned_right_shift(a, b)?);
    }
    let method = binary_method(op).ok_or(EvalError::Unsupported {
        feature: "`in` / `instanceof` operator",
        location,
    })?;
    let Some(Primitive::Binary(f)) = method.kind().primitive() else {
        return Err(EvalError::Unsupported {
            feature: "operator",
            location,
        });
    };
    let result = f(a, b)?;
    if method.negated() {
        Ok(Value::Bool(!truthy(&result)))
    } else {
        Ok(result)
    }
}

impl Interpreter {
    /// Evaluate an expression and return its value
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Number { raw, .. } => Ok(Value::Number(coerce::string_to_number(raw))),

            Expr::Str { value, .. } => Ok(Value::string(value)),

            Expr::Bool(b, _) => Ok(Value::Bool(*b)),

            Expr::Null(_) => Ok(Value::Null),

            Expr::This(_) => Ok(self.this_stack.last().cloned().unwrap_or_default()),

            Expr::Ident(name, location) => {
                scope::lookup(&self.scope, name).ok_or_else(|| EvalError::UndefinedVariable {
                    name: name.clone(),
                    location: *location,
                })
            }

            Expr::Array { location, .. } => Err(EvalError::Unsupported {
                feature: "array literal",
                location: *location,
            }),

            Expr::Object { properties, .. } => {
                let mut object = Object::new();
                for property in properties {
                    let value = self.evaluate_expr(&property.value)?;
                    object.set(&property.key, value);
                }
                Ok(Value::object(object))
            }

            Expr::Function {
                name, params, body, ..
            } => Ok(self.make_function(name.as_deref(), params, body)),

            Expr::Member {
                object, property, ..
            } => {
                let object = self.evaluate_expr(object)?;
                let key = self.property_key(property)?;
                Ok(get_property(&object, &key)?)
            }

            Expr::Call {
                callee,
                args,
                location,
            } => self.evaluate_call(callee, args, *location),

            Expr::New {
                callee,
                args,
                location,
            } => {
                let constructor = self.evaluate_expr(callee)?;
                let args = self.evaluate_args(args)?;
                self.current_location = *location;
                construct_with(&constructor, &args, &mut |function, this, args| {
                    self.call_function_ref(function, this.clone(), args)
                })
            }

            Expr::Unary {
                op,
                operand,
                location,
            } => self.evaluate_unary(*op, operand, *location),

            Expr::Update {
                op, prefix, target, ..
            } => {
                let reference = self.resolve_reference(target)?;
                let old = to_number(&self.get_reference(&reference, target.location())?)?;
                let new = match op {
                    UpdateOp::Increment => old + 1.0,
                    UpdateOp::Decrement => old - 1.0,
                };
                self.put_reference(&reference, Value::Number(new), target.location())?;
                Ok(Value::Number(if *prefix { new } else { old }))
            }

            Expr::Binary {
                op,
                left,
                right,
                location,
            } => {
                let a = self.evaluate_expr(left)?;
                let b = self.evaluate_expr(right)?;
                binary_native(*op, &a, &b, *location)
            }

            Expr::Logical {
                op, left, right, ..
            } => {
                let left = self.evaluate_expr(left)?;
                let short_circuit = match op {
                    LogicalOp::And => !truthy(&left),
                    LogicalOp::Or => truthy(&left),
                    LogicalOp::Nullish => !left.is_nullish(),
                };
                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate_expr(right)
                }
            }

            Expr::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                let test = self.evaluate_expr(test)?;
                if truthy(&test) {
                    self.evaluate_expr(consequent)
                } else {
                    self.evaluate_expr(alternate)
                }
            }

            Expr::Assign {
                op,
                target,
                value,
                location,
            } => self.evaluate_assign(*op, target, value, *location),

            Expr::Sequence { exprs, .. } => {
                let mut last = Value::Undefined;
                for expr in exprs {
                    last = self.evaluate_expr(expr)?;
                }
                Ok(last)
            }
        }
    }

    fn evaluate_args(&mut self, args: &[Expr]) -> Result<Vec<Value>, EvalError> {
        args.iter().map(|arg| self.evaluate_expr(arg)).collect()
    }

    fn property_key(&mut self, property: &MemberProperty) -> Result<Rc<str>, EvalError> {
        match property {
            MemberProperty::Named(name) => Ok(Rc::from(name.as_str())),
            MemberProperty::Computed(expr) => {
                let key = self.evaluate_expr(expr)?;
                Ok(coerce::to_string(&key)?)
            }
        }
    }

    fn evaluate_call(
        &mut self,
        callee: &Expr,
        args: &[Expr],
        location: SourceLocation,
    ) -> Result<Value, EvalError> {
        // Member calls pass the object as `this`
        let (function, this) = match callee {
            Expr::Member {
                object, property, ..
            } => {
                let object = self.evaluate_expr(object)?;
                let key = self.property_key(property)?;
                (get_property(&object, &key)?, object)
            }
            other => (self.evaluate_expr(other)?, Value::Undefined),
        };
        let args = self.evaluate_args(args)?;

        self.current_location = location;
        self.call_function(&function, this, &args)
            .map_err(|err| match err {
                EvalError::NotCallable { .. } => EvalError::NotCallable {
                    callee: print_expr(callee),
                    location,
                },
                other => other,
            })
    }

    fn evaluate_unary(
        &mut self,
        op: UnaryOp,
        operand: &Expr,
        location: SourceLocation,
    ) -> Result<Value, EvalError> {
        match op {
            UnaryOp::Typeof => {
                // `typeof undeclared` is not an error
                if let Expr::Ident(name, _) = operand {
                    if scope::lookup(&self.scope, name).is_none() {
                        return Ok(Value::string("undefined"));
                    }
                }
                let value = self.evaluate_expr(operand)?;
                Ok(Value::string(value.type_of()))
            }
            UnaryOp::Void => {
                self.evaluate_expr(operand)?;
                Ok(Value::Undefined)
            }
            UnaryOp::Delete => Err(EvalError::Unsupported {
                feature: "`delete` operator",
                location,
            }),
            UnaryOp::Neg | UnaryOp::Plus | UnaryOp::Not | UnaryOp::BitNot => {
                let value = self.evaluate_expr(operand)?;
                match unary_method(op).and_then(|method| method.kind().primitive()) {
                    Some(Primitive::Unary(f)) => Ok(f(&value)?),
                    _ => Err(EvalError::Unsupported {
                        feature: "operator",
                        location,
                    }),
                }
            }
        }
    }

    fn evaluate_assign(
        &mut self,
        op: AssignOp,
        target: &Pattern,
        value: &Expr,
        location: SourceLocation,
    ) -> Result<Value, EvalError> {
        if op == AssignOp::Assign {
            return match target {
                Pattern::Ident(..) | Pattern::Member(_) => {
                    let reference = self.resolve_pattern_reference(target, location)?;
                    let value = self.evaluate_expr(value)?;
                    self.put_reference(&reference, value.clone(), location)?;
                    Ok(value)
                }
                _ => {
                    let value = self.evaluate_expr(value)?;
                    self.assign_pattern(target, value.clone(), location)?;
                    Ok(value)
                }
            };
        }

        let reference = self.resolve_pattern_reference(target, location)?;
        let current = self.get_reference(&reference, location)?;

        if let Some(logical) = op.logical() {
            let short_circuit = match logical {
                LogicalOp::And => !truthy(&current),
                LogicalOp::Or => truthy(&current),
                LogicalOp::Nullish => !current.is_nullish(),
            };
            if short_circuit {
                return Ok(current);
            }
            let value = self.evaluate_expr(value)?;
            self.put_reference(&reference, value.clone(), location)?;
            return Ok(value);
        }

        let binary = op
            .binary()
            .ok_or(EvalError::InvalidAssignmentTarget { location })?;
        let rhs = self.evaluate_expr(value)?;
        let result = binary_native(binary, &current, &rhs, location)?;
        self.put_reference(&reference, result.clone(), location)?;
        Ok(result)
    }

    /// Destructuring assignment to existing bindings or properties
    fn assign_pattern(&mut self, pattern: &Pattern, value: Value, location: SourceLocation) -> Result<(), EvalError> {
        match pattern {
            Pattern::Ident(..) | Pattern::Member(_) => {
                let reference = self.resolve_pattern_reference(pattern, location)?;
                self.put_reference(&reference, value, location)
            }
            Pattern::Object { properties, .. } => {
                for (key, target) in properties {
                    let property = get_property(&value, key)?;
                    self.assign_pattern(target, property, location)?;
                }
                Ok(())
            }
            Pattern::Array { location, .. } => Err(EvalError::Unsupported {
                feature: "array destructuring",
                location: *location,
            }),
        }
    }

    fn resolve_pattern_reference(
        &mut self,
        pattern: &Pattern,
        location: SourceLocation,
    ) -> Result<Reference, EvalError> {
        match pattern {
            Pattern::Ident(name, _) => Ok(Reference::Binding(name.clone())),
            Pattern::Member(expr) => self.resolve_reference(expr),
            _ => Err(EvalError::InvalidAssignmentTarget { location }),
        }
    }

    /// Evaluate the parts of an assignment target, leaving the read or
    /// write itself for later
    fn resolve_reference(&mut self, expr: &Expr) -> Result<Reference, EvalError> {
        match expr {
            Expr::Ident(name, _) => Ok(Reference::Binding(name.clone())),
            Expr::Member {
                object, property, ..
            } => {
                let object = self.evaluate_expr(object)?;
                let key = self.property_key(property)?;
                Ok(Reference::Property { object, key })
            }
            other => Err(EvalError::InvalidAssignmentTarget {
                location: other.location(),
            }),
        }
    }

    fn get_reference(&mut self, reference: &Reference, location: SourceLocation) -> Result<Value, EvalError> {
        match reference {
            Reference::Binding(name) => {
                scope::lookup(&self.scope, name).ok_or_else(|| EvalError::UndefinedVariable {
                    name: name.clone(),
                    location,
                })
            }
            Reference::Property { object, key } => Ok(get_property(object, key)?),
        }
    }

    fn put_reference(
        &mut self,
        reference: &Reference,
        value: Value,
        location: SourceLocation,
    ) -> Result<(), EvalError> {
        match reference {
            Reference::Binding(name) => match scope::assign(&self.scope, name, value.clone()) {
                AssignResult::Assigned => Ok(()),
                AssignResult::Constant => Err(EvalError::ConstAssignment {
                    name: name.clone(),
                    location,
                }),
                // Sloppy-mode scripts create a global
                AssignResult::Missing => {
                    self.globals.borrow_mut().declare(name, value, true);
                    Ok(())
                }
            },
            Reference::Property { object, key } => Ok(set_property(object, key, value)?),
        }
    }
}
