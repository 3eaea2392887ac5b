//! Operation dispatch
//!
//! [`Operator`] resolves one operation call to either the native primitive
//! behavior or an override supplied by the left operand.
//!
//! # Resolution
//!
//! For `apply(a, b, kind)`:
//!
//! 1. `null` / `undefined` on either side fails with
//!    [`DispatchError::NullOperand`], before anything else is looked at.
//! 2. A primitive `a` without its own override uses the native behavior.
//!    The right operand is converted by the native rules (its to-primitive
//!    hook included).
//! 3. Otherwise `a`'s override for `kind` is invoked with `this = a` and `b`
//!    as its only argument. The result is returned untouched.
//! 4. For the four orderings only: if `a` lacks the override but carries one
//!    for the inverse ordering, that one is invoked and its truthiness negated.
//! 5. Anything else fails with [`DispatchError::UnsupportedOperator`].
//!
//! One-operand operations follow the same steps with no argument.
//!
//! # Primitive overrides
//!
//! Primitives cannot carry overrides themselves. An [`Operator`] instead
//! holds one override table per primitive type, fixed when it is built with
//! [`OperatorBuilder`]. Once built the tables are read-only.

use crate::operators::{Arity, OperationKind, OperatorToken, Primitive, RuntimeMethod};
use crate::runtime::coerce::truthy;
use crate::runtime::errors::DispatchError;
use crate::runtime::value::{NativeFn, PrimitiveType, Value};
use rustc_hash::FxHashMap;
use std::rc::Rc;

type OverrideTable = FxHashMap<OperatorToken, NativeFn>;

/// The dispatch runtime
#[derive(Clone, Default)]
pub struct Operator {
    primitive_overrides: FxHashMap<PrimitiveType, OverrideTable>,
}

/// Configures per-primitive-type overrides before an [`Operator`] is used
#[derive(Default)]
pub struct OperatorBuilder {
    primitive_overrides: FxHashMap<PrimitiveType, OverrideTable>,
}

impl OperatorBuilder {
    /// Make every value of primitive type `ty` override `kind`
    pub fn override_primitive(
        mut self,
        ty: PrimitiveType,
        kind: OperationKind,
        f: impl Fn(&Value, &[Value]) -> Result<Value, DispatchError> + 'static,
    ) -> Self {
        self.primitive_overrides
            .entry(ty)
            .or_default()
            .insert(kind.token(), Rc::new(f));
        self
    }

    pub fn build(self) -> Operator {
        Operator {
            primitive_overrides: self.primitive_overrides,
        }
    }
}

macro_rules! binary_methods {
    ($($name:ident => $method:ident),* $(,)?) => {
        $(
            pub fn $name(&self, a: &Value, b: &Value) -> Result<Value, DispatchError> {
                self.call(RuntimeMethod::$method, a, Some(b))
            }
        )*
    };
}

macro_rules! unary_methods {
    ($($name:ident => $method:ident),* $(,)?) => {
        $(
            pub fn $name(&self, a: &Value) -> Result<Value, DispatchError> {
                self.call(RuntimeMethod::$method, a, None)
            }
        )*
    };
}

impl Operator {
    /// A dispatcher with no primitive overrides
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> OperatorBuilder {
        OperatorBuilder::default()
    }

    /// The override `value` carries for `kind`, from the value itself or,
    /// for primitives, from this dispatcher's per-type tables
    pub fn override_for(&self, value: &Value, kind: OperationKind) -> Option<NativeFn> {
        match value.primitive_type() {
            Some(ty) => self
                .primitive_overrides
                .get(&ty)
                .and_then(|table| table.get(&kind.token()))
                .cloned(),
            None => value.own_override(kind),
        }
    }

    /// Two-operand dispatch
    pub fn apply(&self, a: &Value, b: &Value, kind: OperationKind) -> Result<Value, DispatchError> {
        self.check_arity(kind, Arity::Binary)?;
        self.resolve(kind, a, Some(b))
    }

    /// One-operand dispatch
    pub fn apply_unary(&self, a: &Value, kind: OperationKind) -> Result<Value, DispatchError> {
        self.check_arity(kind, Arity::Unary)?;
        self.resolve(kind, a, None)
    }

    /// Call a runtime method with loosely typed arguments.
    ///
    /// Missing arguments are `undefined` (and so fail the null check); extra
    /// arguments are ignored.
    pub fn invoke(&self, method: RuntimeMethod, args: &[Value]) -> Result<Value, DispatchError> {
        let a = args.first().cloned().unwrap_or_default();
        match method.arity() {
            Arity::Unary => self.call(method, &a, None),
            Arity::Binary => {
                let b = args.get(1).cloned().unwrap_or_default();
                self.call(method, &a, Some(&b))
            }
        }
    }

    binary_methods! {
        add => Add,
        subtract => Subtract,
        multiply => Multiply,
        divide => Divide,
        modulo => Modulo,
        power => Power,
        less_than => LessThan,
        less_or_equal => LessOrEqual,
        greater_than => GreaterThan,
        greater_or_equal => GreaterOrEqual,
        loose_equal => LooseEqual,
        loose_not_equal => LooseNotEqual,
        strict_equal => StrictEqual,
        strict_not_equal => StrictNotEqual,
        logical_and => LogicalAnd,
        logical_or => LogicalOr,
        logical_xor => LogicalXor,
        left_shift => LeftShift,
        right_shift => RightShift,
    }

    unary_methods! {
        logical_not => LogicalNot,
        increment => Increment,
        decrement => Decrement,
        negate => Negate,
        positive => Positive,
        not => Not,
    }

    fn call(&self, method: RuntimeMethod, a: &Value, b: Option<&Value>) -> Result<Value, DispatchError> {
        let result = self.resolve(method.kind(), a, b)?;
        if method.negated() {
            Ok(Value::Bool(!truthy(&result)))
        } else {
            Ok(result)
        }
    }

    fn check_arity(&self, kind: OperationKind, used: Arity) -> Result<(), DispatchError> {
        if kind.arity() == used {
            Ok(())
        } else {
            Err(DispatchError::ArityMismatch {
                operator: kind.display(),
                expected: kind.arity().count(),
                got: used.count(),
            })
        }
    }

    fn resolve(&self, kind: OperationKind, a: &Value, b: Option<&Value>) -> Result<Value, DispatchError> {
        let operator = kind.display();
        if a.is_nullish() || b.is_some_and(Value::is_nullish) {
            return Err(DispatchError::NullOperand { operator });
        }

        let args: &[Value] = match b {
            Some(b) => std::slice::from_ref(b),
            None => &[],
        };

        let own = self.override_for(a, kind);

        if a.is_primitive() && own.is_none() {
            return match (kind.primitive(), b) {
                (Some(Primitive::Binary(f)), Some(b)) => f(a, b),
                (Some(Primitive::Unary(f)), None) => f(a),
                _ => Err(DispatchError::UnsupportedOperator { operator }),
            };
        }

        if let Some(f) = own {
            return f(a, args);
        }

        if let Some(inverse) = kind.inverse() {
            if let Some(f) = self.override_for(a, inverse) {
                let result = f(a, args)?;
                return Ok(Value::Bool(!truthy(&result)));
            }
        }

        Err(DispatchError::UnsupportedOperator { operator })
    }
}
