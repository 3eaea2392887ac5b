// Property tests for the dispatch rules and the rewrite pass

use macaroni::interpreter::Interpreter;
use macaroni::operators::{Arity, OperationKind};
use macaroni::parser::parse_program;
use macaroni::parser::printer::print_program;
use macaroni::rewrite::{rewrite_program, transform, RewriteConfig};
use macaroni::runtime::errors::DispatchError;
use macaroni::runtime::{Object, Operator, Value};
use proptest::prelude::*;
use proptest::sample::select;

/// Two-operand kinds with a native implementation
fn binary_kinds() -> Vec<OperationKind> {
    OperationKind::ALL
        .into_iter()
        .filter(|kind| kind.arity() == Arity::Binary && kind.primitive().is_some())
        .collect()
}

fn unary_kinds() -> Vec<OperationKind> {
    OperationKind::ALL
        .into_iter()
        .filter(|kind| kind.arity() == Arity::Unary)
        .collect()
}

fn primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1.0e6..1.0e6f64).prop_map(Value::Number),
        (-64i32..64).prop_map(|n| Value::Number(n as f64)),
        any::<bool>().prop_map(Value::Bool),
        "[a-z0-9]{0,4}".prop_map(Value::string),
    ]
}

fn nullish() -> impl Strategy<Value = Value> {
    prop_oneof![Just(Value::Null), Just(Value::Undefined)]
}

/// Equality that treats two `NaN`s as the same result
fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a == b,
    }
}

/// An object ordered by `rank` that defines a single comparison
fn ranked(rank: f64, kind: OperationKind) -> Value {
    Value::object(Object::new().with("rank", rank).with_override(kind, move |this, args| {
        let rank = |v: &Value| match v {
            Value::Object(o) => o.borrow().get("rank").and_then(|r| r.as_number()),
            _ => None,
        };
        let (a, b) = match (rank(this), rank(&args[0])) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(DispatchError::thrown("unranked")),
        };
        let result = match kind {
            OperationKind::LessThan => a < b,
            OperationKind::LessOrEqual => a <= b,
            OperationKind::GreaterThan => a > b,
            _ => a >= b,
        };
        Ok(Value::Bool(result))
    }))
}

/// Arithmetic made of numeric literals only
fn literal_expression() -> impl Strategy<Value = String> {
    let leaf = (0u32..1000).prop_map(|n| n.to_string());
    leaf.prop_recursive(4, 32, 2, |inner| {
        (
            inner.clone(),
            select(vec!["+", "-", "*", "/", "%", "**", "<", ">=", "==", "!==", "&", "|", "<<", ">>"]),
            inner,
        )
            .prop_map(|(left, op, right)| format!("({} {} {})", left, op, right))
    })
}

proptest! {
    #[test]
    fn null_operand_is_always_rejected(
        kind in select(binary_kinds()),
        operand in primitive(),
        null in nullish(),
        null_first in any::<bool>(),
    ) {
        let operator = Operator::new();
        let result = if null_first {
            operator.apply(&null, &operand, kind)
        } else {
            operator.apply(&operand, &null, kind)
        };
        match result {
            Err(DispatchError::NullOperand { operator }) => prop_assert_eq!(operator, kind.display()),
            other => prop_assert!(false, "expected NullOperand, got {:?}", other),
        }
    }

    #[test]
    fn null_operand_is_rejected_for_unary(kind in select(unary_kinds()), null in nullish()) {
        let result = Operator::new().apply_unary(&null, kind);
        prop_assert!(matches!(result, Err(DispatchError::NullOperand { .. })), "expected NullOperand, got {:?}", result);
    }

    #[test]
    fn ordering_derives_from_inverse_override(
        a in -1.0e3..1.0e3f64,
        b in -1.0e3..1.0e3f64,
        defined in select(vec![
            OperationKind::LessThan,
            OperationKind::LessOrEqual,
            OperationKind::GreaterThan,
            OperationKind::GreaterOrEqual,
        ]),
    ) {
        let operator = Operator::new();
        let requested = defined.inverse().unwrap();
        let left = ranked(a, defined);
        let right = ranked(b, defined);

        let direct = operator.apply(&left, &right, defined).unwrap();
        let derived = operator.apply(&left, &right, requested).unwrap();
        prop_assert_eq!(derived, Value::Bool(direct != Value::Bool(true)));
    }

    #[test]
    fn plain_objects_support_nothing(kind in select(binary_kinds()), operand in primitive()) {
        let plain = Value::object(Object::new().with("a", 1.0));
        match Operator::new().apply(&plain, &operand, kind) {
            Err(DispatchError::UnsupportedOperator { operator }) => {
                prop_assert_eq!(operator, kind.display())
            }
            other => prop_assert!(false, "expected UnsupportedOperator, got {:?}", other),
        }
    }

    #[test]
    fn literal_only_code_is_never_rewritten(expression in literal_expression()) {
        let source = format!("var x = {};", expression);
        let mut program = parse_program(&source).unwrap();
        let untouched = print_program(&program);

        let outcome = rewrite_program(&mut program, &RewriteConfig::default());
        prop_assert_eq!(outcome.rewrites, 0);
        prop_assert!(!outcome.import_inserted);
        prop_assert_eq!(print_program(&program), untouched);
    }

    #[test]
    fn one_identifier_forces_a_rewrite(expression in literal_expression()) {
        let source = format!("var x = {} + y;", expression);
        let mut program = parse_program(&source).unwrap();
        let outcome = rewrite_program(&mut program, &RewriteConfig::default());
        prop_assert_eq!(outcome.rewrites, 1);
        prop_assert!(outcome.import_inserted);
    }

    #[test]
    fn rewrite_preserves_primitive_semantics(
        kind in select(binary_kinds()),
        a in primitive(),
        b in primitive(),
    ) {
        let source = format!("a {} b;", kind.display());
        let rewritten = transform(&source, &RewriteConfig::default()).unwrap();

        let mut native = Interpreter::new();
        native.define_global("a", a.clone());
        native.define_global("b", b.clone());
        let expected = native.run_source(&source).map_err(|e| e.to_string());

        let mut dispatched = Interpreter::new();
        dispatched.define_global("a", a);
        dispatched.define_global("b", b);
        let actual = dispatched.run_source(&rewritten).map_err(|e| e.to_string());

        match (&expected, &actual) {
            (Ok(x), Ok(y)) => prop_assert!(same(x, y), "{} gave {:?} natively, {:?} rewritten", source, x, y),
            _ => prop_assert_eq!(expected.is_ok(), actual.is_ok()),
        }
    }

    #[test]
    fn not_equal_is_negated_equal(a in primitive(), b in primitive()) {
        let operator = Operator::new();
        let loose = operator.loose_equal(&a, &b).unwrap();
        let strict = operator.strict_equal(&a, &b).unwrap();
        prop_assert_eq!(operator.loose_not_equal(&a, &b).unwrap(), Value::Bool(loose != Value::Bool(true)));
        prop_assert_eq!(operator.strict_not_equal(&a, &b).unwrap(), Value::Bool(strict != Value::Bool(true)));
    }
}
