// Integration tests: rewrite a unit, then run it against the dispatch runtime

use macaroni::interpreter::{EvalError, Interpreter};
use macaroni::operators::OperationKind;
use macaroni::parser::parse_program;
use macaroni::rewrite::{rewrite_program, ImportStyle, RewriteConfig};
use macaroni::runtime::errors::DispatchError;
use macaroni::runtime::{Object, Operator, PrimitiveType, Value};
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;

/// Rewrite `source`, then run it in `interpreter`
fn run_rewritten_in(
    interpreter: &mut Interpreter,
    source: &str,
    config: &RewriteConfig,
) -> Result<Value, EvalError> {
    let mut program = parse_program(source).expect("Parsing failed");
    rewrite_program(&mut program, config);
    interpreter.run(&program)
}

fn run_rewritten(source: &str) -> Result<Value, EvalError> {
    run_rewritten_in(&mut Interpreter::new(), source, &RewriteConfig::default())
}

fn number(value: &Value) -> f64 {
    value.as_number().expect("expected a number")
}

fn field(value: &Value, key: &str) -> Value {
    match value {
        Value::Object(object) => object.borrow().get(key).unwrap_or_default(),
        other => panic!("expected an object, got {:?}", other),
    }
}

/// A 2D vector whose `+` and `-` are component-wise and whose `==`
/// compares components
fn vector(x: f64, y: f64) -> Value {
    fn components(value: &Value) -> Result<(f64, f64), DispatchError> {
        match value {
            Value::Object(object) => {
                let object = object.borrow();
                let x = object.get("x").and_then(|v| v.as_number());
                let y = object.get("y").and_then(|v| v.as_number());
                match (x, y) {
                    (Some(x), Some(y)) => Ok((x, y)),
                    _ => Err(DispatchError::thrown("not a vector")),
                }
            }
            _ => Err(DispatchError::thrown("not a vector")),
        }
    }

    Value::object(
        Object::new()
            .with("x", x)
            .with("y", y)
            .with_override(OperationKind::Add, |this, args| {
                let (ax, ay) = components(this)?;
                let (bx, by) = components(&args[0])?;
                Ok(vector(ax + bx, ay + by))
            })
            .with_override(OperationKind::Subtract, |this, args| {
                let (ax, ay) = components(this)?;
                let (bx, by) = components(&args[0])?;
                Ok(vector(ax - bx, ay - by))
            })
            .with_override(OperationKind::LooseEqual, |this, args| {
                Ok(Value::Bool(components(this)? == components(&args[0])?))
            }),
    )
}

/// A value ordered by `rank` that only defines `<`
fn ranked(rank: f64) -> Value {
    Value::object(
        Object::new()
            .with("rank", rank)
            .with_override(OperationKind::LessThan, |this, args| {
                let rank = |v: &Value| match v {
                    Value::Object(o) => o.borrow().get("rank").and_then(|r| r.as_number()),
                    _ => None,
                };
                match (rank(this), rank(&args[0])) {
                    (Some(a), Some(b)) => Ok(Value::Bool(a < b)),
                    _ => Err(DispatchError::thrown("unranked")),
                }
            }),
    )
}

// ============================================================================
// Primitive behavior survives the rewrite
// ============================================================================

#[test]
fn test_arithmetic_on_primitives() {
    let result = run_rewritten("var a = 7; var b = 2; a * b - a / b + a % b;").unwrap();
    assert_eq!(number(&result), 14.0 - 3.5 + 1.0);
}

#[test]
fn test_string_concatenation() {
    let result = run_rewritten("var name = 'world'; 'hello ' + name;").unwrap();
    assert_eq!(result, Value::string("hello world"));
}

#[test]
fn test_mixed_addition_coerces_like_native() {
    assert_eq!(run_rewritten("var n = 1; n + '2';").unwrap(), Value::string("12"));
    assert_eq!(number(&run_rewritten("var t = true; t + 1;").unwrap()), 2.0);
}

#[test]
fn test_equality_and_inequality() {
    assert_eq!(run_rewritten("var a = 1; a == '1';").unwrap(), Value::Bool(true));
    assert_eq!(run_rewritten("var a = 1; a === '1';").unwrap(), Value::Bool(false));
    assert_eq!(run_rewritten("var a = 1; a != '1';").unwrap(), Value::Bool(false));
    assert_eq!(run_rewritten("var a = 1; a !== '1';").unwrap(), Value::Bool(true));
}

#[test]
fn test_bitwise_and_shift() {
    let result = run_rewritten("var m = 12; (m & 10) | (m ^ 3) << 1;").unwrap();
    assert_eq!(number(&result), ((12 & 10) | ((12 ^ 3) << 1)) as f64);
    assert_eq!(number(&run_rewritten("var m = 5; ~m;").unwrap()), -6.0);
    assert_eq!(number(&run_rewritten("var m = -16; m >> 2;").unwrap()), -4.0);
}

#[test]
fn test_unary_operators() {
    assert_eq!(number(&run_rewritten("var s = '3'; +s;").unwrap()), 3.0);
    assert_eq!(number(&run_rewritten("var s = 3; -s;").unwrap()), -3.0);
    assert_eq!(run_rewritten("var s = ''; !s;").unwrap(), Value::Bool(true));
}

#[test]
fn test_compound_assignment_updates_binding() {
    let mut interpreter = Interpreter::new();
    run_rewritten_in(
        &mut interpreter,
        "var total = 10; total += 5; total *= 2; total -= 1;",
        &RewriteConfig::default(),
    )
    .unwrap();
    assert_eq!(number(&interpreter.global("total").unwrap()), 29.0);
}

#[test]
fn test_postfix_yields_old_value_and_updates() {
    let mut interpreter = Interpreter::new();
    let result = run_rewritten_in(
        &mut interpreter,
        "var a = 5; var b = a++; b;",
        &RewriteConfig::default(),
    )
    .unwrap();
    assert_eq!(number(&result), 5.0);
    assert_eq!(number(&interpreter.global("a").unwrap()), 6.0);
}

#[test]
fn test_prefix_yields_new_value() {
    let mut interpreter = Interpreter::new();
    let result = run_rewritten_in(
        &mut interpreter,
        "var a = 5; --a;",
        &RewriteConfig::default(),
    )
    .unwrap();
    assert_eq!(number(&result), 4.0);
    assert_eq!(number(&interpreter.global("a").unwrap()), 4.0);
}

#[test]
fn test_postfix_on_computed_property_evaluates_key_once() {
    let mut interpreter = Interpreter::new();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    interpreter.define_global(
        "key",
        Value::native("key", move |_, _| {
            counter.set(counter.get() + 1);
            Ok(Value::string("n"))
        }),
    );
    let result = run_rewritten_in(
        &mut interpreter,
        "var o = { n: 1 }; var old = o[key()]++; old + o.n;",
        &RewriteConfig::default(),
    )
    .unwrap();
    assert_eq!(number(&result), 3.0);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_postfix_inside_function() {
    let source = "
function countdown(n) {
  var steps = 0;
  while (n > 0) {
    n--;
    steps++;
  }
  return steps;
}
countdown(4);
";
    assert_eq!(number(&run_rewritten(source).unwrap()), 4.0);
}

#[test]
fn test_for_loop_accumulates() {
    let source = "var sum = 0; for (let i = 1; i <= 10; i++) { sum += i; } sum;";
    assert_eq!(number(&run_rewritten(source).unwrap()), 55.0);
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_object_override_for_addition() {
    let mut interpreter = Interpreter::new();
    interpreter.define_global("u", vector(1.0, 2.0));
    interpreter.define_global("v", vector(10.0, 20.0));
    let sum = run_rewritten_in(&mut interpreter, "u + v - u + v;", &RewriteConfig::default()).unwrap();
    assert_eq!(number(&field(&sum, "x")), 20.0);
    assert_eq!(number(&field(&sum, "y")), 40.0);
}

#[test]
fn test_compound_assignment_uses_override() {
    let mut interpreter = Interpreter::new();
    interpreter.define_global("step", vector(1.0, 1.0));
    let position = run_rewritten_in(
        &mut interpreter,
        "var p = step; for (let i = 0; i < 3; i++) { p += step; } p;",
        &RewriteConfig::default(),
    )
    .unwrap();
    assert_eq!(number(&field(&position, "x")), 4.0);
    assert_eq!(number(&field(&position, "y")), 4.0);
}

#[test]
fn test_not_equal_negates_equal_override() {
    let mut interpreter = Interpreter::new();
    interpreter.define_global("u", vector(1.0, 2.0));
    interpreter.define_global("v", vector(1.0, 2.0));
    interpreter.define_global("w", vector(3.0, 2.0));
    let config = RewriteConfig::default();
    assert_eq!(run_rewritten_in(&mut interpreter, "u == v;", &config).unwrap(), Value::Bool(true));
    assert_eq!(run_rewritten_in(&mut interpreter, "u != v;", &config).unwrap(), Value::Bool(false));
    assert_eq!(run_rewritten_in(&mut interpreter, "u != w;", &config).unwrap(), Value::Bool(true));
}

#[test]
fn test_ordering_falls_back_to_inverse_override() {
    let mut interpreter = Interpreter::new();
    interpreter.define_global("low", ranked(1.0));
    interpreter.define_global("high", ranked(9.0));
    let config = RewriteConfig::default();
    assert_eq!(run_rewritten_in(&mut interpreter, "low < high;", &config).unwrap(), Value::Bool(true));
    assert_eq!(run_rewritten_in(&mut interpreter, "low >= high;", &config).unwrap(), Value::Bool(false));
    assert_eq!(run_rewritten_in(&mut interpreter, "high >= low;", &config).unwrap(), Value::Bool(true));
}

#[test]
fn test_missing_override_is_unsupported() {
    let mut interpreter = Interpreter::new();
    interpreter.define_global("low", ranked(1.0));
    let err = run_rewritten_in(&mut interpreter, "low * 2;", &RewriteConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        EvalError::Dispatch(DispatchError::UnsupportedOperator { operator: "*" })
    ));
}

#[test]
fn test_errors_from_overrides_propagate() {
    let mut interpreter = Interpreter::new();
    interpreter.define_global("u", vector(1.0, 2.0));
    let err = run_rewritten_in(&mut interpreter, "u + { x: 1 };", &RewriteConfig::default()).unwrap_err();
    match err {
        EvalError::Dispatch(DispatchError::Thrown(value)) => {
            assert_eq!(value, Value::string("not a vector"))
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_primitive_type_override_from_dispatcher() {
    let operator = Operator::builder()
        .override_primitive(PrimitiveType::String, OperationKind::Multiply, |this, args| {
            let text = this.as_str().unwrap_or_default();
            let times = args[0].as_number().unwrap_or(0.0) as usize;
            Ok(Value::string(text.repeat(times)))
        })
        .build();
    let mut interpreter = Interpreter::with_operator(operator);
    let result = run_rewritten_in(
        &mut interpreter,
        "var s = 'ab'; s * 3;",
        &RewriteConfig::default(),
    )
    .unwrap();
    assert_eq!(result, Value::string("ababab"));
    // Numbers keep their native behavior
    let result = run_rewritten_in(&mut interpreter, "var n = 2; n * 3;", &RewriteConfig::default()).unwrap();
    assert_eq!(number(&result), 6.0);
}

// ============================================================================
// Null operands
// ============================================================================

#[test]
fn test_null_operand_is_rejected_after_rewrite() {
    let err = run_rewritten("var a = 1; null + a;").unwrap_err();
    assert!(matches!(
        err,
        EvalError::Dispatch(DispatchError::NullOperand { operator: "+" })
    ));
    assert_eq!(err.to_string(), "Item cannot be null (operator '+')");
}

#[test]
fn test_undefined_operand_is_rejected_after_rewrite() {
    let err = run_rewritten("var a; a < 1;").unwrap_err();
    assert!(matches!(
        err,
        EvalError::Dispatch(DispatchError::NullOperand { operator: "<" })
    ));
}

#[test]
fn test_unrewritten_null_arithmetic_is_native() {
    let mut interpreter = Interpreter::new();
    let result = interpreter.run_source("var a = 1; null + a;").unwrap();
    assert_eq!(number(&result), 1.0);
}

#[test]
fn test_literal_only_expression_runs_natively() {
    assert_eq!(number(&run_rewritten("1 + 2 * 3;").unwrap()), 7.0);
}

// ============================================================================
// Runtime import forms
// ============================================================================

#[test]
fn test_lazy_require_form() {
    let config = RewriteConfig::default().with_import_style(ImportStyle::Lazy);
    let mut interpreter = Interpreter::new();
    let result = run_rewritten_in(&mut interpreter, "var a = 2; a ** 10;", &config).unwrap();
    assert_eq!(number(&result), 1024.0);
}

#[test]
fn test_skip_import_with_host_binding() {
    let config = RewriteConfig::default().with_skip_import(true);
    let mut interpreter = Interpreter::new();
    interpreter.define_global(
        "Operator",
        macaroni::runtime::module::operator_object(Rc::new(Operator::new())),
    );
    let result = run_rewritten_in(&mut interpreter, "var a = 2; a - 5;", &config).unwrap();
    assert_eq!(number(&result), -3.0);
}

#[test]
fn test_skip_import_without_binding_fails() {
    let config = RewriteConfig::default().with_skip_import(true);
    let err = run_rewritten_in(&mut Interpreter::new(), "var a = 2; a - 5;", &config).unwrap_err();
    assert!(matches!(err, EvalError::UndefinedVariable { ref name, .. } if name == "Operator"));
}

#[test]
fn test_host_module_import() {
    let mut interpreter = Interpreter::new();
    interpreter.define_module(
        "./geometry",
        Value::object(Object::new().with("origin", vector(0.0, 0.0))),
    );
    interpreter.define_global("unit", vector(1.0, 1.0));
    let source = "
import { origin } from './geometry';
origin + unit + unit;
";
    let sum = run_rewritten_in(&mut interpreter, source, &RewriteConfig::default()).unwrap();
    assert_eq!(number(&field(&sum, "x")), 2.0);
}

#[test]
fn test_runtime_methods_callable_directly() {
    let mut interpreter = Interpreter::new();
    let source = "
import { Operator } from 'macaroni';
Operator.strictNotEqual(1, 1) || Operator.greaterThan(3, 2);
";
    assert_eq!(interpreter.run_source(source).unwrap(), Value::Bool(true));
}

// ============================================================================
// Property interception
// ============================================================================

#[test]
fn test_capture_routes_reads_through_override() {
    let mut interpreter = Interpreter::new();
    let reads = Rc::new(Cell::new(0));
    let counter = reads.clone();
    interpreter.define_global(
        "config",
        Value::object(Object::new().with("depth", 3.0).with_override(
            OperationKind::GetProperty,
            move |_, args| {
                counter.set(counter.get() + 1);
                Ok(Value::string(format!("<{}>", args[0])))
            },
        )),
    );
    let source = "
import { capturePropertyAccess } from 'macaroni';
var wrapped = capturePropertyAccess(config);
wrapped.depth + wrapped.anything;
";
    let result = interpreter.run_source(source).unwrap();
    assert_eq!(result, Value::string("<depth><anything>"));
    assert_eq!(reads.get(), 2);
}

#[test]
fn test_capture_routes_writes_through_override() {
    let mut interpreter = Interpreter::new();
    let target = Value::object(Object::new().with_override(
        OperationKind::SetProperty,
        |this, args| {
            if let Value::Object(object) = this {
                let key = args[0].to_string();
                object.borrow_mut().set(&format!("_{}", key), args[1].clone());
            }
            Ok(Value::Undefined)
        },
    ));
    interpreter.define_global("target", target.clone());
    let source = "
import { capturePropertyAccess } from 'macaroni';
var wrapped = capturePropertyAccess(target);
wrapped.size = 4;
";
    interpreter.run_source(source).unwrap();
    assert_eq!(number(&field(&target, "_size")), 4.0);
    assert_eq!(field(&target, "size"), Value::Undefined);
}

#[test]
fn test_capture_without_override_passes_through() {
    let source = "
import { capturePropertyAccess } from 'macaroni';
var plain = capturePropertyAccess({ a: 1 });
plain.b = 2;
plain.a + plain.b;
";
    assert_eq!(number(&Interpreter::new().run_source(source).unwrap()), 3.0);
}

#[test]
fn test_capture_constructor_wraps_instances() {
    let source = "
import { capturePropertyAccess } from 'macaroni';
function Point(x, y) {
  this.x = x;
  this.y = y;
}
var CapturedPoint = capturePropertyAccess(Point);
var p = new CapturedPoint(3, 4);
p.x * p.y;
";
    assert_eq!(number(&Interpreter::new().run_source(source).unwrap()), 12.0);
}

#[test]
fn test_capture_rejects_primitives() {
    let source = "
import { capturePropertyAccess } from 'macaroni';
capturePropertyAccess(42);
";
    let err = Interpreter::new().run_source(source).unwrap_err();
    assert_eq!(err.to_string(), "Cannot capture property access on number");
}

// ============================================================================
// Evaluator errors
// ============================================================================

#[test]
fn test_const_reassignment_is_an_error() {
    let err = run_rewritten("const a = 1; a += 1;").unwrap_err();
    assert!(matches!(err, EvalError::ConstAssignment { ref name, .. } if name == "a"));
}

#[test]
fn test_unknown_module_is_an_error() {
    let err = run_rewritten("import x from 'elsewhere'; x;").unwrap_err();
    assert!(matches!(err, EvalError::UnknownModule { .. }));
}

#[test]
fn test_calling_a_non_function() {
    let err = run_rewritten("var o = { f: 1 }; o.f();").unwrap_err();
    assert!(matches!(err, EvalError::NotCallable { ref callee, .. } if callee == "o.f"));
}
