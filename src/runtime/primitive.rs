//! Native operator semantics
//!
//! One function per dispatchable operation, computing exactly what the
//! built-in operator would, implicit conversions of both operands included.
//! These are the defaults the dispatcher falls back to for primitive left
//! operands.

use crate::runtime::coerce::{
    self, loose_equals, strict_equals, to_int32, to_number, to_primitive, to_uint32, truthy, Hint,
};
use crate::runtime::errors::DispatchError;
use crate::runtime::value::Value;

type Outcome = Result<Value, DispatchError>;

fn numeric(a: &Value, b: &Value, op: fn(f64, f64) -> f64) -> Outcome {
    let x = to_number(a)?;
    let y = to_number(b)?;
    Ok(Value::Number(op(x, y)))
}

fn int32(a: &Value, b: &Value, op: fn(i32, i32) -> i32) -> Outcome {
    let x = to_int32(to_number(a)?);
    let y = to_int32(to_number(b)?);
    Ok(Value::Number(f64::from(op(x, y))))
}

/// `+`: string concatenation if either side converts to a string
pub fn add(a: &Value, b: &Value) -> Outcome {
    let pa = to_primitive(a, Hint::Default)?;
    let pb = to_primitive(b, Hint::Default)?;

    if matches!(pa, Value::String(_)) || matches!(pb, Value::String(_)) {
        let mut s = coerce::to_string(&pa)?.to_string();
        s.push_str(&coerce::to_string(&pb)?);
        return Ok(Value::string(s));
    }

    numeric(&pa, &pb, |x, y| x + y)
}

pub fn subtract(a: &Value, b: &Value) -> Outcome {
    numeric(a, b, |x, y| x - y)
}

pub fn multiply(a: &Value, b: &Value) -> Outcome {
    numeric(a, b, |x, y| x * y)
}

pub fn divide(a: &Value, b: &Value) -> Outcome {
    numeric(a, b, |x, y| x / y)
}

/// Truncating remainder; the sign follows the dividend
pub fn modulo(a: &Value, b: &Value) -> Outcome {
    numeric(a, b, |x, y| x % y)
}

pub fn power(a: &Value, b: &Value) -> Outcome {
    numeric(a, b, pow)
}

/// `**` on numbers: unlike `powf`, `1 ** NaN` and `(±1) ** ±Infinity` are NaN
pub fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() {
        return f64::NAN;
    }
    if exponent == 0.0 {
        return 1.0;
    }
    if base.abs() == 1.0 && exponent.is_infinite() {
        return f64::NAN;
    }
    base.powf(exponent)
}

pub fn less_than(a: &Value, b: &Value) -> Outcome {
    Ok(Value::Bool(coerce::less_than(a, b, true)? == Some(true)))
}

pub fn greater_than(a: &Value, b: &Value) -> Outcome {
    Ok(Value::Bool(coerce::less_than(b, a, false)? == Some(true)))
}

pub fn less_or_equal(a: &Value, b: &Value) -> Outcome {
    Ok(Value::Bool(coerce::less_than(b, a, false)? == Some(false)))
}

pub fn greater_or_equal(a: &Value, b: &Value) -> Outcome {
    Ok(Value::Bool(coerce::less_than(a, b, true)? == Some(false)))
}

pub fn loose_equal(a: &Value, b: &Value) -> Outcome {
    Ok(Value::Bool(loose_equals(a, b)?))
}

pub fn strict_equal(a: &Value, b: &Value) -> Outcome {
    Ok(Value::Bool(strict_equals(a, b)))
}

pub fn bit_and(a: &Value, b: &Value) -> Outcome {
    int32(a, b, |x, y| x & y)
}

pub fn bit_or(a: &Value, b: &Value) -> Outcome {
    int32(a, b, |x, y| x | y)
}

pub fn bit_xor(a: &Value, b: &Value) -> Outcome {
    int32(a, b, |x, y| x ^ y)
}

pub fn left_shift(a: &Value, b: &Value) -> Outcome {
    let x = to_int32(to_number(a)?);
    let shift = to_uint32(to_number(b)?) & 31;
    Ok(Value::Number(f64::from(x.wrapping_shl(shift))))
}

/// Sign-propagating `>>`
pub fn right_shift(a: &Value, b: &Value) -> Outcome {
    let x = to_int32(to_number(a)?);
    let shift = to_uint32(to_number(b)?) & 31;
    Ok(Value::Number(f64::from(x >> shift)))
}

/// Zero-filling `>>>`; never dispatched, used by the evaluator
pub fn unsigned_right_shift(a: &Value, b: &Value) -> Outcome {
    let x = to_uint32(to_number(a)?);
    let shift = to_uint32(to_number(b)?) & 31;
    Ok(Value::Number(f64::from(x >> shift)))
}

pub fn bit_not(a: &Value) -> Outcome {
    Ok(Value::Number(f64::from(!to_int32(to_number(a)?))))
}

pub fn increment(a: &Value) -> Outcome {
    Ok(Value::Number(to_number(a)? + 1.0))
}

pub fn decrement(a: &Value) -> Outcome {
    Ok(Value::Number(to_number(a)? - 1.0))
}

pub fn negate(a: &Value) -> Outcome {
    Ok(Value::Number(-to_number(a)?))
}

pub fn positive(a: &Value) -> Outcome {
    Ok(Value::Number(to_number(a)?))
}

pub fn not(a: &Value) -> Outcome {
    Ok(Value::Bool(!truthy(a)))
}
