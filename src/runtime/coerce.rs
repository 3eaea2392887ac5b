//! Implicit conversions
//!
//! The conversions the native operators apply to their operands: to
//! primitive, to number, to string, to 32-bit integer, truthiness, and the
//! comparison and equality algorithms built on them. Objects may take part
//! through a to-primitive hook (see [`Object::with_to_primitive`]) or native
//! `valueOf` / `toString` methods; otherwise they convert to
//! `"[object Object]"`.
//!
//! [`Object::with_to_primitive`]: crate::runtime::value::Object::with_to_primitive

use crate::runtime::errors::DispatchError;
use crate::runtime::value::{FunctionBody, Value};
use std::rc::Rc;

/// Preferred result type of a to-primitive conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    Default,
    Number,
    String,
}

impl Hint {
    pub fn as_str(self) -> &'static str {
        match self {
            Hint::Default => "default",
            Hint::Number => "number",
            Hint::String => "string",
        }
    }
}

pub fn to_primitive(value: &Value, hint: Hint) -> Result<Value, DispatchError> {
    match value {
        Value::Object(object) => {
            let hook = object.borrow().to_primitive_hook();
            if let Some(hook) = hook {
                let result = hook(value, &[Value::string(hint.as_str())])?;
                return if result.is_primitive() {
                    Ok(result)
                } else {
                    Err(DispatchError::thrown("Cannot convert object to primitive value"))
                };
            }

            let order = match hint {
                Hint::String => ["toString", "valueOf"],
                Hint::Default | Hint::Number => ["valueOf", "toString"],
            };
            for name in order {
                let method = object.borrow().get(name);
                if let Some(Value::Function(method)) = method {
                    if let FunctionBody::Native(f) = method.body() {
                        let result = f(value, &[])?;
                        if result.is_primitive() {
                            return Ok(result);
                        }
                    }
                }
            }
            Ok(Value::string("[object Object]"))
        }
        Value::Function(_) => Ok(Value::string(value.to_string())),
        Value::Proxy(proxy) => to_primitive(proxy.target(), hint),
        primitive => Ok(primitive.clone()),
    }
}

pub fn to_number(value: &Value) -> Result<f64, DispatchError> {
    Ok(match value {
        Value::Undefined => f64::NAN,
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => *n,
        Value::String(s) => string_to_number(s),
        other => return to_number(&to_primitive(other, Hint::Number)?),
    })
}

pub fn to_string(value: &Value) -> Result<Rc<str>, DispatchError> {
    Ok(match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => Rc::from(number_to_string(*n)),
        Value::Undefined => Rc::from("undefined"),
        Value::Null => Rc::from("null"),
        Value::Bool(b) => Rc::from(if *b { "true" } else { "false" }),
        other => return to_string(&to_primitive(other, Hint::String)?),
    })
}

pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::String(s) => !s.is_empty(),
        Value::Object(_) | Value::Function(_) | Value::Proxy(_) => true,
    }
}

/// String to number: whitespace trimmed, empty is zero, anything malformed is NaN
pub fn string_to_number(s: &str) -> f64 {
    let s = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if s.is_empty() {
        return 0.0;
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.is_empty() {
            return f64::NAN;
        }
        let mut value = 0.0;
        for c in digits.chars() {
            match c.to_digit(radix) {
                Some(d) => value = value * radix as f64 + d as f64,
                None => return f64::NAN,
            }
        }
        return value;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    // `str::parse` also accepts "inf" and "nan", which are not numbers here
    let well_formed = s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !well_formed {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Number to string with shortest round-trip digits.
///
/// Plain notation is used for decimal exponents in `-7 < e < 21`, exponent
/// notation (`1e+21`, `1.5e-7`) outside it.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let k = digits.len() as i32;
    let point = exponent + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let e = point - 1;
        let e_sign = if e < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, e_sign, e.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, e_sign, e.abs())
        }
    };

    format!("{}{}", sign, body)
}

fn modulo_2_32(n: f64) -> f64 {
    if !n.is_finite() || n == 0.0 {
        return 0.0;
    }
    n.trunc().rem_euclid(4_294_967_296.0)
}

pub fn to_int32(n: f64) -> i32 {
    let m = modulo_2_32(n);
    if m >= 2_147_483_648.0 {
        (m - 4_294_967_296.0) as i32
    } else {
        m as i32
    }
}

pub fn to_uint32(n: f64) -> u32 {
    modulo_2_32(n) as u32
}

/// Abstract relational comparison `x < y`; `None` when either side is NaN.
///
/// `left_first` controls which operand is converted first, so that
/// `a > b` (evaluated as `b < a`) still converts `a` before `b`.
pub fn less_than(x: &Value, y: &Value, left_first: bool) -> Result<Option<bool>, DispatchError> {
    let (px, py) = if left_first {
        let px = to_primitive(x, Hint::Number)?;
        (px, to_primitive(y, Hint::Number)?)
    } else {
        let py = to_primitive(y, Hint::Number)?;
        (to_primitive(x, Hint::Number)?, py)
    };

    if let (Value::String(a), Value::String(b)) = (&px, &py) {
        return Ok(Some(a.encode_utf16().lt(b.encode_utf16())));
    }

    let nx = to_number(&px)?;
    let ny = to_number(&py)?;
    if nx.is_nan() || ny.is_nan() {
        return Ok(None);
    }
    Ok(Some(nx < ny))
}

/// `===`
pub fn strict_equals(x: &Value, y: &Value) -> bool {
    match (x, y) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        _ => x.same_reference(y),
    }
}

/// `==`
pub fn loose_equals(x: &Value, y: &Value) -> Result<bool, DispatchError> {
    match (x, y) {
        (a, b) if a.is_nullish() && b.is_nullish() => Ok(true),
        (a, b) if a.is_nullish() || b.is_nullish() => Ok(false),
        (Value::Number(_), Value::Number(_))
        | (Value::String(_), Value::String(_))
        | (Value::Bool(_), Value::Bool(_)) => Ok(strict_equals(x, y)),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            Ok(*n == string_to_number(s))
        }
        (Value::Bool(b), other) => loose_equals(&Value::Number(f64::from(u8::from(*b))), other),
        (other, Value::Bool(b)) => loose_equals(other, &Value::Number(f64::from(u8::from(*b)))),
        (a, b) if !a.is_primitive() && !b.is_primitive() => Ok(a.same_reference(b)),
        (a, b) if !a.is_primitive() => loose_equals(&to_primitive(a, Hint::Default)?, b),
        (a, b) => loose_equals(a, &to_primitive(b, Hint::Default)?),
    }
}
