//! Property-access interception
//!
//! [`capture_property_access`] puts a value behind a [`Proxy`]. Reads and
//! writes through the proxy consult the target's `GetProperty` /
//! `SetProperty` overrides and fall through to the target otherwise.
//!
//! Constructible functions get a [`ProxyKind::Constructor`] proxy: the
//! function itself is not intercepted, but every instance it constructs is
//! wrapped before it is handed back.

use crate::operators::OperationKind;
use crate::runtime::errors::DispatchError;
use crate::runtime::value::{FunctionRef, Object, Proxy, ProxyKind, Value};
use std::rc::Rc;

/// Wrap `value` so that property access goes through its overrides.
///
/// Capturing a proxy returns that same proxy.
pub fn capture_property_access(value: &Value) -> Result<Value, DispatchError> {
    match value {
        Value::Proxy(_) => Ok(value.clone()),
        Value::Object(_) => Ok(Value::Proxy(Rc::new(Proxy::new(
            value.clone(),
            ProxyKind::Instance,
        )))),
        Value::Function(function) if function.is_constructible() => Ok(Value::Proxy(Rc::new(
            Proxy::new(value.clone(), ProxyKind::Constructor),
        ))),
        other => Err(DispatchError::InvalidProxyTarget {
            found: other.kind_name(),
        }),
    }
}

/// Read `key` from `object`
pub fn get_property(object: &Value, key: &str) -> Result<Value, DispatchError> {
    match object {
        Value::Undefined | Value::Null => Err(DispatchError::NullOperand {
            operator: OperationKind::GetProperty.display(),
        }),
        Value::Proxy(proxy) => {
            let target = proxy.target();
            if proxy.kind() == ProxyKind::Instance {
                if let Some(f) = target.own_override(OperationKind::GetProperty) {
                    return f(target, &[Value::string(key)]);
                }
            }
            get_property(target, key)
        }
        Value::Object(obj) => Ok(obj.borrow().get(key).unwrap_or_default()),
        Value::Function(function) => match function.properties.borrow().get(key) {
            Some(value) => Ok(value),
            None if key == "name" => Ok(Value::string(&function.name)),
            None => Ok(Value::Undefined),
        },
        Value::String(s) if key == "length" => Ok(Value::Number(s.encode_utf16().count() as f64)),
        _ => Ok(Value::Undefined),
    }
}

/// Write `value` to `key` on `object`.
///
/// Writes to primitives are silently dropped, as in sloppy-mode scripts.
pub fn set_property(object: &Value, key: &str, value: Value) -> Result<(), DispatchError> {
    match object {
        Value::Undefined | Value::Null => Err(DispatchError::NullOperand {
            operator: OperationKind::SetProperty.display(),
        }),
        Value::Proxy(proxy) => {
            let target = proxy.target();
            if proxy.kind() == ProxyKind::Instance {
                if let Some(f) = target.own_override(OperationKind::SetProperty) {
                    f(target, &[Value::string(key), value])?;
                    return Ok(());
                }
            }
            set_property(target, key, value)
        }
        Value::Object(obj) => {
            obj.borrow_mut().set(key, value);
            Ok(())
        }
        Value::Function(function) => {
            function.properties.borrow_mut().set(key, value);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// `new callee(...args)`.
///
/// `call` runs the function body with the fresh instance as `this`; the
/// evaluator passes one that can run script functions. A constructor proxy
/// wraps whatever instance comes back.
pub fn construct_with<E>(
    callee: &Value,
    args: &[Value],
    call: &mut dyn FnMut(&FunctionRef, &Value, &[Value]) -> Result<Value, E>,
) -> Result<Value, E>
where
    E: From<DispatchError>,
{
    match callee {
        Value::Proxy(proxy) if proxy.kind() == ProxyKind::Constructor => {
            let instance = construct_with(proxy.target(), args, call)?;
            Ok(capture_property_access(&instance)?)
        }
        Value::Function(function) if function.is_constructible() => {
            let instance = Value::object(Object::new());
            let result = call(function, &instance, args)?;
            if result.is_primitive() {
                Ok(instance)
            } else {
                Ok(result)
            }
        }
        other => Err(DispatchError::NotConstructible(other.to_string()).into()),
    }
}

/// `new callee(...args)` for host constructors only
pub fn construct(callee: &Value, args: &[Value]) -> Result<Value, DispatchError> {
    construct_with(callee, args, &mut |function, this, args| {
        function.call_native(this, args)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::Function;
    use std::cell::RefCell;

    fn uppercase_getter() -> Value {
        Value::object(
            Object::new()
                .with("secret", "hidden")
                .with_override(OperationKind::GetProperty, |_, args| {
                    let key = args[0].as_str().unwrap_or_default().to_uppercase();
                    Ok(Value::string(key))
                }),
        )
    }

    #[test]
    fn test_get_override_receives_property_name() {
        let proxy = capture_property_access(&uppercase_getter()).unwrap();
        assert_eq!(get_property(&proxy, "name").unwrap(), Value::string("NAME"));
        assert_eq!(get_property(&proxy, "secret").unwrap(), Value::string("SECRET"));
    }

    #[test]
    fn test_unwrapped_value_is_not_intercepted() {
        let object = uppercase_getter();
        assert_eq!(get_property(&object, "secret").unwrap(), Value::string("hidden"));
    }

    #[test]
    fn test_pass_through_without_overrides() {
        let object = Value::object(Object::new().with("x", 1.0));
        let proxy = capture_property_access(&object).unwrap();
        assert_eq!(get_property(&proxy, "x").unwrap(), Value::Number(1.0));
        set_property(&proxy, "y", Value::Number(2.0)).unwrap();
        assert_eq!(get_property(&object, "y").unwrap(), Value::Number(2.0));
        assert_eq!(get_property(&proxy, "missing").unwrap(), Value::Undefined);
    }

    #[test]
    fn test_set_override_receives_name_and_value() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let object = Value::object(Object::new().with_override(
            OperationKind::SetProperty,
            move |this, args| {
                assert!(matches!(this, Value::Object(_)));
                sink.borrow_mut().push((args[0].clone(), args[1].clone()));
                Ok(Value::Undefined)
            },
        ));
        let proxy = capture_property_access(&object).unwrap();
        set_property(&proxy, "x", Value::Number(3.0)).unwrap();

        assert_eq!(*log.borrow(), vec![(Value::string("x"), Value::Number(3.0))]);
        // The write was intercepted, not applied
        assert_eq!(get_property(&object, "x").unwrap(), Value::Undefined);
    }

    #[test]
    fn test_capture_is_idempotent() {
        let proxy = capture_property_access(&Value::object(Object::new())).unwrap();
        let again = capture_property_access(&proxy).unwrap();
        assert!(proxy.same_reference(&again));
    }

    #[test]
    fn test_invalid_targets() {
        for value in [
            Value::Number(1.0),
            Value::string("s"),
            Value::Null,
            Value::Undefined,
            Value::native("f", |_, _| Ok(Value::Undefined)),
        ] {
            assert!(matches!(
                capture_property_access(&value),
                Err(DispatchError::InvalidProxyTarget { .. })
            ));
        }
    }

    #[test]
    fn test_constructor_proxy_wraps_instances() {
        let point = Value::function(Function::constructor("Point", |this, args| {
            let Value::Object(obj) = this else {
                return Err(DispatchError::thrown("no instance"));
            };
            let mut obj = obj.borrow_mut();
            obj.set("x", args.first().cloned().unwrap_or_default());
            obj.set_override(
                OperationKind::GetProperty,
                Rc::new(|this, args| {
                    let key = args[0].as_str().unwrap_or_default();
                    match this {
                        Value::Object(o) => Ok(o.borrow().get(key).unwrap_or(Value::Number(0.0))),
                        _ => Ok(Value::Undefined),
                    }
                }),
            );
            Ok(Value::Undefined)
        }));
        let wrapped = capture_property_access(&point).unwrap();
        let instance = construct(&wrapped, &[Value::Number(4.0)]).unwrap();

        assert!(matches!(&instance, Value::Proxy(p) if p.kind() == ProxyKind::Instance));
        assert_eq!(get_property(&instance, "x").unwrap(), Value::Number(4.0));
        assert_eq!(get_property(&instance, "y").unwrap(), Value::Number(0.0));
        // Plain construction is untouched
        let plain = construct(&point, &[Value::Number(1.0)]).unwrap();
        assert!(matches!(plain, Value::Object(_)));
    }

    #[test]
    fn test_nullish_access_fails() {
        assert!(matches!(
            get_property(&Value::Null, "x"),
            Err(DispatchError::NullOperand { operator: "[[Get]]" })
        ));
        assert!(matches!(
            set_property(&Value::Undefined, "x", Value::Null),
            Err(DispatchError::NullOperand { operator: "[[Set]]" })
        ));
    }

    #[test]
    fn test_string_length() {
        assert_eq!(get_property(&Value::string("héllo"), "length").unwrap(), Value::Number(5.0));
    }
}
