//! The runtime entry point as seen by evaluated code
//!
//! `import { Operator } from 'macaroni'` binds the `Operator` property of the
//! object built here. Every [`RuntimeMethod`] is one native function on it.

use crate::operators::RuntimeMethod;
use crate::runtime::dispatch::Operator;
use crate::runtime::property::capture_property_access;
use crate::runtime::value::{Object, Value};
use std::rc::Rc;

/// Name of the exported dispatch object
pub const OPERATOR_EXPORT: &str = "Operator";

/// Name of the exported interception helper
pub const CAPTURE_EXPORT: &str = "capturePropertyAccess";

/// The `Operator` object: one native per runtime method
pub fn operator_object(operator: Rc<Operator>) -> Value {
    let mut object = Object::new();
    for method in RuntimeMethod::ALL {
        let operator = operator.clone();
        let function = Value::native(method.name(), move |_, args| operator.invoke(method, args));
        object.set(method.name(), function);
    }
    Value::object(object)
}

/// The module namespace object for the runtime
pub fn runtime_module(operator: Rc<Operator>) -> Value {
    let capture = Value::native(CAPTURE_EXPORT, |_, args| {
        capture_property_access(&args.first().cloned().unwrap_or_default())
    });
    Value::object(
        Object::new()
            .with(OPERATOR_EXPORT, operator_object(operator))
            .with(CAPTURE_EXPORT, capture),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::property::get_property;

    fn call(object: &Value, name: &str, args: &[Value]) -> Value {
        let Value::Function(f) = get_property(object, name).unwrap() else {
            panic!("{name} is not a function");
        };
        f.call_native(object, args).unwrap()
    }

    #[test]
    fn test_exports_every_method() {
        let module = runtime_module(Rc::new(Operator::new()));
        let operator = get_property(&module, OPERATOR_EXPORT).unwrap();
        for method in RuntimeMethod::ALL {
            assert!(
                matches!(get_property(&operator, method.name()).unwrap(), Value::Function(_)),
                "missing {}",
                method.name()
            );
        }
    }

    #[test]
    fn test_methods_dispatch() {
        let operator = operator_object(Rc::new(Operator::new()));
        assert_eq!(
            call(&operator, "add", &[Value::Number(1.0), Value::Number(2.0)]),
            Value::Number(3.0)
        );
        assert_eq!(
            call(&operator, "strictNotEqual", &[Value::Number(1.0), Value::string("1")]),
            Value::Bool(true)
        );
        assert_eq!(call(&operator, "increment", &[Value::Number(5.0)]), Value::Number(6.0));
    }
}
