//! Runtime value model
//!
//! - [`Value`]: every value the dispatch runtime and the evaluator handle
//! - [`Object`]: a property bag with a token-keyed override table
//! - [`Function`]: native or script-defined callables
//! - [`Proxy`]: the indirection installed by property-access interception
//!
//! Objects, functions and proxies are reference types: cloning a [`Value`]
//! clones the handle, and equality between them is identity.

use crate::operators::{OperationKind, OperatorToken};
use crate::runtime::errors::DispatchError;
use rustc_hash::FxHashMap;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Host function: receives `this` and the arguments
pub type NativeFn = Rc<dyn Fn(&Value, &[Value]) -> Result<Value, DispatchError>>;

pub type ObjectRef = Rc<RefCell<Object>>;
pub type FunctionRef = Rc<Function>;
pub type ProxyRef = Rc<Proxy>;

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Object(ObjectRef),
    Function(FunctionRef),
    Proxy(ProxyRef),
}

/// The primitive categories that can carry their own overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Bool,
    Number,
    String,
}

impl Value {
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    pub fn function(function: Function) -> Self {
        Value::Function(Rc::new(function))
    }

    /// A plain, non-constructible host function
    pub fn native(
        name: impl Into<String>,
        f: impl Fn(&Value, &[Value]) -> Result<Value, DispatchError> + 'static,
    ) -> Self {
        Value::function(Function::native(name, f))
    }

    /// `null` or `undefined`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Anything that is not an object, a callable or a proxy
    pub fn is_primitive(&self) -> bool {
        !matches!(self, Value::Object(_) | Value::Function(_) | Value::Proxy(_))
    }

    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        match self {
            Value::Bool(_) => Some(PrimitiveType::Bool),
            Value::Number(_) => Some(PrimitiveType::Number),
            Value::String(_) => Some(PrimitiveType::String),
            _ => None,
        }
    }

    /// Result of the `typeof` operator
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Object(_) => "object",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Proxy(proxy) => proxy.target().type_of(),
        }
    }

    /// Short category name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
            Value::Function(f) if f.is_constructible() => "constructor",
            Value::Function(_) => "function",
            Value::Proxy(_) => "proxy",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The override this value carries for `kind`, if any.
    ///
    /// Primitives never carry overrides themselves; per-type overrides live
    /// in the dispatcher.
    pub fn own_override(&self, kind: OperationKind) -> Option<NativeFn> {
        let token = kind.token();
        match self {
            Value::Object(object) => object.borrow().override_for(token),
            Value::Function(function) => function.properties.borrow().override_for(token),
            Value::Proxy(proxy) => proxy.target().own_override(kind),
            _ => None,
        }
    }

    /// Identity for reference types, value equality for primitives
    pub fn same_reference(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Proxy(a), Value::Proxy(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl PartialEq for Value {
    /// Structural for primitives (`NaN` equals nothing), identity otherwise
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            _ => self.same_reference(other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => f.write_str(&crate::runtime::coerce::number_to_string(*n)),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Object(object) => {
                let object = object.borrow();
                let mut keys: Vec<_> = object.properties.keys().collect();
                keys.sort();
                write!(f, "Object {{ ")?;
                for key in keys {
                    write!(f, "{} ", key)?;
                }
                write!(f, "}}")
            }
            Value::Function(function) => write!(f, "[Function: {}]", function.name),
            Value::Proxy(proxy) => write!(f, "Proxy({:?})", proxy.target()),
        }
    }
}

impl fmt::Display for Value {
    /// Side-effect free rendering, like `String(value)` without hooks
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Object(_) => f.write_str("[object Object]"),
            Value::Function(function) => {
                write!(f, "function {}() {{ [native code] }}", function.name)
            }
            Value::Proxy(proxy) => fmt::Display::fmt(proxy.target(), f),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

/// Property bag with an override table keyed by [`OperatorToken`]
#[derive(Clone, Default)]
pub struct Object {
    properties: FxHashMap<Rc<str>, Value>,
    overrides: FxHashMap<OperatorToken, NativeFn>,
    to_primitive: Option<NativeFn>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.properties.get(key).cloned()
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.properties.insert(Rc::from(key), value);
    }

    pub fn has_own(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|k| &**k)
    }

    pub fn override_for(&self, token: OperatorToken) -> Option<NativeFn> {
        self.overrides.get(&token).cloned()
    }

    pub fn set_override(&mut self, kind: OperationKind, f: NativeFn) {
        self.overrides.insert(kind.token(), f);
    }

    pub fn to_primitive_hook(&self) -> Option<NativeFn> {
        self.to_primitive.clone()
    }

    pub fn set_to_primitive(&mut self, f: NativeFn) {
        self.to_primitive = Some(f);
    }

    /// Chainable: add a data property
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value.into());
        self
    }

    /// Chainable: register an override for `kind`
    pub fn with_override(
        mut self,
        kind: OperationKind,
        f: impl Fn(&Value, &[Value]) -> Result<Value, DispatchError> + 'static,
    ) -> Self {
        self.set_override(kind, Rc::new(f));
        self
    }

    /// Chainable: install a to-primitive conversion hook; it receives the
    /// hint (`"default"`, `"number"` or `"string"`) as its only argument
    pub fn with_to_primitive(
        mut self,
        f: impl Fn(&Value, &[Value]) -> Result<Value, DispatchError> + 'static,
    ) -> Self {
        self.set_to_primitive(Rc::new(f));
        self
    }
}

/// What runs when a function is called
#[derive(Clone)]
pub enum FunctionBody {
    Native(NativeFn),
    /// Opaque closure owned by the evaluator
    Script(Rc<dyn Any>),
}

pub struct Function {
    pub name: String,
    body: FunctionBody,
    constructible: bool,
    /// Own properties and overrides; functions are objects too
    pub properties: ObjectRef,
}

impl Function {
    pub fn native(
        name: impl Into<String>,
        f: impl Fn(&Value, &[Value]) -> Result<Value, DispatchError> + 'static,
    ) -> Self {
        Function {
            name: name.into(),
            body: FunctionBody::Native(Rc::new(f)),
            constructible: false,
            properties: Rc::new(RefCell::new(Object::new())),
        }
    }

    /// A host constructor: called with a fresh object as `this`
    pub fn constructor(
        name: impl Into<String>,
        f: impl Fn(&Value, &[Value]) -> Result<Value, DispatchError> + 'static,
    ) -> Self {
        Function {
            constructible: true,
            ..Function::native(name, f)
        }
    }

    pub fn script(name: impl Into<String>, closure: Rc<dyn Any>) -> Self {
        Function {
            name: name.into(),
            body: FunctionBody::Script(closure),
            constructible: true,
            properties: Rc::new(RefCell::new(Object::new())),
        }
    }

    pub fn body(&self) -> &FunctionBody {
        &self.body
    }

    pub fn is_constructible(&self) -> bool {
        self.constructible
    }

    /// Call a native function; script functions need the evaluator
    pub fn call_native(&self, this: &Value, args: &[Value]) -> Result<Value, DispatchError> {
        match &self.body {
            FunctionBody::Native(f) => f(this, args),
            FunctionBody::Script(_) => Err(DispatchError::NotCallable(self.name.clone())),
        }
    }
}

/// How a proxy intercepts its target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    /// Property reads and writes go through the target's overrides
    Instance,
    /// Construction results are wrapped in an [`ProxyKind::Instance`] proxy
    Constructor,
}

pub struct Proxy {
    target: Value,
    kind: ProxyKind,
}

impl Proxy {
    pub(crate) fn new(target: Value, kind: ProxyKind) -> Self {
        Proxy { target, kind }
    }

    pub fn target(&self) -> &Value {
        &self.target
    }

    pub fn kind(&self) -> ProxyKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_classification() {
        assert!(Value::Bool(true).is_primitive());
        assert!(Value::Number(0.0).is_primitive());
        assert!(Value::string("hello").is_primitive());
        assert!(Value::Undefined.is_primitive());
        assert!(!Value::object(Object::new()).is_primitive());
        assert!(!Value::native("f", |_, _| Ok(Value::Undefined)).is_primitive());
    }

    #[test]
    fn test_reference_equality() {
        let a = Value::object(Object::new());
        let b = Value::object(Object::new());
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_overrides_are_keyed_by_token_not_name() {
        let object = Value::object(
            Object::new()
                .with("add", Value::number(1.0))
                .with_override(OperationKind::Subtract, |_, _| Ok(Value::Null)),
        );
        assert!(object.own_override(OperationKind::Add).is_none());
        assert!(object.own_override(OperationKind::Subtract).is_some());
    }

    #[test]
    fn test_type_of() {
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::native("f", |_, _| Ok(Value::Undefined)).type_of(), "function");
        assert_eq!(Value::string("").type_of(), "string");
    }
}
