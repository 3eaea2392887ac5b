//! Dispatch runtime
//!
//! Decides, per operation call, whether the built-in primitive behavior
//! applies or an operand-supplied override does.
//!
//! - [`value`]: the value model and the override protocol
//! - [`coerce`] / [`primitive`]: native conversion and operator semantics
//! - [`dispatch`]: the [`Operator`] dispatcher
//! - [`property`]: property-access interception through proxies
//! - [`module`]: the runtime as an importable module object

pub mod coerce;
pub mod dispatch;
pub mod errors;
pub mod module;
pub mod primitive;
pub mod property;
pub mod value;

pub use dispatch::{Operator, OperatorBuilder};
pub use errors::DispatchError;
pub use property::capture_property_access;
pub use value::{Function, Object, PrimitiveType, ProxyKind, Value};
