//! Operation registry
//!
//! The fixed catalogue of operations that can be overloaded:
//! - [`OperationKind`]: the closed set of operation identities
//! - [`OperatorToken`]: the opaque key an override is registered under
//! - [`OperationSpec`]: arity, primitive behavior, inverse and display string
//! - [`RuntimeMethod`]: the callables exposed by the runtime entry point
//!
//! # Tokens
//!
//! Overrides are keyed by [`OperatorToken`], never by property names. A token
//! can only be obtained from [`OperationKind::token`], so an ordinary data
//! property called `add` can never be mistaken for an `Add` override.
//!
//! # Table
//!
//! All registry data lives in one `static` table built at compile time.
//! Lookups never allocate.

use crate::runtime::errors::DispatchError;
use crate::runtime::primitive;
use crate::runtime::value::Value;
use std::fmt;

/// Placeholder shown for operations the registry does not know about
pub const UNKNOWN_OPERATOR: &str = "?<unknown>";

/// Every operation that can be overloaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    LooseEqual,
    StrictEqual,
    /// `&`
    LogicalAnd,
    /// `|`
    LogicalOr,
    /// `^`
    LogicalXor,
    /// `~`
    LogicalNot,
    LeftShift,
    RightShift,
    Increment,
    Decrement,
    /// Unary `-`
    Negate,
    /// Unary `+`
    Positive,
    /// `!`
    Not,
    GetProperty,
    SetProperty,
}

/// Opaque identity of an [`OperationKind`], used as the override key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorToken(OperationKind);

impl OperatorToken {
    pub fn kind(self) -> OperationKind {
        self.0
    }
}

impl fmt::Debug for OperatorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[Macaroni.Operator.{}]]", self.0.spec().token_name)
    }
}

/// Number of operands an operation takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Binary,
}

impl Arity {
    pub fn count(self) -> usize {
        match self {
            Arity::Unary => 1,
            Arity::Binary => 2,
        }
    }
}

pub type UnaryPrimitive = fn(&Value) -> Result<Value, DispatchError>;
pub type BinaryPrimitive = fn(&Value, &Value) -> Result<Value, DispatchError>;

/// Built-in behavior used when the left operand is a primitive
#[derive(Clone, Copy)]
pub enum Primitive {
    Unary(UnaryPrimitive),
    Binary(BinaryPrimitive),
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Unary(_) => f.write_str("Primitive::Unary"),
            Primitive::Binary(_) => f.write_str("Primitive::Binary"),
        }
    }
}

/// Registry entry for one operation
#[derive(Debug)]
pub struct OperationSpec {
    pub kind: OperationKind,
    pub arity: Arity,
    /// `None` for operations that only exist for interception
    pub primitive: Option<Primitive>,
    /// Logical negation of this operation; only set for the orderings
    pub inverse: Option<OperationKind>,
    pub display: &'static str,
    token_name: &'static str,
}

macro_rules! spec {
    ($kind:ident, $arity:ident, $primitive:expr, $inverse:expr, $display:literal, $token:literal) => {
        OperationSpec {
            kind: OperationKind::$kind,
            arity: Arity::$arity,
            primitive: $primitive,
            inverse: $inverse,
            display: $display,
            token_name: $token,
        }
    };
}

use Primitive::{Binary, Unary};

/// Indexed by `OperationKind as usize`
static OPERATIONS: [OperationSpec; 25] = [
    spec!(Add, Binary, Some(Binary(primitive::add)), None, "+", "Add"),
    spec!(Subtract, Binary, Some(Binary(primitive::subtract)), None, "-", "Sub"),
    spec!(Multiply, Binary, Some(Binary(primitive::multiply)), None, "*", "Mul"),
    spec!(Divide, Binary, Some(Binary(primitive::divide)), None, "/", "Div"),
    spec!(Modulo, Binary, Some(Binary(primitive::modulo)), None, "%", "Mod"),
    spec!(Power, Binary, Some(Binary(primitive::power)), None, "**", "Pow"),
    spec!(
        LessThan,
        Binary,
        Some(Binary(primitive::less_than)),
        Some(OperationKind::GreaterOrEqual),
        "<",
        "Less"
    ),
    spec!(
        LessOrEqual,
        Binary,
        Some(Binary(primitive::less_or_equal)),
        Some(OperationKind::GreaterThan),
        "<=",
        "LessEq"
    ),
    spec!(
        GreaterThan,
        Binary,
        Some(Binary(primitive::greater_than)),
        Some(OperationKind::LessOrEqual),
        ">",
        "Greater"
    ),
    spec!(
        GreaterOrEqual,
        Binary,
        Some(Binary(primitive::greater_or_equal)),
        Some(OperationKind::LessThan),
        ">=",
        "GreaterEq"
    ),
    spec!(LooseEqual, Binary, Some(Binary(primitive::loose_equal)), None, "==", "UnsafeEq"),
    spec!(StrictEqual, Binary, Some(Binary(primitive::strict_equal)), None, "===", "StrictEq"),
    spec!(LogicalAnd, Binary, Some(Binary(primitive::bit_and)), None, "&", "LogicalAnd"),
    spec!(LogicalOr, Binary, Some(Binary(primitive::bit_or)), None, "|", "LogicalOr"),
    spec!(LogicalXor, Binary, Some(Binary(primitive::bit_xor)), None, "^", "LogicalXor"),
    spec!(LogicalNot, Unary, Some(Unary(primitive::bit_not)), None, "~", "LogicalNot"),
    spec!(LeftShift, Binary, Some(Binary(primitive::left_shift)), None, "<<", "LShift"),
    spec!(RightShift, Binary, Some(Binary(primitive::right_shift)), None, ">>", "RShift"),
    spec!(Increment, Unary, Some(Unary(primitive::increment)), None, "++", "Increment"),
    spec!(Decrement, Unary, Some(Unary(primitive::decrement)), None, "--", "Decrement"),
    spec!(Negate, Unary, Some(Unary(primitive::negate)), None, "-x", "Negate"),
    spec!(Positive, Unary, Some(Unary(primitive::positive)), None, "+x", "Positive"),
    spec!(Not, Unary, Some(Unary(primitive::not)), None, "!", "Not"),
    spec!(GetProperty, Binary, None, None, "[[Get]]", "GetProperty"),
    spec!(SetProperty, Binary, None, None, "[[Set]]", "SetProperty"),
];

impl OperationKind {
    pub const ALL: [OperationKind; 25] = [
        OperationKind::Add,
        OperationKind::Subtract,
        OperationKind::Multiply,
        OperationKind::Divide,
        OperationKind::Modulo,
        OperationKind::Power,
        OperationKind::LessThan,
        OperationKind::LessOrEqual,
        OperationKind::GreaterThan,
        OperationKind::GreaterOrEqual,
        OperationKind::LooseEqual,
        OperationKind::StrictEqual,
        OperationKind::LogicalAnd,
        OperationKind::LogicalOr,
        OperationKind::LogicalXor,
        OperationKind::LogicalNot,
        OperationKind::LeftShift,
        OperationKind::RightShift,
        OperationKind::Increment,
        OperationKind::Decrement,
        OperationKind::Negate,
        OperationKind::Positive,
        OperationKind::Not,
        OperationKind::GetProperty,
        OperationKind::SetProperty,
    ];

    pub fn spec(self) -> &'static OperationSpec {
        &OPERATIONS[self as usize]
    }

    pub fn token(self) -> OperatorToken {
        OperatorToken(self)
    }

    pub fn arity(self) -> Arity {
        self.spec().arity
    }

    pub fn display(self) -> &'static str {
        self.spec().display
    }

    pub fn inverse(self) -> Option<OperationKind> {
        self.spec().inverse
    }

    pub fn primitive(self) -> Option<Primitive> {
        self.spec().primitive
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// Callables exposed on the runtime entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeMethod {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    LooseEqual,
    LooseNotEqual,
    StrictEqual,
    StrictNotEqual,
    LogicalAnd,
    LogicalOr,
    LogicalXor,
    LogicalNot,
    LeftShift,
    RightShift,
    Increment,
    Decrement,
    Negate,
    Positive,
    Not,
}

impl RuntimeMethod {
    pub const ALL: [RuntimeMethod; 25] = [
        RuntimeMethod::Add,
        RuntimeMethod::Subtract,
        RuntimeMethod::Multiply,
        RuntimeMethod::Divide,
        RuntimeMethod::Modulo,
        RuntimeMethod::Power,
        RuntimeMethod::LessThan,
        RuntimeMethod::LessOrEqual,
        RuntimeMethod::GreaterThan,
        RuntimeMethod::GreaterOrEqual,
        RuntimeMethod::LooseEqual,
        RuntimeMethod::LooseNotEqual,
        RuntimeMethod::StrictEqual,
        RuntimeMethod::StrictNotEqual,
        RuntimeMethod::LogicalAnd,
        RuntimeMethod::LogicalOr,
        RuntimeMethod::LogicalXor,
        RuntimeMethod::LogicalNot,
        RuntimeMethod::LeftShift,
        RuntimeMethod::RightShift,
        RuntimeMethod::Increment,
        RuntimeMethod::Decrement,
        RuntimeMethod::Negate,
        RuntimeMethod::Positive,
        RuntimeMethod::Not,
    ];

    /// Property name on the runtime entry point
    pub fn name(self) -> &'static str {
        match self {
            RuntimeMethod::Add => "add",
            RuntimeMethod::Subtract => "subtract",
            RuntimeMethod::Multiply => "multiply",
            RuntimeMethod::Divide => "divide",
            RuntimeMethod::Modulo => "modulo",
            RuntimeMethod::Power => "power",
            RuntimeMethod::LessThan => "lessThan",
            RuntimeMethod::LessOrEqual => "lessOrEqual",
            RuntimeMethod::GreaterThan => "greaterThan",
            RuntimeMethod::GreaterOrEqual => "greaterOrEqual",
            RuntimeMethod::LooseEqual => "looseEqual",
            RuntimeMethod::LooseNotEqual => "looseNotEqual",
            RuntimeMethod::StrictEqual => "strictEqual",
            RuntimeMethod::StrictNotEqual => "strictNotEqual",
            RuntimeMethod::LogicalAnd => "logicalAnd",
            RuntimeMethod::LogicalOr => "logicalOr",
            RuntimeMethod::LogicalXor => "logicalXor",
            RuntimeMethod::LogicalNot => "logicalNot",
            RuntimeMethod::LeftShift => "leftShift",
            RuntimeMethod::RightShift => "rightShift",
            RuntimeMethod::Increment => "increment",
            RuntimeMethod::Decrement => "decrement",
            RuntimeMethod::Negate => "negate",
            RuntimeMethod::Positive => "positive",
            RuntimeMethod::Not => "not",
        }
    }

    pub fn from_name(name: &str) -> Option<RuntimeMethod> {
        RuntimeMethod::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// The operation this method dispatches
    pub fn kind(self) -> OperationKind {
        match self {
            RuntimeMethod::Add => OperationKind::Add,
            RuntimeMethod::Subtract => OperationKind::Subtract,
            RuntimeMethod::Multiply => OperationKind::Multiply,
            RuntimeMethod::Divide => OperationKind::Divide,
            RuntimeMethod::Modulo => OperationKind::Modulo,
            RuntimeMethod::Power => OperationKind::Power,
            RuntimeMethod::LessThan => OperationKind::LessThan,
            RuntimeMethod::LessOrEqual => OperationKind::LessOrEqual,
            RuntimeMethod::GreaterThan => OperationKind::GreaterThan,
            RuntimeMethod::GreaterOrEqual => OperationKind::GreaterOrEqual,
            RuntimeMethod::LooseEqual | RuntimeMethod::LooseNotEqual => OperationKind::LooseEqual,
            RuntimeMethod::StrictEqual | RuntimeMethod::StrictNotEqual => {
                OperationKind::StrictEqual
            }
            RuntimeMethod::LogicalAnd => OperationKind::LogicalAnd,
            RuntimeMethod::LogicalOr => OperationKind::LogicalOr,
            RuntimeMethod::LogicalXor => OperationKind::LogicalXor,
            RuntimeMethod::LogicalNot => OperationKind::LogicalNot,
            RuntimeMethod::LeftShift => OperationKind::LeftShift,
            RuntimeMethod::RightShift => OperationKind::RightShift,
            RuntimeMethod::Increment => OperationKind::Increment,
            RuntimeMethod::Decrement => OperationKind::Decrement,
            RuntimeMethod::Negate => OperationKind::Negate,
            RuntimeMethod::Positive => OperationKind::Positive,
            RuntimeMethod::Not => OperationKind::Not,
        }
    }

    /// `looseNotEqual` and `strictNotEqual` negate the equality they dispatch
    pub fn negated(self) -> bool {
        matches!(self, RuntimeMethod::LooseNotEqual | RuntimeMethod::StrictNotEqual)
    }

    pub fn arity(self) -> Arity {
        self.kind().arity()
    }

    pub fn display(self) -> &'static str {
        match self {
            RuntimeMethod::LooseNotEqual => "!=",
            RuntimeMethod::StrictNotEqual => "!==",
            other => other.kind().display(),
        }
    }
}

/// Display string for a runtime method name; never fails
pub fn display_for_name(name: &str) -> &'static str {
    RuntimeMethod::from_name(name)
        .map(RuntimeMethod::display)
        .unwrap_or(UNKNOWN_OPERATOR)
}
