// AST (Abstract Syntax Tree) definitions for the JavaScript subset

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Binary operators (non short-circuiting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    // Comparison
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
    // Relational keywords
    In,
    InstanceOf,
}

impl BinaryOp {
    /// Source text of the operator
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Exp => "**",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        }
    }
}

/// Short-circuiting operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,     // &&
    Or,      // ||
    Nullish, // ??
}

impl LogicalOp {
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::Nullish => "??",
        }
    }
}

/// Prefix unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,    // -x
    Plus,   // +x
    Not,    // !x
    BitNot, // ~x
    Typeof,
    Void,
    Delete,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        }
    }

    /// Keyword operators need a space before their operand
    pub fn is_keyword(self) -> bool {
        matches!(self, UnaryOp::Typeof | UnaryOp::Void | UnaryOp::Delete)
    }
}

/// Increment / decrement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

/// Assignment operators, plain and compound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Nullish,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
            AssignOp::Exp => "**=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::And => "&&=",
            AssignOp::Or => "||=",
            AssignOp::Nullish => "??=",
        }
    }

    /// The binary operator a compound assignment applies, if it is one
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Mod => Some(BinaryOp::Mod),
            AssignOp::Exp => Some(BinaryOp::Exp),
            AssignOp::Shl => Some(BinaryOp::Shl),
            AssignOp::Shr => Some(BinaryOp::Shr),
            AssignOp::UShr => Some(BinaryOp::UShr),
            AssignOp::BitAnd => Some(BinaryOp::BitAnd),
            AssignOp::BitOr => Some(BinaryOp::BitOr),
            AssignOp::BitXor => Some(BinaryOp::BitXor),
            AssignOp::Assign | AssignOp::And | AssignOp::Or | AssignOp::Nullish => None,
        }
    }

    /// The short-circuiting operator of a logical assignment (`&&=`, `||=`, `??=`)
    pub fn logical(self) -> Option<LogicalOp> {
        match self {
            AssignOp::And => Some(LogicalOp::And),
            AssignOp::Or => Some(LogicalOp::Or),
            AssignOp::Nullish => Some(LogicalOp::Nullish),
            _ => None,
        }
    }
}

/// `var`, `let` or `const`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

/// Property name after `.` or inside `[]`
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    Named(String),
    Computed(Box<Expr>),
}

/// `key: value` entry of an object literal
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Expr,
    pub shorthand: bool,
}

/// Binding or assignment target
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Ident(String, SourceLocation),
    /// Always holds an [`Expr::Member`]
    Member(Box<Expr>),
    Array {
        elements: Vec<Option<Pattern>>,
        location: SourceLocation,
    },
    Object {
        properties: Vec<(String, Pattern)>,
        location: SourceLocation,
    },
}

impl Pattern {
    /// Plain names and property accesses; everything else is destructuring
    pub fn is_simple(&self) -> bool {
        matches!(self, Pattern::Ident(..) | Pattern::Member(_))
    }

    /// The pattern read back as an expression (simple targets only)
    pub fn to_expr(&self) -> Option<Expr> {
        match self {
            Pattern::Ident(name, loc) => Some(Expr::Ident(name.clone(), *loc)),
            Pattern::Member(expr) => Some((**expr).clone()),
            _ => None,
        }
    }

    /// Collect every name this pattern binds or mentions
    pub fn names(&self, out: &mut Vec<String>) {
        match self {
            Pattern::Ident(name, _) => out.push(name.clone()),
            Pattern::Member(_) => {}
            Pattern::Array { elements, .. } => {
                for element in elements.iter().flatten() {
                    element.names(out);
                }
            }
            Pattern::Object { properties, .. } => {
                for (_, value) in properties {
                    value.names(out);
                }
            }
        }
    }
}

/// One `name = init` entry of a variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub target: Pattern,
    pub init: Option<Expr>,
}

/// One binding of an import declaration
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    Default(String),
    Namespace(String),
    Named { imported: String, local: String },
}

impl ImportSpecifier {
    pub fn local(&self) -> &str {
        match self {
            ImportSpecifier::Default(local) | ImportSpecifier::Namespace(local) => local,
            ImportSpecifier::Named { local, .. } => local,
        }
    }
}

/// Initialiser clause of a `for` statement
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Var {
        kind: VarKind,
        declarators: Vec<Declarator>,
    },
    Expr(Expr),
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number {
        raw: String,
        location: SourceLocation,
    },
    Str {
        value: String,
        raw: String,
        location: SourceLocation,
    },
    Bool(bool, SourceLocation),
    Null(SourceLocation),
    This(SourceLocation),
    Ident(String, SourceLocation),
    Array {
        elements: Vec<Expr>,
        location: SourceLocation,
    },
    Object {
        properties: Vec<Property>,
        location: SourceLocation,
    },
    Function {
        name: Option<String>,
        params: Vec<String>,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    Member {
        object: Box<Expr>,
        property: MemberProperty,
        location: SourceLocation,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        target: Box<Expr>,
        location: SourceLocation,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
        location: SourceLocation,
    },
    Assign {
        op: AssignOp,
        target: Pattern,
        value: Box<Expr>,
        location: SourceLocation,
    },
    Sequence {
        exprs: Vec<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Number { location, .. }
            | Expr::Str { location, .. }
            | Expr::Array { location, .. }
            | Expr::Object { location, .. }
            | Expr::Function { location, .. }
            | Expr::Member { location, .. }
            | Expr::Call { location, .. }
            | Expr::New { location, .. }
            | Expr::Unary { location, .. }
            | Expr::Update { location, .. }
            | Expr::Binary { location, .. }
            | Expr::Logical { location, .. }
            | Expr::Conditional { location, .. }
            | Expr::Assign { location, .. }
            | Expr::Sequence { location, .. } => *location,
            Expr::Bool(_, loc) | Expr::Null(loc) | Expr::This(loc) | Expr::Ident(_, loc) => *loc,
        }
    }

    /// `name` or `obj.prop` / `obj[key]`
    pub fn is_simple_target(&self) -> bool {
        matches!(self, Expr::Ident(..) | Expr::Member { .. })
    }

    pub fn ident(name: impl Into<String>, location: SourceLocation) -> Self {
        Expr::Ident(name.into(), location)
    }

    /// `object.name`
    pub fn member(object: Expr, name: impl Into<String>, location: SourceLocation) -> Self {
        Expr::Member {
            object: Box::new(object),
            property: MemberProperty::Named(name.into()),
            location,
        }
    }

    pub fn call(callee: Expr, args: Vec<Expr>, location: SourceLocation) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
            location,
        }
    }

    /// `target = value`
    pub fn assign(target: Pattern, value: Expr, location: SourceLocation) -> Self {
        Expr::Assign {
            op: AssignOp::Assign,
            target,
            value: Box::new(value),
            location,
        }
    }
}

/// Statements
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Import {
        specifiers: Vec<ImportSpecifier>,
        source: String,
        location: SourceLocation,
    },
    VarDecl {
        kind: VarKind,
        declarators: Vec<Declarator>,
        location: SourceLocation,
    },
    FunctionDecl {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    Return {
        value: Option<Expr>,
        location: SourceLocation,
    },
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
        location: SourceLocation,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    Block {
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    Break(SourceLocation),
    Continue(SourceLocation),
    Empty(SourceLocation),
    Expression {
        expr: Expr,
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this node
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Import { location, .. }
            | Stmt::VarDecl { location, .. }
            | Stmt::FunctionDecl { location, .. }
            | Stmt::Return { location, .. }
            | Stmt::If { location, .. }
            | Stmt::While { location, .. }
            | Stmt::For { location, .. }
            | Stmt::Block { location, .. }
            | Stmt::Expression { location, .. } => *location,
            Stmt::Break(loc) | Stmt::Continue(loc) | Stmt::Empty(loc) => *loc,
        }
    }

    pub fn is_import(&self) -> bool {
        matches!(self, Stmt::Import { .. })
    }

    /// A string-literal expression statement, such as `'use strict';`.
    ///
    /// Only counts as a directive while it is part of the leading run of
    /// such statements in a unit or function body.
    pub fn is_directive(&self) -> bool {
        matches!(
            self,
            Stmt::Expression {
                expr: Expr::Str { .. },
                ..
            }
        )
    }
}

/// One compilation unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    revision: u64,
}

impl Program {
    pub fn new(body: Vec<Stmt>) -> Self {
        Program { body, revision: 0 }
    }

    /// Number of mutations applied to this tree since it was parsed
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn bump_revision(&mut self, mutations: u64) {
        self.revision += mutations;
    }
}
