//! # Introduction
//!
//! Macaroni adds operator overloading to JavaScript. A source-to-source
//! rewrite pass turns operator syntax into explicit calls against a dispatch
//! runtime, and the runtime decides per call whether native primitive
//! behavior applies or an operand-supplied override does.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Rewrite pass → Printer → Source
//!                                        ↓
//!                                 Interpreter → Dispatch runtime
//! ```
//!
//! 1. [`parser`]: tokenises a JavaScript subset, builds an owned AST,
//!    prints it back and provides a mutable visitor.
//! 2. [`operators`]: the registry of overloadable operations, their
//!    override tokens and the runtime method names.
//! 3. [`rewrite`]: the rewrite pass and its configuration.
//! 4. [`runtime`]: the value model, native operator semantics, the
//!    [`runtime::Operator`] dispatcher and property-access interception.
//! 5. [`interpreter`]: a tree-walking evaluator that runs rewritten code
//!    against the runtime.
//!
//! ## Example
//!
//! ```rust
//! use macaroni::rewrite::{transform, RewriteConfig};
//!
//! let output = transform("cat.a + cat.b;", &RewriteConfig::default()).unwrap();
//! assert_eq!(
//!     output,
//!     "import { Operator } from 'macaroni';\nOperator.add(cat.a, cat.b);\n"
//! );
//! ```

pub mod interpreter;
pub mod operators;
pub mod parser;
pub mod rewrite;
pub mod runtime;
