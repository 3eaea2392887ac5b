//! Evaluator for rewritten units
//!
//! Executes a [`Program`](crate::parser::ast::Program) so that the output of
//! the rewrite pass can be checked for behavior, not only for text:
//! - [`engine`]: the [`Interpreter`], calls and hoisting
//! - [`scope`]: lexical environments
//! - [`errors`]: evaluation error types
//!
//! # Execution Model
//!
//! A plain tree walk. `statements`, `loops` and `expressions` each add an
//! `impl Interpreter` block. The dispatch runtime is importable as
//! `macaroni`, through `import { Operator } from 'macaroni'` as well as
//! `require('macaroni')`; host values are injected with
//! [`Interpreter::define_global`].
//!
//! Host functions (and therefore operator overrides) are native closures;
//! script functions can be called from scripts only.

pub mod constants;
pub mod engine;
pub mod errors;
mod expressions;
mod loops;
pub mod scope;
mod statements;

pub use engine::Interpreter;
pub use errors::EvalError;
