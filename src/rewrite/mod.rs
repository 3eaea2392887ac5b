//! Operator rewrite pass
//!
//! Turns operator syntax into explicit calls against the dispatch runtime:
//!
//! ```text
//! 1 + a        →  Operator.add(1, a)
//! a += 2       →  a = Operator.add(a, 2)
//! ++a          →  a = Operator.increment(a)
//! a++          →  (_temp = a, a = Operator.increment(_temp), _temp)
//! ```
//!
//! Arithmetic made only of numeric literals is left alone so it keeps its
//! native constant semantics. When anything was rewritten, the runtime import
//! is inserted once, after the last existing import (or at the top).
//!
//! The pass is a pure function of the tree and the [`RewriteConfig`].

pub mod config;
mod imports;
mod names;
mod pass;

pub use config::{ConfigError, ImportStyle, RewriteConfig};
pub use pass::{binary_method, is_literal_only, unary_method, update_method};

use crate::parser::ast::Program;
use crate::parser::printer::print_program;
use crate::parser::visit::VisitMut;
use crate::parser::{parse_program, ParseError};
use imports::{hoist_declarations, insert_after_imports, runtime_import};
use names::NameGenerator;
use pass::{Finished, Rewriter};
use tracing::{debug, instrument, trace};

/// Summary of one pass over a unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Operator nodes replaced by runtime calls
    pub rewrites: usize,
    pub import_inserted: bool,
    /// Hidden variables introduced for postfix updates
    pub hidden_names: Vec<String>,
}

impl RewriteOutcome {
    pub fn changed(&self) -> bool {
        self.rewrites > 0
    }
}

/// Rewrite one unit in place
#[instrument(level = "debug", skip_all, fields(statements = program.body.len()))]
pub fn rewrite_program(program: &mut Program, config: &RewriteConfig) -> RewriteOutcome {
    let names = NameGenerator::for_program(program);
    let mut rewriter = Rewriter::new(config, names);
    rewriter.visit_program(program);
    let Finished {
        rewrites,
        top_level,
        hidden_names,
    } = rewriter.finish();

    hoist_declarations(&mut program.body, top_level);

    let import_inserted = if rewrites == 0 {
        trace!("nothing rewritten, no import needed");
        false
    } else if config.skip_import {
        trace!("runtime import suppressed by configuration");
        false
    } else {
        let index = insert_after_imports(&mut program.body, runtime_import(config));
        trace!(index, style = ?config.import_style, "inserted runtime import");
        true
    };

    program.bump_revision(rewrites as u64);
    debug!(rewrites, import_inserted, hidden = hidden_names.len(), "rewrite finished");

    RewriteOutcome {
        rewrites,
        import_inserted,
        hidden_names,
    }
}

/// Parse, rewrite and print `source`
pub fn transform(source: &str, config: &RewriteConfig) -> Result<String, ParseError> {
    let mut program = parse_program(source)?;
    rewrite_program(&mut program, config);
    Ok(print_program(&program))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> String {
        transform(source, &RewriteConfig::default()).unwrap()
    }

    #[test]
    fn test_binary() {
        assert_eq!(
            run("1 + a;"),
            "import { Operator } from 'macaroni';\nOperator.add(1, a);\n"
        );
    }

    #[test]
    fn test_literal_arithmetic_untouched() {
        assert_eq!(run("1 + 2 * 3;"), "1 + 2 * 3;\n");
    }

    #[test]
    fn test_revision_counts_rewrites() {
        let mut program = parse_program("a + b; c - d; 1 + 2;").unwrap();
        let outcome = rewrite_program(&mut program, &RewriteConfig::default());
        assert_eq!(outcome.rewrites, 2);
        assert_eq!(program.revision(), 2);
    }

    #[test]
    fn test_skip_import() {
        let config = RewriteConfig::default().with_skip_import(true);
        let mut program = parse_program("a * b;").unwrap();
        let outcome = rewrite_program(&mut program, &config);
        assert!(outcome.changed());
        assert!(!outcome.import_inserted);
        assert_eq!(print_program(&program), "Operator.multiply(a, b);\n");
    }
}
