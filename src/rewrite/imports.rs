//! Statements the pass adds to a unit: the runtime import and hoisted
//! declarations for hidden variables.

use crate::parser::ast::{
    Declarator, Expr, ImportSpecifier, Pattern, SourceLocation, Stmt, VarKind,
};
use crate::parser::printer::quote_string;
use crate::rewrite::config::{ImportStyle, RewriteConfig};

/// The statement that binds the runtime entry point
pub(crate) fn runtime_import(config: &RewriteConfig) -> Stmt {
    let location = SourceLocation::default();
    let binding = config.runtime_binding.clone();
    match config.import_style {
        ImportStyle::Eager => Stmt::Import {
            specifiers: vec![ImportSpecifier::Named {
                imported: binding.clone(),
                local: binding,
            }],
            source: config.runtime_module.clone(),
            location,
        },
        ImportStyle::Lazy => {
            let module = Expr::Str {
                value: config.runtime_module.clone(),
                raw: quote_string(&config.runtime_module),
                location,
            };
            Stmt::VarDecl {
                kind: VarKind::Const,
                declarators: vec![Declarator {
                    target: Pattern::Object {
                        properties: vec![(binding.clone(), Pattern::Ident(binding, location))],
                        location,
                    },
                    init: Some(Expr::call(
                        Expr::ident("require", location),
                        vec![module],
                        location,
                    )),
                }],
                location,
            }
        }
    }
}

/// Insert `stmt` after the last top-level import, or after the directive
/// prologue if there is none. Returns the index it landed at.
pub(crate) fn insert_after_imports(body: &mut Vec<Stmt>, stmt: Stmt) -> usize {
    let index = match body.iter().rposition(Stmt::is_import) {
        Some(last) => last + 1,
        None => prologue_len(body),
    };
    body.insert(index, stmt);
    index
}

/// Leading directives and imports; nothing may be inserted above them
fn prologue_len(body: &[Stmt]) -> usize {
    body.iter()
        .take_while(|stmt| stmt.is_directive() || stmt.is_import())
        .count()
}

/// `var a, b;` placed after any leading directives and imports
pub(crate) fn hoist_declarations(body: &mut Vec<Stmt>, names: Vec<String>) {
    if names.is_empty() {
        return;
    }
    let location = SourceLocation::default();
    let declaration = Stmt::VarDecl {
        kind: VarKind::Var,
        declarators: names
            .into_iter()
            .map(|name| Declarator {
                target: Pattern::Ident(name, location),
                init: None,
            })
            .collect(),
        location,
    };
    let index = prologue_len(body);
    body.insert(index, declaration);
}
