//! Lexical environments
//!
//! - [`Scope`]: one level of bindings, linked to its parent
//! - [`Binding`]: a value plus whether it may be reassigned
//!
//! Blocks get their own scope for `let`/`const`; `var` and function
//! declarations land in the nearest function scope (or the global one).
//! Closures keep their defining scope alive through [`ScopeRef`].

use crate::runtime::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

pub type ScopeRef = Rc<RefCell<Scope>>;

#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub mutable: bool,
}

#[derive(Debug, Default)]
pub struct Scope {
    vars: FxHashMap<String, Binding>,
    parent: Option<ScopeRef>,
    /// Function bodies and the global scope; targets of `var`
    function_scope: bool,
}

/// Outcome of an assignment to an existing name
#[derive(Debug, PartialEq, Eq)]
pub enum AssignResult {
    Assigned,
    Constant,
    Missing,
}

impl Scope {
    pub fn global() -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            vars: FxHashMap::default(),
            parent: None,
            function_scope: true,
        }))
    }

    /// Scope for a function body
    pub fn function(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            vars: FxHashMap::default(),
            parent: Some(parent.clone()),
            function_scope: true,
        }))
    }

    /// Scope for a block or loop head
    pub fn block(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            vars: FxHashMap::default(),
            parent: Some(parent.clone()),
            function_scope: false,
        }))
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Declare `name` here, replacing any existing binding of this scope
    pub fn declare(&mut self, name: &str, value: Value, mutable: bool) {
        self.vars.insert(name.to_string(), Binding { value, mutable });
    }
}

/// Walk outwards from `scope` looking for `name`
pub fn lookup(scope: &ScopeRef, name: &str) -> Option<Value> {
    let mut current = scope.clone();
    loop {
        let next = {
            let frame = current.borrow();
            if let Some(binding) = frame.vars.get(name) {
                return Some(binding.value.clone());
            }
            frame.parent.clone()
        };
        current = next?;
    }
}

/// Reassign the nearest binding of `name`
pub fn assign(scope: &ScopeRef, name: &str, value: Value) -> AssignResult {
    let mut current = scope.clone();
    loop {
        let next = {
            let mut frame = current.borrow_mut();
            if let Some(binding) = frame.vars.get_mut(name) {
                if !binding.mutable {
                    return AssignResult::Constant;
                }
                binding.value = value;
                return AssignResult::Assigned;
            }
            frame.parent.clone()
        };
        match next {
            Some(parent) => current = parent,
            None => return AssignResult::Missing,
        }
    }
}

/// The scope `var` declarations from `scope` belong to
pub fn function_scope_of(scope: &ScopeRef) -> ScopeRef {
    let mut current = scope.clone();
    loop {
        let next = {
            let frame = current.borrow();
            if frame.function_scope {
                None
            } else {
                frame.parent.clone()
            }
        };
        match next {
            Some(parent) => current = parent,
            None => return current,
        }
    }
}
