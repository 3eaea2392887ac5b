// Execution engine for rewritten units

use crate::interpreter::constants::{MAX_CALL_DEPTH, RUNTIME_MODULE};
use crate::interpreter::errors::EvalError;
use crate::interpreter::scope::{Scope, ScopeRef};
use crate::parser::ast::*;
use crate::runtime::dispatch::Operator;
use crate::runtime::errors::DispatchError;
use crate::runtime::module::runtime_module;
use crate::runtime::value::{Function, FunctionBody, ProxyKind, Value};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Non-local control flow raised by a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlFlow {
    Normal,
    Break,
    Continue,
    Return,
}

impl ControlFlow {
    pub(crate) fn keyword(self) -> &'static str {
        match self {
            ControlFlow::Normal => "",
            ControlFlow::Break => "break",
            ControlFlow::Continue => "continue",
            ControlFlow::Return => "return",
        }
    }
}

/// Body of a script-defined function, stored behind [`FunctionBody::Script`]
pub(crate) struct ScriptClosure {
    pub params: Vec<String>,
    pub body: Rc<Vec<Stmt>>,
    pub env: ScopeRef,
}

type ModuleTable = Rc<RefCell<FxHashMap<String, Value>>>;

/// Tree-walking evaluator for a parsed (usually rewritten) unit
pub struct Interpreter {
    /// Global scope
    pub(crate) globals: ScopeRef,

    /// Current lexical scope
    pub(crate) scope: ScopeRef,

    /// Importable modules by specifier; shared with the `require` global
    modules: ModuleTable,

    /// `this` of each active call; the bottom entry is the top level
    pub(crate) this_stack: Vec<Value>,

    pub(crate) control_flow: ControlFlow,

    /// Value carried by the pending `return`
    pub(crate) return_value: Value,

    /// Value of the last expression statement executed at any depth
    pub(crate) completion: Value,

    pub(crate) call_depth: usize,

    pub(crate) current_location: SourceLocation,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter whose runtime module uses a plain [`Operator`]
    pub fn new() -> Self {
        Self::with_operator(Operator::new())
    }

    /// An interpreter whose runtime module dispatches through `operator`
    pub fn with_operator(operator: Operator) -> Self {
        let globals = Scope::global();
        let modules: ModuleTable = Rc::new(RefCell::new(FxHashMap::default()));
        modules
            .borrow_mut()
            .insert(RUNTIME_MODULE.to_string(), runtime_module(Rc::new(operator)));

        {
            let mut scope = globals.borrow_mut();
            scope.declare("undefined", Value::Undefined, false);
            scope.declare("NaN", Value::Number(f64::NAN), false);
            scope.declare("Infinity", Value::Number(f64::INFINITY), false);
            scope.declare("require", require_function(modules.clone()), true);
        }

        Interpreter {
            scope: globals.clone(),
            globals,
            modules,
            this_stack: vec![Value::Undefined],
            control_flow: ControlFlow::Normal,
            return_value: Value::Undefined,
            completion: Value::Undefined,
            call_depth: 0,
            current_location: SourceLocation::new(1, 1),
        }
    }

    /// Bind a host value as a global variable
    pub fn define_global(&mut self, name: &str, value: Value) {
        self.globals.borrow_mut().declare(name, value, true);
    }

    /// Current value of a global variable
    pub fn global(&self, name: &str) -> Option<Value> {
        crate::interpreter::scope::lookup(&self.globals, name)
    }

    /// Make `value` importable as `name`
    pub fn define_module(&mut self, name: &str, value: Value) {
        self.modules.borrow_mut().insert(name.to_string(), value);
    }

    pub(crate) fn module(&self, name: &str) -> Option<Value> {
        self.modules.borrow().get(name).cloned()
    }

    /// Execute a unit; returns the value of the last expression statement
    pub fn run(&mut self, program: &Program) -> Result<Value, EvalError> {
        self.completion = Value::Undefined;
        self.control_flow = ControlFlow::Normal;
        self.scope = self.globals.clone();

        self.hoist_declarations(&program.body);
        for stmt in &program.body {
            self.execute_statement(stmt)?;
            if self.control_flow != ControlFlow::Normal {
                return Err(EvalError::IllegalJump {
                    statement: self.control_flow.keyword(),
                    location: stmt.location(),
                });
            }
        }
        Ok(self.completion.clone())
    }

    /// Parse and run `source` as-is
    pub fn run_source(&mut self, source: &str) -> Result<Value, Box<dyn std::error::Error>> {
        let program = crate::parser::parse_program(source)?;
        Ok(self.run(&program)?)
    }

    /// Call any callable value
    pub fn call_function(
        &mut self,
        callee: &Value,
        this: Value,
        args: &[Value],
    ) -> Result<Value, EvalError> {
        match callee {
            Value::Function(function) => self.call_function_ref(function, this, args),
            // Calling a wrapped constructor calls the constructor itself
            Value::Proxy(proxy) if proxy.kind() == ProxyKind::Constructor => {
                let target = proxy.target().clone();
                self.call_function(&target, this, args)
            }
            other => Err(EvalError::NotCallable {
                callee: other.to_string(),
                location: self.current_location,
            }),
        }
    }

    pub(crate) fn call_function_ref(
        &mut self,
        function: &Function,
        this: Value,
        args: &[Value],
    ) -> Result<Value, EvalError> {
        match function.body() {
            FunctionBody::Native(f) => Ok(f(&this, args)?),
            FunctionBody::Script(closure) => match closure.downcast_ref::<ScriptClosure>() {
                Some(closure) => self.call_script(closure, this, args),
                None => Err(DispatchError::NotCallable(function.name.clone()).into()),
            },
        }
    }

    fn call_script(
        &mut self,
        closure: &ScriptClosure,
        this: Value,
        args: &[Value],
    ) -> Result<Value, EvalError> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(EvalError::CallDepthExceeded {
                limit: MAX_CALL_DEPTH,
                location: self.current_location,
            });
        }

        let scope = Scope::function(&closure.env);
        {
            let mut frame = scope.borrow_mut();
            for (i, param) in closure.params.iter().enumerate() {
                frame.declare(param, args.get(i).cloned().unwrap_or_default(), true);
            }
        }

        let saved_scope = std::mem::replace(&mut self.scope, scope);
        self.this_stack.push(this);
        self.call_depth += 1;

        let result = self.execute_function_body(&closure.body);

        self.call_depth -= 1;
        self.this_stack.pop();
        self.scope = saved_scope;

        result?;
        let returned = std::mem::take(&mut self.return_value);
        self.control_flow = ControlFlow::Normal;
        Ok(returned)
    }

    fn execute_function_body(&mut self, body: &[Stmt]) -> Result<(), EvalError> {
        self.hoist_declarations(body);
        for stmt in body {
            self.execute_statement(stmt)?;
            match self.control_flow {
                ControlFlow::Normal => {}
                ControlFlow::Return => return Ok(()),
                other => {
                    return Err(EvalError::IllegalJump {
                        statement: other.keyword(),
                        location: stmt.location(),
                    })
                }
            }
        }
        self.return_value = Value::Undefined;
        Ok(())
    }

    /// Create a closure over the current scope
    pub(crate) fn make_function(&self, name: Option<&str>, params: &[String], body: &[Stmt]) -> Value {
        let closure = ScriptClosure {
            params: params.to_vec(),
            body: Rc::new(body.to_vec()),
            env: self.scope.clone(),
        };
        Value::function(Function::script(name.unwrap_or_default(), Rc::new(closure)))
    }

    /// Declare `var` names (as `undefined`) and function declarations of a
    /// body before any of it runs
    pub(crate) fn hoist_declarations(&mut self, body: &[Stmt]) {
        let mut vars = Vec::new();
        collect_var_names(body, &mut vars);
        {
            let target = crate::interpreter::scope::function_scope_of(&self.scope);
            let mut frame = target.borrow_mut();
            for name in vars {
                if !frame.has_own(&name) {
                    frame.declare(&name, Value::Undefined, true);
                }
            }
        }
        self.hoist_functions(body);
    }

    /// Function declarations directly inside `body` are bound up front
    pub(crate) fn hoist_functions(&mut self, body: &[Stmt]) {
        for stmt in body {
            if let Stmt::FunctionDecl {
                name, params, body, ..
            } = stmt
            {
                let function = self.make_function(Some(name), params, body);
                self.scope.borrow_mut().declare(name, function, true);
            }
        }
    }
}

/// `var` names declared anywhere in `body`, not descending into functions
fn collect_var_names(body: &[Stmt], out: &mut Vec<String>) {
    for stmt in body {
        collect_var_names_stmt(stmt, out);
    }
}

fn collect_var_names_stmt(stmt: &Stmt, out: &mut Vec<String>) {
    match stmt {
        Stmt::VarDecl {
            kind: VarKind::Var,
            declarators,
            ..
        } => {
            for declarator in declarators {
                declarator.target.names(out);
            }
        }
        Stmt::If {
            consequent,
            alternate,
            ..
        } => {
            collect_var_names_stmt(consequent, out);
            if let Some(alternate) = alternate {
                collect_var_names_stmt(alternate, out);
            }
        }
        Stmt::While { body, .. } => collect_var_names_stmt(body, out),
        Stmt::For { init, body, .. } => {
            if let Some(ForInit::Var {
                kind: VarKind::Var,
                declarators,
            }) = init
            {
                for declarator in declarators {
                    declarator.target.names(out);
                }
            }
            collect_var_names_stmt(body, out);
        }
        Stmt::Block { body, .. } => collect_var_names(body, out),
        _ => {}
    }
}

/// `require(specifier)` over the shared module table
fn require_function(modules: ModuleTable) -> Value {
    Value::native("require", move |_, args| {
        let name = args.first().and_then(Value::as_str).unwrap_or_default();
        modules
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| DispatchError::thrown(format!("Cannot find module '{}'", name)))
    })
}
