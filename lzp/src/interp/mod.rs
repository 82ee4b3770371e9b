//! Tree-walking interpreter
//!
//! Values, scopes, the evaluator and the builtin library. [`Interpreter`]
//! bundles a global scope with every builtin registered.

pub mod builtins;
mod error;
mod eval;
mod read;
mod scope;
mod value;

pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::{MAX_EVAL_DEPTH, apply, eval, eval_sexpr};
pub use read::read;
pub use scope::{
    Registrar, Scope, ScopeRef, child_scope, define, define_global, lookup, register, root,
};
pub use value::{Builtin, BuiltinFn, Closure, Function, Printer, VARIADIC, Value};

use crate::parser::parse_source;
use std::path::Path;

/// A global scope preloaded with the builtin library
pub struct Interpreter {
    global: ScopeRef,
}

impl Interpreter {
    pub fn new() -> Self {
        let mut global = Scope::new().into_ref();
        builtins::add_builtins(&mut global);
        Interpreter { global }
    }

    pub fn global(&self) -> &ScopeRef {
        &self.global
    }

    /// Evaluate a whole source text as one S-expression, REPL style
    pub fn eval_str(&self, origin: &str, source: &str) -> Value {
        match parse_source(origin, source) {
            Ok(tree) => eval(&self.global, read(&tree)),
            Err(err) => Value::Error(RuntimeError::parse(&err.render_diagnostic(origin, source))),
        }
    }

    /// Evaluate each top-level form of `source`, printing errors
    pub fn load_source(&self, origin: &str, source: &str) -> Value {
        builtins::load_source(&self.global, origin, source)
    }

    /// Read a file and evaluate it form by form
    pub fn load_file(&self, path: impl AsRef<Path>) -> Value {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(source) => self.load_source(&path.display().to_string(), &source),
            Err(err) => Value::Error(RuntimeError::io_error(&err.to_string())),
        }
    }

    /// Load a native plugin into the global scope
    pub fn load_plugin(&self, name: &str) -> Value {
        match crate::plugin::load_plugin(&self.global, name) {
            Ok(()) => Value::sexpr(),
            Err(err) => Value::Error(RuntimeError::plugin_load(err.to_string())),
        }
    }

    /// Print a value with builtin names resolved against the global scope
    pub fn print_value(&self, value: &Value) -> String {
        value.display_in(&self.global).to_string()
    }

    /// `name: value` lines for the global bindings, sorted by name
    pub fn state_lines(&self) -> Vec<String> {
        builtins::state_lines(&self.global)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
