//! Lexical scopes for symbol bindings

use super::error::RuntimeError;
use super::value::{Builtin, BuiltinFn, Function, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared reference to a scope
pub type ScopeRef = Rc<RefCell<Scope>>;

/// A binding frame with an optional enclosing frame.
///
/// Cloning deep-copies the bindings but shares the parent, which is always
/// owned by someone else.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    /// Bindings owned by this frame
    bindings: HashMap<String, Value>,
    /// Enclosing frame used as lookup fallback
    parent: Option<ScopeRef>,
}

impl Scope {
    /// Create a new root scope
    pub fn new() -> Self {
        Scope {
            bindings: HashMap::new(),
            parent: None,
        }
    }

    /// Create a new scope with a parent
    pub fn with_parent(parent: ScopeRef) -> Self {
        Scope {
            bindings: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Wrap in `Rc<RefCell<>>`
    pub fn into_ref(self) -> ScopeRef {
        Rc::new(RefCell::new(self))
    }

    /// Install or replace a binding in this frame
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    /// Copy of the nearest binding for `name` in the chain
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.get(name) {
            return Some(value.clone());
        }
        let mut next = self.parent.clone();
        while let Some(scope) = next {
            let scope = scope.borrow();
            if let Some(value) = scope.bindings.get(name) {
                return Some(value.clone());
            }
            next = scope.parent.clone();
        }
        None
    }

    /// Like [`Scope::get`], but an unbound name becomes an error value
    pub fn lookup(&self, name: &str) -> Value {
        self.get(name)
            .unwrap_or_else(|| Value::Error(RuntimeError::unbound_symbol(name)))
    }

    /// Check if a name is bound anywhere in the chain
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Name under which this chain binds `builtin`, compared by identity.
    ///
    /// The registered name wins while it is still bound to the same function.
    /// Otherwise the nearest frame holding an alias answers, with the
    /// lexicographically smallest alias in that frame.
    pub fn builtin_name(&self, builtin: &Builtin) -> Option<String> {
        let registered = matches!(
            self.get(builtin.name()),
            Some(Value::Fun(Function::Builtin(bound))) if bound.same_fn(builtin)
        );
        if registered {
            return Some(builtin.name().to_string());
        }
        if let Some(name) = find_builtin(&self.bindings, builtin) {
            return Some(name);
        }
        let mut next = self.parent.clone();
        while let Some(scope) = next {
            let scope = scope.borrow();
            if let Some(name) = find_builtin(&scope.bindings, builtin) {
                return Some(name);
            }
            next = scope.parent.clone();
        }
        None
    }

    /// Every name visible from this frame, innermost first, deduplicated
    pub fn visible_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.keys().cloned().collect();
        let mut next = self.parent.clone();
        while let Some(scope) = next {
            let scope = scope.borrow();
            names.extend(scope.bindings.keys().cloned());
            next = scope.parent.clone();
        }
        let mut seen = std::collections::HashSet::new();
        names.retain(|name| seen.insert(name.clone()));
        names
    }

    /// Local bindings only
    pub fn bindings(&self) -> &HashMap<String, Value> {
        &self.bindings
    }

    pub fn parent(&self) -> Option<&ScopeRef> {
        self.parent.as_ref()
    }

    pub fn set_parent(&mut self, parent: Option<ScopeRef>) {
        self.parent = parent;
    }
}

fn find_builtin(bindings: &HashMap<String, Value>, builtin: &Builtin) -> Option<String> {
    bindings
        .iter()
        .filter_map(|(name, value)| match value {
            Value::Fun(Function::Builtin(bound)) if bound.same_fn(builtin) => Some(name),
            _ => None,
        })
        .min()
        .cloned()
}

/// Create a child scope from a parent reference
pub fn child_scope(parent: &ScopeRef) -> ScopeRef {
    Scope::with_parent(Rc::clone(parent)).into_ref()
}

/// Outermost scope of the chain starting at `scope`
pub fn root(scope: &ScopeRef) -> ScopeRef {
    let mut current = Rc::clone(scope);
    loop {
        let parent = current.borrow().parent.clone();
        match parent {
            Some(parent) => current = parent,
            None => return current,
        }
    }
}

/// Install a binding in the local (innermost) scope
pub fn define(scope: &ScopeRef, name: &str, value: Value) {
    scope.borrow_mut().define(name, value);
}

/// Install a binding at the root of the chain
pub fn define_global(scope: &ScopeRef, name: &str, value: Value) {
    root(scope).borrow_mut().define(name, value);
}

/// Resolve `name` through the chain, or an unbound-symbol error value
pub fn lookup(scope: &ScopeRef, name: &str) -> Value {
    scope.borrow().lookup(name)
}

/// Bind `name` to a native builtin in `scope`
pub fn register(scope: &ScopeRef, name: &str, func: BuiltinFn) {
    tracing::trace!(name, "registering builtin");
    define(scope, name, Value::builtin(name, func));
}

/// Extension surface handed to builtin setup and to native plugins
pub trait Registrar {
    /// Bind `name` to a native builtin
    fn register(&mut self, name: &str, func: BuiltinFn);

    /// Parse and evaluate `source` form by form, printing errors
    fn eval_source(&mut self, origin: &str, source: &str) -> Value;
}

impl Registrar for ScopeRef {
    fn register(&mut self, name: &str, func: BuiltinFn) {
        register(self, name, func);
    }

    fn eval_source(&mut self, origin: &str, source: &str) -> Value {
        super::builtins::load_source(self, origin, source)
    }
}
