//! Expression evaluator
//!
//! Evaluation consumes its input: every function here takes the value it
//! reduces by ownership and returns a freshly owned result. Errors are values
//! and short-circuit S-expression reduction once all children are evaluated.

use super::error::RuntimeError;
use super::scope::{ScopeRef, lookup};
use super::value::{Closure, Function, VARIADIC, Value};
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Maximum nesting of S-expression evaluations before giving up
pub const MAX_EVAL_DEPTH: usize = 10_000;

/// Stack growth parameters for deep recursion
const STACK_RED_ZONE: usize = 128 * 1024; // 128KB remaining triggers growth
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024; // Grow by 4MB each time

thread_local! {
    static EVAL_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Holds one level of evaluation depth while alive
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Option<Self> {
        EVAL_DEPTH.with(|depth| {
            if depth.get() >= MAX_EVAL_DEPTH {
                None
            } else {
                depth.set(depth.get() + 1);
                Some(DepthGuard)
            }
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        EVAL_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Evaluate a value against `scope`.
///
/// Symbols resolve to a copy of their binding, S-expressions reduce, and
/// everything else evaluates to itself.
pub fn eval(scope: &ScopeRef, value: Value) -> Value {
    match value {
        Value::Sym(name) => lookup(scope, &name),
        Value::SExpr(cells) => {
            let Some(_guard) = DepthGuard::enter() else {
                tracing::warn!(limit = MAX_EVAL_DEPTH, "evaluation depth limit reached");
                return Value::Error(RuntimeError::stack_overflow());
            };
            stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || eval_sexpr(scope, cells))
        }
        other => other,
    }
}

/// Reduce the children of an S-expression
pub fn eval_sexpr(scope: &ScopeRef, cells: Vec<Value>) -> Value {
    let mut cells: Vec<Value> = cells.into_iter().map(|cell| eval(scope, cell)).collect();

    if let Some(index) = cells.iter().position(Value::is_error) {
        return cells.swap_remove(index);
    }

    match cells.len() {
        0 => return Value::SExpr(cells),
        1 => return cells.swap_remove(0),
        _ => {}
    }

    let head = cells.remove(0);
    match head {
        Value::Fun(func) => apply(scope, func, cells),
        other => Value::Error(RuntimeError::not_a_function(other.type_name())),
    }
}

/// Apply a function to already-evaluated arguments
pub fn apply(scope: &ScopeRef, func: Function, args: Vec<Value>) -> Value {
    match func {
        Function::Builtin(builtin) => builtin.call(scope, args),
        Function::Closure(closure) => apply_closure(scope, *closure, args),
    }
}

/// Bind arguments to formals and either run the body or return the partially
/// applied closure.
///
/// The body runs in the closure's own scope, parented to the caller's scope
/// for this call only.
fn apply_closure(caller: &ScopeRef, closure: Closure, args: Vec<Value>) -> Value {
    let Closure {
        formals,
        body,
        mut scope,
    } = closure;

    let given = args.len();
    let total = formals.len();
    let mut formals = VecDeque::from(formals);
    let mut args = VecDeque::from(args);

    while let Some(arg) = args.pop_front() {
        let Some(formal) = formals.pop_front() else {
            return Value::Error(RuntimeError::too_many_arguments(given, total));
        };

        if formal == VARIADIC {
            let rest = match (formals.pop_front(), formals.is_empty()) {
                (Some(rest), true) => rest,
                _ => return Value::Error(RuntimeError::invalid_variadic()),
            };
            args.push_front(arg);
            scope.define(rest, Value::QExpr(args.drain(..).collect()));
            break;
        }

        scope.define(formal, arg);
    }

    if formals.front().is_some_and(|formal| formal == VARIADIC) {
        formals.pop_front();
        let rest = match (formals.pop_front(), formals.is_empty()) {
            (Some(rest), true) => rest,
            _ => return Value::Error(RuntimeError::invalid_variadic()),
        };
        scope.define(rest, Value::qexpr());
    }

    if !formals.is_empty() {
        return Value::Fun(Function::Closure(Box::new(Closure {
            formals: formals.into(),
            body,
            scope,
        })));
    }

    scope.set_parent(Some(Rc::clone(caller)));
    let local = scope.into_ref();
    eval(&local, Value::SExpr(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::{ErrorKind, InterpResult};
    use crate::interp::scope::{Scope, define, register};

    fn builtin_add(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
        let mut sum = 0;
        for arg in args {
            match arg {
                Value::Int(n) => sum += n,
                other => return Err(RuntimeError::type_mismatch("+", 0, other.type_name(), "Number")),
            }
        }
        Ok(Value::Int(sum))
    }

    fn sym(name: &str) -> Value {
        Value::Sym(name.to_string())
    }

    fn global() -> ScopeRef {
        let scope = Scope::new().into_ref();
        register(&scope, "+", builtin_add);
        scope
    }

    fn lambda(formals: &[&str], body: Vec<Value>) -> Value {
        Value::lambda(formals.iter().map(|f| f.to_string()).collect(), body)
    }

    fn call(scope: &ScopeRef, f: Value, args: Vec<Value>) -> Value {
        let mut cells = vec![f];
        cells.extend(args);
        eval(scope, Value::SExpr(cells))
    }

    #[test]
    fn test_self_evaluating() {
        let scope = global();
        assert_eq!(eval(&scope, Value::Int(1)), Value::Int(1));
        assert_eq!(eval(&scope, Value::Str("s".into())), Value::Str("s".into()));
        let q = Value::QExpr(vec![sym("undefined")]);
        assert_eq!(eval(&scope, q.clone()), q);
    }

    #[test]
    fn test_symbol_resolves() {
        let scope = global();
        define(&scope, "x", Value::Int(5));
        assert_eq!(eval(&scope, sym("x")), Value::Int(5));
    }

    #[test]
    fn test_empty_and_singleton_sexpr() {
        let scope = global();
        assert_eq!(eval(&scope, Value::sexpr()), Value::sexpr());
        assert_eq!(eval(&scope, Value::SExpr(vec![Value::Int(3)])), Value::Int(3));
    }

    #[test]
    fn test_builtin_application() {
        let scope = global();
        let expr = Value::SExpr(vec![sym("+"), Value::Int(1), Value::Int(2)]);
        assert_eq!(eval(&scope, expr), Value::Int(3));
    }

    #[test]
    fn test_non_function_head() {
        let scope = global();
        let result = eval(&scope, Value::SExpr(vec![Value::Int(1), Value::Int(2)]));
        match result {
            Value::Error(err) => {
                assert_eq!(err.kind, ErrorKind::Type);
                assert!(err.message.contains("Got Number, Expected Function"));
            }
            other => panic!("expected error, got {other}"),
        }
    }

    #[test]
    fn test_first_error_wins() {
        let scope = global();
        let expr = Value::SExpr(vec![sym("+"), sym("first_missing"), sym("second_missing")]);
        match eval(&scope, expr) {
            Value::Error(err) => assert!(err.message.contains("first_missing")),
            other => panic!("expected error, got {other}"),
        }
    }

    #[test]
    fn test_later_children_still_evaluated() {
        fn builtin_mark(scope: &ScopeRef, _: Vec<Value>) -> InterpResult<Value> {
            define(scope, "marked", Value::Int(1));
            Ok(Value::Int(0))
        }
        let scope = global();
        register(&scope, "mark", builtin_mark);
        let expr = Value::SExpr(vec![
            sym("+"),
            sym("missing"),
            Value::SExpr(vec![sym("mark"), Value::Int(0)]),
        ]);
        assert!(eval(&scope, expr).is_error());
        assert!(scope.borrow().contains("marked"));
    }

    #[test]
    fn test_closure_application() {
        let scope = global();
        let f = lambda(&["x", "y"], vec![sym("+"), sym("x"), sym("y")]);
        assert_eq!(call(&scope, f, vec![Value::Int(2), Value::Int(3)]), Value::Int(5));
    }

    #[test]
    fn test_partial_application() {
        let scope = global();
        let f = lambda(&["x", "y"], vec![sym("+"), sym("x"), sym("y")]);
        let partial = call(&scope, f, vec![Value::Int(2)]);
        match &partial {
            Value::Fun(Function::Closure(closure)) => {
                assert_eq!(closure.formals, vec!["y".to_string()]);
                assert_eq!(closure.scope.get("x"), Some(Value::Int(2)));
                assert!(closure.scope.parent().is_none());
            }
            other => panic!("expected closure, got {other}"),
        }
        assert_eq!(call(&scope, partial, vec![Value::Int(3)]), Value::Int(5));
    }

    #[test]
    fn test_too_many_arguments() {
        let scope = global();
        let f = lambda(&["x"], vec![sym("x")]);
        match call(&scope, f, vec![Value::Int(1), Value::Int(2)]) {
            Value::Error(err) => {
                assert_eq!(err.kind, ErrorKind::Arity);
                assert!(err.message.contains("Got 2, Expected 1"));
            }
            other => panic!("expected error, got {other}"),
        }
    }

    #[test]
    fn test_variadic_binding() {
        let scope = global();
        let f = lambda(&["x", "&", "xs"], vec![sym("xs")]);
        let result = call(&scope, f.clone(), vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(result, Value::QExpr(vec![Value::Int(2), Value::Int(3)]));
        assert_eq!(call(&scope, f, vec![Value::Int(1)]), Value::qexpr());
    }

    #[test]
    fn test_variadic_missing_rest_name() {
        let scope = global();
        let f = lambda(&["x", "&"], vec![sym("x")]);
        match call(&scope, f, vec![Value::Int(1), Value::Int(2)]) {
            Value::Error(err) => assert!(err.message.contains("Symbol '&' not followed")),
            other => panic!("expected error, got {other}"),
        }
    }

    #[test]
    fn test_caller_scope_fallback() {
        let scope = global();
        let f = lambda(&["x"], vec![sym("+"), sym("x"), sym("y")]);
        define(&scope, "y", Value::Int(10));
        assert_eq!(call(&scope, f, vec![Value::Int(5)]), Value::Int(15));
    }

    #[test]
    fn test_closure_scope_not_persisted() {
        let scope = global();
        define(&scope, "f", lambda(&["x"], vec![sym("x")]));
        let f = lookup(&scope, "f");
        assert_eq!(call(&scope, f, vec![Value::Int(1)]), Value::Int(1));
        match lookup(&scope, "f") {
            Value::Fun(Function::Closure(closure)) => {
                assert!(closure.scope.bindings().is_empty());
                assert!(closure.scope.parent().is_none());
            }
            other => panic!("expected closure, got {other}"),
        }
    }

    #[test]
    fn test_depth_limit_yields_error() {
        let scope = global();
        let mut expr = Value::Int(1);
        for _ in 0..(MAX_EVAL_DEPTH + 10) {
            expr = Value::SExpr(vec![expr]);
        }
        match eval(&scope, expr) {
            Value::Error(err) => assert_eq!(err.kind, ErrorKind::StackOverflow),
            other => panic!("expected error, got {other}"),
        }
        assert_eq!(EVAL_DEPTH.with(Cell::get), 0);
    }
}
