//! Builtin library
//!
//! Every builtin has the [`BuiltinFn`](super::value::BuiltinFn) shape: it owns
//! its arguments, validates them before doing anything observable, and
//! returns `Err` for a failed check so the caller sees an error value.

mod arith;
mod control;
mod define;
mod io;
mod list;

pub(crate) use io::state_lines;

use super::error::{InterpResult, RuntimeError};
use super::eval::eval;
use super::read::read;
use super::scope::{Registrar, ScopeRef};
use super::value::Value;
use crate::parser::parse_source;

/// Register the whole builtin library
pub fn add_builtins(registrar: &mut impl Registrar) {
    // Lists
    registrar.register("list", list::builtin_list);
    registrar.register("head", list::builtin_head);
    registrar.register("tail", list::builtin_tail);
    registrar.register("eval", list::builtin_eval);
    registrar.register("join", list::builtin_join);
    registrar.register("len", list::builtin_len);

    // Definitions
    registrar.register("\\", define::builtin_lambda);
    registrar.register("def", define::builtin_def);
    registrar.register("=", define::builtin_put);

    // Arithmetic
    registrar.register("+", arith::builtin_add);
    registrar.register("-", arith::builtin_sub);
    registrar.register("*", arith::builtin_mul);
    registrar.register("/", arith::builtin_div);
    registrar.register("%", arith::builtin_rem);
    registrar.register("**", arith::builtin_pow);
    registrar.register("min", arith::builtin_min);
    registrar.register("max", arith::builtin_max);

    // Comparison
    registrar.register("==", arith::builtin_eq);
    registrar.register("!=", arith::builtin_ne);
    registrar.register(">", arith::builtin_gt);
    registrar.register("<", arith::builtin_lt);
    registrar.register(">=", arith::builtin_ge);
    registrar.register("<=", arith::builtin_le);

    // Logic
    registrar.register("!", arith::builtin_not);
    registrar.register("||", arith::builtin_or);
    registrar.register("&&", arith::builtin_and);

    // Control flow
    registrar.register("if", control::builtin_if);
    registrar.register("error", control::builtin_error);
    registrar.register("exit", control::builtin_exit);

    // I/O and introspection
    registrar.register("print", io::builtin_print);
    registrar.register("show", io::builtin_show);
    registrar.register("state", io::builtin_state);
    registrar.register("load", io::builtin_load);
    registrar.register("read", io::builtin_read);
    registrar.register("plugin", io::builtin_plugin);
}

/// Parse `source` and evaluate each top-level form against `scope`.
///
/// Errors from individual forms are printed and do not stop later forms. A
/// parse failure evaluates nothing and comes back as a single error value.
pub fn load_source(scope: &ScopeRef, origin: &str, source: &str) -> Value {
    let tree = match parse_source(origin, source) {
        Ok(tree) => tree,
        Err(err) => {
            let diagnostic = err.render_diagnostic(origin, source);
            tracing::debug!(origin, %diagnostic, "parse failed");
            return Value::Error(RuntimeError::parse(&diagnostic));
        }
    };

    let forms = match read(&tree) {
        Value::SExpr(forms) => forms,
        other => vec![other],
    };

    for (index, form) in forms.into_iter().enumerate() {
        tracing::debug!(origin, form = index, "evaluating top-level form");
        let result = eval(scope, form);
        if result.is_error() {
            println!("{}", result.display_in(scope));
        }
    }

    Value::sexpr()
}

// ============================================================================
// Argument checks
// ============================================================================

fn expect_count(func: &str, args: &[Value], expected: usize) -> InterpResult<()> {
    if args.len() != expected {
        return Err(RuntimeError::arity_mismatch(func, args.len(), expected));
    }
    Ok(())
}

fn expect_min(func: &str, args: &[Value], min: usize) -> InterpResult<()> {
    if args.len() < min {
        return Err(RuntimeError::arity_mismatch(func, args.len(), min));
    }
    Ok(())
}

fn expect_qexpr(func: &str, index: usize, value: Value) -> InterpResult<Vec<Value>> {
    match value {
        Value::QExpr(cells) => Ok(cells),
        other => Err(RuntimeError::type_mismatch(
            func,
            index,
            other.type_name(),
            "Q-Expression",
        )),
    }
}

fn expect_str(func: &str, index: usize, value: Value) -> InterpResult<String> {
    match value {
        Value::Str(text) => Ok(text),
        other => Err(RuntimeError::type_mismatch(func, index, other.type_name(), "String")),
    }
}

/// Take exactly one argument out of `args`
fn single(func: &str, args: Vec<Value>) -> InterpResult<Value> {
    expect_count(func, &args, 1)?;
    let mut args = args.into_iter();
    args.next()
        .ok_or_else(|| RuntimeError::arity_mismatch(func, 0, 1))
}
