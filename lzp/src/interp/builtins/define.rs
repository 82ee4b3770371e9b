//! Variable and function definition

use super::{expect_count, expect_min, expect_qexpr};
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::scope::{ScopeRef, define, define_global};
use crate::interp::value::Value;

/// Names out of a Q-expression of symbols
fn symbols(func: &str, cells: Vec<Value>) -> InterpResult<Vec<String>> {
    cells
        .into_iter()
        .map(|cell| match cell {
            Value::Sym(name) => Ok(name),
            other => Err(RuntimeError::non_symbol(func, other.type_name())),
        })
        .collect()
}

fn bind(func: &str, scope: &ScopeRef, args: Vec<Value>, global: bool) -> InterpResult<Value> {
    expect_min(func, &args, 1)?;
    let mut args = args.into_iter();
    let names = match args.next() {
        Some(first) => symbols(func, expect_qexpr(func, 0, first)?)?,
        None => return Err(RuntimeError::arity_mismatch(func, 0, 1)),
    };

    let values: Vec<Value> = args.collect();
    if names.len() != values.len() {
        return Err(RuntimeError::symbol_count_mismatch(func, names.len(), values.len()));
    }

    for (name, value) in names.iter().zip(values) {
        if global {
            define_global(scope, name, value);
        } else {
            define(scope, name, value);
        }
    }
    Ok(Value::sexpr())
}

/// `def`: bind in the outermost scope
pub(super) fn builtin_def(scope: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    bind("def", scope, args, true)
}

/// `=`: bind in the calling scope
pub(super) fn builtin_put(scope: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    bind("=", scope, args, false)
}

/// `\`: build a closure from formals and body
pub(super) fn builtin_lambda(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    expect_count("\\", &args, 2)?;
    let mut args = args.into_iter();
    let (Some(formals), Some(body)) = (args.next(), args.next()) else {
        return Err(RuntimeError::arity_mismatch("\\", 0, 2));
    };
    let formals = symbols("\\", expect_qexpr("\\", 0, formals)?)?;
    let body = expect_qexpr("\\", 1, body)?;
    Ok(Value::lambda(formals, body))
}
