//! Printing, introspection and re-entrant loading

use super::{expect_str, load_source, single};
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::scope::ScopeRef;
use crate::interp::value::Value;
use crate::plugin;

pub(super) fn builtin_print(scope: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    let printed: Vec<String> = args
        .iter()
        .map(|arg| arg.display_in(scope).to_string())
        .collect();
    println!("{}", printed.join(" "));
    Ok(Value::sexpr())
}

pub(super) fn builtin_show(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    let texts = args
        .into_iter()
        .enumerate()
        .map(|(index, arg)| expect_str("show", index, arg))
        .collect::<InterpResult<Vec<String>>>()?;
    println!("{}", texts.join(" "));
    Ok(Value::sexpr())
}

/// Lines printed by `state`, one per local binding, sorted by name
pub(crate) fn state_lines(scope: &ScopeRef) -> Vec<String> {
    let frame = scope.borrow();
    let mut bindings: Vec<_> = frame.bindings().iter().collect();
    bindings.sort_by(|a, b| a.0.cmp(b.0));
    bindings
        .into_iter()
        .map(|(name, value)| format!("{name}: {}", value.display_in(scope)))
        .collect()
}

pub(super) fn builtin_state(scope: &ScopeRef, _: Vec<Value>) -> InterpResult<Value> {
    for line in state_lines(scope) {
        println!("{line}");
    }
    Ok(Value::sexpr())
}

pub(super) fn builtin_load(scope: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    let path = expect_str("load", 0, single("load", args)?)?;
    tracing::debug!(%path, "loading file");
    let source =
        std::fs::read_to_string(&path).map_err(|err| RuntimeError::io_error(&err.to_string()))?;
    Ok(load_source(scope, &path, &source))
}

pub(super) fn builtin_read(scope: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    let source = expect_str("read", 0, single("read", args)?)?;
    Ok(load_source(scope, "<read>", &source))
}

pub(super) fn builtin_plugin(scope: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    let name = expect_str("plugin", 0, single("plugin", args)?)?;
    plugin::load_plugin(scope, &name).map_err(|err| RuntimeError::plugin_load(err.to_string()))?;
    Ok(Value::sexpr())
}
