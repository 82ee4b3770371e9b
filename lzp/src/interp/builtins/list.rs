//! List and string builtins

use super::{expect_min, expect_qexpr, expect_str, single};
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::eval::eval;
use crate::interp::scope::ScopeRef;
use crate::interp::value::Value;

const LIST_OR_STRING: &str = "Q-Expression or String";

pub(super) fn builtin_list(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    Ok(Value::QExpr(args))
}

pub(super) fn builtin_head(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    match single("head", args)? {
        Value::QExpr(cells) => match cells.into_iter().next() {
            Some(first) => Ok(Value::QExpr(vec![first])),
            None => Err(RuntimeError::empty_argument("head", 0)),
        },
        Value::Str(text) => match text.chars().next() {
            Some(first) => Ok(Value::Str(first.to_string())),
            None => Err(RuntimeError::empty_argument("head", 0)),
        },
        other => Err(RuntimeError::type_mismatch("head", 0, other.type_name(), LIST_OR_STRING)),
    }
}

pub(super) fn builtin_tail(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    match single("tail", args)? {
        Value::QExpr(mut cells) => {
            if cells.is_empty() {
                return Err(RuntimeError::empty_argument("tail", 0));
            }
            cells.remove(0);
            Ok(Value::QExpr(cells))
        }
        Value::Str(text) => {
            let mut chars = text.chars();
            match chars.next() {
                Some(_) => Ok(Value::Str(chars.as_str().to_string())),
                None => Err(RuntimeError::empty_argument("tail", 0)),
            }
        }
        other => Err(RuntimeError::type_mismatch("tail", 0, other.type_name(), LIST_OR_STRING)),
    }
}

pub(super) fn builtin_len(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    let len = match single("len", args)? {
        Value::QExpr(cells) => cells.len(),
        Value::Str(text) => text.chars().count(),
        other => {
            return Err(RuntimeError::type_mismatch("len", 0, other.type_name(), LIST_OR_STRING));
        }
    };
    Ok(Value::Int(i64::try_from(len).unwrap_or(i64::MAX)))
}

/// Concatenate lists, or strings, into a fresh value
pub(super) fn builtin_join(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    expect_min("join", &args, 1)?;
    let strings = match &args[0] {
        Value::QExpr(_) => false,
        Value::Str(_) => true,
        other => {
            return Err(RuntimeError::type_mismatch("join", 0, other.type_name(), LIST_OR_STRING));
        }
    };

    if strings {
        let mut joined = String::new();
        for (index, arg) in args.into_iter().enumerate() {
            joined.push_str(&expect_str("join", index, arg)?);
        }
        return Ok(Value::Str(joined));
    }

    let mut joined = Vec::new();
    for (index, arg) in args.into_iter().enumerate() {
        joined.extend(expect_qexpr("join", index, arg)?);
    }
    Ok(Value::QExpr(joined))
}

pub(super) fn builtin_eval(scope: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    let cells = expect_qexpr("eval", 0, single("eval", args)?)?;
    Ok(eval(scope, Value::SExpr(cells)))
}
