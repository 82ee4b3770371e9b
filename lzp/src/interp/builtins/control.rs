//! Control flow builtins

use super::{expect_count, expect_qexpr, expect_str, single};
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::eval::eval;
use crate::interp::scope::ScopeRef;
use crate::interp::value::Value;
use std::io::Write;

pub(super) fn builtin_if(scope: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    expect_count("if", &args, 3)?;
    let mut args = args.into_iter();
    let (Some(cond), Some(then), Some(otherwise)) = (args.next(), args.next(), args.next()) else {
        return Err(RuntimeError::arity_mismatch("if", 0, 3));
    };

    let cond = match cond {
        Value::Int(n) => n != 0,
        Value::Float(x) => x != 0.0,
        other => {
            return Err(RuntimeError::type_mismatch("if", 0, other.type_name(), "Number"));
        }
    };
    let then = expect_qexpr("if", 1, then)?;
    let otherwise = expect_qexpr("if", 2, otherwise)?;

    let branch = if cond { then } else { otherwise };
    Ok(eval(scope, Value::SExpr(branch)))
}

pub(super) fn builtin_error(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    let message = expect_str("error", 0, single("error", args)?)?;
    Ok(Value::Error(RuntimeError::user(message)))
}

pub(super) fn builtin_exit(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    let code = match single("exit", args)? {
        Value::Int(code) => code,
        other => {
            return Err(RuntimeError::type_mismatch("exit", 0, other.type_name(), "Number"));
        }
    };
    tracing::debug!(code, "exit requested");
    let _ = std::io::stdout().flush();
    std::process::exit(i32::try_from(code).unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;
    use crate::interp::scope::Scope;

    fn sym(name: &str) -> Value {
        Value::Sym(name.to_string())
    }

    #[test]
    fn test_if_selects_branch() {
        let scope = Scope::new().into_ref();
        let pick = |cond| {
            builtin_if(
                &scope,
                vec![cond, Value::QExpr(vec![Value::Int(1)]), Value::QExpr(vec![Value::Int(2)])],
            )
            .unwrap()
        };
        assert_eq!(pick(Value::Int(1)), Value::Int(1));
        assert_eq!(pick(Value::Int(0)), Value::Int(2));
        assert_eq!(pick(Value::Float(0.5)), Value::Int(1));
    }

    #[test]
    fn test_if_leaves_other_branch_unevaluated() {
        let scope = Scope::new().into_ref();
        let result = builtin_if(
            &scope,
            vec![
                Value::Int(1),
                Value::QExpr(vec![Value::Int(1)]),
                Value::QExpr(vec![sym("unbound_in_else")]),
            ],
        )
        .unwrap();
        assert_eq!(result, Value::Int(1));
    }

    #[test]
    fn test_if_type_checks() {
        let scope = Scope::new().into_ref();
        let err = builtin_if(
            &scope,
            vec![Value::qexpr(), Value::qexpr(), Value::qexpr()],
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        let err = builtin_if(&scope, vec![Value::Int(1), Value::Int(2), Value::qexpr()]).unwrap_err();
        assert!(err.message.contains("argument 1"));
    }

    #[test]
    fn test_error_builds_user_error() {
        let scope = Scope::new().into_ref();
        match builtin_error(&scope, vec![Value::Str("boom".into())]).unwrap() {
            Value::Error(err) => {
                assert_eq!(err.kind, ErrorKind::User);
                assert_eq!(err.message, "boom");
            }
            other => panic!("expected error, got {other}"),
        }
        assert!(builtin_error(&scope, vec![Value::Int(1)]).is_err());
    }

    #[test]
    fn test_exit_validates_before_exiting() {
        let scope = Scope::new().into_ref();
        let err = builtin_exit(&scope, vec![Value::Str("0".into())]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }
}
