//! Arithmetic, comparison and logic builtins

use super::{expect_count, expect_min};
use crate::interp::error::{InterpResult, RuntimeError};
use crate::interp::scope::ScopeRef;
use crate::interp::value::Value;
use std::cmp::Ordering;

const NUMERIC: &str = "Number or Float";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Min,
    Max,
}

impl ArithOp {
    fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Rem => "%",
            ArithOp::Pow => "**",
            ArithOp::Min => "min",
            ArithOp::Max => "max",
        }
    }

    fn ints(self, x: i64, y: i64) -> InterpResult<Value> {
        let n = match self {
            ArithOp::Add => x.wrapping_add(y),
            ArithOp::Sub => x.wrapping_sub(y),
            ArithOp::Mul => x.wrapping_mul(y),
            ArithOp::Div | ArithOp::Rem if y == 0 => return Err(RuntimeError::division_by_zero()),
            ArithOp::Div => x.wrapping_div(y),
            ArithOp::Rem => x.wrapping_rem(y),
            ArithOp::Pow => match u32::try_from(y) {
                Ok(exp) => x.wrapping_pow(exp),
                Err(_) => return Ok(Value::Float((x as f64).powf(y as f64))),
            },
            ArithOp::Min => x.min(y),
            ArithOp::Max => x.max(y),
        };
        Ok(Value::Int(n))
    }

    fn floats(self, x: f64, y: f64) -> InterpResult<Value> {
        let r = match self {
            ArithOp::Add => x + y,
            ArithOp::Sub => x - y,
            ArithOp::Mul => x * y,
            ArithOp::Div | ArithOp::Rem if y == 0.0 => {
                return Err(RuntimeError::division_by_zero());
            }
            ArithOp::Div => x / y,
            ArithOp::Rem => x % y,
            ArithOp::Pow => x.powf(y),
            ArithOp::Min => x.min(y),
            ArithOp::Max => x.max(y),
        };
        Ok(Value::Float(r))
    }

    fn combine(self, lhs: Value, rhs: Value) -> InterpResult<Value> {
        match (lhs, rhs) {
            (Value::Int(x), Value::Int(y)) => self.ints(x, y),
            (lhs, rhs) => self.floats(as_f64(&lhs), as_f64(&rhs)),
        }
    }
}

/// Float view of a value already checked to be numeric
fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Int(n) => *n as f64,
        Value::Float(x) => *x,
        _ => f64::NAN,
    }
}

fn check_numeric(func: &str, args: &[Value]) -> InterpResult<()> {
    for (index, arg) in args.iter().enumerate() {
        if !matches!(arg, Value::Int(_) | Value::Float(_)) {
            return Err(RuntimeError::type_mismatch(func, index, arg.type_name(), NUMERIC));
        }
    }
    Ok(())
}

fn arith(op: ArithOp, args: Vec<Value>) -> InterpResult<Value> {
    let func = op.symbol();
    expect_min(func, &args, 1)?;
    check_numeric(func, &args)?;

    if op == ArithOp::Rem {
        if let Some(index) = args.iter().position(|arg| matches!(arg, Value::Float(_))) {
            return Err(RuntimeError::type_mismatch(func, index, "Float", "Number"));
        }
    }

    let mut args = args.into_iter();
    let Some(mut acc) = args.next() else {
        return Err(RuntimeError::arity_mismatch(func, 0, 1));
    };

    if op == ArithOp::Sub && args.len() == 0 {
        return Ok(match acc {
            Value::Int(n) => Value::Int(n.wrapping_neg()),
            Value::Float(x) => Value::Float(-x),
            other => other,
        });
    }

    for arg in args {
        acc = op.combine(acc, arg)?;
    }
    Ok(acc)
}

pub(super) fn builtin_add(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    arith(ArithOp::Add, args)
}

pub(super) fn builtin_sub(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    arith(ArithOp::Sub, args)
}

pub(super) fn builtin_mul(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    arith(ArithOp::Mul, args)
}

pub(super) fn builtin_div(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    arith(ArithOp::Div, args)
}

pub(super) fn builtin_rem(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    arith(ArithOp::Rem, args)
}

pub(super) fn builtin_pow(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    arith(ArithOp::Pow, args)
}

pub(super) fn builtin_min(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    arith(ArithOp::Min, args)
}

pub(super) fn builtin_max(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    arith(ArithOp::Max, args)
}

// ============================================================================
// Comparison
// ============================================================================

fn from_bool(b: bool) -> Value {
    Value::Int(i64::from(b))
}

fn equality(func: &str, args: Vec<Value>, want_equal: bool) -> InterpResult<Value> {
    expect_count(func, &args, 2)?;
    Ok(from_bool((args[0] == args[1]) == want_equal))
}

fn ordering(func: &str, args: Vec<Value>, accept: fn(Ordering) -> bool) -> InterpResult<Value> {
    expect_count(func, &args, 2)?;
    check_numeric(func, &args)?;
    let ord = match (&args[0], &args[1]) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (lhs, rhs) => as_f64(lhs).partial_cmp(&as_f64(rhs)),
    };
    Ok(from_bool(ord.is_some_and(accept)))
}

pub(super) fn builtin_eq(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    equality("==", args, true)
}

pub(super) fn builtin_ne(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    equality("!=", args, false)
}

pub(super) fn builtin_gt(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    ordering(">", args, Ordering::is_gt)
}

pub(super) fn builtin_lt(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    ordering("<", args, Ordering::is_lt)
}

pub(super) fn builtin_ge(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    ordering(">=", args, Ordering::is_ge)
}

pub(super) fn builtin_le(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    ordering("<=", args, Ordering::is_le)
}

// ============================================================================
// Logic
// ============================================================================

fn truthy(value: &Value) -> bool {
    match value {
        Value::Int(n) => *n != 0,
        Value::Float(x) => *x != 0.0,
        _ => false,
    }
}

pub(super) fn builtin_not(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    expect_count("!", &args, 1)?;
    check_numeric("!", &args)?;
    Ok(from_bool(!truthy(&args[0])))
}

pub(super) fn builtin_or(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    expect_count("||", &args, 2)?;
    check_numeric("||", &args)?;
    Ok(from_bool(truthy(&args[0]) || truthy(&args[1])))
}

pub(super) fn builtin_and(_: &ScopeRef, args: Vec<Value>) -> InterpResult<Value> {
    expect_count("&&", &args, 2)?;
    check_numeric("&&", &args)?;
    Ok(from_bool(truthy(&args[0]) && truthy(&args[1])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;
    use crate::interp::scope::Scope;

    fn run(f: fn(&ScopeRef, Vec<Value>) -> InterpResult<Value>, args: Vec<Value>) -> InterpResult<Value> {
        let scope = Scope::new().into_ref();
        f(&scope, args)
    }

    fn ints(ns: &[i64]) -> Vec<Value> {
        ns.iter().copied().map(Value::Int).collect()
    }

    #[test]
    fn test_integer_folds() {
        assert_eq!(run(builtin_add, ints(&[1, 2, 3])).unwrap(), Value::Int(6));
        assert_eq!(run(builtin_sub, ints(&[10, 3, 2])).unwrap(), Value::Int(5));
        assert_eq!(run(builtin_mul, ints(&[2, 3, 4])).unwrap(), Value::Int(24));
        assert_eq!(run(builtin_div, ints(&[7, 2])).unwrap(), Value::Int(3));
        assert_eq!(run(builtin_div, ints(&[-7, 2])).unwrap(), Value::Int(-3));
        assert_eq!(run(builtin_rem, ints(&[7, 3])).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_unary_minus_preserves_type() {
        assert_eq!(run(builtin_sub, ints(&[5])).unwrap(), Value::Int(-5));
        assert_eq!(run(builtin_sub, vec![Value::Float(2.5)]).unwrap(), Value::Float(-2.5));
    }

    #[test]
    fn test_mixed_operands_promote() {
        let sum = run(builtin_add, vec![Value::Int(1), Value::Float(2.5)]).unwrap();
        assert_eq!(sum, Value::Float(3.5));
        let product = run(builtin_mul, vec![Value::Float(0.5), Value::Int(4)]).unwrap();
        assert_eq!(product, Value::Float(2.0));
    }

    #[test]
    fn test_division_by_zero() {
        for args in [ints(&[1, 0]), vec![Value::Float(1.0), Value::Int(0)], vec![Value::Int(1), Value::Float(0.0)]] {
            let err = run(builtin_div, args).unwrap_err();
            assert_eq!(err.kind, ErrorKind::DivisionByZero);
            assert_eq!(err.message, "Division By Zero.");
        }
        assert_eq!(run(builtin_rem, ints(&[1, 0])).unwrap_err().kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_rem_rejects_float() {
        let err = run(builtin_rem, vec![Value::Int(5), Value::Float(2.0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        assert!(err.message.contains("argument 1"));
    }

    #[test]
    fn test_pow() {
        assert_eq!(run(builtin_pow, ints(&[2, 10])).unwrap(), Value::Int(1024));
        assert_eq!(run(builtin_pow, ints(&[2, -1])).unwrap(), Value::Float(0.5));
        assert_eq!(
            run(builtin_pow, vec![Value::Float(4.0), Value::Float(0.5)]).unwrap(),
            Value::Float(2.0)
        );
    }

    #[test]
    fn test_min_max() {
        assert_eq!(run(builtin_min, ints(&[3, 1, 2])).unwrap(), Value::Int(1));
        assert_eq!(run(builtin_max, ints(&[3, 1, 2])).unwrap(), Value::Int(3));
        assert_eq!(
            run(builtin_max, vec![Value::Int(1), Value::Float(1.5)]).unwrap(),
            Value::Float(1.5)
        );
    }

    #[test]
    fn test_wrapping_overflow() {
        assert_eq!(run(builtin_add, ints(&[i64::MAX, 1])).unwrap(), Value::Int(i64::MIN));
    }

    #[test]
    fn test_non_numeric_operand() {
        let err = run(builtin_add, vec![Value::Int(1), Value::Str("x".into())]).unwrap_err();
        assert_eq!(
            err.message,
            "Function '+' passed incorrect type for argument 1. Got String, Expected Number or Float."
        );
    }

    #[test]
    fn test_no_operands() {
        assert_eq!(run(builtin_add, vec![]).unwrap_err().kind, ErrorKind::Arity);
    }

    #[test]
    fn test_equality_structural() {
        let a = Value::QExpr(ints(&[1, 2]));
        assert_eq!(run(builtin_eq, vec![a.clone(), a.clone()]).unwrap(), Value::Int(1));
        assert_eq!(run(builtin_ne, vec![a, Value::qexpr()]).unwrap(), Value::Int(1));
        assert_eq!(run(builtin_eq, vec![Value::Int(1), Value::Float(1.0)]).unwrap(), Value::Int(0));
    }

    #[test]
    fn test_ordering() {
        assert_eq!(run(builtin_gt, ints(&[2, 1])).unwrap(), Value::Int(1));
        assert_eq!(run(builtin_lt, ints(&[2, 1])).unwrap(), Value::Int(0));
        assert_eq!(run(builtin_ge, ints(&[2, 2])).unwrap(), Value::Int(1));
        assert_eq!(run(builtin_le, vec![Value::Float(1.5), Value::Int(2)]).unwrap(), Value::Int(1));
        assert_eq!(run(builtin_gt, ints(&[1])).unwrap_err().kind, ErrorKind::Arity);
    }

    #[test]
    fn test_logic_normalizes() {
        assert_eq!(run(builtin_not, ints(&[0])).unwrap(), Value::Int(1));
        assert_eq!(run(builtin_not, vec![Value::Float(2.0)]).unwrap(), Value::Int(0));
        assert_eq!(run(builtin_or, ints(&[0, 5])).unwrap(), Value::Int(1));
        assert_eq!(run(builtin_and, ints(&[3, 5])).unwrap(), Value::Int(1));
        assert_eq!(run(builtin_and, ints(&[3, 0])).unwrap(), Value::Int(0));
        assert!(run(builtin_and, vec![Value::Int(1), Value::qexpr()]).is_err());
    }
}
