//! Runtime values for the interpreter

use super::error::{InterpResult, RuntimeError};
use super::scope::{Scope, ScopeRef};
use crate::util::{escape_str, format_float};
use std::fmt;

/// Native builtin signature
///
/// A builtin owns its argument list. An `Err` result is surfaced to the
/// caller as a [`Value::Error`], so builtins can use `?` on their checks.
pub type BuiltinFn = fn(&ScopeRef, Vec<Value>) -> InterpResult<Value>;

/// Symbol that marks the rest parameter in a formals list
pub const VARIADIC: &str = "&";

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// First-class error, propagated rather than thrown
    Error(RuntimeError),
    /// Unresolved identifier
    Sym(String),
    /// Text literal
    Str(String),
    /// Builtin or closure
    Fun(Function),
    /// Expression reduced by evaluation
    SExpr(Vec<Value>),
    /// Quoted list, inert until converted
    QExpr(Vec<Value>),
}

/// A callable value
#[derive(Debug, Clone)]
pub enum Function {
    Builtin(Builtin),
    Closure(Box<Closure>),
}

/// Native function together with the name it was registered under
#[derive(Clone)]
pub struct Builtin {
    name: String,
    func: BuiltinFn,
}

impl Builtin {
    pub fn new(name: impl Into<String>, func: BuiltinFn) -> Self {
        Builtin {
            name: name.into(),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the native function, turning a failed check into an error value
    pub fn call(&self, scope: &ScopeRef, args: Vec<Value>) -> Value {
        (self.func)(scope, args).unwrap_or_else(Value::Error)
    }

    /// Identity comparison on the underlying function pointer
    pub fn same_fn(&self, other: &Builtin) -> bool {
        std::ptr::fn_addr_eq(self.func, other.func)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin(<{}>)", self.name)
    }
}

/// User-defined function
#[derive(Debug, Clone)]
pub struct Closure {
    /// Parameter names, possibly `&` followed by one rest name
    pub formals: Vec<String>,
    /// Unevaluated body, evaluated as an S-expression
    pub body: Vec<Value>,
    /// Bindings collected so far; never carries a parent between calls
    pub scope: Scope,
}

impl Closure {
    pub fn new(formals: Vec<String>, body: Vec<Value>) -> Self {
        Closure {
            formals,
            body,
            scope: Scope::new(),
        }
    }
}

impl Value {
    pub fn sexpr() -> Self {
        Value::SExpr(Vec::new())
    }

    pub fn qexpr() -> Self {
        Value::QExpr(Vec::new())
    }

    pub fn builtin(name: impl Into<String>, func: BuiltinFn) -> Self {
        Value::Fun(Function::Builtin(Builtin::new(name, func)))
    }

    pub fn lambda(formals: Vec<String>, body: Vec<Value>) -> Self {
        Value::Fun(Function::Closure(Box::new(Closure::new(formals, body))))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Number",
            Value::Float(_) => "Float",
            Value::Error(_) => "Error",
            Value::Sym(_) => "Symbol",
            Value::Str(_) => "String",
            Value::Fun(_) => "Function",
            Value::SExpr(_) => "S-Expression",
            Value::QExpr(_) => "Q-Expression",
        }
    }

    /// Print with builtin names resolved through `scope`.
    ///
    /// A builtin the scope no longer binds prints as an unresolved error.
    pub fn display_in<'a>(&'a self, scope: &'a ScopeRef) -> Printer<'a> {
        Printer {
            value: self,
            scope: Some(scope),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => (a - b).abs() < 1e-15,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Sym(a), Value::Sym(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Fun(a), Value::Fun(b)) => a == b,
            (Value::SExpr(a), Value::SExpr(b)) => a == b,
            (Value::QExpr(a), Value::QExpr(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Function::Builtin(a), Function::Builtin(b)) => a.same_fn(b),
            (Function::Closure(a), Function::Closure(b)) => {
                a.formals == b.formals && a.body == b.body
            }
            _ => false,
        }
    }
}

/// Display adapter resolving builtin names through a scope
pub struct Printer<'a> {
    value: &'a Value,
    scope: Option<&'a ScopeRef>,
}

impl Printer<'_> {
    fn write(&self, f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
        match value {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{}", format_float(*x)),
            Value::Error(err) => write!(f, "Error: {}", err.message),
            Value::Sym(name) => write!(f, "{name}"),
            Value::Str(text) => write!(f, "\"{}\"", escape_str(text)),
            Value::Fun(Function::Builtin(builtin)) => match self.scope {
                None => write!(f, "<{}>", builtin.name()),
                Some(scope) => match scope.borrow().builtin_name(builtin) {
                    Some(name) => write!(f, "<{name}>"),
                    None => write!(
                        f,
                        "Error: {}",
                        RuntimeError::unresolved_builtin(builtin.name())
                    ),
                },
            },
            Value::Fun(Function::Closure(closure)) => {
                write!(f, "(\\ {{")?;
                for (i, formal) in closure.formals.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{formal}")?;
                }
                write!(f, "}} ")?;
                self.write_cells(f, &closure.body, '{', '}')?;
                write!(f, ")")
            }
            Value::SExpr(cells) => self.write_cells(f, cells, '(', ')'),
            Value::QExpr(cells) => self.write_cells(f, cells, '{', '}'),
        }
    }

    fn write_cells(&self, f: &mut fmt::Formatter<'_>, cells: &[Value], open: char, close: char) -> fmt::Result {
        write!(f, "{open}")?;
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            self.write(f, cell)?;
        }
        write!(f, "{close}")
    }
}

impl fmt::Display for Printer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, self.value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer {
            value: self,
            scope: None,
        }
        .fmt(f)
    }
}
