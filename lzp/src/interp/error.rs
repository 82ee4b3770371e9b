//! Runtime errors carried inside error values

use std::fmt;

/// Runtime error during evaluation
///
/// Errors never unwind: they are wrapped in [`super::Value::Error`] and flow
/// through evaluation like any other value.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong value variant in a position
    Type,
    /// Wrong argument or formal count
    Arity,
    /// Lookup exhausted the scope chain
    UnboundSymbol,
    /// Division or modulo by zero
    DivisionByZero,
    /// Numeric literal out of range
    InvalidNumber,
    /// Source text could not be parsed
    Parse,
    /// Native plugin could not be loaded
    PluginLoad,
    /// Raised by the `error` builtin
    User,
    /// Evaluation nested too deeply
    StackOverflow,
    /// File could not be read
    Io,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        RuntimeError {
            kind,
            message: message.into(),
        }
    }

    pub fn type_mismatch(func: &str, index: usize, got: &str, expected: &str) -> Self {
        Self::new(
            ErrorKind::Type,
            format!(
                "Function '{func}' passed incorrect type for argument {index}. \
                 Got {got}, Expected {expected}."
            ),
        )
    }

    pub fn empty_argument(func: &str, index: usize) -> Self {
        Self::new(
            ErrorKind::Type,
            format!("Function '{func}' passed {{}} for argument {index}."),
        )
    }

    pub fn not_a_function(got: &str) -> Self {
        Self::new(
            ErrorKind::Type,
            format!("S-Expression starts with incorrect type. Got {got}, Expected Function."),
        )
    }

    pub fn arity_mismatch(func: &str, given: usize, expected: usize) -> Self {
        Self::new(
            ErrorKind::Arity,
            format!(
                "Function '{func}' passed incorrect number of arguments. \
                 Got {given}, Expected {expected}."
            ),
        )
    }

    pub fn too_many_arguments(given: usize, expected: usize) -> Self {
        Self::new(
            ErrorKind::Arity,
            format!("Function passed too many arguments. Got {given}, Expected {expected}."),
        )
    }

    pub fn symbol_count_mismatch(func: &str, given: usize, expected: usize) -> Self {
        Self::new(
            ErrorKind::Arity,
            format!(
                "Function '{func}' passed too many arguments for symbols. \
                 Got {given}, Expected {expected}."
            ),
        )
    }

    pub fn invalid_variadic() -> Self {
        Self::new(
            ErrorKind::Arity,
            "Function format invalid. Symbol '&' not followed by single symbol.",
        )
    }

    pub fn non_symbol(func: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::Type,
            format!("Function '{func}' cannot define non-symbol. Got {got}, Expected Symbol."),
        )
    }

    pub fn unresolved_builtin(name: &str) -> Self {
        Self::new(
            ErrorKind::UnboundSymbol,
            format!("builtin '{name}' is not bound in this scope"),
        )
    }

    pub fn unbound_symbol(name: &str) -> Self {
        Self::new(ErrorKind::UnboundSymbol, format!("unbound symbol '{name}'"))
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "Division By Zero.")
    }

    pub fn invalid_number() -> Self {
        Self::new(ErrorKind::InvalidNumber, "invalid number")
    }

    pub fn invalid_float() -> Self {
        Self::new(ErrorKind::InvalidNumber, "invalid float")
    }

    pub fn parse(diagnostic: &str) -> Self {
        Self::new(ErrorKind::Parse, format!("Could not parse: {diagnostic}"))
    }

    pub fn plugin_load(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PluginLoad, message)
    }

    pub fn user(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::User, message)
    }

    pub fn stack_overflow() -> Self {
        Self::new(ErrorKind::StackOverflow, "stack overflow: too deep recursion")
    }

    pub fn io_error(message: &str) -> Self {
        Self::new(ErrorKind::Io, format!("Could not load file: {message}"))
    }
}

impl PartialEq for RuntimeError {
    /// Errors compare by message text only
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for builtin checks
pub type InterpResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message_format() {
        let err = RuntimeError::type_mismatch("head", 0, "Number", "Q-Expression");
        assert_eq!(err.kind, ErrorKind::Type);
        assert_eq!(
            err.message,
            "Function 'head' passed incorrect type for argument 0. Got Number, Expected Q-Expression."
        );
    }

    #[test]
    fn test_arity_mismatch_message_format() {
        let err = RuntimeError::arity_mismatch("eval", 2, 1);
        assert_eq!(err.kind, ErrorKind::Arity);
        assert_eq!(
            err.message,
            "Function 'eval' passed incorrect number of arguments. Got 2, Expected 1."
        );
    }

    #[test]
    fn test_empty_argument_message_format() {
        let err = RuntimeError::empty_argument("tail", 0);
        assert_eq!(err.message, "Function 'tail' passed {} for argument 0.");
    }

    #[test]
    fn test_unbound_symbol_names_symbol() {
        let err = RuntimeError::unbound_symbol("undefined_name");
        assert_eq!(err.kind, ErrorKind::UnboundSymbol);
        assert!(err.message.contains("undefined_name"));
    }

    #[test]
    fn test_equality_ignores_kind() {
        let a = RuntimeError::new(ErrorKind::User, "boom");
        let b = RuntimeError::new(ErrorKind::Type, "boom");
        assert_eq!(a, b);
        assert_ne!(a, RuntimeError::user("bang"));
    }

    #[test]
    fn test_display_is_message() {
        assert_eq!(format!("{}", RuntimeError::division_by_zero()), "Division By Zero.");
    }

    #[test]
    fn test_error_is_std_error() {
        let err = RuntimeError::stack_overflow();
        let std_err: &dyn std::error::Error = &err;
        assert!(std_err.source().is_none());
    }
}
