//! Ingestion of the parse tree into values

use super::error::RuntimeError;
use super::value::Value;
use crate::ast::ParseNode;
use crate::util::unescape_str;

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Rebuild a value tree from a parse node.
///
/// Leaves become scalars, the root and `sexpr` nodes become S-expressions
/// and `qexpr` nodes become Q-expressions. Malformed numeric literals turn
/// into error values in place.
pub fn read(node: &ParseNode) -> Value {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || read_node(node))
}

fn read_node(node: &ParseNode) -> Value {
    if node.has_tag("number") {
        return read_number(&node.contents);
    }
    if node.has_tag("float") {
        return read_float(&node.contents);
    }
    if node.has_tag("symbol") {
        return Value::Sym(node.contents.clone());
    }
    if node.has_tag("string") {
        return read_string(&node.contents);
    }

    let cells = node
        .children
        .iter()
        .filter(|child| !is_punctuation(child))
        .map(read)
        .collect();

    if node.has_tag("qexpr") {
        Value::QExpr(cells)
    } else {
        Value::SExpr(cells)
    }
}

/// Brackets, start/end markers and comments carry no value
fn is_punctuation(node: &ParseNode) -> bool {
    matches!(node.contents.as_str(), "(" | ")" | "{" | "}")
        || node.tag == "regex"
        || node.has_tag("comment")
}

fn read_number(text: &str) -> Value {
    match text.parse::<i64>() {
        Ok(n) => Value::Int(n),
        Err(_) => Value::Error(RuntimeError::invalid_number()),
    }
}

/// Literals that overflow, or underflow to zero from a non-zero mantissa,
/// are not representable
fn read_float(text: &str) -> Value {
    let mantissa = text.split(['e', 'E']).next().unwrap_or(text);
    let nonzero = mantissa.bytes().any(|b| matches!(b, b'1'..=b'9'));
    match text.parse::<f64>() {
        Ok(x) if x.is_finite() && (x != 0.0 || !nonzero) => Value::Float(x),
        _ => Value::Error(RuntimeError::invalid_float()),
    }
}

fn read_string(literal: &str) -> Value {
    let inner = literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(literal);
    Value::Str(unescape_str(inner))
}
