//! Tagged parse tree produced by the parser
//!
//! Each node carries a grammar tag path such as `expr|number|regex` and, for
//! leaves, the literal source text. The interpreter only relies on substring
//! matches against the tag, so the tree shape stays decoupled from the
//! evaluator's value model.

mod span;

pub use span::*;

use serde::{Deserialize, Serialize};

/// Tag of the root node of every parse
pub const ROOT_TAG: &str = ">";

/// A node of the parse tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseNode {
    /// Grammar rule path, `|`-separated
    pub tag: String,
    /// Literal text for leaves, empty for inner nodes
    pub contents: String,
    pub span: Span,
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    pub fn leaf(tag: impl Into<String>, contents: impl Into<String>, span: Span) -> Self {
        ParseNode {
            tag: tag.into(),
            contents: contents.into(),
            span,
            children: Vec::new(),
        }
    }

    pub fn branch(tag: impl Into<String>, span: Span, children: Vec<ParseNode>) -> Self {
        ParseNode {
            tag: tag.into(),
            contents: String::new(),
            span,
            children,
        }
    }

    /// True if any segment of the tag path contains `needle`
    pub fn has_tag(&self, needle: &str) -> bool {
        self.tag.contains(needle)
    }
}

/// Frees nested children from a work list so deep trees do not recurse
impl Drop for ParseNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
