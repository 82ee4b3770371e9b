//! Recursive-descent parser producing the tagged parse tree
//!
//! Grammar:
//!
//! ```text
//! lzp   : /^/ <expr>* /$/ ;
//! expr  : <number> | <float> | <symbol> | <string> | <comment> | <sexpr> | <qexpr> ;
//! sexpr : '(' <expr>* ')' ;
//! qexpr : '{' <expr>* '}' ;
//! ```

use crate::ast::{ParseNode, ROOT_TAG, Span};
use crate::error::{LzpError, Result};
use crate::lexer::{Token, tokenize};
use std::iter::Peekable;
use std::vec::IntoIter;

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW_SIZE: usize = 1024 * 1024;

/// Deepest bracket nesting accepted in source text
pub const MAX_NESTING: usize = 1024;

/// Tokenize and parse source text in one step
pub fn parse_source(origin: &str, source: &str) -> Result<ParseNode> {
    let tokens = tokenize(source)?;
    parse(origin, source, tokens)
}

/// Parse tokens into a tree rooted at a `>` node
pub fn parse(_origin: &str, source: &str, tokens: Vec<(Token, Span)>) -> Result<ParseNode> {
    let end = Span::new(source.len(), source.len());
    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
        end,
        depth: 0,
    };

    let mut children = vec![ParseNode::leaf("regex", "", Span::new(0, 0))];
    while let Some((token, span)) = parser.tokens.next() {
        children.push(parser.expr(token, span)?);
    }
    children.push(ParseNode::leaf("regex", "", end));

    Ok(ParseNode::branch(ROOT_TAG, Span::new(0, source.len()), children))
}

struct Parser {
    tokens: Peekable<IntoIter<(Token, Span)>>,
    end: Span,
    /// Brackets currently open
    depth: usize,
}

impl Parser {
    fn expr(&mut self, token: Token, span: Span) -> Result<ParseNode> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.expr_inner(token, span))
    }

    fn expr_inner(&mut self, token: Token, span: Span) -> Result<ParseNode> {
        match token {
            Token::LParen => self.list("sexpr", token, span, Token::RParen),
            Token::LBrace => self.list("qexpr", token, span, Token::RBrace),
            Token::RParen | Token::RBrace => Err(LzpError::parser(
                format!("unexpected {token}"),
                span,
            )),
            leaf => {
                let tag = format!("expr|{}|regex", leaf.rule());
                Ok(ParseNode::leaf(tag, leaf.text(), span))
            }
        }
    }

    fn list(&mut self, rule: &str, open: Token, open_span: Span, close: Token) -> Result<ParseNode> {
        if self.depth >= MAX_NESTING {
            return Err(LzpError::parser(
                format!("nesting deeper than {MAX_NESTING} levels"),
                open_span,
            ));
        }
        self.depth += 1;
        let node = self.list_items(rule, open, open_span, close);
        self.depth -= 1;
        node
    }

    fn list_items(&mut self, rule: &str, open: Token, open_span: Span, close: Token) -> Result<ParseNode> {
        let mut children = vec![ParseNode::leaf("char", open.text(), open_span)];

        loop {
            match self.tokens.next() {
                Some((token, span)) if token == close => {
                    children.push(ParseNode::leaf("char", token.text(), span));
                    let whole = open_span.merge(span);
                    return Ok(ParseNode::branch(format!("expr|{rule}|>"), whole, children));
                }
                Some((token @ (Token::RParen | Token::RBrace), span)) => {
                    return Err(LzpError::parser(
                        format!("expected {close} but found {token}"),
                        span,
                    ));
                }
                Some((token, span)) => children.push(self.expr(token, span)?),
                None => {
                    return Err(LzpError::parser(
                        format!("unexpected end of input, expected {close}"),
                        self.end,
                    ));
                }
            }
        }
    }
}
