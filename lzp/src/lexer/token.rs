//! Token definitions

use logos::Logos;

/// LZP token
///
/// Literal payloads keep their raw source text; numeric conversion happens
/// when the parse tree is ingested, where overflow becomes an error value.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[regex(r"-?[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string(), priority = 4)]
    #[regex(r"-?[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().to_string(), priority = 4)]
    Float(String),

    #[regex(r"-?[0-9]+", |lex| lex.slice().to_string(), priority = 4)]
    Number(String),

    #[regex(r"[a-zA-Z0-9_+\-*/\\=<>!&%|^]+", |lex| lex.slice().to_string(), priority = 1)]
    Symbol(String),

    /// Quoted string, quotes and escapes included
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice().to_string())]
    Str(String),

    #[regex(r";[^\r\n]*", |lex| lex.slice().to_string())]
    Comment(String),
}

impl Token {
    /// Grammar rule name used in parse tree tags
    pub fn rule(&self) -> &'static str {
        match self {
            Token::LParen | Token::RParen | Token::LBrace | Token::RBrace => "char",
            Token::Float(_) => "float",
            Token::Number(_) => "number",
            Token::Symbol(_) => "symbol",
            Token::Str(_) => "string",
            Token::Comment(_) => "comment",
        }
    }

    /// Source text of the token
    pub fn text(&self) -> &str {
        match self {
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Float(s)
            | Token::Number(s)
            | Token::Symbol(s)
            | Token::Str(s)
            | Token::Comment(s) => s,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LParen | Token::RParen | Token::LBrace | Token::RBrace => {
                write!(f, "'{}'", self.text())
            }
            _ => write!(f, "{} {}", self.rule(), self.text()),
        }
    }
}
