//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::ast::Span;
use crate::error::{LzpError, Result};
use logos::Logos;

/// Tokenize source code
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                return Err(LzpError::lexer(
                    format!("unexpected character: {:?}", lexer.slice()),
                    span,
                ));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("  \t\n\r\n ").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_delimiters() {
        assert_eq!(
            kinds("( ) { }"),
            vec![Token::LParen, Token::RParen, Token::LBrace, Token::RBrace]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(
            kinds("42 -7"),
            vec![Token::Number("42".into()), Token::Number("-7".into())]
        );
    }

    #[test]
    fn test_tokenize_floats() {
        assert_eq!(
            kinds("2.5 -0.25 1e+20 6.02e23"),
            vec![
                Token::Float("2.5".into()),
                Token::Float("-0.25".into()),
                Token::Float("1e+20".into()),
                Token::Float("6.02e23".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_operator_symbols() {
        assert_eq!(
            kinds("+ - * / % ** == != <= >= && || ! \\ &"),
            ["+", "-", "*", "/", "%", "**", "==", "!=", "<=", ">=", "&&", "||", "!", "\\", "&"]
                .iter()
                .map(|s| Token::Symbol(s.to_string()))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_tokenize_minus_is_symbol_not_number() {
        assert_eq!(
            kinds("(- 5)"),
            vec![
                Token::LParen,
                Token::Symbol("-".into()),
                Token::Number("5".into()),
                Token::RParen
            ]
        );
    }

    #[test]
    fn test_tokenize_identifier_with_digits() {
        assert_eq!(kinds("time-milli x1"), vec![
            Token::Symbol("time-milli".into()),
            Token::Symbol("x1".into())
        ]);
    }

    #[test]
    fn test_tokenize_string_keeps_escapes() {
        let tokens = kinds(r#""a \"b\"\n""#);
        assert_eq!(tokens, vec![Token::Str(r#""a \"b\"\n""#.into())]);
    }

    #[test]
    fn test_tokenize_comment() {
        let tokens = kinds("; hello\n1");
        assert_eq!(
            tokens,
            vec![Token::Comment("; hello".into()), Token::Number("1".into())]
        );
    }

    #[test]
    fn test_tokenize_spans() {
        let tokens = tokenize("(head {1})").unwrap();
        assert_eq!(tokens[0].1, Span::new(0, 1));
        assert_eq!(tokens[1].1, Span::new(1, 5));
        assert_eq!(tokens[3].1, Span::new(7, 8));
    }

    #[test]
    fn test_tokenize_unexpected_character_error() {
        let err = tokenize("(+ 1 #)").unwrap_err();
        assert!(err.message().contains("unexpected character"));
        assert_eq!(err.span(), Some(Span::new(5, 6)));
    }

    #[test]
    fn test_tokenize_unterminated_string_error() {
        assert!(tokenize("\"abc").is_err());
    }
}
