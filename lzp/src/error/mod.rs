//! Host-side error types and reporting
//!
//! These cover failures outside the evaluator: tokenizing, parsing and file
//! access. Runtime failures are values, see [`crate::interp::RuntimeError`].

use crate::ast::Span;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, LzpError>;

/// Lexer, parser or IO failure
#[derive(Debug, Error)]
pub enum LzpError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl LzpError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. } | Self::Parser { span, .. } => Some(*span),
            Self::Io { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexer { message, .. } => message,
            Self::Parser { message, .. } => message,
            Self::Io { message } => message,
        }
    }

    /// One-line diagnostic in `origin:line:col: message` form
    pub fn render_diagnostic(&self, origin: &str, source: &str) -> String {
        match self.span() {
            Some(span) => {
                let (line, col) = span.line_col(source);
                format!("{origin}:{line}:{col}: {}", self.message())
            }
            None => format!("{origin}: {}", self.message()),
        }
    }
}

impl From<std::io::Error> for LzpError {
    fn from(err: std::io::Error) -> Self {
        LzpError::io_error(err.to_string())
    }
}

/// Report error with ariadne
pub fn report_error(filename: &str, source: &str, error: &LzpError) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let kind = match error {
        LzpError::Lexer { .. } => "Lexer",
        LzpError::Parser { .. } => "Parser",
        LzpError::Io { .. } => "IO",
    };

    let printed = if let Some(span) = error.span() {
        Report::build(ReportKind::Error, (filename, span.start..span.end))
            .with_message(format!("{kind} error"))
            .with_label(
                Label::new((filename, span.start..span.end))
                    .with_message(error.message())
                    .with_color(Color::Red),
            )
            .finish()
            .eprint((filename, Source::from(source)))
    } else {
        Report::build(ReportKind::Error, (filename, 0..0))
            .with_message(format!("{kind} error: {}", error.message()))
            .finish()
            .eprint((filename, Source::from(source)))
    };

    if printed.is_err() {
        eprintln!("{}", error.render_diagnostic(filename, source));
    }
}
