//! LZP interpreter library
//!
//! A small, dynamically typed Lisp with quoted expressions, closures with
//! partial application and native plugins. Embed it through
//! [`interp::Interpreter`], or extend a scope directly with
//! [`interp::Registrar`].

pub mod ast;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod plugin;
pub mod repl;
pub mod util;

pub use ast::{ParseNode, Span};
pub use error::{LzpError, Result};
pub use interp::{Interpreter, Registrar, RuntimeError, ScopeRef, Value};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `LZP_LOG=lzp=debug` or
/// `LZP_LOG=lzp=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        // Only initialize if LZP_LOG is set
        if let Ok(filter) = EnvFilter::try_from_env("LZP_LOG") {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
