//! LZP interpreter CLI

use clap::{Parser, Subcommand};
use lzp::error::{LzpError, report_error};
use lzp::interp::Interpreter;
use lzp::repl::Repl;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lzp", version, about = "LZP - a small embeddable Lisp")]
struct Cli {
    /// Directory searched for bare plugin names
    #[arg(long, global = true, env = "LZP_PLUGIN_PATH", default_value = lzp::plugin::DEFAULT_PLUGIN_DIR)]
    plugin_dir: PathBuf,

    /// Plugin to load before running (repeatable)
    #[arg(long = "plugin", global = true, value_name = "NAME")]
    plugins: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive REPL (default)
    Repl,
    /// Load source files in order into one global scope
    Run {
        /// Source files to load
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Start the REPL after loading
        #[arg(short, long)]
        interactive: bool,
    },
    /// Evaluate a source string and print the result
    Eval {
        /// Source text, evaluated like a REPL line
        source: String,
    },
    /// Parse and dump the parse tree (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
}

fn main() {
    lzp::init_tracing();
    let cli = Cli::parse();
    lzp::plugin::set_plugin_dir(&cli.plugin_dir);

    let result = match cli.command.unwrap_or(Command::Repl) {
        Command::Repl => start_repl(prepare(&cli.plugins)),
        Command::Run { files, interactive } => run_files(prepare(&cli.plugins), &files, interactive),
        Command::Eval { source } => {
            eval_source(&prepare(&cli.plugins), &source);
            Ok(())
        }
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Interpreter with the requested plugins loaded
fn prepare(plugins: &[String]) -> Interpreter {
    let interpreter = Interpreter::new();
    for name in plugins {
        let result = interpreter.load_plugin(name);
        if result.is_error() {
            eprintln!("{}", interpreter.print_value(&result));
        }
    }
    interpreter
}

fn start_repl(interpreter: Interpreter) -> Result<(), Box<dyn std::error::Error>> {
    Repl::with_interpreter(interpreter)?.run()?;
    Ok(())
}

fn run_files(
    interpreter: Interpreter,
    files: &[PathBuf],
    interactive: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for file in files {
        let result = interpreter.load_file(file);
        if result.is_error() {
            println!("{}", interpreter.print_value(&result));
        }
    }
    if interactive {
        start_repl(interpreter)?;
    }
    Ok(())
}

fn eval_source(interpreter: &Interpreter, source: &str) {
    let value = interpreter.eval_str("<eval>", source);
    println!("{}", interpreter.print_value(&value));
}

/// Read `path`, rendering any front-end failure with ariadne
fn with_source<T>(
    path: &Path,
    stage: impl FnOnce(&str, &str) -> lzp::Result<T>,
) -> Result<T, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path).map_err(LzpError::from)?;
    let filename = path.display().to_string();
    stage(&filename, &source).map_err(|err| {
        report_error(&filename, &source, &err);
        err.into()
    })
}

fn parse_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let tree = with_source(path, lzp::parser::parse_source)?;
    println!("{}", serde_json::to_string_pretty(&tree)?);
    Ok(())
}

fn tokenize_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let tokens = with_source(path, |_, source| lzp::lexer::tokenize(source))?;
    for (tok, span) in &tokens {
        println!("{:?} @ {}..{}", tok, span.start, span.end);
    }
    Ok(())
}
