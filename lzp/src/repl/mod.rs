//! REPL (Read-Eval-Print Loop) for LZP

use crate::interp::{ErrorKind, Interpreter, Value};
use crate::util::{find_similar_name, format_suggestion_hint};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "lzp> ";
const HISTORY_FILE: &str = ".lzp_history";

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    interpreter: Interpreter,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL with a fresh interpreter
    pub fn new() -> RlResult<Self> {
        Self::with_interpreter(Interpreter::new())
    }

    /// Create a REPL over an existing interpreter, keeping its bindings
    pub fn with_interpreter(interpreter: Interpreter) -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            interpreter,
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("LZP version {}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with(':') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    println!("{}", self.eval_input(line));
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Handle REPL commands (starting with :)
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                self.print_help();
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                false
            }
            ":state" => {
                for line in self.interpreter.state_lines() {
                    println!("{line}");
                }
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    /// Print help message
    fn print_help(&self) {
        println!("LZP REPL Commands:");
        println!("  :help, :h, :?   Show this help");
        println!("  :quit, :q       Exit the REPL");
        println!("  :clear          Clear the screen");
        println!("  :state          List global bindings");
        println!();
        println!("You can enter:");
        println!("  - Expressions: + 1 2, (* 2 (- 5 3))");
        println!("  - Definitions: def {{x y}} 1 2");
        println!("  - Functions: def {{add}} (\\ {{a b}} {{+ a b}})");
        println!("  - Quoted lists: {{1 2 3}}, (head {{1 2 3}})");
        println!();
        println!("Built-in functions:");
        println!("  print, show     Print values or raw strings");
        println!("  load, read      Evaluate a file or a source string");
        println!("  plugin          Load a native plugin");
        println!("  state           List bindings of the current scope");
    }

    /// Evaluate one line and render the result for display
    fn eval_input(&mut self, input: &str) -> String {
        let value = self.interpreter.eval_str("<repl>", input);
        let printed = self.interpreter.print_value(&value);

        match self.suggestion(&value) {
            Some(hint) => format!("{printed}\n{hint}"),
            None => printed,
        }
    }

    /// "did you mean" hint for an unbound symbol
    fn suggestion(&self, value: &Value) -> Option<String> {
        let Value::Error(err) = value else {
            return None;
        };
        if err.kind != ErrorKind::UnboundSymbol {
            return None;
        }
        let name = err.message.split('\'').nth(1)?;
        let names = self.interpreter.global().borrow().visible_names();
        let candidates: Vec<&str> = names.iter().map(String::as_str).collect();
        let hint = format_suggestion_hint(find_similar_name(name, &candidates, 2));
        (!hint.is_empty()).then_some(hint)
    }
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
