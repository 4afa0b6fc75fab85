use crate::builtin::{Builtin, ExitCode};
use crate::env::Environment;
use crate::external;
use crate::lexer;
use crate::parser::{self, Invocation};
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use std::io::Write;

/// The interactive command interpreter.
///
/// One `Interpreter` owns the session [`Environment`] and processes one
/// line at a time: tokenize, split off any redirection, then either run a
/// builtin in-process or resolve and spawn an external program. Execution
/// is strictly sequential; the only blocking point is waiting for a spawned
/// child to exit.
///
/// Example
/// ```
/// use minish::Interpreter;
/// let mut sh = Interpreter::default();
/// let code = sh.run_line("echo hello world");
/// assert_eq!(code, 0);
/// ```
pub struct Interpreter {
    env: Environment,
}

impl Interpreter {
    /// Create an interpreter over an explicit environment.
    pub fn new(env: Environment) -> Self {
        Self { env }
    }

    /// True once the `exit` builtin has asked the read loop to stop.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Tokenize and dispatch a single line, reporting any error to the
    /// user. Errors never escape: a malformed or failing line is reported
    /// and the interpreter stays usable for the next one.
    pub fn run_line(&mut self, line: &str) -> ExitCode {
        let tokens = match lexer::tokenize(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                println!("Error: {}", err);
                return 1;
            }
        };
        match self.dispatch(tokens) {
            Ok(code) => code,
            Err(err) => {
                println!("Error executing command: {}", err);
                1
            }
        }
    }

    /// Execute one tokenized command line.
    pub fn dispatch(&mut self, tokens: Vec<String>) -> anyhow::Result<ExitCode> {
        self.dispatch_with_output(tokens, &mut std::io::stdout())
    }

    /// Like [`Interpreter::dispatch`], but builtin output and interpreter
    /// messages go to the provided writer. External processes still write
    /// to their own (inherited or redirected) streams.
    pub(crate) fn dispatch_with_output(
        &mut self,
        tokens: Vec<String>,
        stdout: &mut dyn Write,
    ) -> anyhow::Result<ExitCode> {
        if tokens.is_empty() {
            return Ok(0);
        }

        // A redirect operator with no target after it is not a syntax
        // error: the whole line runs verbatim as an external command, bare
        // operator included.
        if let Some(idx) = parser::redirect_operator_index(&tokens) {
            if idx + 1 == tokens.len() {
                let invocation = Invocation {
                    argv: tokens,
                    redirect: None,
                };
                return self.run_resolved(&invocation, stdout);
            }
        }

        let invocation = parser::parse_invocation(tokens);
        if invocation.argv.is_empty() {
            return Ok(0);
        }

        if let Some(builtin) = Builtin::from_name(&invocation.argv[0]) {
            // Builtins ignore redirection; only external commands honor it.
            return builtin.run(&invocation.argv[1..], stdout, &mut self.env);
        }

        self.run_resolved(&invocation, stdout)
    }

    fn run_resolved(
        &mut self,
        invocation: &Invocation,
        stdout: &mut dyn Write,
    ) -> anyhow::Result<ExitCode> {
        let name = &invocation.argv[0];
        if external::find_executable(&self.env, name).is_none() {
            writeln!(stdout, "{}: command not found", name)?;
            return Ok(127);
        }
        external::run_external(&self.env, invocation)
    }

    /// The interactive Read-Eval-Print Loop.
    ///
    /// Lines are read through rustyline with history and command-name
    /// completion over every builtin and every executable on `PATH`. The
    /// loop ends on `exit`, end-of-input or interrupt.
    pub fn repl(&mut self) -> rustyline::Result<()> {
        let mut rl = Editor::<CommandCompleter, DefaultHistory>::new()?;
        rl.set_helper(Some(CommandCompleter::new(&self.env)));

        while !self.env.should_exit {
            match rl.readline("$ ") {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    self.run_line(&line);
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter over a snapshot of the process environment.
    fn default() -> Self {
        Self::new(Environment::new())
    }
}

/// rustyline helper that completes the command word from the set of
/// builtin and `PATH`-reachable executable names.
pub(crate) struct CommandCompleter {
    commands: Vec<String>,
}

impl CommandCompleter {
    fn new(env: &Environment) -> Self {
        Self {
            commands: external::executable_commands(env).into_iter().collect(),
        }
    }
}

impl Completer for CommandCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let head = &line[..pos];
        // Only the command word is completed; arguments are left alone.
        if head.contains(' ') {
            return Ok((pos, Vec::new()));
        }
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(head))
            .cloned()
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}
