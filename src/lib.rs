//! A tiny interactive command interpreter.
//!
//! This crate provides the building blocks of a minimal shell: a quote-aware
//! command-line tokenizer, a dispatcher that runs a closed set of built-in
//! commands in-process or launches external programs found on `PATH`, and
//! file redirection for the output streams of external commands.
//!
//! The main entry point is [`Interpreter`], which owns the session
//! [`env::Environment`] and drives the read-eval loop. The public modules
//! [`lexer`] and [`parser`] expose the tokenizer and the invocation-splitting
//! step for direct use.

mod builtin;
pub mod env;
mod external;
mod interpreter;
pub mod lexer;
pub mod parser;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;
