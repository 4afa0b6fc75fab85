//! A module implementing the command-line tokenizer.
//!
//! One raw input line is split into shell words by an explicit finite state
//! machine over the quote state (`{unquoted, single, double}`) crossed with
//! a pending-escape flag. Quote characters only toggle state and are never
//! part of a token; escape handling differs inside double quotes versus
//! outside any quotes. Tokenization is a pure function of the line — it
//! never touches the filesystem or the environment.

use std::fmt;

/// Errors that can occur while tokenizing a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    /// A closing `'` was not found before the end of the line.
    UnclosedSingleQuote,
    /// A closing `"` was not found before the end of the line.
    UnclosedDoubleQuote,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnclosedSingleQuote => write!(f, "Unclosed single quote"),
            LexError::UnclosedDoubleQuote => write!(f, "Unclosed double quote"),
        }
    }
}

impl std::error::Error for LexError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Unquoted,
    Single,
    Double,
}

struct Lexer {
    quote: QuoteState,
    escaping: bool,
    buffer: String,
    tokens: Vec<String>,
}

impl Lexer {
    fn new() -> Self {
        Lexer {
            quote: QuoteState::Unquoted,
            escaping: false,
            buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Single FSM transition for one input character.
    fn step(&mut self, ch: char) {
        if self.escaping {
            self.resolve_escape(ch);
            self.escaping = false;
            return;
        }

        match (self.quote, ch) {
            // Single quotes: everything is literal until the closing quote.
            (QuoteState::Single, '\'') => self.quote = QuoteState::Unquoted,
            (QuoteState::Single, c) => self.buffer.push(c),

            (QuoteState::Double, '"') => self.quote = QuoteState::Unquoted,
            (QuoteState::Double, '\\') => self.escaping = true,
            (QuoteState::Double, c) => self.buffer.push(c),

            (QuoteState::Unquoted, '\\') => self.escaping = true,
            (QuoteState::Unquoted, '\'') => self.quote = QuoteState::Single,
            (QuoteState::Unquoted, '"') => self.quote = QuoteState::Double,
            (QuoteState::Unquoted, ' ') => self.flush(),
            (QuoteState::Unquoted, c) => self.buffer.push(c),
        }
    }

    /// Resolve the character following a backslash.
    ///
    /// Inside double quotes only `\`, `$`, `"` and newline are unescaped to
    /// the bare character; any other character keeps the backslash as well.
    /// Outside quotes the escaped character is always taken literally.
    fn resolve_escape(&mut self, ch: char) {
        match self.quote {
            QuoteState::Double => match ch {
                '\\' | '$' | '"' | '\n' => self.buffer.push(ch),
                other => {
                    self.buffer.push('\\');
                    self.buffer.push(other);
                }
            },
            _ => self.buffer.push(ch),
        }
    }

    /// Emit the accumulated buffer as a token, if non-empty. Runs of spaces
    /// therefore never produce empty tokens.
    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.tokens.push(std::mem::take(&mut self.buffer));
        }
    }

    fn finish(mut self) -> Result<Vec<String>, LexError> {
        match self.quote {
            QuoteState::Single => Err(LexError::UnclosedSingleQuote),
            QuoteState::Double => Err(LexError::UnclosedDoubleQuote),
            QuoteState::Unquoted => {
                self.flush();
                Ok(self.tokens)
            }
        }
    }
}

/// Split one input line into shell words.
///
/// Returns the ordered token sequence, which is empty for a blank or
/// whitespace-only line. Fails when a quote is left unclosed; the caller is
/// responsible for reporting the error to the user.
pub fn tokenize(line: &str) -> Result<Vec<String>, LexError> {
    let mut lexer = Lexer::new();
    for ch in line.chars() {
        lexer.step(ch);
    }
    lexer.finish()
}
