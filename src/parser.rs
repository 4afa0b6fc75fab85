//! Turns a token sequence into a command invocation.
//!
//! The only structure recognized at this level is a single output
//! redirection: the first token that exactly equals one of the redirect
//! operators splits the sequence into the command's argv and a target path.
//! Operators are matched against whole tokens, never substrings, so a word
//! like `a>b` or a quoted `"a > b"` is an ordinary argument.

/// Which stream a redirect operator routes, and whether it appends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// `>` or `1>`: truncate the target and write stdout to it.
    Stdout,
    /// `>>` or `1>>`: append stdout to the target.
    StdoutAppend,
    /// `2>`: truncate the target and write stderr to it.
    Stderr,
    /// `2>>`: append stderr to the target.
    StderrAppend,
}

impl RedirectKind {
    /// Recognize a redirect operator token. Returns `None` for anything that
    /// is not exactly one of the six operator spellings.
    pub fn from_operator(token: &str) -> Option<RedirectKind> {
        match token {
            ">" | "1>" => Some(RedirectKind::Stdout),
            ">>" | "1>>" => Some(RedirectKind::StdoutAppend),
            "2>" => Some(RedirectKind::Stderr),
            "2>>" => Some(RedirectKind::StderrAppend),
            _ => None,
        }
    }

    pub fn redirects_stdout(self) -> bool {
        matches!(self, RedirectKind::Stdout | RedirectKind::StdoutAppend)
    }

    pub fn is_append(self) -> bool {
        matches!(self, RedirectKind::StdoutAppend | RedirectKind::StderrAppend)
    }
}

/// A recognized redirection: which stream goes where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectSpec {
    pub kind: RedirectKind,
    pub target: String,
}

/// One command invocation: argv (argv[0] is the command name as typed) and
/// an optional stream redirection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<String>,
    pub redirect: Option<RedirectSpec>,
}

/// Index of the first token that is a redirect operator, if any.
pub fn redirect_operator_index(tokens: &[String]) -> Option<usize> {
    tokens
        .iter()
        .position(|t| RedirectKind::from_operator(t).is_some())
}

/// Split a token sequence at the first redirect operator.
///
/// When an operator is found and a target token follows it, argv is
/// everything before the operator and any tokens past the target are
/// dropped. When the operator is the last token there is nothing to
/// redirect to: the whole sequence is returned verbatim, bare operator
/// included, and the caller executes it literally. That trailing-operator
/// fallback mirrors the long-standing behavior of this interpreter and is
/// deliberate, not a syntax error.
pub fn parse_invocation(mut tokens: Vec<String>) -> Invocation {
    let operator = tokens
        .iter()
        .enumerate()
        .find_map(|(i, t)| RedirectKind::from_operator(t).map(|kind| (i, kind)));

    match operator {
        Some((idx, kind)) if idx + 1 < tokens.len() => {
            let target = tokens[idx + 1].clone();
            tokens.truncate(idx);
            Invocation {
                argv: tokens,
                redirect: Some(RedirectSpec { kind, target }),
            }
        }
        _ => Invocation {
            argv: tokens,
            redirect: None,
        },
    }
}
