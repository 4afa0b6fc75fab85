use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable, session-level view of the process environment.
///
/// The environment contains:
/// - `vars`: a map of environment variables visible to executed commands.
/// - `current_dir`: the working directory used by `pwd`, relative `cd` and
///   external-process spawns. `cd` is the sole writer; execution is
///   single-threaded so no locking is needed.
/// - `should_exit`: a flag the read loop checks to know when to terminate.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that the read loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let mut vars = HashMap::new();
        for (k, v) in stdenv::vars() {
            vars.insert(k, v);
        }
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars,
            current_dir,
            should_exit: false,
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// The colon-separated executable search path, if set.
    pub fn path(&self) -> Option<String> {
        self.get_var("PATH")
    }

    /// The user's home directory, used for `~` expansion in `cd`.
    pub fn home(&self) -> Option<String> {
        self.get_var("HOME")
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn empty_env() -> Environment {
        Environment {
            vars: HashMap::new(),
            current_dir: stdenv::current_dir().unwrap(),
            should_exit: false,
        }
    }

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = empty_env();

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");

        assert_eq!(env.get_var("KEY"), Some("VALUE".to_string()));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.path().is_some());
    }

    #[test]
    fn test_home_accessor() {
        let mut env = empty_env();
        env.set_var("HOME", "/home/someone");
        assert_eq!(env.home(), Some("/home/someone".to_string()));
    }
}
