use crate::env::Environment;
use crate::external;
use anyhow::Result;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Names of all built-in commands, in dispatch order.
pub const BUILTIN_NAMES: [&str; 5] = ["echo", "type", "pwd", "cd", "exit"];

/// Commands implemented inside the interpreter process.
///
/// This is a closed set: new builtins are added as new variants with a
/// matching arm in [`Builtin::run`], not registered at runtime. Builtins
/// never honor a redirection; redirection is defined only for external
/// commands in this interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Echo,
    Type,
    Pwd,
    Cd,
    Exit,
}

impl Builtin {
    /// Look up a builtin by its command name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Builtin> {
        match name {
            "echo" => Some(Builtin::Echo),
            "type" => Some(Builtin::Type),
            "pwd" => Some(Builtin::Pwd),
            "cd" => Some(Builtin::Cd),
            "exit" => Some(Builtin::Exit),
            _ => None,
        }
    }

    /// Execute the builtin with the given arguments.
    ///
    /// All user-visible output, including error messages, goes to `stdout`;
    /// the return value follows shell conventions (0 success, non-zero
    /// failure). Argument and filesystem problems are reported as messages,
    /// never propagated as errors, so the read loop always continues.
    pub fn run(
        self,
        args: &[String],
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        match self {
            Builtin::Echo => {
                writeln!(stdout, "{}", args.join(" "))?;
                Ok(0)
            }
            Builtin::Type => run_type(args, stdout, env),
            Builtin::Pwd => {
                writeln!(stdout, "{}", env.current_dir.to_string_lossy())?;
                Ok(0)
            }
            Builtin::Cd => run_cd(args, stdout, env),
            Builtin::Exit => {
                // Only `exit` and `exit 0` terminate; other forms are inert.
                if args.is_empty() || args[0] == "0" {
                    env.should_exit = true;
                }
                Ok(0)
            }
        }
    }
}

fn run_type(args: &[String], stdout: &mut dyn Write, env: &Environment) -> Result<ExitCode> {
    let Some(name) = args.first() else {
        writeln!(stdout, ": not found")?;
        return Ok(1);
    };

    if Builtin::from_name(name).is_some() {
        writeln!(stdout, "{} is a shell builtin", name)?;
        return Ok(0);
    }

    match external::find_executable(env, name) {
        Some(path) => {
            writeln!(stdout, "{} is {}", name, path.display())?;
            Ok(0)
        }
        None => {
            writeln!(stdout, "{}: not found", name)?;
            Ok(1)
        }
    }
}

fn run_cd(args: &[String], stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
    let Some(raw) = args.first() else {
        writeln!(stdout, "cd: missing argument")?;
        return Ok(1);
    };

    let expanded = if raw == "~" || raw.starts_with("~/") {
        match env.home() {
            Some(home) => format!("{}{}", home, &raw[1..]),
            None => {
                writeln!(stdout, "cd: {}: HOME not set", raw)?;
                return Ok(1);
            }
        }
    } else {
        raw.clone()
    };

    let target = if Path::new(&expanded).is_absolute() {
        PathBuf::from(&expanded)
    } else {
        env.current_dir.join(&expanded)
    };

    // Canonicalization resolves `.` and `..` and rejects dangling paths.
    let canonical = match fs::canonicalize(&target) {
        Ok(path) => path,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            writeln!(stdout, "cd: {}: No such file or directory", raw)?;
            return Ok(1);
        }
        Err(err) => {
            writeln!(stdout, "cd: {}: {}", raw, err)?;
            return Ok(1);
        }
    };

    if !canonical.is_dir() {
        writeln!(stdout, "cd: {}: Not a directory", raw)?;
        return Ok(1);
    }

    env.current_dir = canonical;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env as stdenv;
    use std::io;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn test_env() -> Environment {
        Environment {
            vars: HashMap::new(),
            current_dir: stdenv::current_dir().unwrap(),
            should_exit: false,
        }
    }

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn run(builtin: Builtin, argv: &[&str], env: &mut Environment) -> (String, ExitCode) {
        let mut out = Vec::new();
        let code = builtin
            .run(&args(argv), &mut out, env)
            .expect("builtin should not error");
        (String::from_utf8(out).unwrap(), code)
    }

    fn make_unique_temp_dir(tag: &str) -> io::Result<PathBuf> {
        let mut p = stdenv::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("minish_test_{}_{}_{}", tag, std::process::id(), nanos));
        fs::create_dir_all(&p)?;
        Ok(p)
    }

    #[test]
    fn test_builtin_lookup_is_case_sensitive() {
        assert_eq!(Builtin::from_name("echo"), Some(Builtin::Echo));
        assert_eq!(Builtin::from_name("Echo"), None);
        assert_eq!(Builtin::from_name("ls"), None);
    }

    #[test]
    fn test_echo_joins_args_with_single_space() {
        let mut env = test_env();
        let (out, code) = run(Builtin::Echo, &["hello", "world"], &mut env);
        assert_eq!(out, "hello world\n");
        assert_eq!(code, 0);
    }

    #[test]
    fn test_echo_without_args_prints_empty_line() {
        let mut env = test_env();
        let (out, code) = run(Builtin::Echo, &[], &mut env);
        assert_eq!(out, "\n");
        assert_eq!(code, 0);
    }

    #[test]
    fn test_pwd_prints_current_dir() {
        let mut env = test_env();
        env.current_dir = PathBuf::from("/some/where");
        let (out, code) = run(Builtin::Pwd, &[], &mut env);
        assert_eq!(out, "/some/where\n");
        assert_eq!(code, 0);
    }

    #[test]
    fn test_type_reports_builtins() {
        let mut env = test_env();
        for name in BUILTIN_NAMES {
            let (out, code) = run(Builtin::Type, &[name], &mut env);
            assert_eq!(out, format!("{} is a shell builtin\n", name));
            assert_eq!(code, 0);
        }
    }

    #[test]
    fn test_type_unknown_name_not_found() {
        let mut env = test_env();
        env.set_var("PATH", stdenv::temp_dir().to_string_lossy().to_string());
        let (out, code) = run(Builtin::Type, &["nonexistentcmd123"], &mut env);
        assert_eq!(out, "nonexistentcmd123: not found\n");
        assert_eq!(code, 1);
    }

    #[test]
    fn test_type_without_argument() {
        let mut env = test_env();
        let (out, code) = run(Builtin::Type, &[], &mut env);
        assert_eq!(out, ": not found\n");
        assert_eq!(code, 1);
    }

    #[test]
    #[cfg(unix)]
    fn test_type_reports_executable_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = make_unique_temp_dir("type_path").unwrap();
        let exe = dir.join("frobnicate");
        fs::write(&exe, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();

        let mut env = test_env();
        env.set_var("PATH", dir.to_string_lossy().to_string());

        let (out, code) = run(Builtin::Type, &["frobnicate"], &mut env);
        assert_eq!(out, format!("frobnicate is {}\n", exe.display()));
        assert_eq!(code, 0);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_cd_missing_argument() {
        let mut env = test_env();
        let (out, code) = run(Builtin::Cd, &[], &mut env);
        assert_eq!(out, "cd: missing argument\n");
        assert_eq!(code, 1);
    }

    #[test]
    fn test_cd_to_absolute_path() {
        let dir = make_unique_temp_dir("cd_abs").unwrap();
        let canonical = fs::canonicalize(&dir).unwrap();

        let mut env = test_env();
        let (out, code) = run(Builtin::Cd, &[&canonical.to_string_lossy()], &mut env);
        assert_eq!(out, "");
        assert_eq!(code, 0);
        assert_eq!(env.current_dir, canonical);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_cd_relative_and_dotdot() {
        let dir = make_unique_temp_dir("cd_rel").unwrap();
        let canonical = fs::canonicalize(&dir).unwrap();
        fs::create_dir_all(canonical.join("sub")).unwrap();

        let mut env = test_env();
        env.current_dir = canonical.clone();

        let (_, code) = run(Builtin::Cd, &["sub"], &mut env);
        assert_eq!(code, 0);
        assert_eq!(env.current_dir, canonical.join("sub"));

        let (_, code) = run(Builtin::Cd, &[".."], &mut env);
        assert_eq!(code, 0);
        assert_eq!(env.current_dir, canonical);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_cd_tilde_expands_to_home() {
        let dir = make_unique_temp_dir("cd_home").unwrap();
        let canonical = fs::canonicalize(&dir).unwrap();
        fs::create_dir_all(canonical.join("inner")).unwrap();

        let mut env = test_env();
        env.set_var("HOME", canonical.to_string_lossy().to_string());

        let (_, code) = run(Builtin::Cd, &["~"], &mut env);
        assert_eq!(code, 0);
        assert_eq!(env.current_dir, canonical);

        let (_, code) = run(Builtin::Cd, &["~/inner"], &mut env);
        assert_eq!(code, 0);
        assert_eq!(env.current_dir, canonical.join("inner"));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_cd_nonexistent_path_is_reported() {
        let mut env = test_env();
        let before = env.current_dir.clone();
        let name = format!("no_such_dir_{}", std::process::id());
        let (out, code) = run(Builtin::Cd, &[&name], &mut env);
        assert_eq!(out, format!("cd: {}: No such file or directory\n", name));
        assert_eq!(code, 1);
        assert_eq!(env.current_dir, before);
    }

    #[test]
    fn test_cd_to_file_is_not_a_directory() {
        let dir = make_unique_temp_dir("cd_file").unwrap();
        let file = dir.join("plain");
        fs::write(&file, "x").unwrap();

        let mut env = test_env();
        let target = file.to_string_lossy().to_string();
        let (out, code) = run(Builtin::Cd, &[&target], &mut env);
        assert_eq!(out, format!("cd: {}: Not a directory\n", target));
        assert_eq!(code, 1);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_exit_sets_flag_only_for_bare_and_zero() {
        let mut env = test_env();

        let (_, code) = run(Builtin::Exit, &["1"], &mut env);
        assert_eq!(code, 0);
        assert!(!env.should_exit);

        let (_, code) = run(Builtin::Exit, &["0"], &mut env);
        assert_eq!(code, 0);
        assert!(env.should_exit);

        let mut env = test_env();
        let (_, code) = run(Builtin::Exit, &[], &mut env);
        assert_eq!(code, 0);
        assert!(env.should_exit);
    }
}
