use crate::builtin::{BUILTIN_NAMES, ExitCode};
use crate::env::Environment;
use crate::parser::Invocation;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Locate an executable for a bare command name by searching `PATH`.
///
/// Directories are searched in list order, so the first directory holding a
/// matching entry wins when the same name exists in several of them. An
/// entry only matches when it exists, is not a directory, and is executable
/// by the current user. Returns `None` when `PATH` is unset or nothing
/// matches.
pub fn find_executable(env: &Environment, name: &str) -> Option<PathBuf> {
    let search_paths = env.path()?;
    for dir in std::env::split_paths(&search_paths) {
        let candidate = dir.join(name);
        if is_executable_file(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Collect the names of every executable reachable through `PATH`, plus the
/// builtin names. Used to seed line completion; duplicates across
/// directories collapse since the result is a set.
pub fn executable_commands(env: &Environment) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = BUILTIN_NAMES.iter().map(|s| s.to_string()).collect();

    let Some(search_paths) = env.path() else {
        return names;
    };
    for dir in std::env::split_paths(&search_paths) {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            if is_executable_file(&entry.path()) {
                if let Some(name) = entry.file_name().to_str() {
                    names.insert(name.to_string());
                }
            }
        }
    }
    names
}

fn is_executable_file(path: &Path) -> bool {
    let Ok(metadata) = path.metadata() else {
        return false;
    };
    if metadata.is_dir() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Spawn an external process and block until it terminates.
///
/// argv[0] is passed through exactly as the user typed it; the resolver only
/// decides whether a spawn is attempted at all, so the child sees the
/// invocation name rather than an absolute path. stdout and stderr are
/// inherited unless the invocation carries a redirect, in which case the
/// redirected stream is connected to the target file instead.
pub fn run_external(env: &Environment, invocation: &Invocation) -> Result<ExitCode> {
    let name = &invocation.argv[0];
    let mut command = Command::new(name);
    command
        .args(&invocation.argv[1..])
        .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .current_dir(&env.current_dir);

    if let Some(spec) = &invocation.redirect {
        let target = open_redirect_target(spec.kind.is_append(), &spec.target, env)?;
        if spec.kind.redirects_stdout() {
            command.stdout(Stdio::from(target));
        } else {
            command.stderr(Stdio::from(target));
        }
    }

    let mut child = command
        .spawn()
        .with_context(|| format!("failed to start {}", name))?;
    let exit_status = child.wait()?;
    match exit_status.code() {
        Some(code) => Ok(code),
        None => Ok(terminated_by_signal(exit_status)),
    }
}

fn open_redirect_target(append: bool, target: &str, env: &Environment) -> Result<File> {
    let path = if Path::new(target).is_absolute() {
        PathBuf::from(target)
    } else {
        env.current_dir.join(target)
    };
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    if append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    options
        .open(&path)
        .with_context(|| format!("cannot open {}", target))
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}
