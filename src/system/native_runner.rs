// src/system/native_runner.rs

//! Direct process-creation runner.
//!
//! Spawns the child through the platform loader instead of a shell, so the
//! loader resolves argument quoting. This is the only back end with real
//! timeout cancellation: a `try_wait` poll loop forcibly kills the child
//! when the limit expires. Output is captured from both streams on drain
//! threads and merged into one buffer.

use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::constants::{PIPE_CHUNK_SIZE, WAIT_POLL_INTERVAL_MS};
use crate::models::{ExecOptions, RunOutcome};
use crate::system::executor::ExecutionError;
use crate::system::status;

pub(crate) fn run(
    command: &str,
    cwd: Option<&Path>,
    verbose: bool,
    timeout: Option<Duration>,
    options: &ExecOptions,
) -> Result<RunOutcome, ExecutionError> {
    let (program, rest) = split_program(command);
    if program.is_empty() {
        return Err(ExecutionError::Parse(command.to_string()));
    }
    if verbose {
        println!("running {command}");
    }

    let mut cmd = build_command(&program, &rest, command, options)?;
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        // Windows built-ins like `echo` or `dir` have no image file; retry
        // through the command interpreter.
        #[cfg(windows)]
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("'{program}' not found, retrying through the interpreter");
            spawn_via_interpreter(command, cwd, options)?
        }
        Err(source) => {
            return Err(ExecutionError::Spawn {
                command: command.to_string(),
                source,
            });
        }
    };

    let stdout_drain = child.stdout.take().map(|s| spawn_drain(s, verbose));
    let stderr_drain = child.stderr.take().map(|s| spawn_drain(s, verbose));

    let wait_status = wait_with_timeout(&mut child, timeout, command)?;
    let mut output = join_drain(stdout_drain);
    output.push_str(&join_drain(stderr_drain));

    match wait_status {
        Some(status) => Ok(status::decode(status, output)),
        // Timed out; the child was killed and reaped, keep partial output.
        None => Ok(RunOutcome::aborted(output)),
    }
}

/// Splits the leading program token from the rest of the line, honoring a
/// quoted program path.
fn split_program(command: &str) -> (String, String) {
    let trimmed = command.trim_start();
    if let Some(quoted) = trimmed.strip_prefix('"') {
        if let Some(end) = quoted.find('"') {
            let program = quoted.get(..end).unwrap_or_default().to_string();
            let rest = quoted
                .get(end + 1..)
                .unwrap_or_default()
                .trim_start()
                .to_string();
            return (program, rest);
        }
    }
    match trimmed.split_once(char::is_whitespace) {
        Some((program, rest)) => (program.to_string(), rest.trim_start().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

#[cfg(windows)]
fn build_command(
    program: &str,
    rest: &str,
    _command: &str,
    options: &ExecOptions,
) -> Result<Command, ExecutionError> {
    use std::os::windows::process::CommandExt;
    use windows_sys::Win32::System::Threading::CREATE_NO_WINDOW;

    let mut cmd = Command::new(program);
    if !rest.is_empty() {
        // The loader, not a shell, interprets the argument text.
        cmd.raw_arg(rest);
    }
    if options.hide_console {
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    Ok(cmd)
}

#[cfg(not(windows))]
fn build_command(
    program: &str,
    rest: &str,
    command: &str,
    _options: &ExecOptions,
) -> Result<Command, ExecutionError> {
    let mut cmd = Command::new(program);
    if !rest.is_empty() {
        let args =
            shlex::split(rest).ok_or_else(|| ExecutionError::Parse(command.to_string()))?;
        cmd.args(args);
    }
    Ok(cmd)
}

/// Legacy interpreter fallback for image-less built-in commands.
#[cfg(windows)]
fn spawn_via_interpreter(
    command: &str,
    cwd: Option<&Path>,
    options: &ExecOptions,
) -> Result<Child, ExecutionError> {
    use std::os::windows::process::CommandExt;
    use windows_sys::Win32::System::Threading::CREATE_NO_WINDOW;

    let interpreter = options
        .interpreter_substitute
        .clone()
        .unwrap_or_else(|| "cmd.exe".into());
    let mut cmd = Command::new(interpreter);
    cmd.arg("/C")
        .raw_arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if options.hide_console {
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.spawn().map_err(|source| ExecutionError::Spawn {
        command: command.to_string(),
        source,
    })
}

/// Drains one child stream to a string on its own thread, so a child
/// producing more than the pipe buffer never deadlocks the wait loop.
fn spawn_drain<R>(mut stream: R, verbose: bool) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut captured = String::new();
        let mut chunk = [0u8; PIPE_CHUNK_SIZE];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    let text = String::from_utf8_lossy(chunk.get(..n).unwrap_or_default());
                    if verbose {
                        print!("{text}");
                        let _ = std::io::stdout().flush();
                    }
                    captured.push_str(&text);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        captured
    })
}

fn join_drain(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Blocks until the child exits, or kills it when the limit expires.
/// `Ok(None)` means the timeout fired and the child was killed and reaped.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Option<Duration>,
    command: &str,
) -> Result<Option<ExitStatus>, ExecutionError> {
    let spawn_err = |source: std::io::Error| ExecutionError::Spawn {
        command: command.to_string(),
        source,
    };

    let Some(limit) = timeout.filter(|t| !t.is_zero()) else {
        // Zero or unset: wait indefinitely.
        return child.wait().map(Some).map_err(spawn_err);
    };

    let deadline = Instant::now() + limit;
    loop {
        match child.try_wait().map_err(spawn_err)? {
            Some(status) => return Ok(Some(status)),
            None if Instant::now() >= deadline => {
                log::warn!(
                    "command timed out after {limit:?}, killing child (pid {})",
                    child.id()
                );
                if let Err(e) = child.kill() {
                    log::warn!("failed to kill child {}: {e}", child.id());
                }
                // Reap so no zombie outlives the call.
                let _ = child.wait();
                return Ok(None);
            }
            None => thread::sleep(Duration::from_millis(WAIT_POLL_INTERVAL_MS)),
        }
    }
}
