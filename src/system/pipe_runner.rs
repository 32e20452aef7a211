// src/system/pipe_runner.rs

//! Pipe-based synchronous runner.
//!
//! Spawns the command through the platform's blocking shell pipe, reads
//! fixed-size chunks until end of stream, and decodes the wait status. The
//! child's error stream is redirected into its output stream inside the
//! shell line, so a single pipe captures both in emission order.
//!
//! This back end accepts a timeout but does not enforce it; a hung child
//! blocks the call indefinitely. Documented limitation, not a bug.

use std::fmt::Write as _;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::constants::PIPE_CHUNK_SIZE;
use crate::models::RunOutcome;
use crate::system::executor::ExecutionError;
use crate::system::status;

pub(crate) fn run(
    command: &str,
    cwd: Option<&Path>,
    verbose: bool,
    timeout: Option<Duration>,
) -> Result<RunOutcome, ExecutionError> {
    if let Some(limit) = timeout {
        log::debug!("pipe backend does not enforce timeouts; ignoring {limit:?}");
    }

    let line = build_line(command, cwd);
    if verbose {
        println!("running {line}");
    }

    let mut child = Command::new("sh")
        .arg("-c")
        .arg(&line)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| ExecutionError::Spawn {
            command: line.clone(),
            source,
        })?;

    let mut output = String::new();
    if let Some(mut stdout) = child.stdout.take() {
        let mut chunk = [0u8; PIPE_CHUNK_SIZE];
        loop {
            match stdout.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    let text = String::from_utf8_lossy(chunk.get(..n).unwrap_or_default());
                    if verbose {
                        print!("{text}");
                        let _ = std::io::stdout().flush();
                    }
                    output.push_str(&text);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(ExecutionError::Read {
                        path: "<pipe>".to_string(),
                        source,
                    });
                }
            }
        }
    }

    let wait_status = child.wait().map_err(|source| ExecutionError::Spawn {
        command: line,
        source,
    })?;
    Ok(status::decode(wait_status, output))
}

/// `cd "<dir>" && <command> 2>&1`
fn build_line(command: &str, cwd: Option<&Path>) -> String {
    let mut line = String::with_capacity(command.len() + 32);
    if let Some(dir) = cwd {
        let _ = write!(line, "cd \"{}\" && ", dir.display());
    }
    line.push_str(command);
    line.push_str(" 2>&1");
    line
}
