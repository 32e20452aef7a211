// src/system/file_runner.rs

//! Shell-interpreter + temp-file runner.
//!
//! The legacy fallback for hosts without a usable pipe facility: redirect
//! the command's output into an ephemeral file through the blocking
//! shell-execute call, then read the file back line by line. The temp file
//! is deleted on success and failure alike.
//!
//! Two documented limitations: the timeout is ignored, and signal death is
//! indistinguishable from a normal exit because the target platforms expose
//! only a combined raw status.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tempfile::NamedTempFile;

use crate::constants::TEMP_OUTPUT_PREFIX;
use crate::models::{ExecOptions, RunOutcome};
use crate::system::executor::ExecutionError;

pub(crate) fn run(
    command: &str,
    cwd: Option<&Path>,
    verbose: bool,
    options: &ExecOptions,
) -> Result<RunOutcome, ExecutionError> {
    let capture = NamedTempFile::with_prefix(TEMP_OUTPUT_PREFIX).map_err(|source| {
        ExecutionError::Stat {
            path: TEMP_OUTPUT_PREFIX.to_string(),
            source,
        }
    })?;
    // Detach the handle; the guard still deletes the file on every exit path.
    let capture_path = capture.into_temp_path();

    let mut line = String::with_capacity(command.len() + 64);
    if let Some(dir) = cwd {
        let _ = write!(line, "cd \"{}\" && ", dir.display());
    }
    line.push_str(command);
    let _ = write!(line, " > \"{}\"", capture_path.display());

    if verbose {
        println!("running {line}");
    }

    let status = interpreter(options)
        .arg(&line)
        .stdin(Stdio::null())
        .status()
        .map_err(|source| ExecutionError::Spawn {
            command: line.clone(),
            source,
        })?;

    let output = read_capture(&capture_path);

    if let Err(e) = capture_path.close() {
        log::warn!("could not delete capture file: {e}");
    }

    let output = output?;
    Ok(RunOutcome::exited(raw_status(status), output))
}

/// The blocking shell-execute front end for this platform.
fn interpreter(options: &ExecOptions) -> Command {
    if cfg!(windows) {
        let path = options
            .interpreter_substitute
            .clone()
            .unwrap_or_else(|| "cmd.exe".into());
        let mut cmd = Command::new(path);
        cmd.arg("/C");
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c");
        cmd
    }
}

/// Reads the capture file line by line, joining with `\n`; the first line
/// carries no leading separator.
fn read_capture(path: &Path) -> Result<String, ExecutionError> {
    let read_err = |source: std::io::Error| ExecutionError::Read {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(read_err)?;
    let mut output = String::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(read_err)?;
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&line);
    }
    Ok(output)
}

/// The synchronous call's raw combined status. On Unix hosts this is the
/// full wait status, exactly what `system(3)` would have returned; it does
/// not separate signal death from a normal exit.
#[cfg(unix)]
fn raw_status(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.into_raw()
}

#[cfg(not(unix))]
fn raw_status(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_a_single_line() {
        let outcome = run("echo hello", None, false, &ExecOptions::default()).expect("run");
        assert!(outcome.completed);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.output, "hello");
    }

    #[test]
    fn joins_lines_with_newlines() {
        let outcome = run(
            "printf 'a\\nb\\nc\\n'",
            None,
            false,
            &ExecOptions::default(),
        )
        .expect("run");
        assert_eq!(outcome.output, "a\nb\nc");
    }

    #[test]
    fn reports_the_raw_combined_status() {
        // exit 3 through system() semantics: code in the high byte.
        let outcome = run("exit 3", None, false, &ExecOptions::default()).expect("run");
        assert!(outcome.completed);
        assert_eq!(outcome.exit_code, Some(3 << 8));
        assert_eq!(outcome.terminating_signal, None);
    }

    #[test]
    fn working_directory_prefix_applies() {
        let dir = tempfile::tempdir().expect("temp dir");
        let outcome = run("pwd", Some(dir.path()), false, &ExecOptions::default()).expect("run");
        let canonical = dir.path().canonicalize().expect("canonicalize");
        assert_eq!(
            std::path::Path::new(outcome.output.trim()).canonicalize().ok(),
            Some(canonical)
        );
    }

    // The child's stdout symlink under /proc names the capture file, so the
    // deletion paths can be observed without racing other tests.
    #[cfg(target_os = "linux")]
    #[test]
    fn capture_file_is_deleted_afterward() {
        let outcome = run(
            "readlink /proc/self/fd/1",
            None,
            false,
            &ExecOptions::default(),
        )
        .expect("run");
        assert!(outcome.completed);
        let capture = std::path::PathBuf::from(outcome.output.trim());
        assert!(
            capture.to_string_lossy().contains(TEMP_OUTPUT_PREFIX),
            "child did not report the capture file: {}",
            capture.display()
        );
        assert!(!capture.exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn unreadable_capture_file_reports_read_failure() {
        // The inner shell's stdout is the capture file; removing it makes
        // the read-back fail while the delete path still runs.
        let err = run(
            "sh -c 'rm -- \"$(readlink /proc/$$/fd/1)\"'",
            None,
            false,
            &ExecOptions::default(),
        )
        .unwrap_err();
        match err {
            ExecutionError::Read { path, .. } => {
                assert!(!std::path::Path::new(&path).exists());
            }
            other => panic!("expected a read failure, got {other:?}"),
        }
    }

    #[test]
    fn signal_death_is_not_distinguished() {
        // The child dies to SIGSEGV, but this back end still reports a
        // completed outcome with the combined status.
        let outcome = run("kill -s SEGV $$", None, false, &ExecOptions::default()).expect("run");
        assert!(outcome.completed);
        assert_eq!(outcome.terminating_signal, None);
    }
}
