// src/models.rs

use std::path::PathBuf;
use std::time::Duration;

/// Process-wide execution preferences.
///
/// These are set once at startup by the embedding application and passed by
/// reference into every call; they are never mutated during an invocation.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Hide the child's console window (Windows native back end only).
    pub hide_console: bool,
    /// Alternate command-interpreter path for operating system versions that
    /// lack a standard one. `None` uses the platform default.
    pub interpreter_substitute: Option<PathBuf>,
    /// Force `verbose` off for every call, regardless of what the caller asks.
    pub suppress_output: bool,
}

/// Everything a single invocation needs besides the command line itself.
///
/// Immutable once constructed; build one per call.
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    /// Working directory for the child. `None` inherits the caller's.
    pub cwd: Option<PathBuf>,
    /// Echo the child's output as it is produced.
    pub verbose: bool,
    /// Wall-clock limit on the child. Only the native process-creation back
    /// end enforces this; the pipe and temp-file back ends ignore it.
    pub timeout: Option<Duration>,
    /// Shared process-wide preferences.
    pub options: ExecOptions,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// A timeout of zero means "wait indefinitely".
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    pub fn options(mut self, options: ExecOptions) -> Self {
        self.options = options;
        self
    }
}

/// The normalized result of one command invocation.
///
/// Invariant: `exit_code` and `terminating_signal` are mutually exclusive. A
/// process either exits normally (possibly with a nonzero code) or is killed
/// by a signal, never both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    /// The child ran to a normal exit. A nonzero exit code still counts as
    /// completed; callers must inspect `exit_code` to judge success.
    pub completed: bool,
    /// The child's exit code, when it exited normally.
    pub exit_code: Option<i32>,
    /// Short name of the terminating signal (`"SIGSEGV"`, `"signal 7"`, ...)
    /// when the child was killed instead of exiting.
    pub terminating_signal: Option<String>,
    /// The child's combined standard output and standard error.
    pub output: String,
}

impl RunOutcome {
    /// A normal exit with the given code.
    pub fn exited(code: i32, output: String) -> Self {
        Self {
            completed: true,
            exit_code: Some(code),
            terminating_signal: None,
            output,
        }
    }

    /// Termination by signal; no exit code is available.
    pub fn signaled(name: String, output: String) -> Self {
        Self {
            completed: false,
            exit_code: None,
            terminating_signal: Some(name),
            output,
        }
    }

    /// A child that never reached a normal exit (e.g. killed on timeout).
    pub fn aborted(output: String) -> Self {
        Self {
            completed: false,
            exit_code: None,
            terminating_signal: None,
            output,
        }
    }

    /// Completed with exit code zero.
    pub fn success(&self) -> bool {
        self.completed && self.exit_code == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonzero_exit_is_completed_but_not_success() {
        let outcome = RunOutcome::exited(2, String::new());
        assert!(outcome.completed);
        assert!(!outcome.success());
    }

    #[test]
    fn signal_outcome_carries_no_exit_code() {
        let outcome = RunOutcome::signaled("SIGSEGV".to_string(), String::new());
        assert_eq!(outcome.exit_code, None);
        assert_eq!(outcome.terminating_signal.as_deref(), Some("SIGSEGV"));
        assert!(!outcome.completed);
    }

    #[test]
    fn zero_second_timeout_means_wait_forever() {
        let ctx = ExecContext::new().timeout_secs(0);
        assert_eq!(ctx.timeout, None);
        let ctx = ExecContext::new().timeout_secs(3);
        assert_eq!(ctx.timeout, Some(Duration::from_secs(3)));
    }
}
