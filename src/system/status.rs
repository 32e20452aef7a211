// src/system/status.rs

//! Wait-status normalization: one raw [`ExitStatus`] in, one
//! [`RunOutcome`] out.

use std::process::ExitStatus;

use crate::models::RunOutcome;

/// Decodes a child's wait status against its captured output.
///
/// A normal exit is a completed outcome even when the code is nonzero. A
/// signal death names the signal, appends a trailing description line to the
/// output, and carries no exit code.
pub(crate) fn decode(status: ExitStatus, output: String) -> RunOutcome {
    if let Some(code) = status.code() {
        return RunOutcome::exited(code, output);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(raw) = status.signal() {
            let name = signal_name(raw);
            let mut output = output;
            output.push_str("\nProcess terminated due to ");
            output.push_str(&name);
            return RunOutcome::signaled(name, output);
        }
    }
    RunOutcome::aborted(output)
}

/// Short name for a terminating signal, from a fixed table; anything outside
/// the table is reported as `"signal N"`.
#[cfg(unix)]
fn signal_name(raw: i32) -> String {
    use nix::sys::signal::Signal;
    match Signal::try_from(raw) {
        Ok(Signal::SIGKILL) => "SIGKILL".to_string(),
        Ok(Signal::SIGFPE) => "SIGFPE".to_string(),
        Ok(Signal::SIGBUS) => "SIGBUS".to_string(),
        Ok(Signal::SIGSEGV) => "SIGSEGV".to_string(),
        _ => format!("signal {raw}"),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn normal_exit_keeps_its_code() {
        // Raw wait status: exit code lives in the high byte.
        let outcome = decode(ExitStatus::from_raw(0), "ok".to_string());
        assert_eq!(outcome, RunOutcome::exited(0, "ok".to_string()));

        let outcome = decode(ExitStatus::from_raw(3 << 8), String::new());
        assert!(outcome.completed);
        assert_eq!(outcome.exit_code, Some(3));
        assert_eq!(outcome.terminating_signal, None);
    }

    #[test]
    fn sigsegv_is_named_and_appended() {
        let raw = nix::sys::signal::Signal::SIGSEGV as i32;
        let outcome = decode(ExitStatus::from_raw(raw), "out".to_string());
        assert!(!outcome.completed);
        assert_eq!(outcome.exit_code, None);
        assert_eq!(outcome.terminating_signal.as_deref(), Some("SIGSEGV"));
        assert!(outcome.output.ends_with("Process terminated due to SIGSEGV"));
    }

    #[test]
    fn unknown_signal_falls_back_to_its_number() {
        // SIGUSR1 is outside the fixed table.
        let raw = nix::sys::signal::Signal::SIGUSR1 as i32;
        let outcome = decode(ExitStatus::from_raw(raw), String::new());
        assert_eq!(
            outcome.terminating_signal,
            Some(format!("signal {raw}"))
        );
    }

    #[test]
    fn kill_and_fpe_and_bus_use_short_names() {
        for (raw, name) in [
            (nix::sys::signal::Signal::SIGKILL as i32, "SIGKILL"),
            (nix::sys::signal::Signal::SIGFPE as i32, "SIGFPE"),
            (nix::sys::signal::Signal::SIGBUS as i32, "SIGBUS"),
        ] {
            let outcome = decode(ExitStatus::from_raw(raw), String::new());
            assert_eq!(outcome.terminating_signal.as_deref(), Some(name));
        }
    }
}
