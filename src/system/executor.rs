// src/system/executor.rs

//! The single entry point: plan a back end, dispatch one runner, return the
//! normalized outcome.

use std::io;
use thiserror::Error;

use crate::models::{ExecContext, RunOutcome};
use crate::system::platform::{self, Platform, SystemPaths};
use crate::system::selector::{self, Backend, SelectError};
use crate::system::{file_runner, native_runner, pipe_runner};

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("command could not be parsed: {0}")]
    Parse(String),
    #[error("command '{command}' could not be spawned: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("could not create capture file '{path}': {source}")]
    Stat {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("could not read captured output from '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Runs one command to completion and captures its combined output.
///
/// Exactly one child is spawned per call, and the call returns only after
/// that child terminates (or, on the native back end, after the enforced
/// timeout kills it). An empty command is a success, not an error.
pub fn run_command(command: &str, ctx: &ExecContext) -> Result<RunOutcome, ExecutionError> {
    run_on(Platform::current(), command, ctx)
}

/// [`run_command`] with an explicit platform tag; the selector's Windows
/// states stay reachable from tests on any host.
pub fn run_on(
    platform: Platform,
    command: &str,
    ctx: &ExecContext,
) -> Result<RunOutcome, ExecutionError> {
    let verbose = ctx.verbose && !ctx.options.suppress_output;

    let trimmed = command.trim();
    if trimmed.is_empty() {
        return Ok(RunOutcome::exited(0, String::new()));
    }

    let cwd = ctx.cwd.as_deref().map(dunce::simplified);
    if let Some(dir) = cwd {
        if !platform::is_directory(dir) {
            // The child's own spawn failure is the real signal; this is
            // just an early diagnostic.
            log::warn!("working directory '{}' is not a directory", dir.display());
        }
    }

    let plan = selector::plan(platform, trimmed, &SystemPaths)?;
    log::debug!("dispatching '{}' via {:?}", plan.command, plan.backend);

    match plan.backend {
        Backend::Pipe => pipe_runner::run(&plan.command, cwd, verbose, ctx.timeout),
        Backend::NativeCreate => {
            native_runner::run(&plan.command, cwd, verbose, ctx.timeout, &ctx.options)
        }
        Backend::TempFile => file_runner::run(&plan.command, cwd, verbose, &ctx.options),
    }
}
