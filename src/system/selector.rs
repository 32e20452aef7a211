// src/system/selector.rs

//! Backend selection as an explicit state machine.
//!
//! `Raw → QuoteScan → ShortPathRewrite → Dispatch` on Windows-style
//! platforms; other platforms go straight from `Raw` to dispatch. The
//! rewrite exists because legacy command-interpreter front ends reject
//! lines with more than one distinct pair of quotes; replacing the leading
//! program path with its short alias sidesteps that limit without touching
//! the argument text the program itself receives.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::system::platform::{Platform, ShortPaths};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("could not parse command line with quotes: {0}")]
    QuoteParse(String),
    #[error("short path resolution failed for '{0}'")]
    ShortPath(String),
}

/// One of the three process-execution strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Blocking shell-pipe capture (POSIX-style hosts).
    Pipe,
    /// Direct process creation through the platform loader.
    NativeCreate,
    /// Blocking shell-execute into a temp file (legacy fallback).
    TempFile,
}

/// The selector's decision: which runner, and the possibly rewritten line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    pub backend: Backend,
    pub command: String,
}

enum SelectorState {
    Raw,
    QuoteScan,
    ShortPathRewrite,
    Ready(Backend),
}

lazy_static! {
    /// `"<program>" <remaining-args>`: the only shape the rewrite accepts.
    static ref QUOTED_PROGRAM: Regex =
        Regex::new(r#"^"([^"]*)"[ \t](.*)"#).unwrap();
}

/// Plans the back end for one command. Pure in (platform, command); the
/// filesystem questions go through the injected `paths` collaborator.
pub fn plan(
    platform: Platform,
    command: &str,
    paths: &dyn ShortPaths,
) -> Result<DispatchPlan, SelectError> {
    let mut command = command.to_string();
    let mut state = SelectorState::Raw;
    loop {
        state = match state {
            SelectorState::Raw => match platform {
                Platform::Unix => SelectorState::Ready(Backend::Pipe),
                Platform::WindowsLegacy => SelectorState::Ready(Backend::TempFile),
                Platform::Windows => {
                    if command.starts_with('"') {
                        SelectorState::QuoteScan
                    } else {
                        SelectorState::Ready(Backend::NativeCreate)
                    }
                }
            },
            SelectorState::QuoteScan => {
                if quote_count_exceeds_two(&command) {
                    SelectorState::ShortPathRewrite
                } else {
                    // One pair of quotes is fine as-is.
                    SelectorState::Ready(Backend::NativeCreate)
                }
            }
            SelectorState::ShortPathRewrite => {
                command = rewrite_program_path(&command, paths)?;
                SelectorState::Ready(Backend::NativeCreate)
            }
            SelectorState::Ready(backend) => {
                return Ok(DispatchPlan { backend, command });
            }
        };
    }
}

/// Counts quote characters, stopping as soon as the count passes two; only
/// the relation to two matters.
fn quote_count_exceeds_two(command: &str) -> bool {
    let mut count = 0u8;
    for ch in command.chars() {
        if ch == '"' {
            count += 1;
            if count > 2 {
                return true;
            }
        }
    }
    false
}

/// Replaces the quoted leading program with its short-path alias.
///
/// A program that is not an existing file is assumed to be a shell built-in
/// (`dir`, `echo`, ...) and is left unresolved.
fn rewrite_program_path(command: &str, paths: &dyn ShortPaths) -> Result<String, SelectError> {
    let caps = QUOTED_PROGRAM
        .captures(command)
        .ok_or_else(|| SelectError::QuoteParse(command.to_string()))?;
    let program = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let args = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    let resolved = if paths.file_exists(program) {
        paths
            .short_path(program)
            .ok_or_else(|| SelectError::ShortPath(program.to_string()))?
    } else {
        program.to_string()
    };
    Ok(format!("{resolved} {args}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Path collaborator double: a fixed map of existing files to aliases.
    struct FakePaths {
        short: HashMap<&'static str, Option<&'static str>>,
    }

    impl FakePaths {
        fn with(entries: &[(&'static str, Option<&'static str>)]) -> Self {
            Self {
                short: entries.iter().copied().collect(),
            }
        }
    }

    impl ShortPaths for FakePaths {
        fn file_exists(&self, path: &str) -> bool {
            self.short.contains_key(path)
        }
        fn short_path(&self, path: &str) -> Option<String> {
            self.short
                .get(path)
                .copied()
                .flatten()
                .map(str::to_string)
        }
    }

    fn no_paths() -> FakePaths {
        FakePaths::with(&[])
    }

    #[test]
    fn unix_always_plans_the_pipe_runner() {
        let plan = plan(Platform::Unix, "\"a\" \"b\" \"c\"", &no_paths()).expect("plan");
        assert_eq!(plan.backend, Backend::Pipe);
        assert_eq!(plan.command, "\"a\" \"b\" \"c\"");
    }

    #[test]
    fn legacy_windows_plans_the_temp_file_runner() {
        let plan = plan(Platform::WindowsLegacy, "dir", &no_paths()).expect("plan");
        assert_eq!(plan.backend, Backend::TempFile);
    }

    #[test]
    fn unquoted_windows_command_dispatches_directly() {
        let plan = plan(Platform::Windows, "notepad.exe file.txt", &no_paths()).expect("plan");
        assert_eq!(plan.backend, Backend::NativeCreate);
        assert_eq!(plan.command, "notepad.exe file.txt");
    }

    #[test]
    fn two_quotes_pass_through_unmodified() {
        let plan = plan(Platform::Windows, "\"C:\\a.exe\" arg", &no_paths()).expect("plan");
        assert_eq!(plan.backend, Backend::NativeCreate);
        assert_eq!(plan.command, "\"C:\\a.exe\" arg");
    }

    #[test]
    fn four_quotes_trigger_the_short_path_rewrite() {
        let paths = FakePaths::with(&[(
            "C:\\Program Files\\a.exe",
            Some("C:\\PROGRA~1\\a.exe"),
        )]);
        let plan = plan(
            Platform::Windows,
            "\"C:\\Program Files\\a.exe\" \"C:\\Program Files\\b.exe\"",
            &paths,
        )
        .expect("plan");
        assert_eq!(plan.backend, Backend::NativeCreate);
        assert_eq!(
            plan.command,
            "C:\\PROGRA~1\\a.exe \"C:\\Program Files\\b.exe\""
        );
    }

    #[test]
    fn builtin_program_is_left_unresolved() {
        // `dir` is not a file on disk, so no short-path lookup happens.
        let plan = plan(Platform::Windows, "\"dir\" \"a b\" \"c d\"", &no_paths()).expect("plan");
        assert_eq!(plan.backend, Backend::NativeCreate);
        assert_eq!(plan.command, "dir \"a b\" \"c d\"");
    }

    #[test]
    fn multi_quote_line_without_args_fails_quote_parse() {
        let err = plan(Platform::Windows, "\"a.exe\"\"b.exe\"", &no_paths()).unwrap_err();
        assert!(matches!(err, SelectError::QuoteParse(_)));
    }

    #[test]
    fn failed_short_path_resolution_is_an_error() {
        // The program exists but has no short alias.
        let paths = FakePaths::with(&[("C:\\Program Files\\a.exe", None)]);
        let err = plan(
            Platform::Windows,
            "\"C:\\Program Files\\a.exe\" \"x y\" z",
            &paths,
        )
        .unwrap_err();
        assert!(matches!(err, SelectError::ShortPath(_)));
    }
}
