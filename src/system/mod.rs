//! # System Interaction Layer
//!
//! The boundary between the argument-list grammar and the operating system's
//! process back ends.
//!
//! ## Modules
//!
//! - **`executor`**: The single entry point. Plans a back end for the command
//!   via `selector`, dispatches exactly one runner, and returns the
//!   normalized outcome.
//! - **`selector`**: A small state machine choosing between the pipe, native
//!   process-creation, and temp-file back ends, including the Windows
//!   multi-quote short-path rewrite.
//! - **`pipe_runner`** / **`native_runner`** / **`file_runner`**: The three
//!   back ends. Each spawns one child, captures its combined output, and
//!   decodes the raw termination status.
//! - **`platform`**: The platform tag and the consumed path collaborators
//!   (existence checks, short-path aliases).
//! - **`status`**: Translates a raw wait status into a [`crate::RunOutcome`].

pub mod executor;
pub mod file_runner;
pub mod native_runner;
pub mod pipe_runner;
pub mod platform;
pub mod selector;
pub mod status;
