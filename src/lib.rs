//! Cross-platform command invocation with deterministic output capture.
//!
//! Given a shell-style command line, `runcmd` executes it as a single child
//! process on one of several operating-system back ends, captures the child's
//! combined output, and normalizes the heterogeneous termination signals into
//! one [`RunOutcome`] shape. It also provides the escaping and parsing grammar
//! that lets a single `;`-delimited string safely represent an argument list.

pub mod constants;
pub mod core;
pub mod models;
pub mod system;

pub use crate::core::arglist;
pub use crate::models::{ExecContext, ExecOptions, RunOutcome};
pub use crate::system::executor::{ExecutionError, run_command};
pub use crate::system::selector::{Backend, SelectError};
