//! Subcommand argument structs and entry points for the `bf` binary.
//!
//! Each entry point returns the process exit code: 0 on success, 1 when the
//! program or its I/O failed, 2 on a usage error.

pub mod repl;
pub mod run;
