// afniwrap-cli/src/lib.rs
//
// Library portion of the afniwrap CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, DeconvolveArgs, RemlfitArgs};
pub use commands::{run_deconvolve, run_remlfit};
