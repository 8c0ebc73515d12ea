//! Core library for building validated command lines for AFNI's GLM tools.
//!
//! This crate provides typed parameter models for `3dDeconvolve` and
//! `3dREMLfit`, whole-set validation (mandatory fields, co-occurrence
//! constraints, equal-length list groups, input existence), generated
//! output-filename derivation, and deterministic command-line assembly.
//! Actual process execution stays behind the [`runner::CommandRunner`]
//! seam so a surrounding workflow framework can supply its own.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use afniwrap_core::{Deconvolve, SystemRunner, CommandRunner};
//! use std::path::PathBuf;
//!
//! let config = Deconvolve {
//!     in_file: vec![PathBuf::from("run1.nii.gz")],
//!     num_stimts: Some(1),
//!     stim_files: vec![PathBuf::from("onsets.1D")],
//!     models: vec!["GAM".to_string()],
//!     labels: vec!["go".to_string()],
//!     tout: true,
//!     ..Deconvolve::default()
//! };
//!
//! let built = config.build().unwrap();
//! println!("{}", built.command);
//! SystemRunner.run(&built.command).unwrap();
//! ```

pub mod command;
pub mod error;
pub mod filenames;
pub mod runner;
pub mod tools;
pub mod validation;

// Re-exports for public API
pub use command::{CommandBuilder, CommandLine};
pub use error::{CoreError, CoreResult};
pub use runner::{check_dependency, CommandRunner, SystemRunner};
pub use tools::{
    BuiltCommand, Deconvolve, OutputDatatype, OutputManifest, Polort, RemlFit, Timing,
};
