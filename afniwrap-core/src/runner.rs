//! Process runner seam.
//!
//! Assembled command lines are handed to a [`CommandRunner`]; the trait
//! exists so workflow frameworks (and tests) can substitute their own
//! execution strategy. Timeouts, retries, and output collection belong to
//! the caller, not to this crate.

use std::io;
use std::process::{Command, ExitStatus, Stdio};

use crate::command::CommandLine;
use crate::error::{CoreError, CoreResult};

/// Trait representing something that can execute an assembled command line.
pub trait CommandRunner {
    /// Runs the command to completion and returns its exit status.
    fn run(&self, cmd: &CommandLine) -> CoreResult<ExitStatus>;
}

/// Concrete implementation of [`CommandRunner`] using `std::process`.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, cmd: &CommandLine) -> CoreResult<ExitStatus> {
        log::debug!("spawning: {}", cmd.to_single_line());

        let status = Command::new(cmd.program())
            .args(cmd.args())
            .status()
            .map_err(|e| CoreError::CommandStart {
                program: cmd.program().to_string(),
                source: e,
            })?;

        if status.success() {
            Ok(status)
        } else {
            log::error!("{} exited with {status}", cmd.program());
            Err(CoreError::CommandFailed {
                program: cmd.program().to_string(),
                status: status.to_string(),
            })
        }
    }
}

/// Checks that a required external tool is available and executable.
///
/// Runs the tool with `-help` and discards all output; AFNI programs exit
/// zero in that mode. Returns `DependencyNotFound` when the binary is not
/// on the `PATH`, or `CommandStart` when it exists but fails to launch.
pub fn check_dependency(program: &str) -> CoreResult<()> {
    let result = Command::new(program)
        .arg("-help")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("found dependency: {program}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("dependency '{program}' not found");
            Err(CoreError::DependencyNotFound(program.to_string()))
        }
        Err(e) => {
            log::error!("failed to start dependency check for '{program}': {e}");
            Err(CoreError::CommandStart {
                program: program.to_string(),
                source: e,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandBuilder;

    #[test]
    fn test_check_dependency_missing_tool() {
        let err = check_dependency("afniwrap-no-such-binary").unwrap_err();
        assert!(matches!(err, CoreError::DependencyNotFound(name) if name.contains("no-such")));
    }

    #[test]
    fn test_system_runner_reports_start_failure() {
        let cmd = CommandBuilder::new("afniwrap-no-such-binary").flag("-help").build();
        let err = SystemRunner.run(&cmd).unwrap_err();
        assert!(matches!(err, CoreError::CommandStart { .. }));
    }
}
