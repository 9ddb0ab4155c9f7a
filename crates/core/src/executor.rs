//! Command execution seam and shared types.
//!
//! Defines [`CommandRunner`], the one-operation trait the rebuild workflow
//! talks to, along with [`CommandOutput`]. The real implementation is
//! [`ShellRunner`](crate::subprocess::ShellRunner); tests substitute a fake.

use crate::error::CommandError;

/// Captured output from a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Complete stdout captured from the process.
    pub stdout: String,
    /// Complete stderr captured from the process.
    pub stderr: String,
    /// Process exit code (`None` if killed by signal).
    pub exit_code: Option<i32>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl CommandOutput {
    /// Output of a command that exited with status zero.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            exit_code: Some(0),
            ..Self::default()
        }
    }

    /// Output of a command that exited with `exit_code`.
    pub fn failure(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code: Some(exit_code),
            duration_ms: 0,
        }
    }

    /// True iff the process exited with status code zero.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Convert a non-zero exit into a [`CommandError`] describing it.
    pub fn check(&self, command: &str) -> Result<(), CommandError> {
        if self.succeeded() {
            Ok(())
        } else {
            Err(CommandError::Unsuccessful {
                command: command.to_string(),
                exit_code: self.exit_code,
            })
        }
    }
}

/// Runs shell command text and returns what it printed.
///
/// Implementations own the working directory the command runs in. A
/// non-zero exit is *not* an `Err`: it comes back as a [`CommandOutput`]
/// whose [`succeeded`](CommandOutput::succeeded) is false. `Err` is reserved
/// for commands that could not be run at all.
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion.
    fn run(
        &self,
        command: &str,
    ) -> impl std::future::Future<Output = Result<CommandOutput, CommandError>> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
