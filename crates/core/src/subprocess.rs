//! Real [`CommandRunner`] backed by `sh -c`.
//!
//! Every command runs through the shell in a fixed working directory with
//! stdout and stderr piped and captured in full. No timeout is applied: a
//! hung command blocks the caller until it exits.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;

use crate::error::CommandError;
use crate::executor::{CommandOutput, CommandRunner};

/// Shell used to interpret command text.
const DEFAULT_SHELL: &str = "sh";

/// Runs command text through the system shell inside `working_dir`.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    working_dir: PathBuf,
}

impl ShellRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }
}

impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<CommandOutput, CommandError> {
        let start = Instant::now();

        tracing::debug!(
            command,
            cwd = %self.working_dir.display(),
            "Spawning shell command",
        );

        let output = Command::new(DEFAULT_SHELL)
            .arg("-c")
            .arg(command)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| CommandError::Spawn {
                command: command.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::Path;

    use assert_matches::assert_matches;

    use super::*;

    fn temp_runner() -> (tempfile::TempDir, ShellRunner) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let runner = ShellRunner::new(dir.path());
        (dir, runner)
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let (_dir, runner) = temp_runner();
        let output = runner.run("echo hello").await.expect("run");
        assert!(output.succeeded());
        assert_eq!(output.stdout, "hello\n");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_captures_stderr_on_failure() {
        let (_dir, runner) = temp_runner();
        let output = runner
            .run("echo 'no such image' >&2; exit 3")
            .await
            .expect("run");
        assert!(!output.succeeded());
        assert_eq!(output.exit_code, Some(3));
        assert!(output.stderr.contains("no such image"));
    }

    #[tokio::test]
    async fn test_missing_program_is_nonzero_exit() {
        let (_dir, runner) = temp_runner();
        let output = runner
            .run("definitely-not-a-real-compose-binary stop web")
            .await
            .expect("run");
        assert_eq!(output.exit_code, Some(127));
        assert_matches!(
            output.check("definitely-not-a-real-compose-binary stop web"),
            Err(CommandError::Unsuccessful { .. })
        );
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let (dir, runner) = temp_runner();
        let output = runner.run("pwd").await.expect("run");
        assert!(output.succeeded());
        // The resolved path may differ due to symlinks, so canonicalize both.
        let expected = dir
            .path()
            .canonicalize()
            .expect("canonicalize dir")
            .to_str()
            .expect("path")
            .to_string();
        let actual = Path::new(output.stdout.trim())
            .canonicalize()
            .expect("canonicalize pwd");
        assert_eq!(actual.to_str().expect("path"), expected);
    }

    #[tokio::test]
    async fn test_interprets_shell_syntax() {
        let (_dir, runner) = temp_runner();
        let output = runner
            .run("f() { echo \"$1-$2\"; }; f stop web")
            .await
            .expect("run");
        assert!(output.succeeded());
        assert_eq!(output.stdout, "stop-web\n");
    }

    #[tokio::test]
    async fn test_records_duration() {
        let (_dir, runner) = temp_runner();
        let output = runner.run("sleep 0.2").await.expect("run");
        assert!(output.succeeded());
        assert!(
            output.duration_ms >= 150,
            "duration {}ms should cover the sleep",
            output.duration_ms
        );
    }

    #[tokio::test]
    async fn test_missing_working_directory_is_spawn_error() {
        let runner = ShellRunner::new("/nonexistent/redeploy/workdir");
        let result = runner.run("true").await;
        assert_matches!(result, Err(CommandError::Spawn { .. }));
    }
}
