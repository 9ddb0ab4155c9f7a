/// Errors produced when running a single shell command.
///
/// Both variants are treated identically by the workflow: the step failed.
/// The distinction only exists so the printed detail is accurate.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The shell could not be spawned or waited on.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The command ran to completion but did not exit with status zero.
    #[error("command `{command}` {}", describe_exit(.exit_code))]
    Unsuccessful {
        command: String,
        exit_code: Option<i32>,
    },
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("returned non-zero exit status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
