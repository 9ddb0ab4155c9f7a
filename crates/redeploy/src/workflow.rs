//! Stop, remove, rebuild and restart one compose service.
//!
//! The four mandatory steps run strictly in order and the first failure
//! aborts the run. After a fixed pause the status and logs steps run
//! regardless of each other's outcome; their failures are printed but never
//! turn a rebuild into an error.

use std::io::Write;

use redeploy_core::compose::{ComposeStep, RebuildPlan, StepPhase};
use redeploy_core::executor::CommandRunner;

use crate::config::{ConfigError, RebuildConfig};
use crate::console::Console;
use crate::delay::Delay;

/// Why a rebuild was abandoned.
#[derive(Debug, thiserror::Error)]
pub enum RebuildError {
    /// Rejected before any command was issued.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// A mandatory step failed.
    #[error("Failed to {}", lowercase(.description))]
    StepFailed { description: String, command: String },
}

fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Outcome of a rebuild whose mandatory phase succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildSummary {
    pub service: String,
    /// Whether `ps` exited zero. Informational only.
    pub status_ok: bool,
    /// Whether `logs` exited zero. Informational only.
    pub logs_ok: bool,
}

/// Run one step, printing what it did. Returns true iff it exited zero.
///
/// Spawn failures, signals and non-zero exits are all reported the same
/// way and all come back as `false`.
pub async fn run_step<R, W>(runner: &R, console: &mut Console<W>, step: &ComposeStep) -> bool
where
    R: CommandRunner,
    W: Write,
{
    console.announce(&step.description, &step.command);
    tracing::info!(command = %step.command, "Running step");

    let output = match runner.run(&step.command).await {
        Ok(output) => output,
        Err(err) => {
            console.step_error(&err, "", "");
            log_failure(step, None, &err);
            return false;
        }
    };

    match output.check(&step.command) {
        Ok(()) => {
            console.step_output(&output.stdout);
            tracing::info!(
                command = %step.command,
                duration_ms = output.duration_ms,
                "Step succeeded",
            );
            true
        }
        Err(err) => {
            console.step_error(&err, &output.stdout, &output.stderr);
            log_failure(step, output.exit_code, &err);
            false
        }
    }
}

fn log_failure(step: &ComposeStep, exit_code: Option<i32>, err: &dyn std::fmt::Display) {
    match step.phase() {
        StepPhase::Mandatory => {
            tracing::error!(command = %step.command, ?exit_code, error = %err, "Step failed");
        }
        StepPhase::BestEffort => {
            tracing::warn!(command = %step.command, ?exit_code, error = %err, "Best-effort step failed");
        }
    }
}

/// Rebuild and restart `config.service`.
///
/// The config is validated first, since its fields end up in shell text.
/// Returns `Err` as soon as a mandatory step fails; in that case the pause
/// and the status/logs steps never happen.
pub async fn run_rebuild<R, D, W>(
    config: &RebuildConfig,
    runner: &R,
    delay: &D,
    console: &mut Console<W>,
) -> Result<RebuildSummary, RebuildError>
where
    R: CommandRunner,
    D: Delay,
    W: Write,
{
    config.validate()?;

    let plan = RebuildPlan::new(&config.compose_bin, &config.service, config.log_tail);

    console.banner(&config.service);

    for step in &plan.mandatory {
        if !run_step(runner, console, step).await {
            console.aborted(&step.description);
            return Err(RebuildError::StepFailed {
                description: step.description.clone(),
                command: step.command.clone(),
            });
        }
    }

    console.waiting();
    tracing::info!(
        delay_secs = config.startup_delay.as_secs_f64(),
        "Waiting for service to start",
    );
    delay.wait(config.startup_delay).await;

    console.status_heading();
    let status_ok = run_step(runner, console, &plan.status).await;

    console.logs_heading();
    let logs_ok = run_step(runner, console, &plan.logs).await;

    console.complete(&config.service);

    Ok(RebuildSummary {
        service: config.service.clone(),
        status_ok,
        logs_ok,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
