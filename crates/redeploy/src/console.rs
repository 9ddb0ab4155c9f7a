//! Operator-facing console output.
//!
//! Everything the operator reads goes through [`Console`]; structured logs
//! go to `tracing` on stderr instead. Write failures are logged and
//! otherwise ignored so that printing can never abort a rebuild step.

use std::fmt;
use std::io::Write;

const RULE: &str = "============================================";

pub struct Console<W: Write> {
    out: W,
}

impl Console<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|()| self.out.write_all(b"\n")) {
            tracing::warn!(error = %e, "Failed to write console output");
        }
    }

    pub fn banner(&mut self, service: &str) {
        self.line(format_args!("🔄 Rebuilding and restarting {service}..."));
        self.line(format_args!("{RULE}"));
    }

    pub fn announce(&mut self, description: &str, command: &str) {
        self.line(format_args!("\n🔄 {description}"));
        self.line(format_args!("Command: {command}"));
    }

    /// Echo captured stdout of a successful step; nothing if it is empty.
    pub fn step_output(&mut self, stdout: &str) {
        if !stdout.is_empty() {
            self.line(format_args!("Output: {stdout}"));
        }
    }

    /// Report a failed step with whatever it printed.
    pub fn step_error(&mut self, detail: &dyn fmt::Display, stdout: &str, stderr: &str) {
        self.line(format_args!("❌ Error: {detail}"));
        if !stdout.is_empty() {
            self.line(format_args!("Stdout: {stdout}"));
        }
        if !stderr.is_empty() {
            self.line(format_args!("Stderr: {stderr}"));
        }
    }

    pub fn aborted(&mut self, description: &str) {
        self.line(format_args!("❌ Failed to {}", description.to_lowercase()));
    }

    pub fn waiting(&mut self) {
        self.line(format_args!("\n⏳ Waiting for service to start..."));
    }

    pub fn status_heading(&mut self) {
        self.line(format_args!("\n📊 Service status:"));
    }

    pub fn logs_heading(&mut self) {
        self.line(format_args!("\n📋 Recent logs:"));
    }

    pub fn complete(&mut self, service: &str) {
        self.line(format_args!("\n✅ Rebuild of {service} complete!"));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
