//! Post-start pause.
//!
//! The workflow waits a fixed duration after `up -d` with no health check.
//! [`Delay`] lets tests observe that wait without sleeping.

use std::time::Duration;

/// Something that can pause the workflow.
pub trait Delay: Send + Sync {
    fn wait(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tokio_delay_waits_full_duration() {
        let start = tokio::time::Instant::now();
        TokioDelay.wait(Duration::from_secs(3)).await;
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
