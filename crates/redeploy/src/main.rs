//! `redeploy` -- rebuild and restart one docker-compose service.
//!
//! Stops the service, removes its container, rebuilds the image, starts it
//! detached, waits a few seconds, then shows `ps` and the tail of its logs.
//! Exits with status 1 if any of the first four steps fails.
//!
//! # Environment variables
//!
//! | Variable                      | Default                 | Description                        |
//! |-------------------------------|-------------------------|------------------------------------|
//! | `REDEPLOY_WORKDIR`            | `/home/nut/loyalty-app` | Directory holding the compose file |
//! | `REDEPLOY_SERVICE`            | `user-service`          | Compose service to rebuild         |
//! | `REDEPLOY_STARTUP_DELAY_SECS` | `3`                     | Pause after `up -d`                |
//! | `REDEPLOY_LOG_TAIL`           | `10`                    | Log lines shown at the end         |
//! | `REDEPLOY_COMPOSE_BIN`        | `docker-compose`        | Compose executable                 |

use std::process::ExitCode;

use redeploy::config::RebuildConfig;
use redeploy::console::Console;
use redeploy::delay::TokioDelay;
use redeploy::workflow;
use redeploy_core::subprocess::ShellRunner;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Console output owns stdout; structured logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redeploy=info,redeploy_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match RebuildConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::env::set_current_dir(&config.working_dir) {
        tracing::error!(
            workdir = %config.working_dir.display(),
            error = %e,
            "Cannot enter working directory",
        );
        return ExitCode::FAILURE;
    }

    tracing::info!(
        service = %config.service,
        workdir = %config.working_dir.display(),
        compose_bin = %config.compose_bin,
        "Starting rebuild",
    );

    let runner = ShellRunner::new(&config.working_dir);
    let mut console = Console::stdout();

    match workflow::run_rebuild(&config, &runner, &TokioDelay, &mut console).await {
        Ok(summary) => {
            tracing::info!(
                service = %summary.service,
                status_ok = summary.status_ok,
                logs_ok = summary.logs_ok,
                "Rebuild complete",
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(service = %config.service, error = %e, "Rebuild aborted");
            ExitCode::FAILURE
        }
    }
}
