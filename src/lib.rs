//! # nexy-tasks
//!
//! Automation client for the Nexy AI points platform.
//!
//! For every bearer token in the token file the client fetches the account
//! identity, lists the account's tasks, verifies and claims every task that is
//! not yet completed, and reports the account's point statistics. Passes over
//! all accounts repeat every 24 hours.
//!
//! ## Quick Start
//!
//! ```no_run
//! use nexy_tasks::{Config, CycleRunner, TokioClock, run_with_shutdown};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::default());
//!     let runner = CycleRunner::new(config, Arc::new(TokioClock), Vec::new());
//!
//!     // Cycles until SIGINT/SIGTERM
//!     run_with_shutdown(&runner).await;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Per-account orchestration
pub mod account;
/// Typed client for the points API
pub mod api;
/// Injectable time source
pub mod clock;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// HTTP transport with retries, user-agent rotation and proxies
pub mod http;
/// Token and proxy files
pub mod inputs;
/// Text rendering of account results
pub mod report;
/// Retry logic with exponential backoff
pub mod retry;
/// Daily cycle over all accounts
pub mod scheduler;
/// Core domain types
pub mod types;
/// Utility functions
pub mod utils;
/// Per-task verification and claim workflow
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use account::AccountProcessor;
pub use api::NexyApi;
pub use clock::{Clock, TokioClock};
pub use config::Config;
pub use error::{Error, Result};
pub use http::HttpClient;
pub use scheduler::CycleRunner;
pub use types::{
    AccountReport, AccountStats, ClaimOutcome, Credential, CycleSummary, Task, TaskStatus,
    UserIdentity, VerifyOutcome, VerifyState,
};

use tokio_util::sync::CancellationToken;

/// Run cycles until a termination signal arrives.
///
/// The runner is cancelled when the signal is received: a day-long wait ends
/// at once, an in-flight account pass finishes first.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
pub async fn run_with_shutdown(runner: &CycleRunner) {
    let shutdown = CancellationToken::new();
    let listener = tokio::spawn(cancel_on_signal(shutdown.clone()));

    runner.run(shutdown).await;
    listener.abort();
}

/// Cancel `shutdown` once a termination signal is received
pub async fn cancel_on_signal(shutdown: CancellationToken) {
    wait_for_signal().await;
    shutdown.cancel();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
