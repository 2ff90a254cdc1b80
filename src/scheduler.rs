//! Daily cycle over every configured account
//!
//! A cycle reads the token file, processes accounts one after another with a
//! pause between them, then the runner waits for the next cycle. The wait is
//! interrupted by cancelling the runner's [`CancellationToken`].

use crate::account::AccountProcessor;
use crate::clock::Clock;
use crate::config::Config;
use crate::http::ProxyEndpoint;
use crate::inputs::{assign_proxy, read_tokens};
use crate::types::CycleSummary;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Repeats account cycles until cancelled
pub struct CycleRunner {
    processor: AccountProcessor,
    clock: Arc<dyn Clock>,
    proxies: Vec<String>,
}

impl CycleRunner {
    /// Create a runner; an empty `proxies` list means direct connections
    pub fn new(config: Arc<Config>, clock: Arc<dyn Clock>, proxies: Vec<String>) -> Self {
        Self {
            processor: AccountProcessor::new(config, clock.clone()),
            clock,
            proxies,
        }
    }

    /// Run one pass over every token
    ///
    /// Account failures are logged and counted; they never end the cycle.
    /// Stops between accounts once `shutdown` is cancelled.
    pub async fn run_cycle(&self, shutdown: &CancellationToken) -> CycleSummary {
        let config = self.processor.config();
        let mut summary = CycleSummary::default();

        let tokens = match read_tokens(&config.inputs.token_file).await {
            Ok(tokens) => tokens,
            Err(e) => {
                error!(error = %e, error_code = e.error_code(), "Failed to read tokens");
                return summary;
            }
        };
        if tokens.is_empty() {
            error!(path = %config.inputs.token_file.display(), "No tokens found");
            return summary;
        }

        summary.accounts = tokens.len();
        for (index, credential) in tokens.iter().enumerate() {
            if shutdown.is_cancelled() {
                info!("Shutdown requested, stopping cycle early");
                break;
            }

            let proxy = assign_proxy(index, &self.proxies);
            if let Some(Ok(endpoint)) = proxy.map(str::parse::<ProxyEndpoint>) {
                info!(account = index + 1, "Using proxy {}", endpoint.host());
            }

            match self
                .processor
                .process(credential, index, tokens.len(), proxy)
                .await
            {
                Ok(report) => {
                    summary.processed += 1;
                    summary.tasks_completed += report.completed_count;
                    summary.tasks_skipped += report.skipped_count;
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(account = index + 1, error = %e, error_code = e.error_code(), "Error processing account");
                }
            }

            self.clock.sleep(config.schedule.inter_account_delay).await;
        }

        summary
    }

    /// Run cycles until `shutdown` is cancelled
    pub async fn run(&self, shutdown: CancellationToken) {
        info!("Cycle runner started");

        while !shutdown.is_cancelled() {
            let summary = self.run_cycle(&shutdown).await;
            info!(
                accounts = summary.accounts,
                processed = summary.processed,
                failed = summary.failed,
                tasks_completed = summary.tasks_completed,
                tasks_skipped = summary.tasks_skipped,
                "Cycle completed. Waiting 24 hours..."
            );

            tokio::select! {
                _ = self.clock.sleep(self.processor.config().schedule.cycle_interval) => {}
                _ = shutdown.cancelled() => {}
            }
        }

        info!("Cycle runner stopped");
    }
}
