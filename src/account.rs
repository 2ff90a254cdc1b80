//! Account processing orchestrator
//!
//! One pass over one credential:
//!
//! 1. Fetch identity (abort on error)
//! 2. Resolve public IP (best effort)
//! 3. Fetch and normalize tasks (abort on error)
//! 4. Fetch completed ids and mark matching tasks (abort on error)
//! 5. Verify, then claim, every pending task
//! 6. Fetch statistics (report without stats on error)

use crate::api::NexyApi;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::Result;
use crate::http::HttpClient;
use crate::report::{render_identity, render_stats, render_task_table};
use crate::types::{AccountReport, Credential, TaskStatus};
use crate::workflow::{claim_with_attempts, verify_task};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Placeholder shown when the egress IP could not be resolved
pub const IP_UNAVAILABLE: &str = "Error retrieving IP";

/// Runs account passes against a shared configuration
pub struct AccountProcessor {
    config: Arc<Config>,
    clock: Arc<dyn Clock>,
}

impl AccountProcessor {
    /// Create a processor; every wait goes through `clock`
    pub fn new(config: Arc<Config>, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Shared configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process the account at position `index` of `total`
    ///
    /// Returns an error when identity, task list or completed list cannot be
    /// fetched; progress already made on the server is kept either way.
    pub async fn process(
        &self,
        credential: &Credential,
        index: usize,
        total: usize,
        proxy: Option<&str>,
    ) -> Result<AccountReport> {
        let account = format!("Account {}/{}", index + 1, total);
        info!(account = %account, "Starting account processing");

        let http = HttpClient::new(&self.config, proxy, self.clock.clone())?;
        let api = NexyApi::new(&self.config, credential, http)?;

        let identity = api.fetch_user().await.inspect_err(|e| {
            error!(account = %account, error = %e, error_code = e.error_code(), "Skipping account due to user info error");
        })?;
        info!(account = %account, "Fetched user: {}", identity.username);

        let ip = match api.public_ip().await {
            Ok(ip) => ip,
            Err(e) => {
                error!(account = %account, error = %e, "Failed to get IP");
                IP_UNAVAILABLE.to_string()
            }
        };
        for line in render_identity(&identity, &ip) {
            info!(account = %account, "{}", line);
        }

        let mut tasks = api.fetch_tasks().await.inspect_err(|e| {
            error!(account = %account, error = %e, error_code = e.error_code(), "Skipping account due to tasks error");
        })?;

        let completed_ids = api.fetch_completed_ids().await.inspect_err(|e| {
            error!(account = %account, error = %e, error_code = e.error_code(), "Skipping account due to completed tasks error");
        })?;
        for task in tasks.iter_mut().filter(|t| completed_ids.contains(&t.id)) {
            task.mark_completed();
        }

        let mut report = AccountReport {
            identity,
            ip,
            tasks: Vec::new(),
            completed_count: 0,
            skipped_count: 0,
            failed_count: 0,
            stats: None,
        };

        if tasks.is_empty() {
            warn!(account = %account, "No tasks available");
            return Ok(report);
        }

        let flow = &self.config.tasks;
        let pending: Vec<usize> = tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status == TaskStatus::Pending)
            .map(|(i, _)| i)
            .collect();

        if pending.is_empty() {
            info!(account = %account, "All tasks already completed");
        } else {
            let total_pending = pending.len();
            for (done, &i) in pending.iter().enumerate() {
                let task = tasks[i].clone();
                let verified = verify_task(&api, flow, &task, &account).await;

                if verified.success {
                    let claimed = claim_with_attempts(&api, flow, &task, &account).await;
                    if claimed.success {
                        tasks[i].mark_completed();
                        report.completed_count += 1;
                    } else {
                        report.failed_count += 1;
                    }
                } else if verified.is_skipped() {
                    report.skipped_count += 1;
                } else {
                    report.failed_count += 1;
                }

                info!(
                    account = %account,
                    processed = done + 1,
                    total = total_pending,
                    "Processing {}/{}",
                    done + 1,
                    total_pending
                );
                self.clock.sleep(flow.inter_task_delay).await;
            }
        }

        for line in render_task_table(&tasks) {
            info!(account = %account, "{}", line);
        }
        report.tasks = tasks;
        if !pending.is_empty() {
            info!(
                account = %account,
                still_pending = report.pending().count(),
                "Processed {} tasks: {} completed, {} skipped",
                pending.len(),
                report.completed_count,
                report.skipped_count
            );
        }

        match api.fetch_statistics().await {
            Ok(stats) => {
                for line in render_stats(&stats) {
                    info!(account = %account, "{}", line);
                }
                report.stats = Some(stats);
                info!(account = %account, "Completed account processing");
            }
            Err(e) => {
                error!(account = %account, error = %e, error_code = e.error_code(), "Skipping stats due to error");
            }
        }

        Ok(report)
    }
}
