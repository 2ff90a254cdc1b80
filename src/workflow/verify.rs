//! Task verification state machine
//!
//! ```text
//! Verifying ──poll──┬─ referral minimum unmet ──▶ Skipped
//!                   ├─ "completed" ─────────────▶ Completed
//!                   ├─ "in_progress", polls left ─▶ InProgress ──wait──▶ Verifying
//!                   ├─ "in_progress", last poll ──▶ Failed
//!                   ├─ anything else ────────────▶ InvalidStatus
//!                   └─ transport/schema error ───▶ Failed
//! ```
//!
//! The referral check runs on every poll, before the status is looked at.

use crate::api::NexyApi;
use crate::api::schema::VerifyData;
use crate::config::TaskFlowConfig;
use crate::error::Error;
use crate::types::{Task, VerifyOutcome};
use tracing::{debug, info, warn};

/// Status string of a task the server is still checking
pub const STATUS_IN_PROGRESS: &str = "in_progress";
/// Status string of a task the server confirmed
pub const STATUS_COMPLETED: &str = "completed";

/// Transition taken after one verify poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollVerdict {
    /// Server confirmed the task
    Completed,
    /// Referral minimum not met
    Skipped {
        /// Invites required
        required: u64,
        /// Invites so far
        invited: u64,
    },
    /// Still in progress and polls remain: wait and poll again
    InProgress,
    /// Still in progress on the last allowed poll
    Exhausted,
    /// Status outside the known set (`"<missing>"` when absent)
    InvalidStatus(String),
}

/// Decide the transition for poll number `poll` (1-based) out of `max_polls`
pub fn classify_poll(data: &VerifyData, task: &Task, poll: u32, max_polls: u32) -> PollVerdict {
    if task.is_referral()
        && let Some(requirement) = data.referral_requirement()
        && !requirement.is_met()
    {
        return PollVerdict::Skipped {
            required: requirement.required,
            invited: requirement.invited,
        };
    }

    match data.status.as_deref() {
        Some(STATUS_IN_PROGRESS) if poll < max_polls => PollVerdict::InProgress,
        Some(STATUS_IN_PROGRESS) => PollVerdict::Exhausted,
        Some(STATUS_COMPLETED) => PollVerdict::Completed,
        Some(other) => PollVerdict::InvalidStatus(other.to_string()),
        None => PollVerdict::InvalidStatus("<missing>".to_string()),
    }
}

/// Drive one task through verification
///
/// Never returns an error: every failure is folded into the outcome.
pub async fn verify_task(
    api: &NexyApi,
    flow: &TaskFlowConfig,
    task: &Task,
    account: &str,
) -> VerifyOutcome {
    let name = task.display_name();
    let max_polls = flow.verify_max_polls.max(1);
    let mut poll: u32 = 1;

    loop {
        debug!(account, task = task.short_id(), poll, "Verifying {}", name);

        let data = match api.verify_task(&task.id).await {
            Ok(data) => data,
            Err(e) => {
                warn!(account, task = task.short_id(), category = %task.category, error = %e, error_code = e.error_code(), "Failed to verify {}", name);
                return VerifyOutcome::failed(format!("Failed to verify: {}", e));
            }
        };

        match classify_poll(&data, task, poll, max_polls) {
            PollVerdict::Completed => {
                info!(account, task = task.short_id(), category = %task.category, "Verified: {}", name);
                return VerifyOutcome::completed(name);
            }
            PollVerdict::Skipped { required, invited } => {
                warn!(
                    account,
                    task = task.short_id(),
                    category = %task.category,
                    "Skipped: Need {} invites, have {}",
                    required,
                    invited
                );
                return VerifyOutcome::skipped(required, invited);
            }
            PollVerdict::InProgress => {
                debug!(
                    account,
                    task = task.short_id(),
                    poll,
                    max_polls,
                    "Retrying {} in {}s",
                    name,
                    flow.verify_poll_interval.as_secs()
                );
                api.http().clock().sleep(flow.verify_poll_interval).await;
                poll += 1;
            }
            PollVerdict::Exhausted => {
                warn!(account, task = task.short_id(), category = %task.category, "Max retries reached for {}", name);
                return VerifyOutcome::failed("Max retries reached: Still in progress");
            }
            PollVerdict::InvalidStatus(status) => {
                let outcome = VerifyOutcome::invalid_status(&status);
                let e = Error::InvalidStatus(status);
                warn!(account, task = task.short_id(), category = %task.category, error = %e, error_code = e.error_code(), "Unexpected verify status for {}", name);
                return outcome;
            }
        }
    }
}
