//! Task claim loop
//!
//! Two retry layers sit on top of the HTTP client's own backoff:
//! [`claim_task`] re-posts while the server answers 2xx without confirming,
//! and [`claim_with_attempts`] repeats whole claim calls that failed.

use crate::api::NexyApi;
use crate::config::TaskFlowConfig;
use crate::error::Error;
use crate::http::ApiResponse;
use crate::types::{ClaimOutcome, Task};
use tracing::{info, warn};

/// Server message marking a reward that was credited earlier
pub const ALREADY_CLAIMED: &str = "already claimed";

/// Whether a 2xx claim response confirms the claim
///
/// HTTP 200 is accepted as is; other 2xx codes need `success: true` or an
/// echoed `statusCode: 200` in the payload.
pub fn claim_accepted(response: &ApiResponse) -> bool {
    if response.status == 200 {
        return true;
    }

    let body = &response.body;
    let flag = |v: &serde_json::Value| v.get("success").and_then(|s| s.as_bool()) == Some(true);
    let echoed = |v: &serde_json::Value| v.get("statusCode").and_then(|s| s.as_u64()) == Some(200);

    flag(body)
        || echoed(body)
        || body.get("data").map(|d| flag(d) || echoed(d)).unwrap_or(false)
}

/// Whether an error is the server refusing a duplicate claim
pub fn is_already_claimed(error: &Error) -> bool {
    error.status_code() == Some(400)
        && error
            .server_message()
            .map(|m| m.contains(ALREADY_CLAIMED))
            .unwrap_or(false)
}

/// Claim one verified task, re-posting up to `max_retries` times while the
/// server answers without confirming
pub async fn claim_task(
    api: &NexyApi,
    flow: &TaskFlowConfig,
    task: &Task,
    max_retries: u32,
    account: &str,
) -> ClaimOutcome {
    let name = task.display_name();
    let max_retries = max_retries.max(1);
    let mut attempt: u32 = 1;

    loop {
        match api.claim_task(&task.id).await {
            Ok(response) if claim_accepted(&response) => {
                info!(account, task = task.short_id(), category = %task.category, "Task Claimed: {}", name);
                return ClaimOutcome {
                    success: true,
                    message: format!("Task \"{}\" claimed", name),
                    already_claimed: false,
                };
            }
            Ok(response) if attempt < max_retries => {
                warn!(
                    account,
                    task = task.short_id(),
                    status = response.status,
                    attempt,
                    max_retries,
                    "Retrying claim for {} in {}s",
                    name,
                    flow.claim_retry_delay.as_secs()
                );
                api.http().clock().sleep(flow.claim_retry_delay).await;
                attempt += 1;
            }
            Ok(_) => {
                warn!(account, task = task.short_id(), category = %task.category, "Failed to claim {}: Invalid response", name);
                return ClaimOutcome {
                    success: false,
                    message: "Failed to claim: Invalid response".to_string(),
                    already_claimed: false,
                };
            }
            Err(e) if is_already_claimed(&e) => {
                info!(account, task = task.short_id(), category = %task.category, "Task Already Claimed: {}", name);
                return ClaimOutcome {
                    success: true,
                    message: format!("Task \"{}\" already claimed", name),
                    already_claimed: true,
                };
            }
            Err(e) => {
                warn!(account, task = task.short_id(), category = %task.category, error = %e, error_code = e.error_code(), "Failed to claim {}", name);
                return ClaimOutcome {
                    success: false,
                    message: format!("Failed to claim: {}", e),
                    already_claimed: false,
                };
            }
        }
    }
}

/// Repeat [`claim_task`] up to `flow.claim_outer_attempts` times, pausing
/// `flow.claim_outer_delay` between calls
pub async fn claim_with_attempts(
    api: &NexyApi,
    flow: &TaskFlowConfig,
    task: &Task,
    account: &str,
) -> ClaimOutcome {
    let max_attempts = flow.claim_outer_attempts.max(1);
    let mut attempt: u32 = 1;

    loop {
        let outcome = claim_task(api, flow, task, flow.claim_max_retries, account).await;
        if outcome.success || attempt >= max_attempts {
            if !outcome.success {
                warn!(
                    account,
                    task = task.short_id(),
                    "Failed to claim {} after {} attempts",
                    task.display_name(),
                    max_attempts
                );
            }
            return outcome;
        }

        attempt += 1;
        warn!(
            account,
            task = task.short_id(),
            "Retrying claim for {} (Attempt {}/{})",
            task.display_name(),
            attempt,
            max_attempts
        );
        api.http().clock().sleep(flow.claim_outer_delay).await;
    }
}
