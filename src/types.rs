//! Core types for nexy-tasks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque bearer token for one account
///
/// `Debug` and `Display` never reveal the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the `Authorization` header
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(***)")
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

/// Task progress within one account pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet verified and claimed
    #[default]
    Pending,
    /// Claimed now or in an earlier run
    Completed,
}

/// A task as shown to the account, after normalization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task identifier (unique within one fetch)
    pub id: String,
    /// Description with HTML tags removed
    pub description: String,
    /// Category such as "REF" or "SOCIAL"; "N/A" when absent
    pub category: String,
    /// Points awarded on claim
    pub points: i64,
    /// Current status
    pub status: TaskStatus,
}

impl Task {
    /// Name used in logs and outcome messages
    pub fn display_name(&self) -> &str {
        if self.description.is_empty() {
            "Unknown Task"
        } else {
            &self.description
        }
    }

    /// Whether this task counts invited users
    pub fn is_referral(&self) -> bool {
        self.category == REFERRAL_CATEGORY
    }

    /// Mark the task completed; a completed task never becomes pending again
    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
    }

    /// Short suffix of the id used in log contexts
    pub fn short_id(&self) -> &str {
        let len = self.id.len();
        let mut start = len.saturating_sub(6);
        while !self.id.is_char_boundary(start) {
            start += 1;
        }
        &self.id[start..]
    }
}

/// Category string for referral tasks
pub const REFERRAL_CATEGORY: &str = "REF";

/// Terminal state of the verification state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyState {
    /// Server confirmed the task as done
    Completed,
    /// Referral requirement not met; no further polls this cycle
    Skipped,
    /// Server answered with a status outside the known set
    InvalidStatus,
    /// Transport failure or poll budget exhausted
    Failed,
}

/// Result of verifying one task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    /// Whether the task may now be claimed
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Terminal state reached
    pub state: VerifyState,
    /// `(required, actual)` invite counts when a referral minimum was not met
    pub min_referrals_unmet: Option<(u64, u64)>,
}

impl VerifyOutcome {
    pub(crate) fn completed(task_name: &str) -> Self {
        Self {
            success: true,
            message: format!("Task \"{}\" verified", task_name),
            state: VerifyState::Completed,
            min_referrals_unmet: None,
        }
    }

    pub(crate) fn skipped(required: u64, actual: u64) -> Self {
        Self {
            success: false,
            message: format!("Skipped: Insufficient invites ({}/{})", actual, required),
            state: VerifyState::Skipped,
            min_referrals_unmet: Some((required, actual)),
        }
    }

    pub(crate) fn invalid_status(status: &str) -> Self {
        Self {
            success: false,
            message: format!("Invalid status: {}", status),
            state: VerifyState::InvalidStatus,
            min_referrals_unmet: None,
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            state: VerifyState::Failed,
            min_referrals_unmet: None,
        }
    }

    /// Whether the task was skipped for an unmet referral minimum
    pub fn is_skipped(&self) -> bool {
        self.state == VerifyState::Skipped
    }
}

/// Result of claiming one task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimOutcome {
    /// Whether the reward is now credited
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// The server reported the reward as claimed earlier
    pub already_claimed: bool,
}

/// Who the token belongs to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Display name
    pub username: String,
    /// On-chain agent address
    pub agent_address: String,
}

/// Aggregate points of one account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStats {
    /// Username
    pub username: String,
    /// On-chain agent address
    pub agent_address: String,
    /// Points from social tasks
    pub social_point: i64,
    /// Points from referrals
    pub ref_point: i64,
    /// `social_point + ref_point`
    pub total_point: i64,
    /// Follower count
    pub followers: i64,
}

impl AccountStats {
    /// Build stats, deriving the total from its parts
    pub fn new(
        username: String,
        agent_address: String,
        social_point: i64,
        ref_point: i64,
        followers: i64,
    ) -> Self {
        Self {
            username,
            agent_address,
            social_point,
            ref_point,
            total_point: social_point.saturating_add(ref_point),
            followers,
        }
    }
}

/// Everything one account pass produced
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountReport {
    /// Account identity
    pub identity: UserIdentity,
    /// Egress IP, or a placeholder when it could not be resolved
    pub ip: String,
    /// Tasks with their final status
    pub tasks: Vec<Task>,
    /// Tasks verified and claimed during this pass
    pub completed_count: usize,
    /// Tasks skipped for unmet referral minimums
    pub skipped_count: usize,
    /// Tasks whose verification or claim failed
    pub failed_count: usize,
    /// Final statistics, absent when they could not be fetched
    pub stats: Option<AccountStats>,
}

impl AccountReport {
    /// Tasks still pending at the end of the pass
    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Pending)
    }
}

/// Per-cycle totals across all accounts
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleSummary {
    /// Accounts in the token file
    pub accounts: usize,
    /// Accounts whose pass ran to the end
    pub processed: usize,
    /// Accounts aborted by an error
    pub failed: usize,
    /// Tasks claimed across all accounts
    pub tasks_completed: usize,
    /// Tasks skipped across all accounts
    pub tasks_skipped: usize,
}
