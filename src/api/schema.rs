//! Response schemas of the points API
//!
//! Every field is optional at the serde level; required fields are checked
//! explicitly afterwards so a missing field surfaces as
//! [`Error::IncompleteData`] naming the field instead of a generic decode error.

use crate::error::{Error, Result};
use crate::types::{Task, TaskStatus, UserIdentity};
use crate::utils::strip_html;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// `{ "data": ... }` wrapper used by every endpoint
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    /// Payload
    pub data: Option<T>,
}

/// Decode `{ "data": T }`, failing when `data` is absent
pub fn decode_data<T: DeserializeOwned>(body: Value, what: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_value(body)
        .map_err(|e| Error::IncompleteData(format!("{} response has unexpected shape: {}", what, e)))?;
    envelope
        .data
        .ok_or_else(|| Error::IncompleteData(format!("{} response has no data", what)))
}

/// `GET /client/user` payload
#[derive(Debug, Default, Deserialize)]
pub struct UserData {
    /// Profile metadata
    pub metadata: Option<UserMetadata>,
    /// On-chain agent address
    pub agent_address: Option<String>,
}

/// Profile metadata of a user
#[derive(Debug, Default, Deserialize)]
pub struct UserMetadata {
    /// Display name
    pub name: Option<String>,
    /// Handle
    pub username: Option<String>,
}

impl UserData {
    /// Identity shown at the start of an account pass (`metadata.name`)
    pub fn identity(&self) -> Result<UserIdentity> {
        let username = self
            .metadata
            .as_ref()
            .and_then(|m| non_empty(m.name.as_deref()))
            .ok_or_else(|| Error::IncompleteData("Incomplete user data: missing metadata.name".into()))?;
        Ok(UserIdentity {
            username: username.to_string(),
            agent_address: self.agent_address()?.to_string(),
        })
    }

    /// Handle used in statistics (`metadata.username`, falling back to `metadata.name`)
    pub fn handle(&self) -> Result<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| non_empty(m.username.as_deref()).or_else(|| non_empty(m.name.as_deref())))
            .ok_or_else(|| Error::IncompleteData("Incomplete user data: missing metadata.username".into()))
    }

    /// Agent address, required to be non-empty
    pub fn agent_address(&self) -> Result<&str> {
        non_empty(self.agent_address.as_deref())
            .ok_or_else(|| Error::IncompleteData("Incomplete user data: missing agent_address".into()))
    }
}

/// One entry of `GET /client/tasks`
#[derive(Debug, Default, Deserialize)]
pub struct RawTask {
    /// Identifier; string or number upstream
    pub id: Option<Value>,
    /// HTML description
    pub description: Option<Value>,
    /// Category such as "REF"
    pub category: Option<String>,
    /// Reward points
    pub points: Option<Value>,
}

impl RawTask {
    /// Whether the description is missing or not a string
    pub fn lacks_description(&self) -> bool {
        !matches!(&self.description, Some(Value::String(s)) if !s.is_empty())
    }

    /// Normalize into a pending [`Task`]
    ///
    /// Missing id → `task-<index>`, description stripped of HTML (empty when
    /// not a string), missing category → `"N/A"`, missing points → 0.
    pub fn normalize(&self, index: usize) -> Task {
        let id = self
            .id
            .as_ref()
            .and_then(value_to_id)
            .unwrap_or_else(|| format!("task-{}", index));

        let description = match &self.description {
            Some(Value::String(s)) => strip_html(s),
            _ => String::new(),
        };

        let category = non_empty(self.category.as_deref())
            .unwrap_or("N/A")
            .to_string();

        let points = self.points.as_ref().and_then(lenient_i64).unwrap_or(0);

        Task {
            id,
            description,
            category,
            points,
            status: TaskStatus::Pending,
        }
    }
}

/// One entry of `GET /client/user-tasks/completed`
#[derive(Debug, Default, Deserialize)]
pub struct CompletedItem {
    /// Id of the completed task
    pub task_id: Option<Value>,
}

impl CompletedItem {
    /// Task id as a string, when present
    pub fn id(&self) -> Option<String> {
        self.task_id.as_ref().and_then(value_to_id)
    }
}

/// `POST /client/user-tasks/verify/{id}` payload
#[derive(Debug, Default, Deserialize)]
pub struct VerifyData {
    /// `in_progress`, `completed`, or something unexpected
    pub status: Option<String>,
    /// Echo of the task id
    pub task_id: Option<Value>,
    /// Task definition including requirements
    pub task: Option<VerifyTaskInfo>,
    /// Counters of the verifying user
    pub user: Option<VerifyUser>,
}

/// Task definition inside a verify payload
#[derive(Debug, Default, Deserialize)]
pub struct VerifyTaskInfo {
    /// Requirements
    pub data: Option<TaskRequirements>,
}

/// Requirements of a task
#[derive(Debug, Default, Deserialize)]
pub struct TaskRequirements {
    /// Invites needed before a referral task completes
    pub min_referrals: Option<Value>,
}

/// User counters inside a verify payload
#[derive(Debug, Default, Deserialize)]
pub struct VerifyUser {
    /// Users invited so far
    pub invited: Option<Value>,
}

/// Referral requirement found in a verify payload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferralRequirement {
    /// Minimum invites
    pub required: u64,
    /// Current invites
    pub invited: u64,
}

impl ReferralRequirement {
    /// Whether the user has enough invites
    pub fn is_met(&self) -> bool {
        self.invited >= self.required
    }
}

impl VerifyData {
    /// The referral requirement, when the payload carries a non-zero minimum
    /// and echoes the task id
    pub fn referral_requirement(&self) -> Option<ReferralRequirement> {
        let required = self
            .task
            .as_ref()
            .and_then(|t| t.data.as_ref())
            .and_then(|d| d.min_referrals.as_ref())
            .and_then(lenient_i64)
            .filter(|n| *n > 0)?;

        self.task_id.as_ref().and_then(value_to_id)?;

        let invited = self
            .user
            .as_ref()
            .and_then(|u| u.invited.as_ref())
            .and_then(lenient_i64)
            .unwrap_or(0);

        Some(ReferralRequirement {
            required: required as u64,
            invited: invited.max(0) as u64,
        })
    }
}

/// `GET /client/rewards/statistic` payload
#[derive(Debug, Default, Deserialize)]
pub struct RewardsData {
    /// Social points
    pub social: Option<Value>,
    /// Referral points
    #[serde(rename = "ref")]
    pub referral: Option<Value>,
    /// Followers
    pub follower: Option<Value>,
}

impl RewardsData {
    /// `(social, ref, followers)`, missing values as 0
    pub fn totals(&self) -> (i64, i64, i64) {
        let get = |v: &Option<Value>| v.as_ref().and_then(lenient_i64).unwrap_or(0);
        (get(&self.social), get(&self.referral), get(&self.follower))
    }
}

/// `GET https://api.ipify.org?format=json` payload
#[derive(Debug, Default, Deserialize)]
pub struct IpEcho {
    /// Egress address
    pub ip: Option<String>,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Id from a string or integer value; empty strings, zero and null count as absent
fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Integer from a number (fractions truncated) or a numeric string
fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}
