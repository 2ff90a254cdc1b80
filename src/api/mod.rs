//! Typed client for the points API
//!
//! One [`NexyApi`] is built per account pass: it owns the account's
//! authenticated headers and an [`HttpClient`] bound to the account's proxy.
//! Every fetch returns `Result`, with schema problems reported as
//! [`Error::IncompleteData`](crate::error::Error::IncompleteData).

pub mod schema;

use crate::config::Config;
use crate::error::Result;
use crate::http::{ApiResponse, HttpClient, auth_headers, standard_headers};
use crate::types::{AccountStats, Credential, Task, UserIdentity};
use reqwest::header::HeaderMap;
use schema::{CompletedItem, IpEcho, RawTask, RewardsData, UserData, VerifyData, decode_data};
use std::collections::HashSet;
use tracing::warn;

/// Authenticated view of the API for one account
pub struct NexyApi {
    http: HttpClient,
    base_url: String,
    ip_echo_url: String,
    headers: HeaderMap,
}

impl NexyApi {
    /// Create an API client for `credential` using `http` for transport
    pub fn new(config: &Config, credential: &Credential, http: HttpClient) -> Result<Self> {
        Ok(Self {
            headers: auth_headers(&config.api, credential)?,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            ip_echo_url: config.api.ip_echo_url.clone(),
            http,
        })
    }

    /// Underlying transport
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_user(&self) -> Result<UserData> {
        let response = self.http.get(&self.url("/client/user"), &self.headers).await?;
        decode_data(response.body, "user")
    }

    /// `GET /client/user` → username (`metadata.name`) and agent address
    pub async fn fetch_user(&self) -> Result<UserIdentity> {
        self.get_user().await?.identity()
    }

    /// Egress IP as seen by the IP echo service (unauthenticated)
    pub async fn public_ip(&self) -> Result<String> {
        let response = self.http.get(&self.ip_echo_url, &standard_headers()).await?;
        let echo: IpEcho = serde_json::from_value(response.body)?;
        Ok(echo
            .ip
            .filter(|ip| !ip.is_empty())
            .unwrap_or_else(|| "Unknown".to_string()))
    }

    /// `GET /client/tasks`, normalized
    ///
    /// Duplicate ids keep their first occurrence.
    pub async fn fetch_tasks(&self) -> Result<Vec<Task>> {
        let response = self.http.get(&self.url("/client/tasks"), &self.headers).await?;
        let raw: Vec<RawTask> = decode_data(response.body, "tasks")?;

        let mut seen = HashSet::new();
        let mut tasks = Vec::with_capacity(raw.len());
        for (index, item) in raw.iter().enumerate() {
            let task = item.normalize(index);
            if item.lacks_description() {
                warn!(task_id = %task.id, "Task {} has no description", task.id);
            }
            if !seen.insert(task.id.clone()) {
                warn!(task_id = %task.id, "Duplicate task id in task list, keeping first");
                continue;
            }
            tasks.push(task);
        }
        Ok(tasks)
    }

    /// `GET /client/user-tasks/completed` → ids of tasks already claimed
    pub async fn fetch_completed_ids(&self) -> Result<HashSet<String>> {
        let response = self
            .http
            .get(&self.url("/client/user-tasks/completed"), &self.headers)
            .await?;
        let items: Vec<CompletedItem> = decode_data(response.body, "completed tasks")?;
        Ok(items.iter().filter_map(CompletedItem::id).collect())
    }

    /// `POST /client/user-tasks/verify/{id}` → one verification poll
    pub async fn verify_task(&self, task_id: &str) -> Result<VerifyData> {
        let response = self
            .http
            .post_empty(
                &self.url(&format!("/client/user-tasks/verify/{}", task_id)),
                &self.headers,
            )
            .await?;
        decode_data(response.body, "verify")
    }

    /// `POST /client/user-tasks/claim/{id}` → raw response; interpretation is
    /// left to the claim loop
    pub async fn claim_task(&self, task_id: &str) -> Result<ApiResponse> {
        self.http
            .post_empty(
                &self.url(&format!("/client/user-tasks/claim/{}", task_id)),
                &self.headers,
            )
            .await
    }

    /// `GET /client/user` + `GET /client/rewards/statistic`
    pub async fn fetch_statistics(&self) -> Result<AccountStats> {
        let user = self.get_user().await?;
        let response = self
            .http
            .get(&self.url("/client/rewards/statistic"), &self.headers)
            .await?;
        let rewards: RewardsData = decode_data(response.body, "rewards")?;

        let (social, referral, followers) = rewards.totals();
        Ok(AccountStats::new(
            user.handle()?.to_string(),
            user.agent_address()?.to_string(),
            social,
            referral,
            followers,
        ))
    }
}

#[cfg(test)]
mod tests;
