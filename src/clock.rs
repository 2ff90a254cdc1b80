//! Time source for every wait in the workflow
//!
//! Backoff delays, poll intervals, inter-task and inter-account pauses and the
//! 24 hour cycle sleep all go through [`Clock`], so tests can observe the
//! requested delays without waiting for them.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Something that can suspend the current task for a duration
#[async_trait]
pub trait Clock: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by `tokio::time::sleep`
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock that returns immediately and records every requested delay
///
/// Optionally cancels a [`CancellationToken`] once a given number of sleeps
/// has been recorded, which lets an otherwise endless loop terminate.
#[derive(Debug, Default)]
pub struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
    cancel: Option<(usize, CancellationToken)>,
}

impl RecordingClock {
    /// Create a clock with no cancellation hook
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock that cancels `token` after `limit` recorded sleeps
    pub fn cancel_after(limit: usize, token: CancellationToken) -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
            cancel: Some((limit, token)),
        }
    }

    /// All delays requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Number of requested delays equal to `duration`
    pub fn count_of(&self, duration: Duration) -> usize {
        self.sleeps().iter().filter(|d| **d == duration).count()
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        let recorded = {
            let mut sleeps = self
                .sleeps
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            sleeps.push(duration);
            sleeps.len()
        };

        if let Some((limit, token)) = &self.cancel
            && recorded >= *limit
        {
            token.cancel();
        }

        tokio::task::yield_now().await;
    }
}
