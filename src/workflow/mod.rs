//! Per-task workflow: verification state machine and claim loop

/// Task claim loop
pub mod claim;
/// Task verification state machine
pub mod verify;

pub use claim::{claim_task, claim_with_attempts};
pub use verify::{PollVerdict, classify_poll, verify_task};
