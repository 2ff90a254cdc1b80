//! Plain-text rendering of account results
//!
//! Renderers return lines; the caller decides where they go (the account
//! orchestrator logs each one at `info`).

use crate::types::{AccountStats, Task, TaskStatus, UserIdentity};
use crate::utils::truncate_with_ellipsis;

const BORDER: &str = "+----------------------+----------+-------+----------+";

/// Fixed-width task table: name (20), category (8), points (5), status
pub fn render_task_table(tasks: &[Task]) -> Vec<String> {
    let mut lines = Vec::with_capacity(tasks.len() + 4);
    lines.push(BORDER.to_string());
    lines.push(format!(
        "| {:<20} | {:<8} | {:<5} | {:<8} |",
        "Task Name", "Category", "Point", "Status"
    ));
    lines.push(BORDER.to_string());

    for task in tasks {
        let name = truncate_with_ellipsis(task.display_name(), 20);
        let status = match task.status {
            TaskStatus::Completed => "Complete",
            TaskStatus::Pending => "Pending",
        };
        lines.push(format!(
            "| {:<20} | {:<8.8} | {:<5.5} | {:<8} |",
            name,
            task.category,
            task.points.to_string(),
            status
        ));
    }

    lines.push(BORDER.to_string());
    lines
}

fn labelled(label: &str, value: impl std::fmt::Display) -> String {
    format!("{:<15}: {}", label, value)
}

/// Identity block shown before tasks are processed
pub fn render_identity(identity: &UserIdentity, ip: &str) -> Vec<String> {
    vec![
        labelled("Username", &identity.username),
        labelled("Agent Address", &identity.agent_address),
        labelled("IP", ip),
    ]
}

/// Statistics block shown at the end of an account pass
pub fn render_stats(stats: &AccountStats) -> Vec<String> {
    vec![
        labelled("Username", &stats.username),
        labelled("Agent Address", &stats.agent_address),
        labelled("Social Point", stats.social_point),
        labelled("Referral Point", stats.ref_point),
        labelled("Total Point", stats.total_point),
        labelled("Followers", stats.followers),
    ]
}
