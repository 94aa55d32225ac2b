//! Counter and status transitions.
//!
//! Each function computes the single write a user action turns into. The
//! caller applies it to the record and persists it in one go.

use chrono::{DateTime, Utc};
use coparent_core::{Goal, GoalStatus};
use crate::kernel::evaluate_mastery_on_increment;

/// Fields to write back for one user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalUpdate {
    /// New completion count
    pub current_count: u32,

    /// New status, if it changes
    pub status: Option<GoalStatus>,
}

impl GoalUpdate {
    /// Whether this update sets the goal to mastered.
    pub fn masters(&self) -> bool {
        self.status == Some(GoalStatus::Mastered)
    }

    /// Apply to a record.
    pub fn apply(&self, goal: &mut Goal, now: DateTime<Utc>) {
        goal.current_count = self.current_count;
        if let Some(status) = self.status {
            goal.status = status;
        }
        goal.updated_at = now;
    }
}

/// Log one completion.
///
/// Reaching the target masters the goal in the same write.
pub fn increment(goal: &Goal) -> GoalUpdate {
    let current_count = goal.current_count.saturating_add(1);
    let status = (goal.status != GoalStatus::Mastered
        && evaluate_mastery_on_increment(current_count, goal.target_count))
        .then_some(GoalStatus::Mastered);

    GoalUpdate { current_count, status }
}

/// Remove one completion. `None` when there is nothing to remove.
///
/// Only the count changes. `Mastered` is never revoked here, `Behind` and
/// `TryAgain` are only ever set by a caregiver, and `Expired` follows the date.
pub fn decrement(goal: &Goal) -> Option<GoalUpdate> {
    let current_count = goal.current_count.checked_sub(1)?;
    Some(GoalUpdate { current_count, status: None })
}

/// Explicit status change by a caregiver.
///
/// This is the only path that takes a goal out of `Mastered`, and the manual
/// way into it.
pub fn change_status(goal: &Goal, status: GoalStatus) -> GoalUpdate {
    GoalUpdate {
        current_count: goal.current_count,
        status: (goal.status != status).then_some(status),
    }
}
