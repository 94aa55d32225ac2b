//! Goal progress and status derivation.
//!
//! Everything here is a pure function of its arguments. Rendering code calls
//! these to get a percent, a days-remaining count and a display status; the
//! stored record is never touched.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use coparent_core::{DisplayStatus, Goal, GoalCounters, GoalId, GoalStatus};
use serde::Serialize;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Percent of the target reached, rounded half up and capped at 100.
///
/// Returns `None` when `target` is 0: such goals have no frequency target and
/// no progress bar should be drawn for them.
pub fn compute_percent(current: u32, target: u32) -> Option<u8> {
    if target == 0 {
        return None;
    }
    let current = u64::from(current);
    let target = u64::from(target);
    // round(current / target * 100) in integers: floor((200c + t) / 2t)
    let percent = (current * 200 + target) / (target * 2);
    Some(percent.min(100) as u8)
}

/// Parse a target date as handed over by the backend.
///
/// Accepts RFC 3339 timestamps, naive date-times (read as UTC) and plain
/// `YYYY-MM-DD` dates (UTC midnight). Anything else is `None`.
pub fn parse_target_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whole days until `target_date`, rounded up. Negative once the date has passed.
///
/// `None` when no date is set or it does not parse.
pub fn compute_days_remaining(target_date: Option<&str>, now: DateTime<Utc>) -> Option<i64> {
    let target = parse_target_date(target_date?)?;
    let diff = (target - now).num_milliseconds();
    // ceil(diff / day) for a positive divisor
    Some(-(-diff).div_euclid(MILLIS_PER_DAY))
}

/// Status to display for a goal.
///
/// Rules, first match wins:
/// 1. a stored `Mastered` is terminal;
/// 2. a target date reached or passed shows `Expired`;
/// 3. no completions shows `NotStarted`;
/// 4. otherwise the stored status.
pub fn derive_display_status(
    stored: GoalStatus,
    counters: GoalCounters,
    days_remaining: Option<i64>,
) -> DisplayStatus {
    if stored == GoalStatus::Mastered {
        return DisplayStatus::Mastered;
    }
    if days_remaining.is_some_and(|days| days <= 0) {
        return DisplayStatus::Expired;
    }
    if counters.current == 0 {
        return DisplayStatus::NotStarted;
    }
    stored.into()
}

/// The write the caller owes the backend after deriving `display`, if any.
///
/// Only the lazy expiry produces one: the goal displays as `Expired` but the
/// stored field does not say so yet.
pub fn pending_transition(stored: GoalStatus, display: DisplayStatus) -> Option<GoalStatus> {
    (display == DisplayStatus::Expired && stored != GoalStatus::Expired)
        .then_some(GoalStatus::Expired)
}

/// Whether logging a completion that brings the count to `new_count` masters the goal.
pub fn evaluate_mastery_on_increment(new_count: u32, target: u32) -> bool {
    target > 0 && new_count >= target
}

/// Everything a goal card needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalView {
    /// Goal identifier
    pub goal_id: GoalId,

    /// Goal title
    pub title: String,

    /// Completions logged
    pub current_count: u32,

    /// Completions required
    pub target_count: u32,

    /// Progress bar fill, absent for goals without a target
    pub percent: Option<u8>,

    /// Days until the target date
    pub days_remaining: Option<i64>,

    /// Whether the target date has been reached or passed, mastered or not
    pub overdue: bool,

    /// Status label to show
    pub status: DisplayStatus,

    /// Status write the caller should persist
    pub pending_transition: Option<GoalStatus>,
}

impl GoalView {
    /// Derive the view of `goal` at `now`.
    pub fn derive(goal: &Goal, now: DateTime<Utc>) -> Self {
        let counters = goal.counters();
        let days_remaining = compute_days_remaining(goal.target_date.as_deref(), now);
        let status = derive_display_status(goal.status, counters, days_remaining);

        Self {
            goal_id: goal.id,
            title: goal.title.clone(),
            current_count: counters.current,
            target_count: counters.target,
            percent: compute_percent(counters.current, counters.target),
            days_remaining,
            overdue: days_remaining.is_some_and(|days| days <= 0),
            status,
            pending_transition: pending_transition(goal.status, status),
        }
    }
}
