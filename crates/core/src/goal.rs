//! Goal model - a repeated behaviour a child is working towards mastering.

use serde::{Deserialize, Serialize};
use crate::id::{ChildId, GoalId};
use crate::Time;

/// A goal assigned to a child by a caregiver.
///
/// Counters are read as signed integers and checked with [`GoalCounters::new`],
/// so a negative count in a stored record fails to load instead of wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GoalRecord")]
pub struct Goal {
    /// Unique identifier
    pub id: GoalId,

    /// Child the goal belongs to
    pub child_id: ChildId,

    /// Goal title
    pub title: String,

    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,

    /// Completions logged so far
    pub current_count: u32,

    /// Completions required for mastery (0 means no frequency target)
    pub target_count: u32,

    /// ISO-8601 date the goal should be completed by, as handed over by the backend
    #[serde(default)]
    pub target_date: Option<String>,

    /// Stored status
    pub status: GoalStatus,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl Goal {
    /// Create a goal with no completions logged.
    pub fn new(
        child_id: ChildId,
        title: impl Into<String>,
        target_count: u32,
        target_date: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: GoalId::new(),
            child_id,
            title: title.into(),
            description: None,
            current_count: 0,
            target_count,
            target_date,
            status: GoalStatus::WorkingOn,
            created_at: now,
            updated_at: now,
        }
    }

    /// Counters of this goal.
    pub fn counters(&self) -> GoalCounters {
        GoalCounters {
            current: self.current_count,
            target: self.target_count,
        }
    }
}

/// Goal as it arrives from storage, before counter validation.
#[derive(Deserialize)]
struct GoalRecord {
    id: GoalId,
    child_id: ChildId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    current_count: i64,
    target_count: i64,
    #[serde(default)]
    target_date: Option<String>,
    status: GoalStatus,
    created_at: Time,
    updated_at: Time,
}

impl TryFrom<GoalRecord> for Goal {
    type Error = GoalError;

    fn try_from(record: GoalRecord) -> Result<Self, Self::Error> {
        let counters = GoalCounters::new(record.current_count, record.target_count)?;
        Ok(Self {
            id: record.id,
            child_id: record.child_id,
            title: record.title,
            description: record.description,
            current_count: counters.current,
            target_count: counters.target,
            target_date: record.target_date,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Stored goal status.
///
/// `Mastered` is one-way: only an explicit caregiver status change moves a
/// goal out of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Goal is being worked on
    #[default]
    WorkingOn,
    /// Target reached or confirmed by a caregiver
    Mastered,
    /// Falling behind the expected pace
    Behind,
    /// Needs another attempt
    TryAgain,
    /// Target date passed without mastery
    Expired,
}

impl GoalStatus {
    /// All statuses, in display order.
    pub const ALL: [GoalStatus; 5] = [
        GoalStatus::WorkingOn,
        GoalStatus::Mastered,
        GoalStatus::Behind,
        GoalStatus::TryAgain,
        GoalStatus::Expired,
    ];

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            GoalStatus::WorkingOn => "Working on",
            GoalStatus::Mastered => "Mastered",
            GoalStatus::Behind => "Behind",
            GoalStatus::TryAgain => "Try again",
            GoalStatus::Expired => "Expired",
        }
    }

    /// Wire spelling used by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            GoalStatus::WorkingOn => "working_on",
            GoalStatus::Mastered => "mastered",
            GoalStatus::Behind => "behind",
            GoalStatus::TryAgain => "try_again",
            GoalStatus::Expired => "expired",
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();
        GoalStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| GoalError::UnknownStatus(s.to_string()))
    }
}

/// Status as shown to the caregiver.
///
/// Mirrors [`GoalStatus`] plus `NotStarted`, the presentation variant of
/// `WorkingOn` for goals without any completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    /// Working on, no completions yet
    NotStarted,
    /// Working on
    WorkingOn,
    /// Mastered
    Mastered,
    /// Behind
    Behind,
    /// Try again
    TryAgain,
    /// Expired
    Expired,
}

impl DisplayStatus {
    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            DisplayStatus::NotStarted => "Not started",
            DisplayStatus::WorkingOn => GoalStatus::WorkingOn.label(),
            DisplayStatus::Mastered => GoalStatus::Mastered.label(),
            DisplayStatus::Behind => GoalStatus::Behind.label(),
            DisplayStatus::TryAgain => GoalStatus::TryAgain.label(),
            DisplayStatus::Expired => GoalStatus::Expired.label(),
        }
    }

    /// The stored status this display status stands for.
    pub fn stored(self) -> GoalStatus {
        match self {
            DisplayStatus::NotStarted | DisplayStatus::WorkingOn => GoalStatus::WorkingOn,
            DisplayStatus::Mastered => GoalStatus::Mastered,
            DisplayStatus::Behind => GoalStatus::Behind,
            DisplayStatus::TryAgain => GoalStatus::TryAgain,
            DisplayStatus::Expired => GoalStatus::Expired,
        }
    }
}

impl From<GoalStatus> for DisplayStatus {
    fn from(status: GoalStatus) -> Self {
        match status {
            GoalStatus::WorkingOn => DisplayStatus::WorkingOn,
            GoalStatus::Mastered => DisplayStatus::Mastered,
            GoalStatus::Behind => DisplayStatus::Behind,
            GoalStatus::TryAgain => DisplayStatus::TryAgain,
            GoalStatus::Expired => DisplayStatus::Expired,
        }
    }
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated completion counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalCounters {
    /// Completions logged
    pub current: u32,
    /// Completions required
    pub target: u32,
}

impl GoalCounters {
    /// Validate signed counters coming from an untyped source.
    ///
    /// Negative values are rejected, never clamped.
    pub fn new(current: i64, target: i64) -> Result<Self, GoalError> {
        let current = u32::try_from(current).map_err(|_| GoalError::InvalidCount {
            field: "current_count",
            value: current,
        })?;
        let target = u32::try_from(target).map_err(|_| GoalError::InvalidCount {
            field: "target_count",
            value: target,
        })?;
        Ok(Self { current, target })
    }
}

/// Goal input errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GoalError {
    /// A counter was negative or out of range
    #[error("{field} must be a non-negative integer, got {value}")]
    InvalidCount {
        /// Offending field
        field: &'static str,
        /// Offending value
        value: i64,
    },

    /// Status text outside the closed set
    #[error("unknown goal status: {0}")]
    UnknownStatus(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_goal_starts_working_on_with_zero_count() {
        let goal = Goal::new(ChildId::new("c1"), "Brush teeth", 5, None);
        assert_eq!(goal.current_count, 0);
        assert_eq!(goal.status, GoalStatus::WorkingOn);
        assert_eq!(goal.counters(), GoalCounters { current: 0, target: 5 });
    }

    #[test]
    fn test_status_wire_spelling() {
        let json = serde_json::to_string(&GoalStatus::TryAgain).unwrap();
        assert_eq!(json, "\"try_again\"");
        let back: GoalStatus = serde_json::from_str("\"working_on\"").unwrap();
        assert_eq!(back, GoalStatus::WorkingOn);
    }

    #[test]
    fn test_status_from_str_is_lenient_about_spelling() {
        assert_eq!("Working on".parse::<GoalStatus>().unwrap(), GoalStatus::WorkingOn);
        assert_eq!("try-again".parse::<GoalStatus>().unwrap(), GoalStatus::TryAgain);
        assert_eq!("MASTERED".parse::<GoalStatus>().unwrap(), GoalStatus::Mastered);
        assert!(matches!(
            "done".parse::<GoalStatus>(),
            Err(GoalError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_not_started_maps_back_to_working_on() {
        assert_eq!(DisplayStatus::NotStarted.stored(), GoalStatus::WorkingOn);
        assert_eq!(DisplayStatus::NotStarted.label(), "Not started");
        assert_eq!(DisplayStatus::from(GoalStatus::Behind), DisplayStatus::Behind);
    }

    #[test]
    fn test_counters_reject_negative_values() {
        assert_eq!(
            GoalCounters::new(-1, 5),
            Err(GoalError::InvalidCount { field: "current_count", value: -1 })
        );
        assert_eq!(
            GoalCounters::new(0, -3),
            Err(GoalError::InvalidCount { field: "target_count", value: -3 })
        );
        assert_eq!(GoalCounters::new(2, 0).unwrap(), GoalCounters { current: 2, target: 0 });
    }

    #[test]
    fn test_goal_deserializes_without_optional_fields() {
        let json = r#"{
            "id": "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "child_id": "kid-1",
            "title": "Tie shoes",
            "current_count": 2,
            "target_count": 10,
            "status": "behind",
            "created_at": "2024-03-01T00:00:00Z",
            "updated_at": "2024-03-02T00:00:00Z"
        }"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.status, GoalStatus::Behind);
        assert!(goal.target_date.is_none());
        assert!(goal.description.is_none());
    }

    #[test]
    fn test_goal_with_negative_count_fails_to_load() {
        let json = r#"{
            "id": "01ARZ3NDEKTSV4RRFFQ69G5FAV",
            "child_id": "kid-1",
            "title": "Tie shoes",
            "current_count": -1,
            "target_count": 10,
            "status": "working_on",
            "created_at": "2024-03-01T00:00:00Z",
            "updated_at": "2024-03-02T00:00:00Z"
        }"#;
        let err = serde_json::from_str::<Goal>(json).unwrap_err();
        assert!(err.to_string().contains("current_count must be a non-negative integer"));
    }

    #[test]
    fn test_default_status_is_working_on() {
        assert_eq!(GoalStatus::default(), GoalStatus::WorkingOn);
    }
}
