//! Goal progress tracking.
//!
//! Percent complete, days remaining and display status derivation for
//! goals, the counter transitions behind the increment/decrement buttons,
//! and a tracker that persists the resulting writes.

#![warn(missing_docs)]

pub mod kernel;
pub mod transition;
pub mod tracker;

pub use kernel::{
    compute_days_remaining, compute_percent, derive_display_status,
    evaluate_mastery_on_increment, parse_target_date, pending_transition, GoalView,
};
pub use transition::{change_status, decrement, increment, GoalUpdate};
pub use tracker::{GoalTracker, TrackerConfig, TrackerError};
