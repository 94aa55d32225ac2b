//! Co-parenting core data models.
//!
//! Goals, shared expenses and family contacts as exchanged with the
//! backend, plus the typed identifiers that tie them together.

#![warn(missing_docs)]

// Core identities
mod id;

// Goal tracking
mod goal;

// Expense sharing
mod expense;

// Family contacts
mod contact;

// Re-exports
pub use id::*;

pub use goal::{Goal, GoalStatus, DisplayStatus, GoalCounters, GoalError};
pub use expense::{Expense, SplitMode, SplitRatio, PresetRatio, SplitShares, UnknownPreset};
pub use contact::{Contact, ContactRow, ContactChildLink, ChildRef};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
