//! Shared expense splitting.
//!
//! Turns a total and a preset or custom percentage pair into the two
//! amounts each co-parent owes, and validates the add-expense form.

#![warn(missing_docs)]

pub mod splitter;
pub mod selector;
pub mod submission;

pub use splitter::{compute_shares, parse_amount, parse_percent, resolve_ratio, validate};
pub use selector::SplitSelector;
pub use submission::{ExpenseDraft, ExpenseError};
