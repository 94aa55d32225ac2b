//! Storage trait abstraction.

use async_trait::async_trait;
use coparent_core::{Contact, ContactRow, Expense, Goal, GoalId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for family records.
///
/// The backend owns the record schemas; this trait is the seam the goal
/// tracker and the CLI write through.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Goal operations ===

    /// Save a goal (create or update).
    async fn save_goal(&mut self, goal: &Goal) -> Result<()>;

    /// Load a goal by ID.
    async fn load_goal(&self, id: GoalId) -> Result<Option<Goal>>;

    /// List all goals.
    async fn list_goals(&self) -> Result<Vec<Goal>>;

    /// Delete a goal. Deleting a missing goal is not an error.
    async fn delete_goal(&mut self, id: GoalId) -> Result<()>;

    // === Expense operations ===

    /// Save a submitted expense.
    async fn save_expense(&mut self, expense: &Expense) -> Result<()>;

    /// List expenses, oldest first.
    async fn list_expenses(&self) -> Result<Vec<Expense>>;

    // === Contact operations ===

    /// Save a contact in the backend's nested row shape.
    async fn save_contact_row(&mut self, row: &ContactRow) -> Result<()>;

    /// List contacts with their junction rows flattened.
    async fn list_contacts(&self) -> Result<Vec<Contact>>;
}
