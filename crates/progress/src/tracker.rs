//! Goal tracking service.
//!
//! Wraps a [`Storage`] backend: reads goals, derives their views, and turns
//! user actions into single writes.

use chrono::{DateTime, Utc};
use coparent_core::{Goal, GoalId, GoalStatus};
use coparent_storage::{Storage, StorageError};
use tracing::{debug, info, warn};

use crate::kernel::{compute_days_remaining, GoalView};
use crate::transition::{self, GoalUpdate};

/// Errors from tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The goal does not exist
    #[error("goal not found: {0}")]
    NotFound(GoalId),

    /// Backend failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Tracker configuration.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Persist the lazy `Expired` transition when a view reveals it
    pub persist_expiry: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            persist_expiry: true,
        }
    }
}

/// Goal tracker over a storage backend.
pub struct GoalTracker<S: Storage> {
    storage: S,
    config: TrackerConfig,
}

impl<S: Storage> GoalTracker<S> {
    /// Create a tracker with the default configuration.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            config: TrackerConfig::default(),
        }
    }

    /// Set configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Underlying storage, mutably.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// View of one goal at `now`, persisting a pending expiry first.
    pub async fn view(&mut self, id: GoalId, now: DateTime<Utc>) -> Result<GoalView> {
        let goal = self.load(id).await?;
        Ok(self.settle(goal, now).await)
    }

    /// Views of every goal at `now`.
    pub async fn view_all(&mut self, now: DateTime<Utc>) -> Result<Vec<GoalView>> {
        let goals = self.storage.list_goals().await?;
        let mut views = Vec::with_capacity(goals.len());
        for goal in goals {
            views.push(self.settle(goal, now).await);
        }
        Ok(views)
    }

    /// Log a completion.
    pub async fn increment(&mut self, id: GoalId, now: DateTime<Utc>) -> Result<Goal> {
        let goal = self.load(id).await?;
        let update = transition::increment(&goal);
        if update.masters() {
            info!(goal_id = %id, count = update.current_count, "goal mastered");
        }
        self.write(goal, update, now).await
    }

    /// Remove a completion. Returns the goal unchanged when the count is already 0.
    pub async fn decrement(&mut self, id: GoalId, now: DateTime<Utc>) -> Result<Goal> {
        let goal = self.load(id).await?;
        match transition::decrement(&goal) {
            Some(update) => self.write(goal, update, now).await,
            None => {
                debug!(goal_id = %id, "decrement at zero ignored");
                Ok(goal)
            }
        }
    }

    /// Set the status explicitly.
    pub async fn set_status(
        &mut self,
        id: GoalId,
        status: GoalStatus,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        let goal = self.load(id).await?;
        let update = transition::change_status(&goal, status);
        self.write(goal, update, now).await
    }

    async fn load(&self, id: GoalId) -> Result<Goal> {
        self.storage
            .load_goal(id)
            .await?
            .ok_or(TrackerError::NotFound(id))
    }

    async fn write(&mut self, mut goal: Goal, update: GoalUpdate, now: DateTime<Utc>) -> Result<Goal> {
        update.apply(&mut goal, now);
        self.storage.save_goal(&goal).await?;
        debug!(goal_id = %goal.id, count = goal.current_count, status = goal.status.as_str(), "goal updated");
        Ok(goal)
    }

    /// Derive the view and, when it reveals an unrecorded expiry, persist it.
    async fn settle(&mut self, goal: Goal, now: DateTime<Utc>) -> GoalView {
        let view = GoalView::derive(&goal, now);
        debug!(goal_id = %goal.id, status = view.status.label(), percent = ?view.percent, "derived goal view");

        if view.pending_transition.is_none() || !self.config.persist_expiry {
            return view;
        }

        match self.persist_expiry(goal.id, now).await {
            Some(updated) => GoalView::derive(&updated, now),
            None => view,
        }
    }

    /// One attempt at the corrective `Expired` write.
    ///
    /// The record is re-read first and only written if it is still unmastered,
    /// not yet expired and past its date, so a concurrent manual change wins.
    /// Failures are logged and left for the next read to signal again.
    async fn persist_expiry(&mut self, id: GoalId, now: DateTime<Utc>) -> Option<Goal> {
        let mut fresh = match self.storage.load_goal(id).await {
            Ok(Some(goal)) => goal,
            Ok(None) => {
                warn!(goal_id = %id, "goal vanished before expiry could be recorded");
                return None;
            }
            Err(e) => {
                warn!(goal_id = %id, error = %e, "failed to reload goal for expiry");
                return None;
            }
        };

        let still_due = matches!(
            compute_days_remaining(fresh.target_date.as_deref(), now),
            Some(days) if days <= 0
        );
        if matches!(fresh.status, GoalStatus::Mastered | GoalStatus::Expired) || !still_due {
            debug!(goal_id = %id, status = fresh.status.as_str(), "expiry superseded by newer record");
            return Some(fresh);
        }

        let update = transition::change_status(&fresh, GoalStatus::Expired);
        update.apply(&mut fresh, now);
        match self.storage.save_goal(&fresh).await {
            Ok(()) => {
                info!(goal_id = %id, "recorded goal expiry");
                Some(fresh)
            }
            Err(e) => {
                warn!(goal_id = %id, error = %e, "failed to record goal expiry");
                None
            }
        }
    }
}
