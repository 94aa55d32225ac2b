//! JSON file storage implementation.
//!
//! Stores one pretty-printed JSON file per record under the storage root,
//! in `goals/`, `expenses/` and `contacts/`.

use std::path::{Path, PathBuf};
use coparent_core::{Contact, ContactId, ContactRow, Expense, ExpenseId, Goal, GoalId};
use super::{Storage, StorageError, Result};
use tokio::fs;
use tracing::debug;

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage, creating the record directories under `root` if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("goals")).await?;
        fs::create_dir_all(root.join("expenses")).await?;
        fs::create_dir_all(root.join("contacts")).await?;

        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn goal_path(&self, id: GoalId) -> PathBuf {
        self.root.join("goals").join(format!("{}.json", id))
    }
    fn expense_path(&self, id: ExpenseId) -> PathBuf {
        self.root.join("expenses").join(format!("{}.json", id))
    }
    fn contact_path(&self, id: &ContactId) -> Result<PathBuf> {
        let raw = id.as_str();
        if raw.is_empty() || raw.contains(['/', '\\']) || raw.starts_with('.') {
            return Err(StorageError::Other(format!("contact id not usable as a file name: {raw:?}")));
        }
        Ok(self.root.join("contacts").join(format!("{}.json", raw)))
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_goal(&mut self, goal: &Goal) -> Result<()> {
        write_json(&self.goal_path(goal.id), goal).await?;
        debug!(goal_id = %goal.id, status = goal.status.as_str(), "saved goal");
        Ok(())
    }

    async fn load_goal(&self, id: GoalId) -> Result<Option<Goal>> {
        read_json(&self.goal_path(id)).await
    }

    async fn list_goals(&self) -> Result<Vec<Goal>> {
        let mut goals = list_dir(&self.root.join("goals")).await?;
        goals.sort_by(|a: &Goal, b| a.created_at.cmp(&b.created_at));
        Ok(goals)
    }

    async fn delete_goal(&mut self, id: GoalId) -> Result<()> {
        fs::remove_file(self.goal_path(id)).await.or_else(|e| {
            if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
        })?;
        debug!(goal_id = %id, "deleted goal");
        Ok(())
    }

    async fn save_expense(&mut self, expense: &Expense) -> Result<()> {
        write_json(&self.expense_path(expense.id), expense).await?;
        debug!(expense_id = %expense.id, amount = %expense.amount, "saved expense");
        Ok(())
    }

    async fn list_expenses(&self) -> Result<Vec<Expense>> {
        let mut expenses = list_dir(&self.root.join("expenses")).await?;
        expenses.sort_by(|a: &Expense, b| a.created_at.cmp(&b.created_at));
        Ok(expenses)
    }

    async fn save_contact_row(&mut self, row: &ContactRow) -> Result<()> {
        write_json(&self.contact_path(&row.id)?, row).await?;
        debug!(contact_id = %row.id, links = row.contact_children.len(), "saved contact");
        Ok(())
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let rows: Vec<ContactRow> = list_dir(&self.root.join("contacts")).await?;
        let mut contacts: Vec<Contact> = rows.into_iter().map(ContactRow::into_contact).collect();
        contacts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(contacts)
    }
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json.as_bytes()).await?;
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&entry.path()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => tracing::warn!(path = %entry.path().display(), error = %e, "skipping unreadable record"),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coparent_core::{
        ChildId, ChildRef, ContactChildLink, GoalStatus, SplitMode, SplitRatio, SplitShares,
    };
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_goal_round_trip_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let mut goal = Goal::new(ChildId::new("k1"), "Make bed", 7, Some("2030-01-01".into()));
        goal.current_count = 3;
        storage.save_goal(&goal).await.unwrap();

        let loaded = storage.load_goal(goal.id).await.unwrap().unwrap();
        assert_eq!(loaded, goal);
        assert_eq!(storage.list_goals().await.unwrap().len(), 1);

        storage.delete_goal(goal.id).await.unwrap();
        assert!(storage.load_goal(goal.id).await.unwrap().is_none());
        // second delete is a no-op
        storage.delete_goal(goal.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_goal_overwrites_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let mut goal = Goal::new(ChildId::new("k1"), "Read", 3, None);
        storage.save_goal(&goal).await.unwrap();
        goal.status = GoalStatus::Mastered;
        storage.save_goal(&goal).await.unwrap();

        let goals = storage.list_goals().await.unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].status, GoalStatus::Mastered);
    }

    #[tokio::test]
    async fn test_expenses_listed_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let older = chrono::Utc::now() - chrono::Duration::days(1);
        let make = |description: &str, created_at| Expense {
            id: ExpenseId::new(),
            child_id: None,
            description: description.to_string(),
            amount: dec!(200),
            paid_by: "Sam".to_string(),
            split_mode: SplitMode::Custom,
            ratio: SplitRatio::new(60, 40),
            shares: SplitShares { first: dec!(120), second: dec!(80), valid: true },
            created_at,
        };
        storage.save_expense(&make("shoes", chrono::Utc::now())).await.unwrap();
        storage.save_expense(&make("dentist", older)).await.unwrap();

        let listed = storage.list_expenses().await.unwrap();
        let names: Vec<_> = listed.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["dentist", "shoes"]);
        assert_eq!(listed[0].shares.first, dec!(120));
    }

    #[tokio::test]
    async fn test_large_amounts_keep_their_cents() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let expense = Expense {
            id: ExpenseId::new(),
            child_id: Some(ChildId::new("k1")),
            description: "tuition".to_string(),
            amount: dec!(12345678901234567.89),
            paid_by: "Sam".to_string(),
            split_mode: SplitMode::Custom,
            ratio: SplitRatio::new(60, 40),
            shares: SplitShares {
                first: dec!(7407407340740740.73),
                second: dec!(4938271560493827.16),
                valid: true,
            },
            created_at: chrono::Utc::now(),
        };
        storage.save_expense(&expense).await.unwrap();

        let listed = storage.list_expenses().await.unwrap();
        assert_eq!(listed, vec![expense]);
        assert_eq!(listed[0].amount.to_string(), "12345678901234567.89");
        assert_eq!(listed[0].shares.first.to_string(), "7407407340740740.73");
    }

    #[tokio::test]
    async fn test_contacts_are_flattened_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let row = ContactRow {
            id: ContactId::new("ct-1"),
            name: "Dr. Lee".to_string(),
            relationship: Some("pediatrician".to_string()),
            phone: None,
            email: None,
            contact_children: vec![
                ContactChildLink { child: Some(ChildRef { id: ChildId::new("k1"), name: "Ada".into() }) },
                ContactChildLink { child: None },
            ],
        };
        storage.save_contact_row(&row).await.unwrap();

        let contacts = storage.list_contacts().await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].children.len(), 1);
        assert_eq!(contacts[0].children[0].name, "Ada");
    }

    #[tokio::test]
    async fn test_rejects_path_like_contact_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let row = ContactRow {
            id: ContactId::new("../escape"),
            name: "Nope".to_string(),
            relationship: None,
            phone: None,
            email: None,
            contact_children: vec![],
        };
        assert!(matches!(
            storage.save_contact_row(&row).await,
            Err(StorageError::Other(_))
        ));
    }
}
