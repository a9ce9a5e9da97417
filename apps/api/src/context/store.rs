//! Persistence seam for context summaries.
//!
//! The service hands every generated summary to a `ContextStore`; only the
//! session's current summary is sent as active. Stores keep at most one active
//! record per user: appending an active record deactivates the user's previous
//! active records first.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::context::{ContextRecord, NewContextRecord};

/// Carried in `AppState` as `Arc<dyn ContextStore>`.
#[async_trait]
pub trait ContextStore: Send + Sync {
    async fn append(&self, record: NewContextRecord) -> Result<ContextRecord, AppError>;

    /// All records for a user, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ContextRecord>, AppError>;

    async fn active_for_user(&self, user_id: Uuid) -> Result<Option<ContextRecord>, AppError> {
        Ok(self
            .list_for_user(user_id)
            .await?
            .into_iter()
            .find(|r| r.is_active))
    }
}

#[derive(Default)]
pub struct InMemoryContextStore {
    records: RwLock<Vec<ContextRecord>>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContextStore for InMemoryContextStore {
    async fn append(&self, record: NewContextRecord) -> Result<ContextRecord, AppError> {
        let mut records = self.records.write().await;
        if record.is_active {
            for existing in records
                .iter_mut()
                .filter(|r| r.user_id == record.user_id && r.is_active)
            {
                existing.is_active = false;
            }
        }
        let stored = ContextRecord {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            content: record.content,
            is_active: record.is_active,
            created_at: Utc::now(),
        };
        records.push(stored.clone());
        info!(
            "Stored context record {} for user {}",
            stored.id, stored.user_id
        );
        Ok(stored)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ContextRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_active_record_per_user() {
        let store = InMemoryContextStore::new();
        let user = Uuid::new_v4();
        store
            .append(NewContextRecord::new(user, "first", true))
            .await
            .unwrap();
        let second = store
            .append(NewContextRecord::new(user, "second", true))
            .await
            .unwrap();

        let records = store.list_for_user(user).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records.iter().filter(|r| r.is_active).count(), 1);
        assert_eq!(store.active_for_user(user).await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let store = InMemoryContextStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store
            .append(NewContextRecord::new(alice, "alice", true))
            .await
            .unwrap();
        store
            .append(NewContextRecord::new(bob, "bob", true))
            .await
            .unwrap();

        let alice_active = store.active_for_user(alice).await.unwrap().unwrap();
        assert_eq!(alice_active.content, "alice");
        assert!(alice_active.is_active);
        assert_eq!(store.list_for_user(bob).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_inactive_append_keeps_current_active() {
        let store = InMemoryContextStore::new();
        let user = Uuid::new_v4();
        let active = store
            .append(NewContextRecord::new(user, "current", true))
            .await
            .unwrap();
        store
            .append(NewContextRecord::new(user, "archived", false))
            .await
            .unwrap();
        assert_eq!(store.active_for_user(user).await.unwrap(), Some(active));
    }
}
