use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated summary of the conversation. Superseded, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    pub id: Uuid,
    pub content: String,
    pub last_updated: DateTime<Utc>,
}

/// Shape handed to the external context store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContextRecord {
    pub user_id: Uuid,
    pub content: String,
    pub is_active: bool,
}

impl NewContextRecord {
    pub fn new(user_id: Uuid, content: impl Into<String>, is_active: bool) -> Self {
        Self {
            user_id,
            content: content.into(),
            is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
