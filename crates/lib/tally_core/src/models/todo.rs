//! Todo domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A todo item owned by a single user.
///
/// `user_id` is set once at creation from the resolved identity and is
/// never taken from caller-supplied data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub content: String,
    pub completed: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}
