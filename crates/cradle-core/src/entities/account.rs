use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A family account owning zero or more child profiles.
///
/// `user_id` identifies the authenticated owner; authorization middleware is
/// outside this core, so the reconciler only compares it against the
/// requesting user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub user_id: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}
