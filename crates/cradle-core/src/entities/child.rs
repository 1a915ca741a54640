use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A child profile within an account.
///
/// `date_of_birth` anchors every birth-relative expected date the schedule
/// generator computes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Child {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub created_at: DateTime<Utc>,
}
