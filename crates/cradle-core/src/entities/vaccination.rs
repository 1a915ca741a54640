use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{DoseStatus, DoseType};

/// One persisted dose record, unique per (child, disease, dose type).
///
/// Created on the first dose event for the tuple; later events for the same
/// tuple mutate `actual_date`/`status`. Records are never deleted by this
/// core. The reminder fields are bookkeeping for the reminder job, which only
/// reads them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VaccinationRecord {
    pub id: String,
    pub child_id: String,
    pub disease: String,
    pub dose_type: DoseType,
    pub expected_date: NaiveDate,
    pub actual_date: Option<NaiveDate>,
    pub status: DoseStatus,
    pub created_by: String,
    pub email_reminder_enabled: bool,
    pub reminder_interval_days: u32,
    pub last_reminder_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single dose-administration event submitted to the reconciler.
///
/// `actual_date = None` means "record the dose as still pending" — the record
/// is created (or kept) without marking it completed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DoseEvent {
    pub child_id: String,
    pub disease: String,
    pub dose_type: DoseType,
    pub actual_date: Option<NaiveDate>,
}
