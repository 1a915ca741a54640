use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{DoseStatus, DoseType};

/// One row of the computed immunization chart.
///
/// Ephemeral: produced fresh on every generator invocation, never persisted.
/// For a completed dose `expected_date == actual_date`; for a pending dose
/// `actual_date` is `None` and `expected_date` is the computed due date.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChartEntry {
    pub disease: String,
    pub dose_type: DoseType,
    pub expected_date: NaiveDate,
    pub actual_date: Option<NaiveDate>,
    pub is_optional: bool,
    pub status: DoseStatus,
}

/// An administered-dose fact fed into the schedule generator.
///
/// The reconciler projects persisted records with a non-null actual date down
/// to this shape before regenerating the chart.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AdministeredDose {
    pub disease: String,
    pub dose_type: DoseType,
    pub actual_date: NaiveDate,
}
