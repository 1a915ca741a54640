//! Response types returned by the vaccination service operations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{ChartEntry, VaccinationRecord};

/// Response from `manage_vaccination`: the upserted record, the refreshed
/// chart regenerated from all persisted actual dates, and the pending entries
/// still ahead of today.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ManageVaccinationResponse {
    pub record: VaccinationRecord,
    pub chart: Vec<ChartEntry>,
    pub next_due: Vec<ChartEntry>,
}

/// Response from the read-only `get_chart`: the persisted records alongside
/// the complete schedule computed from their actual dates.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChartResponse {
    pub records: Vec<VaccinationRecord>,
    pub schedule: Vec<ChartEntry>,
}
