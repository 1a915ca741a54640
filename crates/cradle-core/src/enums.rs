//! Dose and status enums for the immunization schedule.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! The ordinal position of a dose within a disease's series comes from the
//! reference table, never from enum ordering.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// DoseType
// ---------------------------------------------------------------------------

/// Position of a dose within a disease's immunization series.
///
/// The reference table declares which dose types a disease actually uses and
/// in what order; nothing here implies every disease has all six.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DoseType {
    First,
    Second,
    Third,
    Fourth,
    Booster,
    Annual,
}

impl DoseType {
    /// Return the string representation used in SQL storage and interval keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Booster => "booster",
            Self::Annual => "annual",
        }
    }
}

impl fmt::Display for DoseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DoseStatus
// ---------------------------------------------------------------------------

/// Completion state of a scheduled or persisted dose.
///
/// A dose is `Completed` exactly when an actual administration date is on
/// file; everything else is `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DoseStatus {
    Pending,
    Completed,
}

impl DoseStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dose_type_serde_roundtrip() {
        for dose in [
            DoseType::First,
            DoseType::Second,
            DoseType::Third,
            DoseType::Fourth,
            DoseType::Booster,
            DoseType::Annual,
        ] {
            let json = serde_json::to_string(&dose).unwrap();
            assert_eq!(json, format!("\"{}\"", dose.as_str()));
            let back: DoseType = serde_json::from_str(&json).unwrap();
            assert_eq!(back, dose);
        }
    }

    #[test]
    fn status_follows_actual_date_convention() {
        assert_eq!(DoseStatus::Pending.as_str(), "pending");
        assert_eq!(DoseStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn invalid_dose_type_rejected() {
        let result: Result<DoseType, _> = serde_json::from_str("\"fifth\"");
        assert!(result.is_err());
    }
}
