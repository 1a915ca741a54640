//! The immunization reference table: diseases, dose series, interval rules.
//!
//! Loaded once at process start and never mutated afterwards, so a shared
//! reference is safe across concurrent requests. A default table ships
//! embedded in the binary; deployments can override it with their own TOML
//! via [`ImmunizationReference::from_path`].

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use cradle_core::enums::DoseType;

/// Default table: 12 diseases spanning required and optional vaccines.
const DEFAULT_TABLE: &str = include_str!("../reference/immunization.toml");

/// Errors from loading or validating a reference table.
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// Reading the table file failed.
    #[error("Failed to read reference table: {0}")]
    Io(#[from] std::io::Error),

    /// The table is not valid TOML (or has the wrong shape).
    #[error("Failed to parse reference table: {0}")]
    Parse(#[from] toml::de::Error),

    /// The table parsed but violates a structural constraint.
    #[error("Invalid reference table: {0}")]
    Invalid(String),
}

/// One scheduled dose within a disease's series.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduledDose {
    pub dose: DoseType,
    pub months_after_birth: f64,
}

/// A disease's complete entry: ordered dose series plus interval overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiseaseSchedule {
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    pub schedule: Vec<ScheduledDose>,
    /// Minimum months between two actual administration dates, keyed
    /// `"{from}_to_{to}"`. Absence means no override.
    #[serde(default)]
    pub intervals: BTreeMap<String, f64>,
}

impl DiseaseSchedule {
    /// Position of `dose` within this disease's declared series.
    #[must_use]
    pub fn dose_index(&self, dose: DoseType) -> Option<usize> {
        self.schedule.iter().position(|s| s.dose == dose)
    }

    /// The dose types of the series, in declared order.
    #[must_use]
    pub fn dose_types(&self) -> Vec<DoseType> {
        self.schedule.iter().map(|s| s.dose).collect()
    }

    /// Declared minimum interval (months) between the actual dates of two
    /// doses, or `None` when the table has no override for the pair.
    #[must_use]
    pub fn min_interval(&self, from: DoseType, to: DoseType) -> Option<f64> {
        self.intervals.get(&interval_key(from, to)).copied()
    }
}

/// Format the interval-map key for a dose pair.
#[must_use]
pub fn interval_key(from: DoseType, to: DoseType) -> String {
    format!("{}_to_{}", from.as_str(), to.as_str())
}

/// The full immutable reference table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImmunizationReference {
    #[serde(rename = "disease")]
    diseases: Vec<DiseaseSchedule>,
}

impl ImmunizationReference {
    /// Load the embedded default table.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError` only if the embedded TOML is corrupt, which a
    /// passing test suite rules out.
    pub fn load_default() -> Result<Self, ReferenceError> {
        Self::from_toml_str(DEFAULT_TABLE)
    }

    /// Parse and validate a table from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::Parse` on malformed TOML and
    /// `ReferenceError::Invalid` on structural violations.
    pub fn from_toml_str(raw: &str) -> Result<Self, ReferenceError> {
        let table: Self = toml::from_str(raw)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a table override from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError` if the file cannot be read, parsed, or
    /// validated.
    pub fn from_path(path: &Path) -> Result<Self, ReferenceError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// All diseases, in table order. The generator iterates exactly this.
    #[must_use]
    pub fn diseases(&self) -> &[DiseaseSchedule] {
        &self.diseases
    }

    /// Look up a disease by its exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DiseaseSchedule> {
        self.diseases.iter().find(|d| d.name == name)
    }

    fn validate(&self) -> Result<(), ReferenceError> {
        if self.diseases.is_empty() {
            return Err(ReferenceError::Invalid("no diseases declared".into()));
        }

        let mut names = HashSet::new();
        for disease in &self.diseases {
            if !names.insert(disease.name.as_str()) {
                return Err(ReferenceError::Invalid(format!(
                    "duplicate disease '{}'",
                    disease.name
                )));
            }
            if disease.schedule.is_empty() {
                return Err(ReferenceError::Invalid(format!(
                    "disease '{}' declares no doses",
                    disease.name
                )));
            }

            let mut doses = HashSet::new();
            for scheduled in &disease.schedule {
                if !doses.insert(scheduled.dose) {
                    return Err(ReferenceError::Invalid(format!(
                        "disease '{}' declares dose '{}' twice",
                        disease.name, scheduled.dose
                    )));
                }
                if !scheduled.months_after_birth.is_finite() || scheduled.months_after_birth < 0.0 {
                    return Err(ReferenceError::Invalid(format!(
                        "disease '{}' dose '{}' has offset {}",
                        disease.name, scheduled.dose, scheduled.months_after_birth
                    )));
                }
            }

            for (key, months) in &disease.intervals {
                if !months.is_finite() || *months <= 0.0 {
                    return Err(ReferenceError::Invalid(format!(
                        "disease '{}' interval '{key}' has value {months}",
                        disease.name
                    )));
                }
                let (from, to) = parse_interval_key(key).ok_or_else(|| {
                    ReferenceError::Invalid(format!(
                        "disease '{}' has malformed interval key '{key}'",
                        disease.name
                    ))
                })?;
                if !doses.contains(&from) || !doses.contains(&to) {
                    return Err(ReferenceError::Invalid(format!(
                        "disease '{}' interval '{key}' names a dose outside its series",
                        disease.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Parse a `"{from}_to_{to}"` key back into its dose pair.
fn parse_interval_key(key: &str) -> Option<(DoseType, DoseType)> {
    let (from, to) = key.split_once("_to_")?;
    Some((parse_dose(from)?, parse_dose(to)?))
}

fn parse_dose(s: &str) -> Option<DoseType> {
    serde_json::from_value(serde_json::Value::String(s.to_string())).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_table_loads_and_validates() {
        let reference = ImmunizationReference::load_default().unwrap();
        assert!(reference.diseases().len() >= 10);
        assert!(reference.get("BCG").is_some());
        assert!(reference.get("Hepatitis B").is_some());
        assert!(reference.get("Smallpox").is_none());
    }

    #[test]
    fn hepatitis_b_series_in_declared_order() {
        let reference = ImmunizationReference::load_default().unwrap();
        let hep_b = reference.get("Hepatitis B").unwrap();
        assert_eq!(
            hep_b.dose_types(),
            vec![DoseType::First, DoseType::Second, DoseType::Third]
        );
        assert_eq!(hep_b.dose_index(DoseType::Third), Some(2));
        assert_eq!(hep_b.dose_index(DoseType::Booster), None);
    }

    #[test]
    fn interval_lookup_hits_and_misses() {
        let reference = ImmunizationReference::load_default().unwrap();
        let hep_b = reference.get("Hepatitis B").unwrap();
        assert_eq!(hep_b.min_interval(DoseType::First, DoseType::Second), Some(1.0));
        assert_eq!(hep_b.min_interval(DoseType::Second, DoseType::Third), Some(5.0));

        // Typhoid declares no overrides at all
        let typhoid = reference.get("Typhoid").unwrap();
        assert_eq!(typhoid.min_interval(DoseType::First, DoseType::Booster), None);
    }

    #[test]
    fn optional_flag_carried() {
        let reference = ImmunizationReference::load_default().unwrap();
        assert!(!reference.get("BCG").unwrap().optional);
        assert!(reference.get("Varicella").unwrap().optional);
    }

    #[test]
    fn rejects_empty_table() {
        let err = ImmunizationReference::from_toml_str("").unwrap_err();
        assert!(matches!(err, ReferenceError::Parse(_) | ReferenceError::Invalid(_)));
    }

    #[test]
    fn rejects_duplicate_disease() {
        let raw = r#"
            [[disease]]
            name = "BCG"
            schedule = [{ dose = "first", months_after_birth = 0.0 }]

            [[disease]]
            name = "BCG"
            schedule = [{ dose = "first", months_after_birth = 0.0 }]
        "#;
        let err = ImmunizationReference::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, ReferenceError::Invalid(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn rejects_duplicate_dose_in_series() {
        let raw = r#"
            [[disease]]
            name = "DTP"
            schedule = [
              { dose = "first", months_after_birth = 1.5 },
              { dose = "first", months_after_birth = 2.5 },
            ]
        "#;
        let err = ImmunizationReference::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, ReferenceError::Invalid(msg) if msg.contains("twice")));
    }

    #[test]
    fn rejects_negative_offset() {
        let raw = r#"
            [[disease]]
            name = "BCG"
            schedule = [{ dose = "first", months_after_birth = -1.0 }]
        "#;
        assert!(ImmunizationReference::from_toml_str(raw).is_err());
    }

    #[test]
    fn rejects_interval_for_unknown_dose() {
        let raw = r#"
            [[disease]]
            name = "BCG"
            schedule = [{ dose = "first", months_after_birth = 0.0 }]
            [disease.intervals]
            first_to_second = 1.0
        "#;
        let err = ImmunizationReference::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, ReferenceError::Invalid(msg) if msg.contains("outside its series")));
    }

    #[test]
    fn rejects_malformed_interval_key() {
        let raw = r#"
            [[disease]]
            name = "BCG"
            schedule = [{ dose = "first", months_after_birth = 0.0 }]
            [disease.intervals]
            first_second = 1.0
        "#;
        let err = ImmunizationReference::from_toml_str(raw).unwrap_err();
        assert!(matches!(err, ReferenceError::Invalid(msg) if msg.contains("malformed")));
    }

    #[test]
    fn loads_override_from_path() {
        let raw = r#"
            [[disease]]
            name = "Measles"
            schedule = [{ dose = "first", months_after_birth = 9.0 }]
        "#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.toml");
        std::fs::write(&path, raw).unwrap();

        let reference = ImmunizationReference::from_path(&path).unwrap();
        assert_eq!(reference.diseases().len(), 1);
        assert!(reference.get("Measles").is_some());
    }

    #[test]
    fn interval_key_formatting() {
        assert_eq!(interval_key(DoseType::First, DoseType::Second), "first_to_second");
        assert_eq!(interval_key(DoseType::Second, DoseType::Annual), "second_to_annual");
    }
}
