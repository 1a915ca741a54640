//! The vaccination record reconciler.
//!
//! Accepts a single dose-administration event, validates it against the
//! medical ordering and minimum-interval rules (with the untouched reference
//! schedule as context), performs the one atomic upsert, and returns the
//! refreshed chart. Validation runs entirely before the write, so a rejected
//! submission never leaves partial state.

use std::collections::HashSet;

use chrono::Utc;

use cradle_core::entities::{AdministeredDose, DoseEvent, VaccinationRecord};
use cradle_core::enums::DoseType;
use cradle_core::responses::{ChartResponse, ManageVaccinationResponse};
use cradle_schedule::dates::add_months;
use cradle_schedule::{generate_chart, next_due};

use crate::error::VaccinationError;
use crate::service::CradleService;

/// Minimum months between consecutive doses when the reference table
/// declares no explicit interval for the pair.
const DEFAULT_MIN_INTERVAL_MONTHS: f64 = 1.0;

impl CradleService {
    /// Record (or re-record) one dose for a child and return the refreshed
    /// chart.
    ///
    /// `actual_date = None` creates or keeps the record as pending. The
    /// validation sequence fails fast — first failing check wins — and the
    /// single upsert only runs once every check has passed. Re-submitting an
    /// identical event updates the same record to the same values.
    ///
    /// # Errors
    ///
    /// Returns a [`VaccinationError`] variant for each rejected submission:
    /// empty fields, foreign children, doses outside the vaccine's series,
    /// incomplete predecessor doses, or administration dates inside the
    /// minimum interval. `Store` wraps persistence failures.
    pub async fn manage_vaccination(
        &self,
        event: &DoseEvent,
        requesting_user_id: &str,
    ) -> Result<ManageVaccinationResponse, VaccinationError> {
        if event.child_id.trim().is_empty() {
            return Err(VaccinationError::MissingField("child_id"));
        }
        if event.disease.trim().is_empty() {
            return Err(VaccinationError::MissingField("disease"));
        }

        let (account, child) = self
            .find_account_containing_child(&event.child_id)
            .await?
            .ok_or_else(|| VaccinationError::ChildNotFound(event.child_id.clone()))?;
        if account.user_id != requesting_user_id {
            tracing::warn!(
                child = %event.child_id,
                user = %requesting_user_id,
                "vaccination submission for a child outside the user's account"
            );
            return Err(VaccinationError::Unauthorized {
                child_id: event.child_id.clone(),
                user_id: requesting_user_id.to_string(),
            });
        }

        // The untouched reference schedule anchors both interval validation
        // and the expected date a newly created record carries.
        let original = generate_chart(self.reference(), child.date_of_birth, &[]);

        let Some(disease) = self.reference().get(&event.disease) else {
            return Err(VaccinationError::InvalidDose {
                disease: event.disease.clone(),
                dose_type: event.dose_type,
                accepted: Vec::new(),
            });
        };
        let Some(dose_index) = disease.dose_index(event.dose_type) else {
            return Err(VaccinationError::InvalidDose {
                disease: disease.name.clone(),
                dose_type: event.dose_type,
                accepted: disease.dose_types(),
            });
        };
        let Some(planned) = original
            .iter()
            .find(|e| e.disease == disease.name && e.dose_type == event.dose_type)
        else {
            // unreachable: the chart carries every declared (disease, dose)
            return Err(VaccinationError::InvalidDose {
                disease: disease.name.clone(),
                dose_type: event.dose_type,
                accepted: disease.dose_types(),
            });
        };

        if dose_index > 0 {
            let previous: Vec<DoseType> = disease.schedule[..dose_index]
                .iter()
                .map(|s| s.dose)
                .collect();
            let records = self
                .find_by_child_disease_doses(&event.child_id, &disease.name, &previous)
                .await?;

            let completed: HashSet<DoseType> = records
                .iter()
                .filter(|r| r.actual_date.is_some())
                .map(|r| r.dose_type)
                .collect();
            let missing: Vec<DoseType> = previous
                .iter()
                .copied()
                .filter(|d| !completed.contains(d))
                .collect();
            if !missing.is_empty() {
                return Err(VaccinationError::OrderingViolation {
                    disease: disease.name.clone(),
                    dose_type: event.dose_type,
                    missing,
                });
            }

            if let Some(actual_date) = event.actual_date {
                let prev_dose = previous[previous.len() - 1];
                let prev_actual = records
                    .iter()
                    .find(|r| r.dose_type == prev_dose)
                    .and_then(|r| r.actual_date);
                if let Some(prev_date) = prev_actual {
                    let months = disease
                        .min_interval(prev_dose, event.dose_type)
                        .unwrap_or(DEFAULT_MIN_INTERVAL_MONTHS);
                    let earliest_allowed = add_months(prev_date, months);
                    if actual_date < earliest_allowed {
                        tracing::warn!(
                            child = %event.child_id,
                            disease = %disease.name,
                            dose = %event.dose_type,
                            %earliest_allowed,
                            "dose submitted inside the minimum interval"
                        );
                        return Err(VaccinationError::IntervalViolation {
                            disease: disease.name.clone(),
                            dose_type: event.dose_type,
                            earliest_allowed,
                        });
                    }
                }
            }
        }

        let record = self
            .upsert_record(
                &event.child_id,
                &disease.name,
                event.dose_type,
                planned.expected_date,
                event.actual_date,
                requesting_user_id,
            )
            .await?;
        tracing::info!(
            child = %event.child_id,
            disease = %disease.name,
            dose = %event.dose_type,
            status = %record.status,
            "vaccination record upserted"
        );

        let all = self.find_all_by_child(&event.child_id).await?;
        let chart = generate_chart(
            self.reference(),
            child.date_of_birth,
            &administered_facts(&all),
        );
        let today = Utc::now().date_naive();
        let due = next_due(&chart, today);

        Ok(ManageVaccinationResponse {
            record,
            chart,
            next_due: due,
        })
    }

    /// Read-only view: the child's persisted records plus the complete
    /// schedule regenerated from their actual dates. Mutates nothing.
    ///
    /// # Errors
    ///
    /// Returns `ChildNotFound` for unknown children and `Store` for
    /// persistence failures.
    pub async fn get_chart(&self, child_id: &str) -> Result<ChartResponse, VaccinationError> {
        let (_, child) = self
            .find_account_containing_child(child_id)
            .await?
            .ok_or_else(|| VaccinationError::ChildNotFound(child_id.to_string()))?;

        let records = self.find_all_by_child(child_id).await?;
        let schedule = generate_chart(
            self.reference(),
            child.date_of_birth,
            &administered_facts(&records),
        );

        Ok(ChartResponse { records, schedule })
    }
}

/// Project persisted records with a non-null actual date down to the
/// generator's input facts.
fn administered_facts(records: &[VaccinationRecord]) -> Vec<AdministeredDose> {
    records
        .iter()
        .filter_map(|r| {
            r.actual_date.map(|actual_date| AdministeredDose {
                disease: r.disease.clone(),
                dose_type: r.dose_type,
                actual_date,
            })
        })
        .collect()
}
