//! The schedule generator: (date of birth, administered doses) → chart.
//!
//! Pure and deterministic. Each invocation walks the whole reference table
//! and emits exactly one [`ChartEntry`] per declared (disease, dose) pair,
//! so callers can regenerate the chart as often as they like — the
//! reconciler calls it twice per transaction with different dose inputs.

use chrono::NaiveDate;

use cradle_core::entities::{AdministeredDose, ChartEntry};
use cradle_core::enums::{DoseStatus, DoseType};

use crate::dates::add_months;
use crate::reference::ImmunizationReference;

/// Compute the complete immunization chart for one child.
///
/// Per disease, in table order: completed doses carry their administration
/// date as both expected and actual; pending doses get an expected date from
/// the interval rule off the last completed dose when the table declares one,
/// and the birth-relative offset otherwise. The birth-relative fallback
/// applies even after a prior dose has slipped.
///
/// The returned chart is sorted ascending by expected date (stable, so table
/// order breaks ties).
#[must_use]
pub fn generate_chart(
    reference: &ImmunizationReference,
    date_of_birth: NaiveDate,
    actual_doses: &[AdministeredDose],
) -> Vec<ChartEntry> {
    let mut chart = Vec::new();

    for disease in reference.diseases() {
        let mut administered: Vec<&AdministeredDose> = actual_doses
            .iter()
            .filter(|d| d.disease == disease.name)
            .collect();
        administered.sort_by_key(|d| d.actual_date);

        let mut last_actual: Option<(NaiveDate, DoseType)> = None;

        for scheduled in &disease.schedule {
            let actual = administered.iter().find(|d| d.dose_type == scheduled.dose);

            match actual {
                Some(dose) => {
                    chart.push(ChartEntry {
                        disease: disease.name.clone(),
                        dose_type: scheduled.dose,
                        expected_date: dose.actual_date,
                        actual_date: Some(dose.actual_date),
                        is_optional: disease.optional,
                        status: DoseStatus::Completed,
                    });
                    last_actual = Some((dose.actual_date, scheduled.dose));
                }
                None => {
                    let expected = match last_actual {
                        Some((last_date, last_dose)) => {
                            disease.min_interval(last_dose, scheduled.dose).map_or_else(
                                || add_months(date_of_birth, scheduled.months_after_birth),
                                |months| add_months(last_date, months),
                            )
                        }
                        None => add_months(date_of_birth, scheduled.months_after_birth),
                    };
                    chart.push(ChartEntry {
                        disease: disease.name.clone(),
                        dose_type: scheduled.dose,
                        expected_date: expected,
                        actual_date: None,
                        is_optional: disease.optional,
                        status: DoseStatus::Pending,
                    });
                    // only completions advance the trackers
                }
            }
        }
    }

    chart.sort_by_key(|entry| entry.expected_date);
    chart
}

/// Pending chart entries whose expected date is strictly after `today`.
#[must_use]
pub fn next_due(chart: &[ChartEntry], today: NaiveDate) -> Vec<ChartEntry> {
    chart
        .iter()
        .filter(|entry| entry.status == DoseStatus::Pending && entry.expected_date > today)
        .cloned()
        .collect()
}
