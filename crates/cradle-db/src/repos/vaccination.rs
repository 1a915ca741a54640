//! Vaccination record repository — the persisted side of the reconciler.
//!
//! One row per (child, disease, dose type). Writes go through a single
//! atomic `INSERT .. ON CONFLICT` upsert so the status/actual-date pairing
//! can never be torn by concurrent submissions for the same tuple.

use chrono::{NaiveDate, Utc};

use cradle_core::entities::VaccinationRecord;
use cradle_core::enums::{DoseStatus, DoseType};
use cradle_core::ids::PREFIX_RECORD;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, get_u32, parse_date, parse_datetime, parse_enum, parse_optional_date};
use crate::service::CradleService;

const SELECT_COLS: &str = "id, child_id, disease, dose_type, expected_date, actual_date, status, \
     created_by, email_reminder_enabled, reminder_interval_days, last_reminder_date, \
     created_at, updated_at";

fn row_to_record(row: &libsql::Row) -> Result<VaccinationRecord, DatabaseError> {
    Ok(VaccinationRecord {
        id: row.get(0)?,
        child_id: row.get(1)?,
        disease: row.get(2)?,
        dose_type: parse_enum(&row.get::<String>(3)?)?,
        expected_date: parse_date(&row.get::<String>(4)?)?,
        actual_date: parse_optional_date(get_opt_string(row, 5)?.as_deref())?,
        status: parse_enum(&row.get::<String>(6)?)?,
        created_by: row.get(7)?,
        email_reminder_enabled: row.get::<i64>(8)? != 0,
        reminder_interval_days: get_u32(row, 9)?,
        last_reminder_date: parse_optional_date(get_opt_string(row, 10)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(11)?)?,
        updated_at: parse_datetime(&row.get::<String>(12)?)?,
    })
}

impl CradleService {
    /// Atomically create-or-update the record for one dose tuple.
    ///
    /// On first insert the record takes `expected_date`, the creator, and the
    /// service's reminder defaults. On conflict only `actual_date`, `status`,
    /// and `updated_at` change — the original expected date, creator, and
    /// reminder settings are preserved. `status` is derived from
    /// `actual_date` in both paths, keeping the pairing consistent.
    pub async fn upsert_record(
        &self,
        child_id: &str,
        disease: &str,
        dose_type: DoseType,
        expected_date: NaiveDate,
        actual_date: Option<NaiveDate>,
        created_by: &str,
    ) -> Result<VaccinationRecord, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_RECORD).await?;
        let status = if actual_date.is_some() {
            DoseStatus::Completed
        } else {
            DoseStatus::Pending
        };
        let defaults = self.reminder_defaults();

        self.db()
            .conn()
            .execute(
                "INSERT INTO vaccination_records \
                 (id, child_id, disease, dose_type, expected_date, actual_date, status, \
                  created_by, email_reminder_enabled, reminder_interval_days, last_reminder_date, \
                  created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, NULL, ?11, ?11) \
                 ON CONFLICT (child_id, disease, dose_type) DO UPDATE SET \
                   actual_date = excluded.actual_date, \
                   status = excluded.status, \
                   updated_at = excluded.updated_at",
                libsql::params![
                    id.as_str(),
                    child_id,
                    disease,
                    dose_type.as_str(),
                    expected_date.to_string(),
                    actual_date.map(|d| d.to_string()),
                    status.as_str(),
                    created_by,
                    i64::from(defaults.email_enabled),
                    i64::from(defaults.interval_days),
                    now.to_rfc3339()
                ],
            )
            .await?;

        self.find_record(child_id, disease, dose_type)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    pub async fn find_record(
        &self,
        child_id: &str,
        disease: &str,
        dose_type: DoseType,
    ) -> Result<Option<VaccinationRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM vaccination_records \
                     WHERE child_id = ?1 AND disease = ?2 AND dose_type = ?3"
                ),
                libsql::params![child_id, disease, dose_type.as_str()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_child_and_disease(
        &self,
        child_id: &str,
        disease: &str,
    ) -> Result<Vec<VaccinationRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM vaccination_records \
                     WHERE child_id = ?1 AND disease = ?2 ORDER BY expected_date"
                ),
                libsql::params![child_id, disease],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_record(&row)?);
        }
        Ok(records)
    }

    /// Records for a child/disease restricted to the given dose types.
    pub async fn find_by_child_disease_doses(
        &self,
        child_id: &str,
        disease: &str,
        dose_types: &[DoseType],
    ) -> Result<Vec<VaccinationRecord>, DatabaseError> {
        if dose_types.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> =
            (0..dose_types.len()).map(|i| format!("?{}", i + 3)).collect();
        let sql = format!(
            "SELECT {SELECT_COLS} FROM vaccination_records \
             WHERE child_id = ?1 AND disease = ?2 AND dose_type IN ({}) \
             ORDER BY expected_date",
            placeholders.join(", ")
        );

        let mut params: Vec<libsql::Value> =
            vec![child_id.to_string().into(), disease.to_string().into()];
        params.extend(dose_types.iter().map(|d| d.as_str().to_string().into()));

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_record(&row)?);
        }
        Ok(records)
    }

    pub async fn find_all_by_child(
        &self,
        child_id: &str,
    ) -> Result<Vec<VaccinationRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM vaccination_records \
                     WHERE child_id = ?1 ORDER BY expected_date"
                ),
                [child_id],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_record(&row)?);
        }
        Ok(records)
    }

    /// Toggle email reminders / set the reminder cadence for one record.
    pub async fn update_reminder_prefs(
        &self,
        child_id: &str,
        disease: &str,
        dose_type: DoseType,
        enabled: bool,
        interval_days: u32,
    ) -> Result<VaccinationRecord, DatabaseError> {
        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE vaccination_records \
                 SET email_reminder_enabled = ?1, reminder_interval_days = ?2, updated_at = ?3 \
                 WHERE child_id = ?4 AND disease = ?5 AND dose_type = ?6",
                libsql::params![
                    i64::from(enabled),
                    i64::from(interval_days),
                    now.to_rfc3339(),
                    child_id,
                    disease,
                    dose_type.as_str()
                ],
            )
            .await?;

        self.find_record(child_id, disease, dose_type)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// Stamp the date a reminder email went out for one record.
    pub async fn mark_reminder_sent(
        &self,
        child_id: &str,
        disease: &str,
        dose_type: DoseType,
        sent_on: NaiveDate,
    ) -> Result<VaccinationRecord, DatabaseError> {
        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE vaccination_records SET last_reminder_date = ?1, updated_at = ?2 \
                 WHERE child_id = ?3 AND disease = ?4 AND dose_type = ?5",
                libsql::params![
                    sent_on.to_string(),
                    now.to_rfc3339(),
                    child_id,
                    disease,
                    dose_type.as_str()
                ],
            )
            .await?;

        self.find_record(child_id, disease, dose_type)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// Pending records whose reminder is due: expected date has arrived,
    /// reminders enabled, and no reminder within the record's interval.
    /// The reminder job consumes this read-only.
    pub async fn records_due_for_reminder(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<VaccinationRecord>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM vaccination_records \
                     WHERE status = 'pending' \
                       AND email_reminder_enabled = 1 \
                       AND expected_date <= ?1 \
                       AND (last_reminder_date IS NULL \
                            OR date(last_reminder_date, '+' || reminder_interval_days || ' day') <= ?1) \
                     ORDER BY expected_date"
                ),
                [today.to_string()],
            )
            .await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_record(&row)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{seed_child, test_service};
    use pretty_assertions::assert_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[tokio::test]
    async fn upsert_creates_with_defaults() {
        let svc = test_service().await;
        let (_, child) = seed_child(&svc, "user-1", d(2024, 1, 1)).await;

        let record = svc
            .upsert_record(&child.id, "BCG", DoseType::First, d(2024, 1, 1), None, "user-1")
            .await
            .unwrap();

        assert!(record.id.starts_with("vac-"));
        assert_eq!(record.status, DoseStatus::Pending);
        assert_eq!(record.actual_date, None);
        assert_eq!(record.expected_date, d(2024, 1, 1));
        assert_eq!(record.created_by, "user-1");
        assert!(record.email_reminder_enabled);
        assert_eq!(record.reminder_interval_days, 7);
        assert_eq!(record.last_reminder_date, None);
    }

    #[tokio::test]
    async fn upsert_conflict_updates_in_place() {
        let svc = test_service().await;
        let (_, child) = seed_child(&svc, "user-1", d(2024, 1, 1)).await;

        let created = svc
            .upsert_record(&child.id, "BCG", DoseType::First, d(2024, 1, 1), None, "user-1")
            .await
            .unwrap();

        let completed = svc
            .upsert_record(
                &child.id,
                "BCG",
                DoseType::First,
                d(2024, 1, 1),
                Some(d(2024, 1, 5)),
                "user-1",
            )
            .await
            .unwrap();

        // same row: id, expected date, and creation time survive the conflict
        assert_eq!(completed.id, created.id);
        assert_eq!(completed.expected_date, created.expected_date);
        assert_eq!(completed.created_at, created.created_at);
        assert_eq!(completed.status, DoseStatus::Completed);
        assert_eq!(completed.actual_date, Some(d(2024, 1, 5)));

        let all = svc.find_all_by_child(&child.id).await.unwrap();
        assert_eq!(all.len(), 1, "conflict must not create a second row");
    }

    #[tokio::test]
    async fn repeated_identical_upsert_is_idempotent() {
        let svc = test_service().await;
        let (_, child) = seed_child(&svc, "user-1", d(2024, 1, 1)).await;

        let first = svc
            .upsert_record(
                &child.id,
                "BCG",
                DoseType::First,
                d(2024, 1, 1),
                Some(d(2024, 1, 5)),
                "user-1",
            )
            .await
            .unwrap();
        let second = svc
            .upsert_record(
                &child.id,
                "BCG",
                DoseType::First,
                d(2024, 1, 1),
                Some(d(2024, 1, 5)),
                "user-1",
            )
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.actual_date, first.actual_date);
        assert_eq!(second.status, first.status);

        let all = svc.find_all_by_child(&child.id).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn queries_filter_by_disease_and_dose() {
        let svc = test_service().await;
        let (_, child) = seed_child(&svc, "user-1", d(2024, 1, 1)).await;

        svc.upsert_record(&child.id, "Hepatitis B", DoseType::First, d(2024, 1, 1), Some(d(2024, 1, 2)), "user-1")
            .await
            .unwrap();
        svc.upsert_record(&child.id, "Hepatitis B", DoseType::Second, d(2024, 2, 1), None, "user-1")
            .await
            .unwrap();
        svc.upsert_record(&child.id, "BCG", DoseType::First, d(2024, 1, 1), None, "user-1")
            .await
            .unwrap();

        let hep_b = svc
            .find_by_child_and_disease(&child.id, "Hepatitis B")
            .await
            .unwrap();
        assert_eq!(hep_b.len(), 2);

        let firsts = svc
            .find_by_child_disease_doses(&child.id, "Hepatitis B", &[DoseType::First])
            .await
            .unwrap();
        assert_eq!(firsts.len(), 1);
        assert_eq!(firsts[0].dose_type, DoseType::First);

        let none = svc
            .find_by_child_disease_doses(&child.id, "Hepatitis B", &[])
            .await
            .unwrap();
        assert!(none.is_empty());

        let all = svc.find_all_by_child(&child.id).await.unwrap();
        assert_eq!(all.len(), 3);

        let found = svc
            .find_record(&child.id, "BCG", DoseType::First)
            .await
            .unwrap();
        assert!(found.is_some());
        let missing = svc
            .find_record(&child.id, "BCG", DoseType::Second)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn reminder_prefs_roundtrip() {
        let svc = test_service().await;
        let (_, child) = seed_child(&svc, "user-1", d(2024, 1, 1)).await;

        svc.upsert_record(&child.id, "BCG", DoseType::First, d(2024, 1, 1), None, "user-1")
            .await
            .unwrap();

        let updated = svc
            .update_reminder_prefs(&child.id, "BCG", DoseType::First, false, 14)
            .await
            .unwrap();
        assert!(!updated.email_reminder_enabled);
        assert_eq!(updated.reminder_interval_days, 14);

        let stamped = svc
            .mark_reminder_sent(&child.id, "BCG", DoseType::First, d(2024, 1, 10))
            .await
            .unwrap();
        assert_eq!(stamped.last_reminder_date, Some(d(2024, 1, 10)));
    }

    #[tokio::test]
    async fn reminder_prefs_for_missing_record_is_no_result() {
        let svc = test_service().await;
        let (_, child) = seed_child(&svc, "user-1", d(2024, 1, 1)).await;

        let result = svc
            .update_reminder_prefs(&child.id, "BCG", DoseType::First, false, 14)
            .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
    }

    #[tokio::test]
    async fn due_for_reminder_respects_state_and_interval() {
        let svc = test_service().await;
        let (_, child) = seed_child(&svc, "user-1", d(2024, 1, 1)).await;

        // due: pending, expected in the past, never reminded
        svc.upsert_record(&child.id, "BCG", DoseType::First, d(2024, 1, 1), None, "user-1")
            .await
            .unwrap();
        // not due: completed
        svc.upsert_record(&child.id, "Hepatitis B", DoseType::First, d(2024, 1, 1), Some(d(2024, 1, 2)), "user-1")
            .await
            .unwrap();
        // not due: expected in the future
        svc.upsert_record(&child.id, "MMR", DoseType::First, d(2024, 10, 1), None, "user-1")
            .await
            .unwrap();
        // not due: reminders disabled
        svc.upsert_record(&child.id, "Polio", DoseType::First, d(2024, 1, 1), None, "user-1")
            .await
            .unwrap();
        svc.update_reminder_prefs(&child.id, "Polio", DoseType::First, false, 7)
            .await
            .unwrap();
        // not due: reminded 3 days ago with a 7-day interval
        svc.upsert_record(&child.id, "DTP", DoseType::First, d(2024, 1, 1), None, "user-1")
            .await
            .unwrap();
        svc.mark_reminder_sent(&child.id, "DTP", DoseType::First, d(2024, 2, 7))
            .await
            .unwrap();

        let due = svc.records_due_for_reminder(d(2024, 2, 10)).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].disease, "BCG");

        // once the interval elapses, the reminded record becomes due again
        let due_later = svc.records_due_for_reminder(d(2024, 2, 14)).await.unwrap();
        let diseases: Vec<&str> = due_later.iter().map(|r| r.disease.as_str()).collect();
        assert!(diseases.contains(&"DTP"));
    }
}
