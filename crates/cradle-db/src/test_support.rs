//! Shared test utilities for cradle-db tests.

pub(crate) mod helpers {
    use chrono::NaiveDate;

    use cradle_config::ReminderConfig;
    use cradle_core::entities::{Account, Child};
    use cradle_schedule::ImmunizationReference;

    use crate::CradleDb;
    use crate::service::CradleService;

    /// Create an in-memory `CradleService` with the default reference table.
    pub async fn test_service() -> CradleService {
        let db = CradleDb::open_local(":memory:").await.unwrap();
        CradleService::from_db(
            db,
            ImmunizationReference::load_default().unwrap(),
            ReminderConfig::default(),
        )
    }

    /// Seed one account + child and return both (convenience for record tests).
    pub async fn seed_child(
        svc: &CradleService,
        user_id: &str,
        date_of_birth: NaiveDate,
    ) -> (Account, Child) {
        let account = svc.create_account(user_id, None).await.unwrap();
        let child = svc
            .create_child(&account.id, "Asha", date_of_birth)
            .await
            .unwrap();
        (account, child)
    }
}
