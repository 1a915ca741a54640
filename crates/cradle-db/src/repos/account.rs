//! Account and child repository — the ownership collaborators of the
//! reconciler. Accounts belong to authenticated users; children belong to
//! accounts.

use chrono::Utc;

use cradle_core::entities::{Account, Child};
use cradle_core::ids::{PREFIX_ACCOUNT, PREFIX_CHILD};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_date, parse_datetime};
use crate::service::CradleService;

const ACCOUNT_COLS: &str = "id, user_id, name, created_at";
const CHILD_COLS: &str = "id, account_id, name, date_of_birth, created_at";

fn row_to_account(row: &libsql::Row) -> Result<Account, DatabaseError> {
    Ok(Account {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

fn row_to_child(row: &libsql::Row) -> Result<Child, DatabaseError> {
    Ok(Child {
        id: row.get(0)?,
        account_id: row.get(1)?,
        name: row.get(2)?,
        date_of_birth: parse_date(&row.get::<String>(3)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl CradleService {
    pub async fn create_account(
        &self,
        user_id: &str,
        name: Option<&str>,
    ) -> Result<Account, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ACCOUNT).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO accounts ({ACCOUNT_COLS}) VALUES (?1, ?2, ?3, ?4)"),
                libsql::params![id.as_str(), user_id, name, now.to_rfc3339()],
            )
            .await?;

        Ok(Account {
            id,
            user_id: user_id.to_string(),
            name: name.map(String::from),
            created_at: now,
        })
    }

    pub async fn get_account(&self, id: &str) -> Result<Account, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {ACCOUNT_COLS} FROM accounts WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_account(&row)
    }

    pub async fn create_child(
        &self,
        account_id: &str,
        name: &str,
        date_of_birth: chrono::NaiveDate,
    ) -> Result<Child, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_CHILD).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO children ({CHILD_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
                libsql::params![
                    id.as_str(),
                    account_id,
                    name,
                    date_of_birth.to_string(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Child {
            id,
            account_id: account_id.to_string(),
            name: name.to_string(),
            date_of_birth,
            created_at: now,
        })
    }

    pub async fn get_child(&self, id: &str) -> Result<Child, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {CHILD_COLS} FROM children WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_child(&row)
    }

    /// Resolve the account owning a child, together with the child itself.
    ///
    /// Returns `None` when no such child exists — callers decide whether that
    /// is a not-found error.
    pub async fn find_account_containing_child(
        &self,
        child_id: &str,
    ) -> Result<Option<(Account, Child)>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT a.id, a.user_id, a.name, a.created_at, \
                 c.id, c.account_id, c.name, c.date_of_birth, c.created_at \
                 FROM children c JOIN accounts a ON a.id = c.account_id \
                 WHERE c.id = ?1",
                [child_id],
            )
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        let account = Account {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: get_opt_string(&row, 2)?,
            created_at: parse_datetime(&row.get::<String>(3)?)?,
        };
        let child = Child {
            id: row.get(4)?,
            account_id: row.get(5)?,
            name: row.get(6)?,
            date_of_birth: parse_date(&row.get::<String>(7)?)?,
            created_at: parse_datetime(&row.get::<String>(8)?)?,
        };
        Ok(Some((account, child)))
    }

    pub async fn children_of_account(&self, account_id: &str) -> Result<Vec<Child>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {CHILD_COLS} FROM children WHERE account_id = ?1 ORDER BY created_at"
                ),
                [account_id],
            )
            .await?;

        let mut children = Vec::new();
        while let Some(row) = rows.next().await? {
            children.push(row_to_child(&row)?);
        }
        Ok(children)
    }
}
