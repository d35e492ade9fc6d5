//! Postgres-backed contact store.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use switchboard_contacts::{Contact, ContactStore, ContactUpdate, StoreError};

/// Row type for contact queries.
#[derive(FromRow)]
struct ContactRow {
    phone: String,
    name: String,
    mail: String,
    company_name: String,
    meeting_ts: String,
}

impl ContactRow {
    fn into_contact(self) -> Contact {
        Contact {
            phone: self.phone,
            name: self.name,
            mail: self.mail,
            company_name: self.company_name,
            meeting_ts: self.meeting_ts,
        }
    }
}

fn store_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable {
                reason: e.to_string(),
            }
        }
        other => StoreError::QueryFailed {
            reason: other.to_string(),
        },
    }
}

/// Contact store over a Postgres pool.
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    /// Creates a new store.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn get_by_phone(&self, phone: &str) -> Result<Option<Contact>, StoreError> {
        let row: Option<ContactRow> = sqlx::query_as(
            r#"
            SELECT phone, name, mail, company_name, meeting_ts
            FROM contacts
            WHERE phone = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(ContactRow::into_contact))
    }

    async fn insert_if_absent(&self, contact: &Contact) -> Result<bool, StoreError> {
        // ON CONFLICT DO NOTHING makes the check and insert one atomic
        // statement, so two racing creates yield exactly one row.
        let result = sqlx::query(
            r#"
            INSERT INTO contacts (phone, name, mail, company_name, meeting_ts)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (phone) DO NOTHING
            "#,
        )
        .bind(&contact.phone)
        .bind(&contact.name)
        .bind(&contact.mail)
        .bind(&contact.company_name)
        .bind(&contact.meeting_ts)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn update_fields(
        &self,
        phone: &str,
        update: &ContactUpdate,
    ) -> Result<Option<Contact>, StoreError> {
        let row: Option<ContactRow> = sqlx::query_as(
            r#"
            UPDATE contacts
            SET name = COALESCE($2, name),
                mail = COALESCE($3, mail),
                company_name = COALESCE($4, company_name),
                meeting_ts = COALESCE($5, meeting_ts)
            WHERE phone = $1
            RETURNING phone, name, mail, company_name, meeting_ts
            "#,
        )
        .bind(phone)
        .bind(update.name.as_deref())
        .bind(update.mail.as_deref())
        .bind(update.company_name.as_deref())
        .bind(update.meeting_ts.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(ContactRow::into_contact))
    }
}
