//! `PostgreSQL` contact repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use nexussphere_core::{ContactId, Email};

use super::{ContactRepository, RepositoryError};
use crate::models::{Contact, NewContact};

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: i32,
    name: String,
    email: String,
    company: Option<String>,
    message: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = RepositoryError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: ContactId::new(row.id),
            name: row.name,
            email,
            company: row.company,
            message: row.message,
            created_at: row.created_at,
        })
    }
}

/// Contact repository backed by the `site.contact` table.
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn create(&self, contact: NewContact) -> Result<Contact, RepositoryError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r"
            INSERT INTO site.contact (name, email, company, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, company, message, created_at
            ",
        )
        .bind(&contact.name)
        .bind(contact.email.as_str())
        .bind(contact.company.as_deref())
        .bind(&contact.message)
        .fetch_one(&self.pool)
        .await?;

        Contact::try_from(row)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Contact>, RepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, ContactRow>(
            r"
            SELECT id, name, email, company, message, created_at
            FROM site.contact
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Contact::try_from).collect()
    }
}
