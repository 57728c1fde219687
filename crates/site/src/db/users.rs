//! `PostgreSQL` account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use nexussphere_core::{Email, UserId, Username};

use super::{RepositoryError, UserRepository, conflict_on_unique};
use crate::models::{Account, NewAccount};

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i32,
    username: String,
    email: Option<String>,
    is_staff: bool,
    date_joined: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    account: AccountRow,
    password_hash: String,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let username = Username::parse(&row.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = row
            .email
            .filter(|e| !e.is_empty())
            .map(|e| Email::parse(&e))
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        Ok(Self {
            id: UserId::new(row.id),
            username,
            email,
            is_staff: row.is_staff,
            date_joined: row.date_joined,
        })
    }
}

/// Repository for account database operations.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, username, email, is_staff, date_joined
            FROM site.account
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            SELECT id, username, email, is_staff, date_joined
            FROM site.account
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r"
            SELECT id, username, email, is_staff, date_joined, password_hash
            FROM site.account
            WHERE username = $1
            ",
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((Account::try_from(r.account)?, r.password_hash))),
            None => Ok(None),
        }
    }

    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r"
            INSERT INTO site.account (username, email, password_hash, is_staff)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, is_staff, date_joined
            ",
        )
        .bind(account.username.as_str())
        .bind(account.email.as_ref().map(Email::as_str))
        .bind(&account.password_hash)
        .bind(account.is_staff)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_on_unique("username"))?;

        Account::try_from(row)
    }
}
