//! `PostgreSQL` item repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use nexussphere_core::{ItemId, UserId, Username};

use super::{ItemOrder, ItemRepository, RepositoryError};
use crate::models::{Item, ItemChanges, ItemOwner, NewItem};

const SELECT_ITEMS: &str = r"
    SELECT i.id, i.name, i.description, i.created_at, i.owner_id,
           a.username AS owner_username
    FROM site.item i
    LEFT JOIN site.account a ON a.id = i.owner_id
";

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i32,
    name: String,
    description: String,
    created_at: DateTime<Utc>,
    owner_id: Option<i32>,
    owner_username: Option<String>,
}

impl TryFrom<ItemRow> for Item {
    type Error = RepositoryError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let owner = match (row.owner_id, row.owner_username) {
            (Some(id), Some(username)) => Some(ItemOwner {
                id: UserId::new(id),
                username: Username::parse(&username).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
                })?,
            }),
            _ => None,
        };

        Ok(Self {
            id: ItemId::new(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            owner,
        })
    }
}

/// Item repository backed by the `site.item` table.
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn list_all(&self, order: ItemOrder) -> Result<Vec<Item>, RepositoryError> {
        let order_by = match order {
            ItemOrder::Oldest => "ORDER BY i.id ASC",
            ItemOrder::Newest => "ORDER BY i.created_at DESC, i.id DESC",
        };
        let rows = sqlx::query_as::<_, ItemRow>(&format!("{SELECT_ITEMS} {order_by}"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Item::try_from).collect()
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!("{SELECT_ITEMS} WHERE i.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Item::try_from).transpose()
    }

    async fn create(&self, item: NewItem) -> Result<Item, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            WITH inserted AS (
                INSERT INTO site.item (name, description, owner_id)
                VALUES ($1, $2, $3)
                RETURNING id, name, description, created_at, owner_id
            )
            SELECT inserted.id, inserted.name, inserted.description,
                   inserted.created_at, inserted.owner_id,
                   a.username AS owner_username
            FROM inserted
            LEFT JOIN site.account a ON a.id = inserted.owner_id
            ",
        )
        .bind(&item.fields.name)
        .bind(&item.fields.description)
        .bind(item.owner)
        .fetch_one(&self.pool)
        .await?;

        Item::try_from(row)
    }

    async fn update(
        &self,
        id: ItemId,
        changes: &ItemChanges,
    ) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            WITH updated AS (
                UPDATE site.item
                SET name = $2, description = $3
                WHERE id = $1
                RETURNING id, name, description, created_at, owner_id
            )
            SELECT updated.id, updated.name, updated.description,
                   updated.created_at, updated.owner_id,
                   a.username AS owner_username
            FROM updated
            LEFT JOIN site.account a ON a.id = updated.owner_id
            ",
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Item::try_from).transpose()
    }

    async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM site.item WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
