//! Item resource for the JSON API.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use nexussphere_core::{ItemId, can_mutate};

use crate::db::ItemOrder;
use crate::error::ApiError;
use crate::middleware::ApiUser;
use crate::models::{Account, Item, ItemChanges, NewItem};
use crate::state::AppState;

/// JSON representation of an item.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResource {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    /// RFC 3339
    pub created_at: String,
    /// Owner username, `null` for owner-less items.
    pub owner: Option<String>,
}

impl From<&Item> for ItemResource {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            created_at: item.created_at.to_rfc3339(),
            owner: item.owner_username().map(String::from),
        }
    }
}

/// Writable fields accepted in request bodies.
///
/// `owner`, `id` and `created_at` are read-only; if a client sends them
/// they are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemPayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

type Payload = Result<Json<ItemPayload>, JsonRejection>;

fn read_payload(payload: Payload) -> Result<ItemPayload, ApiError> {
    payload
        .map(|Json(p)| p)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

async fn find_item(state: &AppState, raw_id: &str) -> Result<Item, ApiError> {
    let id: ItemId = raw_id.parse().map_err(|_| ApiError::NotFound)?;
    state.items().find_by_id(id).await?.ok_or(ApiError::NotFound)
}

/// Lookup (404) then ownership (403).
async fn find_mutable_item(
    state: &AppState,
    account: &Account,
    raw_id: &str,
) -> Result<Item, ApiError> {
    let item = find_item(state, raw_id).await?;
    if can_mutate(Some(&account.actor()), &item) {
        Ok(item)
    } else {
        tracing::warn!(item_id = %item.id, user_id = %account.id, "API item mutation denied");
        Err(ApiError::Forbidden)
    }
}

async fn save(state: &AppState, id: ItemId, changes: &ItemChanges) -> Result<Item, ApiError> {
    state
        .items()
        .update(id, changes)
        .await?
        .ok_or(ApiError::NotFound)
}

/// `GET /api/items` - every item, newest first. Open to anonymous callers.
///
/// # Errors
///
/// Returns an error if items cannot be loaded.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ItemResource>>, ApiError> {
    let items = state.items().list_all(ItemOrder::Newest).await?;
    Ok(Json(items.iter().map(ItemResource::from).collect()))
}

/// `POST /api/items` - create an item owned by the caller.
///
/// # Errors
///
/// Returns 401 without credentials, 400 for invalid input.
#[instrument(skip(state, account, payload))]
pub async fn create(
    State(state): State<AppState>,
    ApiUser(account): ApiUser,
    payload: Payload,
) -> Result<impl IntoResponse, ApiError> {
    let payload = read_payload(payload)?;
    let fields = ItemChanges::parse(payload.name.as_deref(), payload.description.as_deref())
        .map_err(ApiError::Validation)?;

    let item = state
        .items()
        .create(NewItem {
            fields,
            owner: account.id,
        })
        .await?;
    tracing::info!(item_id = %item.id, user_id = %account.id, "Item created via API");

    Ok((StatusCode::CREATED, Json(ItemResource::from(&item))))
}

/// `GET /api/items/{id}` - open to anonymous callers.
///
/// # Errors
///
/// Returns 404 for an unknown item.
#[instrument(skip(state))]
pub async fn retrieve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItemResource>, ApiError> {
    let item = find_item(&state, &id).await?;
    Ok(Json(ItemResource::from(&item)))
}

/// `PUT /api/items/{id}` - replace the writable fields.
///
/// `name` is required. An omitted `description` keeps the stored one.
///
/// # Errors
///
/// Returns 401, 404, 403 or 400, checked in that order.
#[instrument(skip(state, account, payload))]
pub async fn replace(
    State(state): State<AppState>,
    ApiUser(account): ApiUser,
    Path(id): Path<String>,
    payload: Payload,
) -> Result<Json<ItemResource>, ApiError> {
    let item = find_mutable_item(&state, &account, &id).await?;
    let payload = read_payload(payload)?;

    let description = payload.description.as_deref().unwrap_or(&item.description);
    let changes = ItemChanges::parse(payload.name.as_deref(), Some(description))
        .map_err(ApiError::Validation)?;

    let updated = save(&state, item.id, &changes).await?;
    Ok(Json(ItemResource::from(&updated)))
}

/// `PATCH /api/items/{id}` - update only the fields present.
///
/// # Errors
///
/// Returns 401, 404, 403 or 400, checked in that order.
#[instrument(skip(state, account, payload))]
pub async fn partial_update(
    State(state): State<AppState>,
    ApiUser(account): ApiUser,
    Path(id): Path<String>,
    payload: Payload,
) -> Result<Json<ItemResource>, ApiError> {
    let item = find_mutable_item(&state, &account, &id).await?;
    let payload = read_payload(payload)?;

    let name = payload.name.as_deref().unwrap_or(&item.name);
    let description = payload.description.as_deref().unwrap_or(&item.description);
    let changes =
        ItemChanges::parse(Some(name), Some(description)).map_err(ApiError::Validation)?;

    let updated = save(&state, item.id, &changes).await?;
    Ok(Json(ItemResource::from(&updated)))
}

/// `DELETE /api/items/{id}`
///
/// # Errors
///
/// Returns 401, 404 or 403, checked in that order.
#[instrument(skip(state, account))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiUser(account): ApiUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let item = find_mutable_item(&state, &account, &id).await?;
    if !state.items().delete(item.id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(item_id = %item.id, user_id = %account.id, "Item deleted via API");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use nexussphere_core::{UserId, Username};

    use super::*;
    use crate::models::ItemOwner;

    #[test]
    fn test_resource_shape() {
        let item = Item {
            id: ItemId::new(7),
            name: "Widget".to_string(),
            description: "Blue".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 4, 10, 30, 0).unwrap(),
            owner: Some(ItemOwner {
                id: UserId::new(1),
                username: Username::parse("alice").unwrap(),
            }),
        };

        let json = serde_json::to_value(ItemResource::from(&item)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "name": "Widget",
                "description": "Blue",
                "created_at": "2025-03-04T10:30:00+00:00",
                "owner": "alice",
            })
        );
    }

    #[test]
    fn test_payload_ignores_read_only_fields() {
        let payload: ItemPayload =
            serde_json::from_str(r#"{"name": "Widget", "owner": 99, "id": 3}"#).unwrap();
        assert_eq!(payload.name.as_deref(), Some("Widget"));
        assert_eq!(payload.description, None);
    }
}
