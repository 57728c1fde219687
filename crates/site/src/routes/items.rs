//! Item CRUD route handlers (HTML).
//!
//! Anyone may browse items. Creating requires a signed-in account; editing
//! and deleting additionally require [`can_mutate`]. The checks run in a
//! fixed order: sign-in (redirect to login), lookup (404), then ownership
//! (403).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use nexussphere_core::{FieldErrors, ItemId, can_mutate};

use crate::db::ItemOrder;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, RequireUser};
use crate::models::{Account, Item, ItemChanges, NewItem};
use crate::routes::{PageContext, parse_path_id};
use crate::state::AppState;

/// Where successful mutations land.
const LIST_PATH: &str = "/items";

/// Item view for templates.
#[derive(Debug, Clone)]
pub struct ItemView {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub owner: Option<String>,
    pub created_at: String,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            description: item.description.clone(),
            owner: item.owner_username().map(String::from),
            created_at: item.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Submitted item form.
///
/// Only the writable fields are read; anything else in the body, such as an
/// `owner`, is dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub name: String,
    pub description: String,
}

impl From<&Item> for ItemForm {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
        }
    }
}

/// Item list template.
#[derive(Template, WebTemplate)]
#[template(path = "items/list.html")]
pub struct ItemListTemplate {
    pub page: PageContext,
    pub items: Vec<ItemView>,
}

/// Item detail template.
#[derive(Template, WebTemplate)]
#[template(path = "items/detail.html")]
pub struct ItemDetailTemplate {
    pub page: PageContext,
    pub item: ItemView,
    /// Whether the viewer may edit or delete this item.
    pub can_edit: bool,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "items/form.html")]
pub struct ItemFormTemplate {
    pub page: PageContext,
    pub heading: &'static str,
    pub action: String,
    pub cancel_url: String,
    pub form: ItemForm,
    pub errors: FieldErrors,
}

impl ItemFormTemplate {
    fn create(page: PageContext, form: ItemForm, errors: FieldErrors) -> Self {
        Self {
            page,
            heading: "New item",
            action: format!("{LIST_PATH}/create"),
            cancel_url: LIST_PATH.to_string(),
            form,
            errors,
        }
    }

    fn edit(page: PageContext, id: ItemId, form: ItemForm, errors: FieldErrors) -> Self {
        Self {
            page,
            heading: "Edit item",
            action: format!("{LIST_PATH}/{id}/edit"),
            cancel_url: format!("{LIST_PATH}/{id}"),
            form,
            errors,
        }
    }
}

/// Delete confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "items/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub page: PageContext,
    pub item: ItemView,
}

/// Look up an item, or 404.
async fn find_item(state: &AppState, raw_id: &str) -> Result<Item> {
    let id: ItemId = parse_path_id(raw_id)?;
    state
        .items()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {id}")))
}

/// Look up an item the account is about to change: 404, then 403.
async fn find_mutable_item(state: &AppState, account: &Account, raw_id: &str) -> Result<Item> {
    let item = find_item(state, raw_id).await?;
    if !can_mutate(Some(&account.actor()), &item) {
        tracing::warn!(item_id = %item.id, user_id = %account.id, "Item mutation denied");
        return Err(AppError::Forbidden(
            "You do not have permission to change this item.".to_string(),
        ));
    }
    Ok(item)
}

/// List every item in insertion order.
///
/// # Errors
///
/// Returns an error if items cannot be loaded.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<impl IntoResponse> {
    let items = state.items().list_all(ItemOrder::Oldest).await?;
    Ok(ItemListTemplate {
        page: PageContext::new(&state, user.as_ref()),
        items: items.iter().map(ItemView::from).collect(),
    })
}

/// Display one item.
///
/// # Errors
///
/// Returns 404 if the item doesn't exist.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let item = find_item(&state, &id).await?;
    let actor = user.as_ref().map(Account::actor);
    Ok(ItemDetailTemplate {
        page: PageContext::new(&state, user.as_ref()),
        can_edit: can_mutate(actor.as_ref(), &item),
        item: ItemView::from(&item),
    })
}

/// Display the create form.
#[instrument(skip(state, account))]
pub async fn new_form(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
) -> impl IntoResponse {
    ItemFormTemplate::create(
        PageContext::new(&state, Some(&account)),
        ItemForm::default(),
        FieldErrors::new(),
    )
}

/// Create an item owned by the signed-in account.
///
/// # Errors
///
/// Returns an error if the item cannot be stored.
#[instrument(skip(state, account, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let fields = match ItemChanges::parse(Some(&form.name), Some(&form.description)) {
        Ok(fields) => fields,
        Err(errors) => {
            let page = PageContext::new(&state, Some(&account));
            return Ok(ItemFormTemplate::create(page, form, errors).into_response());
        }
    };

    let item = state
        .items()
        .create(NewItem {
            fields,
            owner: account.id,
        })
        .await?;
    tracing::info!(item_id = %item.id, user_id = %account.id, "Item created");

    Ok(Redirect::to(LIST_PATH).into_response())
}

/// Display the edit form.
///
/// # Errors
///
/// Returns 404 for an unknown item, 403 if the account may not change it.
#[instrument(skip(state, account))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let item = find_mutable_item(&state, &account, &id).await?;
    Ok(ItemFormTemplate::edit(
        PageContext::new(&state, Some(&account)),
        item.id,
        ItemForm::from(&item),
        FieldErrors::new(),
    ))
}

/// Replace an item's name and description.
///
/// # Errors
///
/// Returns 404 for an unknown item, 403 if the account may not change it.
#[instrument(skip(state, account, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(id): Path<String>,
    Form(form): Form<ItemForm>,
) -> Result<Response> {
    let item = find_mutable_item(&state, &account, &id).await?;

    let changes = match ItemChanges::parse(Some(&form.name), Some(&form.description)) {
        Ok(changes) => changes,
        Err(errors) => {
            let page = PageContext::new(&state, Some(&account));
            return Ok(ItemFormTemplate::edit(page, item.id, form, errors).into_response());
        }
    };

    state
        .items()
        .update(item.id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {}", item.id)))?;
    tracing::info!(item_id = %item.id, user_id = %account.id, "Item updated");

    Ok(Redirect::to(LIST_PATH).into_response())
}

/// Display the delete confirmation.
///
/// # Errors
///
/// Returns 404 for an unknown item, 403 if the account may not delete it.
#[instrument(skip(state, account))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let item = find_mutable_item(&state, &account, &id).await?;
    Ok(ConfirmDeleteTemplate {
        page: PageContext::new(&state, Some(&account)),
        item: ItemView::from(&item),
    })
}

/// Delete an item.
///
/// # Errors
///
/// Returns 404 for an unknown item, 403 if the account may not delete it.
#[instrument(skip(state, account))]
pub async fn delete(
    State(state): State<AppState>,
    RequireUser(account): RequireUser,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let item = find_mutable_item(&state, &account, &id).await?;
    if state.items().delete(item.id).await? {
        tracing::info!(item_id = %item.id, user_id = %account.id, "Item deleted");
    }
    Ok(Redirect::to(LIST_PATH))
}

/// Create the item routes router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/create", get(new_form).post(create))
        .route("/{id}", get(show))
        .route("/{id}/edit", get(edit_form).post(update))
        .route("/{id}/delete", get(confirm_delete).post(delete))
}
