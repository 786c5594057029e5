use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    error::{AppError, AppResult},
    extract::{both, ItemIndex, Payload},
    models::Item,
    validation::check_business_rules,
    AppState,
};

pub const ITEM_NOT_FOUND: &str = "Item not found";

fn enforce_rules(item: &Item) -> AppResult<()> {
    check_business_rules(item).map_err(|violation| {
        warn!(%violation, name = %item.name, quantity = item.quantity, "Item failed business rules");
        AppError::from(violation)
    })
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_items(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let store = state.items.read().await;
    debug!(count = store.len(), "Listed items");

    Ok((StatusCode::OK, Json(json!(store.items()))))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_item(
    State(state): State<AppState>,
    Payload(item): Payload<Item>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    enforce_rules(&item)?;

    let index = state.items.write().await.append(item.clone());

    info!(index, name = %item.name, quantity = item.quantity, "Added item");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "item added",
            "item": item,
            "index": index,
        })),
    ))
}

// ── Update ────────────────────────────────────────────────────────────────────

/// Replaces the record at `index`. A malformed path and body are reported
/// together; the range check then runs before the business rules, and both
/// run under the same write guard as the replace.
pub async fn update_item(
    State(state): State<AppState>,
    index: Result<ItemIndex, AppError>,
    payload: Result<Payload<Item>, AppError>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let (ItemIndex(index), Payload(item)) = both(index, payload)?;

    let mut store = state.items.write().await;

    let Some(slot) = store.resolve(index) else {
        warn!(index, len = store.len(), "Update target out of range");
        return Err(AppError::NotFound(ITEM_NOT_FOUND.to_string()));
    };

    enforce_rules(&item)?;

    store
        .replace(slot, item.clone())
        .ok_or_else(|| AppError::NotFound(ITEM_NOT_FOUND.to_string()))?;
    drop(store);

    info!(index = slot, name = %item.name, quantity = item.quantity, "Updated item");

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "item updated",
            "index": slot,
            "item": item,
        })),
    ))
}
