use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{ContentKind, Preferences, WatchlistItem},
};

use super::{auth::UserResponse, AppState, MessageResponse};

#[derive(Debug, Deserialize)]
pub struct WatchlistAddRequest {
    pub content_id: String,
    pub content_type: ContentKind,
}

/// Add an item to the caller's watchlist. Adding an item twice is a no-op.
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<WatchlistAddRequest>,
) -> AppResult<Json<MessageResponse>> {
    let content_id = request.content_id.trim();
    if content_id.is_empty() {
        return Err(AppError::InvalidInput("content_id is required".to_string()));
    }

    let item = WatchlistItem::new(user.id, content_id.to_string(), request.content_type);
    let inserted = state.store.add_to_watchlist(&item).await?;
    tracing::debug!(user_id = %user.id, content_id, inserted, "Watchlist add");

    Ok(Json(MessageResponse {
        message: "Added to watchlist successfully",
    }))
}

pub async fn watchlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<WatchlistItem>>> {
    Ok(Json(state.store.watchlist(user.id).await?))
}

pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(content_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    if !state
        .store
        .remove_from_watchlist(user.id, &content_id)
        .await?
    {
        return Err(AppError::NotFound(
            "Item not found in watchlist".to_string(),
        ));
    }

    Ok(Json(MessageResponse {
        message: "Removed from watchlist successfully",
    }))
}

pub async fn profile(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// Replaces the caller's preference map
pub async fn update_preferences(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(preferences): Json<Preferences>,
) -> AppResult<Json<MessageResponse>> {
    if !state.store.update_preferences(user.id, &preferences).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Preferences updated successfully",
    }))
}
