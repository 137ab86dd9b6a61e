use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    middleware::MaybeUser,
    models::{sort_by_status_priority, EventStatus, SportsEvent},
};

use super::{AppState, FALLBACK_LIMIT};

/// Events for `status` (every status when `None`), persisted on the way out
///
/// If the event source fails, persisted events are served instead.
pub async fn list_events(
    state: &AppState,
    status: Option<EventStatus>,
) -> AppResult<Vec<SportsEvent>> {
    match state.events.events(status).await {
        Ok(events) => match state.store.save_sports_events(events.clone()).await {
            Ok(stored) => Ok(stored),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist sports events");
                Ok(events)
            }
        },
        Err(e) => {
            tracing::warn!(
                error = %e,
                source = state.events.name(),
                "Event source failed, serving persisted events"
            );
            persisted_events(state, status).await
        }
    }
}

async fn persisted_events(
    state: &AppState,
    status: Option<EventStatus>,
) -> AppResult<Vec<SportsEvent>> {
    let Some(status) = status else {
        let mut events = Vec::new();
        for status in EventStatus::ALL {
            events.extend(state.store.sports_by_status(status, FALLBACK_LIMIT).await?);
        }
        sort_by_status_priority(&mut events);
        return Ok(events);
    };

    state.store.sports_by_status(status, FALLBACK_LIMIT).await
}

pub async fn live(
    State(state): State<AppState>,
    _user: MaybeUser,
) -> AppResult<Json<Vec<SportsEvent>>> {
    Ok(Json(list_events(&state, Some(EventStatus::Live)).await?))
}

pub async fn highlights(
    State(state): State<AppState>,
    _user: MaybeUser,
) -> AppResult<Json<Vec<SportsEvent>>> {
    Ok(Json(list_events(&state, Some(EventStatus::Highlights)).await?))
}

pub async fn upcoming(
    State(state): State<AppState>,
    _user: MaybeUser,
) -> AppResult<Json<Vec<SportsEvent>>> {
    Ok(Json(list_events(&state, Some(EventStatus::Upcoming)).await?))
}

/// Live, then upcoming, then highlights
pub async fn all(
    State(state): State<AppState>,
    _user: MaybeUser,
) -> AppResult<Json<Vec<SportsEvent>>> {
    Ok(Json(list_events(&state, None).await?))
}
