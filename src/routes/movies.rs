use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::MaybeUser,
    models::Movie,
    services::MovieCategory,
};

use super::{AppState, ListingQuery, FALLBACK_LIMIT};

/// Fetches a category page, persists it and returns the stored records
///
/// When the catalog call fails the persisted records for the category are
/// served instead, then the category's static list if nothing is persisted.
pub async fn list_movies(
    state: &AppState,
    category: MovieCategory,
    page: u32,
) -> AppResult<Vec<Movie>> {
    let fetched = match state.catalog.movies(category, page).await {
        Ok(movies) => movies,
        Err(e) => {
            tracing::warn!(
                error = %e,
                category = category.tag(),
                provider = state.catalog.name(),
                "Catalog listing failed, serving persisted records"
            );
            let stored = state
                .store
                .movies_by_category(category.tag(), FALLBACK_LIMIT)
                .await?;
            if stored.is_empty() {
                return Ok(category.static_fallback());
            }
            return Ok(stored);
        }
    };

    if fetched.is_empty() {
        return Ok(fetched);
    }

    match state.store.save_movies(fetched.clone()).await {
        Ok(stored) => Ok(stored),
        Err(e) => {
            tracing::warn!(error = %e, category = category.tag(), "Failed to persist movies");
            Ok(fetched)
        }
    }
}

async fn listing(
    state: AppState,
    user: MaybeUser,
    query: ListingQuery,
    category: MovieCategory,
) -> AppResult<Json<Vec<Movie>>> {
    if let MaybeUser(Some(user)) = &user {
        tracing::debug!(user_id = %user.id, category = category.tag(), "Listing for signed-in user");
    }
    Ok(Json(list_movies(&state, category, query.page()).await?))
}

pub async fn trending(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    listing(state, user, query, MovieCategory::Trending).await
}

pub async fn popular(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    listing(state, user, query, MovieCategory::Popular).await
}

pub async fn hindi(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    listing(state, user, query, MovieCategory::Hindi).await
}

pub async fn old_hindi(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    listing(state, user, query, MovieCategory::OldHindi).await
}

pub async fn trending_hindi(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    listing(state, user, query, MovieCategory::TrendingHindi).await
}

pub async fn punjabi(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    listing(state, user, query, MovieCategory::Punjabi).await
}

pub async fn old_punjabi(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    listing(state, user, query, MovieCategory::OldPunjabi).await
}

pub async fn trending_punjabi(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    listing(state, user, query, MovieCategory::TrendingPunjabi).await
}

pub async fn anime(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    listing(state, user, query, MovieCategory::Anime).await
}

/// Live lookup by catalog id, falling back to the persisted copy
pub async fn details(
    State(state): State<AppState>,
    _user: MaybeUser,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Json<Movie>> {
    let fetched = match state.catalog.movie_details(tmdb_id).await {
        Ok(movie) => movie,
        Err(e) => {
            tracing::warn!(error = %e, tmdb_id, "Movie lookup failed, trying persisted copy");
            None
        }
    };

    if let Some(movie) = fetched {
        return match state.store.save_movies(vec![movie.clone()]).await {
            Ok(mut stored) => Ok(Json(stored.pop().unwrap_or(movie))),
            Err(e) => {
                tracing::warn!(error = %e, tmdb_id, "Failed to persist movie");
                Ok(Json(movie))
            }
        };
    }

    state
        .store
        .movie_by_tmdb_id(tmdb_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))
}
