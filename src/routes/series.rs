use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    middleware::MaybeUser,
    models::Series,
    services::SeriesCategory,
};

use super::{AppState, ListingQuery, FALLBACK_LIMIT};

pub async fn list_series(
    state: &AppState,
    category: SeriesCategory,
    page: u32,
) -> AppResult<Vec<Series>> {
    let fetched = match state.catalog.series(category, page).await {
        Ok(series) => series,
        Err(e) => {
            tracing::warn!(
                error = %e,
                category = category.tag(),
                provider = state.catalog.name(),
                "Catalog listing failed, serving persisted records"
            );
            return state
                .store
                .series_by_category(category.tag(), FALLBACK_LIMIT)
                .await;
        }
    };

    if fetched.is_empty() {
        return Ok(fetched);
    }

    match state.store.save_series(fetched.clone()).await {
        Ok(stored) => Ok(stored),
        Err(e) => {
            tracing::warn!(error = %e, category = category.tag(), "Failed to persist series");
            Ok(fetched)
        }
    }
}

pub async fn trending(
    State(state): State<AppState>,
    _user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Series>>> {
    Ok(Json(
        list_series(&state, SeriesCategory::Trending, query.page()).await?,
    ))
}

pub async fn web(
    State(state): State<AppState>,
    _user: MaybeUser,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<Series>>> {
    Ok(Json(list_series(&state, SeriesCategory::Web, query.page()).await?))
}

pub async fn details(
    State(state): State<AppState>,
    _user: MaybeUser,
    Path(tmdb_id): Path<i64>,
) -> AppResult<Json<Series>> {
    let fetched = state
        .catalog
        .series_details(tmdb_id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, tmdb_id, "Series lookup failed, trying persisted copy");
            None
        });

    if let Some(show) = fetched {
        return match state.store.save_series(vec![show.clone()]).await {
            Ok(mut stored) => Ok(Json(stored.pop().unwrap_or(show))),
            Err(e) => {
                tracing::warn!(error = %e, tmdb_id, "Failed to persist series");
                Ok(Json(show))
            }
        };
    }

    state
        .store
        .series_by_tmdb_id(tmdb_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Series not found".to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use super::*;
    use crate::{
        db::{MemoryStore, Store},
        routes::test_support::state_with,
        services::{catalog::MockCatalogProvider, sports::MockEventSource},
    };

    fn show(title: &str, tmdb_id: i64, category: &str) -> Series {
        Series {
            id: Uuid::new_v4(),
            tmdb_id: Some(tmdb_id),
            title: title.to_string(),
            description: String::new(),
            genre: Vec::new(),
            rating: 8.9,
            year: 2008,
            thumbnail: String::new(),
            backdrop_image: String::new(),
            trailer_url: None,
            categories: vec![category.to_string()],
            seasons: Some(5),
            episodes: Some(62),
        }
    }

    #[tokio::test]
    async fn test_web_series_fallback_reads_web_series_tag() {
        let store = Arc::new(MemoryStore::new());
        store
            .save_series(vec![
                show("Breaking Bad", 1396, "series"),
                show("Panchayat", 99999, "web_series"),
            ])
            .await
            .unwrap();

        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_series()
            .returning(|_, _| Err(AppError::ExternalApi("catalog down".to_string())));
        catalog.expect_name().return_const("stub");

        let state = state_with(store, catalog, MockEventSource::new());
        let listed = list_series(&state, SeriesCategory::Web, 1).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Panchayat");
    }

    #[tokio::test]
    async fn test_unknown_series_is_not_found() {
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_series_details().returning(|_| Ok(None));

        let state = state_with(
            Arc::new(MemoryStore::new()),
            catalog,
            MockEventSource::new(),
        );
        let err = details(State(state), MaybeUser(None), Path(404))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
