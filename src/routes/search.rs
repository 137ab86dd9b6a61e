use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::MaybeUser,
    models::{Movie, Series},
    services::{
        search::{merge_results, LOCAL_SEARCH_LIMIT},
        SearchHits,
    },
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub movies: Vec<Movie>,
    pub series: Vec<Series>,
    pub total: usize,
    pub page: u32,
}

async fn local_hits(state: &AppState, query: &str) -> AppResult<SearchHits> {
    Ok(SearchHits {
        movies: state.store.search_movies(query, LOCAL_SEARCH_LIMIT).await?,
        series: state.store.search_series(query, LOCAL_SEARCH_LIMIT).await?,
    })
}

/// Catalog hits first, then persisted hits the catalog did not return
pub async fn search(
    State(state): State<AppState>,
    _user: MaybeUser,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query must not be empty".to_string(),
        ));
    }
    let page = params.page.max(1);

    let local = local_hits(&state, query).await?;

    let (hits, total) = match state.catalog.search(query, page).await {
        Ok(external) => merge_results(external, local),
        Err(e) => {
            tracing::warn!(error = %e, query, "Catalog search failed, serving persisted hits");
            let total = local.movies.len() + local.series.len();
            (local, total)
        }
    };

    Ok(Json(SearchResponse {
        movies: hits.movies,
        series: hits.series,
        total,
        page,
    }))
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

    fn movie(title: &str, tmdb_id: Option<i64>) -> Movie {
        Movie {
            id: Uuid::new_v4(),
            tmdb_id,
            title: title.to_string(),
            description: String::new(),
            genre: Vec::new(),
            rating: 0.0,
            year: 2019,
            thumbnail: String::new(),
            backdrop_image: String::new(),
            trailer_url: None,
            categories: Vec::new(),
            duration: None,
            popularity: None,
        }
    }

    async fn store_with_local_movie() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .save_movies(vec![movie("Carry On Jatta", Some(1))])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let state = state_with(
            Arc::new(MemoryStore::new()),
            MockCatalogProvider::new(),
            MockEventSource::new(),
        );
        let err = search(
            State(state),
            MaybeUser(None),
            Query(SearchQuery {
                q: "   ".to_string(),
                page: 1,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_duplicate_local_hits_are_dropped() {
        let mut catalog = MockCatalogProvider::new();
        catalog.expect_search().returning(|_, _| {
            Ok(SearchHits {
                movies: vec![movie("Carry On Jatta (catalog)", Some(1))],
                series: Vec::new(),
            })
        });

        let state = state_with(
            store_with_local_movie().await,
            catalog,
            MockEventSource::new(),
        );
        let Json(response) = search(
            State(state),
            MaybeUser(None),
            Query(SearchQuery {
                q: "jatta".to_string(),
                page: 1,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.movies.len(), 1);
        assert_eq!(response.movies[0].title, "Carry On Jatta (catalog)");
        assert_eq!(response.total, 1);
    }

    #[tokio::test]
    async fn test_catalog_failure_serves_local_hits() {
        let mut catalog = MockCatalogProvider::new();
        catalog
            .expect_search()
            .returning(|_, _| Err(AppError::ExternalApi("catalog down".to_string())));

        let state = state_with(
            store_with_local_movie().await,
            catalog,
            MockEventSource::new(),
        );
        let Json(response) = search(
            State(state),
            MaybeUser(None),
            Query(SearchQuery {
                q: "JATTA".to_string(),
                page: 3,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.movies.len(), 1);
        assert_eq!(response.total, 1);
        assert_eq!(response.page, 3);
    }
}
