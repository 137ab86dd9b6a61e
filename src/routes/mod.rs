use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::Store,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{CatalogProvider, CredentialService, EventSource},
};

pub mod auth;
pub mod movies;
pub mod search;
pub mod series;
pub mod sports;
pub mod user;

/// Records returned by a listing fallback read
pub const FALLBACK_LIMIT: i64 = 20;

/// Shared handler state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub catalog: Arc<dyn CatalogProvider>,
    pub events: Arc<dyn EventSource>,
    pub credentials: Arc<CredentialService>,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1", get(status))
        .route("/api/v1/", get(status))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/movies/trending", get(movies::trending))
        .route("/movies/popular", get(movies::popular))
        .route("/movies/hindi", get(movies::hindi))
        .route("/movies/hindi/old", get(movies::old_hindi))
        .route("/movies/hindi/trending", get(movies::trending_hindi))
        .route("/movies/punjabi", get(movies::punjabi))
        .route("/movies/punjabi/old", get(movies::old_punjabi))
        .route("/movies/punjabi/trending", get(movies::trending_punjabi))
        .route("/movies/anime", get(movies::anime))
        .route("/movies/:id", get(movies::details))
        .route("/series/trending", get(series::trending))
        .route("/series/web", get(series::web))
        .route("/series/:id", get(series::details))
        .route("/sports/live", get(sports::live))
        .route("/sports/highlights", get(sports::highlights))
        .route("/sports/upcoming", get(sports::upcoming))
        .route("/sports/all", get(sports::all))
        .route("/search", get(search::search))
        .route("/user/watchlist", post(user::add_to_watchlist).get(user::watchlist))
        .route("/user/watchlist/:content_id", delete(user::remove_from_watchlist))
        .route("/user/profile", get(user::profile))
        .route("/user/preferences", put(user::update_preferences))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    pub version: &'static str,
}

async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "StreamFlix API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `{"message": ...}` body for mutations without a payload
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `?page=` on listing endpoints; pages start at 1
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct ListingQuery {
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

impl ListingQuery {
    pub fn page(self) -> u32 {
        self.page.max(1)
    }
}
