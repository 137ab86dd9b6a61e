use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        user::{is_valid_email, normalize_email},
        User,
    },
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user; never carries the password digest
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub watchlist: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            watchlist: user.watchlist.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserResponse,
}

fn auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    Ok(AuthResponse {
        access_token: state.credentials.issue_token(user.id, &user.email)?,
        token_type: "bearer".to_string(),
        user: UserResponse::from(user),
    })
}

/// Register a new user and sign them in
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    if !is_valid_email(&request.email) {
        return Err(AppError::InvalidInput("Invalid email address".to_string()));
    }
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Name is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(AppError::InvalidInput("Password is required".to_string()));
    }

    let password_hash = state.credentials.hash_password(&request.password);
    let user = User::new(&request.email, request.name.trim().to_string(), password_hash);

    state.store.create_user(&user).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(auth_response(&state, &user)?))
}

/// Exchange email and password for a token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state
        .store
        .user_by_email(&normalize_email(&request.email))
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !state
        .credentials
        .verify_password(&request.password, &user.password_hash)
    {
        tracing::debug!(user_id = %user.id, "Login rejected");
        return Err(AppError::InvalidCredentials);
    }

    Ok(Json(auth_response(&state, &user)?))
}
