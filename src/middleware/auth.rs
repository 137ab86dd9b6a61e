use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{
    error::{AppError, AppResult},
    models::User,
    routes::AppState,
};

/// Extracts the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Resolves the bearer token to a stored user. `Ok(None)` covers every
/// anonymous case: no header, bad token, unknown user.
async fn resolve_user(parts: &Parts, state: &AppState) -> AppResult<Option<User>> {
    let Some(token) = bearer_token(parts) else {
        return Ok(None);
    };
    let Some(user_id) = state.credentials.validate_token(token) else {
        return Ok(None);
    };

    let user = state.store.user_by_id(user_id).await?;
    if user.is_none() {
        tracing::debug!(%user_id, "Token for unknown user");
    }
    Ok(user)
}

/// Authenticated user; rejects the request with 401 otherwise
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Authenticated user when a valid token is present, anonymous otherwise.
/// A failed user lookup also counts as anonymous.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state)
            .await?
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve_user(parts, state).await {
            Ok(user) => Ok(MaybeUser(user)),
            Err(e) => {
                tracing::warn!(error = %e, "User lookup failed, continuing as anonymous");
                Ok(MaybeUser(None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts_with(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("Basic abc"))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(Some("abc"))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }
}
