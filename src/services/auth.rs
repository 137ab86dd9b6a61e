use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Password digests and signed access tokens
///
/// Digests are unsalted SHA-256 so that equal passwords always produce equal
/// digests. Tokens are HS256 JWTs with a fixed validity window.
pub struct CredentialService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl CredentialService {
    pub fn new(secret: &str, validity: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validity,
        }
    }

    /// How long an issued token stays valid
    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Hex-encoded SHA-256 of the password
    pub fn hash_password(&self, password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }

    pub fn verify_password(&self, password: &str, digest: &str) -> bool {
        self.hash_password(password) == digest
    }

    /// Issues a token valid from now for the configured window
    pub fn issue_token(&self, user_id: Uuid, email: &str) -> AppResult<String> {
        self.issue_token_at(user_id, email, Utc::now())
    }

    /// Issues a token as if it had been created at `issued_at`
    pub fn issue_token_at(
        &self,
        user_id: Uuid,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let claims = Claims {
            user_id,
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.validity).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    /// Returns the user id for a well-formed, correctly signed, unexpired
    /// token. Every failure collapses to `None`.
    pub fn validate_token(&self, token: &str) -> Option<Uuid> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(data.claims.user_id),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected access token");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CredentialService {
        CredentialService::new("test-secret", Duration::days(30))
    }

    #[test]
    fn test_hash_is_deterministic() {
        let svc = service();
        assert_eq!(svc.hash_password("hunter2"), svc.hash_password("hunter2"));
        assert_eq!(svc.hash_password("hunter2").len(), 64);
    }

    #[test]
    fn test_hash_differs_for_different_passwords() {
        let svc = service();
        assert_ne!(svc.hash_password("hunter2"), svc.hash_password("hunter3"));
    }

    #[test]
    fn test_known_sha256_digest() {
        assert_eq!(
            service().hash_password("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
    }

    #[test]
    fn test_verify_password() {
        let svc = service();
        let digest = svc.hash_password("correct horse");
        assert!(svc.verify_password("correct horse", &digest));
        assert!(!svc.verify_password("wrong horse", &digest));
    }

    #[test]
    fn test_issued_token_validates_to_user_id() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let token = svc.issue_token(user_id, "viewer@streamflix.io").unwrap();

        assert_eq!(svc.validate_token(&token), Some(user_id));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let issued_at = Utc::now() - svc.validity() - Duration::days(1);
        let token = svc
            .issue_token_at(user_id, "viewer@streamflix.io", issued_at)
            .unwrap();

        assert_eq!(svc.validate_token(&token), None);
    }

    #[test]
    fn test_token_inside_window_is_accepted() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let issued_at = Utc::now() - Duration::days(29);
        let token = svc
            .issue_token_at(user_id, "viewer@streamflix.io", issued_at)
            .unwrap();

        assert_eq!(svc.validate_token(&token), Some(user_id));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = CredentialService::new("another-secret", Duration::days(30));
        let token = other
            .issue_token(Uuid::new_v4(), "viewer@streamflix.io")
            .unwrap();

        assert_eq!(service().validate_token(&token), None);
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        assert_eq!(service().validate_token("not-a-jwt"), None);
        assert_eq!(service().validate_token(""), None);
    }
}
