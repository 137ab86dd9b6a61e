use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Free-form per-user preference map
pub type Preferences = HashMap<String, serde_json::Value>;

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    /// Normalized (trimmed, lower-cased) email address, unique across users
    pub email: String,
    pub name: String,
    /// Hex SHA-256 digest of the password
    pub password_hash: String,
    /// Content ids currently on the user's watchlist
    pub watchlist: Vec<String>,
    pub preferences: Preferences,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with an empty watchlist and no preferences
    pub fn new(email: &str, name: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(email),
            name,
            password_hash,
            watchlist: Vec::new(),
            preferences: Preferences::new(),
            created_at: Utc::now(),
        }
    }
}

/// Canonical form used for storage and lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal structural check: one `@` with a non-empty local part and a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new("  Alice@Example.COM ", "Alice".to_string(), "abc".to_string());
        assert_eq!(user.email, "alice@example.com");
        assert!(user.watchlist.is_empty());
        assert!(user.preferences.is_empty());
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("viewer@streamflix.io"));
        assert!(!is_valid_email("viewer"));
        assert!(!is_valid_email("@streamflix.io"));
        assert!(!is_valid_email("viewer@localhost"));
        assert!(!is_valid_email("a@b@c.io"));
        assert!(!is_valid_email("new viewer@streamflix.io"));
    }
}
