use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of content a watchlist entry points at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
    Sports,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "series",
            ContentKind::Sports => "sports",
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(ContentKind::Movie),
            "series" => Ok(ContentKind::Series),
            "sports" => Ok(ContentKind::Sports),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

/// One saved entry; unique per (user_id, content_id)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistItem {
    pub user_id: Uuid,
    pub content_id: String,
    pub content_type: ContentKind,
    pub added_at: DateTime<Utc>,
}

impl WatchlistItem {
    pub fn new(user_id: Uuid, content_id: String, content_type: ContentKind) -> Self {
        Self {
            user_id,
            content_id,
            content_type,
            added_at: Utc::now(),
        }
    }
}
