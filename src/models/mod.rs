use serde::Deserialize;

pub mod content;
pub mod sports;
pub mod user;
pub mod watchlist;

pub use content::{merge_categories, CatalogRecord, Movie, Series};
pub use sports::{sort_by_status_priority, EventStatus, SportsEvent};
pub use user::{Preferences, User};
pub use watchlist::{ContentKind, WatchlistItem};

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paged list response (`/trending`, `/discover`, `/search`, ...)
///
/// Results stay as raw JSON so one malformed entry can be skipped without
/// failing the whole page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

/// A movie as returned by list endpoints and `/movie/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    /// Only present on detail responses
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    /// Only present on list responses
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub videos: Option<TmdbVideos>,
}

/// A TV series as returned by list endpoints and `/tv/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSeries {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<i32>,
    #[serde(default)]
    pub number_of_episodes: Option<i32>,
    #[serde(default)]
    pub videos: Option<TmdbVideos>,
}

/// `append_to_response=videos` block on detail responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbVideos {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl TmdbVideos {
    /// Watch URL of the first YouTube trailer, if any
    pub fn trailer_url(&self) -> Option<String> {
        self.results
            .iter()
            .find(|v| v.site.eq_ignore_ascii_case("youtube") && v.video_type == "Trailer")
            .map(|v| format!("https://www.youtube.com/watch?v={}", v.key))
    }
}
