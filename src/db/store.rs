use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{EventStatus, Movie, Preferences, Series, SportsEvent, User, WatchlistItem},
};

/// Persistence operations over the users, movies, series, sports and
/// watchlist collections
///
/// Uniqueness of user emails and of (user, content) watchlist pairs is
/// enforced by the store itself with a single conditional write, so
/// concurrent identical requests cannot double-insert.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Inserts a new user. Fails with `AppError::DuplicateEmail` when the
    /// email is already registered.
    async fn create_user(&self, user: &User) -> AppResult<()>;

    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn user_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Replaces the preference map. Returns `false` when the user does not exist.
    async fn update_preferences(&self, user_id: Uuid, preferences: &Preferences)
        -> AppResult<bool>;

    /// Upserts movies keyed by catalog id, or by internal id when there is
    /// none, and returns them as stored (existing ids kept, categories merged)
    async fn save_movies(&self, movies: Vec<Movie>) -> AppResult<Vec<Movie>>;

    async fn movies_by_category(&self, category: &str, limit: i64) -> AppResult<Vec<Movie>>;

    async fn movie_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<Movie>>;

    /// Case-insensitive title substring match
    async fn search_movies(&self, query: &str, limit: i64) -> AppResult<Vec<Movie>>;

    async fn save_series(&self, series: Vec<Series>) -> AppResult<Vec<Series>>;

    async fn series_by_category(&self, category: &str, limit: i64) -> AppResult<Vec<Series>>;

    async fn series_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<Series>>;

    async fn search_series(&self, query: &str, limit: i64) -> AppResult<Vec<Series>>;

    /// Upserts events keyed by (title, start_time)
    async fn save_sports_events(&self, events: Vec<SportsEvent>) -> AppResult<Vec<SportsEvent>>;

    async fn sports_by_status(&self, status: EventStatus, limit: i64)
        -> AppResult<Vec<SportsEvent>>;

    /// Adds an item unless the user already saved that content id. Returns
    /// whether a new entry was written.
    async fn add_to_watchlist(&self, item: &WatchlistItem) -> AppResult<bool>;

    /// Returns whether an entry was removed
    async fn remove_from_watchlist(&self, user_id: Uuid, content_id: &str) -> AppResult<bool>;

    /// The user's entries, oldest first
    async fn watchlist(&self, user_id: Uuid) -> AppResult<Vec<WatchlistItem>>;

    /// Store name for logging and debugging
    fn name(&self) -> &'static str;
}
