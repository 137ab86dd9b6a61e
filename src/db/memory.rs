use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{
        merge_categories, CatalogRecord, EventStatus, Movie, Preferences, Series, SportsEvent,
        User, WatchlistItem,
    },
};

#[derive(Default)]
struct MemoryInner {
    users: Vec<User>,
    movies: Vec<Movie>,
    series: Vec<Series>,
    sports: Vec<SportsEvent>,
    watchlist: Vec<WatchlistItem>,
}

/// Process-local store
///
/// Every check-and-write runs under a single write lock, which gives the
/// same uniqueness guarantees as the database constraints. Used when no
/// database is configured and by the test suite.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn upsert_record<T: CatalogRecord>(rows: &mut Vec<T>, mut incoming: T) -> T {
    let existing = rows.iter_mut().find(|row| match incoming.tmdb_id() {
        Some(tmdb_id) => row.tmdb_id() == Some(tmdb_id),
        None => row.id() == incoming.id(),
    });

    match existing {
        Some(row) => {
            incoming.set_id(row.id());
            incoming.keep_details_from(row);
            let merged = merge_categories(row.categories(), incoming.categories());
            *incoming.categories_mut() = merged;
            *row = incoming.clone();
        }
        None => rows.push(incoming.clone()),
    }

    incoming
}

fn take_limit<T: Clone>(rows: impl Iterator<Item = T>, limit: i64) -> Vec<T> {
    rows.take(usize::try_from(limit).unwrap_or(0)).collect()
}

fn title_matches<T: CatalogRecord>(record: &T, needle: &str) -> bool {
    record.title().to_lowercase().contains(needle)
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }
        inner.users.push(user.clone());
        Ok(())
    }

    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: &Preferences,
    ) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.users.iter_mut().find(|u| u.id == user_id) {
            Some(user) => {
                user.preferences = preferences.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn save_movies(&self, movies: Vec<Movie>) -> AppResult<Vec<Movie>> {
        let mut inner = self.inner.write().await;
        Ok(movies
            .into_iter()
            .map(|movie| upsert_record(&mut inner.movies, movie))
            .collect())
    }

    async fn movies_by_category(&self, category: &str, limit: i64) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        Ok(take_limit(
            inner
                .movies
                .iter()
                .filter(|m| m.has_category(category))
                .cloned(),
            limit,
        ))
    }

    async fn movie_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner
            .movies
            .iter()
            .find(|m| m.tmdb_id == Some(tmdb_id))
            .cloned())
    }

    async fn search_movies(&self, query: &str, limit: i64) -> AppResult<Vec<Movie>> {
        let needle = query.to_lowercase();
        let inner = self.inner.read().await;
        Ok(take_limit(
            inner
                .movies
                .iter()
                .filter(|m| title_matches(*m, &needle))
                .cloned(),
            limit,
        ))
    }

    async fn save_series(&self, series: Vec<Series>) -> AppResult<Vec<Series>> {
        let mut inner = self.inner.write().await;
        Ok(series
            .into_iter()
            .map(|s| upsert_record(&mut inner.series, s))
            .collect())
    }

    async fn series_by_category(&self, category: &str, limit: i64) -> AppResult<Vec<Series>> {
        let inner = self.inner.read().await;
        Ok(take_limit(
            inner
                .series
                .iter()
                .filter(|s| s.has_category(category))
                .cloned(),
            limit,
        ))
    }

    async fn series_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<Series>> {
        let inner = self.inner.read().await;
        Ok(inner
            .series
            .iter()
            .find(|s| s.tmdb_id == Some(tmdb_id))
            .cloned())
    }

    async fn search_series(&self, query: &str, limit: i64) -> AppResult<Vec<Series>> {
        let needle = query.to_lowercase();
        let inner = self.inner.read().await;
        Ok(take_limit(
            inner
                .series
                .iter()
                .filter(|s| title_matches(*s, &needle))
                .cloned(),
            limit,
        ))
    }

    async fn save_sports_events(&self, events: Vec<SportsEvent>) -> AppResult<Vec<SportsEvent>> {
        let mut inner = self.inner.write().await;
        let mut stored = Vec::with_capacity(events.len());

        for mut event in events {
            match inner
                .sports
                .iter_mut()
                .find(|e| e.natural_key() == event.natural_key())
            {
                Some(existing) => {
                    event.id = existing.id;
                    *existing = event.clone();
                }
                None => inner.sports.push(event.clone()),
            }
            stored.push(event);
        }

        Ok(stored)
    }

    async fn sports_by_status(
        &self,
        status: EventStatus,
        limit: i64,
    ) -> AppResult<Vec<SportsEvent>> {
        let inner = self.inner.read().await;
        Ok(take_limit(
            inner.sports.iter().filter(|e| e.status == status).cloned(),
            limit,
        ))
    }

    async fn add_to_watchlist(&self, item: &WatchlistItem) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let exists = inner
            .watchlist
            .iter()
            .any(|w| w.user_id == item.user_id && w.content_id == item.content_id);
        if exists {
            return Ok(false);
        }

        inner.watchlist.push(item.clone());
        if let Some(user) = inner.users.iter_mut().find(|u| u.id == item.user_id) {
            if !user.watchlist.contains(&item.content_id) {
                user.watchlist.push(item.content_id.clone());
            }
        }
        Ok(true)
    }

    async fn remove_from_watchlist(&self, user_id: Uuid, content_id: &str) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.watchlist.len();
        inner
            .watchlist
            .retain(|w| !(w.user_id == user_id && w.content_id == content_id));
        let removed = inner.watchlist.len() < before;

        if removed {
            if let Some(user) = inner.users.iter_mut().find(|u| u.id == user_id) {
                user.watchlist.retain(|id| id != content_id);
            }
        }
        Ok(removed)
    }

    async fn watchlist(&self, user_id: Uuid) -> AppResult<Vec<WatchlistItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .watchlist
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentKind;
    use chrono::Utc;

    fn movie(title: &str, tmdb_id: Option<i64>, category: &str) -> Movie {
        Movie {
            id: Uuid::new_v4(),
            tmdb_id,
            title: title.to_string(),
            description: String::new(),
            genre: Vec::new(),
            rating: 7.0,
            year: 2020,
            thumbnail: String::new(),
            backdrop_image: String::new(),
            trailer_url: None,
            categories: vec![category.to_string()],
            duration: None,
            popularity: None,
        }
    }

    fn event(title: &str, status: EventStatus) -> SportsEvent {
        SportsEvent {
            id: Uuid::new_v4(),
            title: title.to_string(),
            sport: "Football".to_string(),
            status,
            teams: Vec::new(),
            venue: None,
            start_time: None,
            image: String::new(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        let first = User::new("viewer@streamflix.io", "A".to_string(), "h".to_string());
        let second = User::new("VIEWER@streamflix.io", "B".to_string(), "h".to_string());

        store.create_user(&first).await.unwrap();
        let err = store.create_user(&second).await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateEmail));
        assert_eq!(
            store
                .user_by_email("viewer@streamflix.io")
                .await
                .unwrap()
                .unwrap()
                .id,
            first.id
        );
    }

    #[tokio::test]
    async fn test_upsert_by_tmdb_id_keeps_id_and_merges_categories() {
        let store = MemoryStore::new();

        let first = store
            .save_movies(vec![movie("Dune", Some(438631), "trending")])
            .await
            .unwrap();
        let second = store
            .save_movies(vec![movie("Dune", Some(438631), "popular")])
            .await
            .unwrap();

        assert_eq!(first[0].id, second[0].id);
        assert_eq!(second[0].categories, vec!["trending", "popular"]);
        assert_eq!(
            store.movies_by_category("trending", 20).await.unwrap().len(),
            1
        );
        assert_eq!(
            store.movies_by_category("popular", 20).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_listing_upsert_keeps_detail_fields() {
        let store = MemoryStore::new();

        let mut detailed = movie("Dune", Some(438631), "trending");
        detailed.trailer_url = Some("https://www.youtube.com/watch?v=n9xhJrPXop4".to_string());
        detailed.duration = Some("155 min".to_string());
        detailed.popularity = Some(88.5);
        store.save_movies(vec![detailed]).await.unwrap();

        let mut listed = movie("Dune", Some(438631), "popular");
        listed.popularity = Some(91.0);
        let stored = store.save_movies(vec![listed]).await.unwrap();

        assert_eq!(
            stored[0].trailer_url.as_deref(),
            Some("https://www.youtube.com/watch?v=n9xhJrPXop4")
        );
        assert_eq!(stored[0].duration.as_deref(), Some("155 min"));
        assert_eq!(stored[0].popularity, Some(91.0));

        let persisted = store.movie_by_tmdb_id(438631).await.unwrap().unwrap();
        assert_eq!(persisted, stored[0]);
    }

    #[tokio::test]
    async fn test_series_upsert_keeps_season_counts() {
        let store = MemoryStore::new();
        let series = |seasons: Option<i32>| Series {
            id: Uuid::new_v4(),
            tmdb_id: Some(1396),
            title: "Breaking Bad".to_string(),
            description: String::new(),
            genre: Vec::new(),
            rating: 8.9,
            year: 2008,
            thumbnail: String::new(),
            backdrop_image: String::new(),
            trailer_url: None,
            categories: Vec::new(),
            seasons,
            episodes: seasons.map(|s| s * 12),
        };

        store.save_series(vec![series(Some(5))]).await.unwrap();
        let stored = store.save_series(vec![series(None)]).await.unwrap();

        assert_eq!(stored[0].seasons, Some(5));
        assert_eq!(stored[0].episodes, Some(60));
    }

    #[tokio::test]
    async fn test_records_without_tmdb_id_upsert_by_internal_id() {
        let store = MemoryStore::new();
        let seeded = movie("Qismat", None, "punjabi");

        store.save_movies(vec![seeded.clone()]).await.unwrap();
        store.save_movies(vec![seeded.clone()]).await.unwrap();
        store
            .save_movies(vec![movie("Qismat", None, "punjabi")])
            .await
            .unwrap();

        assert_eq!(
            store.movies_by_category("punjabi", 20).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring_and_bounded() {
        let store = MemoryStore::new();
        store
            .save_movies(vec![
                movie("The Dark Knight", Some(1), "popular"),
                movie("Dark Waters", Some(2), "popular"),
                movie("Inception", Some(3), "popular"),
            ])
            .await
            .unwrap();

        let hits = store.search_movies("DARK", 10).await.unwrap();
        assert_eq!(hits.len(), 2);

        let bounded = store.search_movies("dark", 1).await.unwrap();
        assert_eq!(bounded.len(), 1);
    }

    #[tokio::test]
    async fn test_sports_upsert_on_title_and_start_time() {
        let store = MemoryStore::new();
        let start = Some(Utc::now());

        let mut live = event("Derby", EventStatus::Live);
        live.start_time = start;
        let stored = store.save_sports_events(vec![live]).await.unwrap();

        let mut finished = event("Derby", EventStatus::Highlights);
        finished.start_time = start;
        let restored = store.save_sports_events(vec![finished]).await.unwrap();

        assert_eq!(stored[0].id, restored[0].id);
        assert!(store
            .sports_by_status(EventStatus::Live, 20)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            store
                .sports_by_status(EventStatus::Highlights, 20)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_watchlist_add_is_idempotent_and_tracks_user_list() {
        let store = MemoryStore::new();
        let user = User::new("viewer@streamflix.io", "V".to_string(), "h".to_string());
        store.create_user(&user).await.unwrap();

        let item = WatchlistItem::new(user.id, "27205".to_string(), ContentKind::Movie);
        assert!(store.add_to_watchlist(&item).await.unwrap());
        assert!(!store.add_to_watchlist(&item).await.unwrap());

        assert_eq!(store.watchlist(user.id).await.unwrap().len(), 1);
        let stored = store.user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.watchlist, vec!["27205"]);

        assert!(store.remove_from_watchlist(user.id, "27205").await.unwrap());
        assert!(!store.remove_from_watchlist(user.id, "27205").await.unwrap());
        let stored = store.user_by_id(user.id).await.unwrap().unwrap();
        assert!(stored.watchlist.is_empty());
    }

    #[tokio::test]
    async fn test_update_preferences() {
        let store = MemoryStore::new();
        let user = User::new("viewer@streamflix.io", "V".to_string(), "h".to_string());
        store.create_user(&user).await.unwrap();

        let mut prefs = Preferences::new();
        prefs.insert("language".to_string(), serde_json::json!("pa"));

        assert!(store.update_preferences(user.id, &prefs).await.unwrap());
        assert!(!store
            .update_preferences(Uuid::new_v4(), &prefs)
            .await
            .unwrap());
        assert_eq!(
            store.user_by_id(user.id).await.unwrap().unwrap().preferences,
            prefs
        );
    }
}
