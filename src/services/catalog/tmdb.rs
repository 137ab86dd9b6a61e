//! TMDB catalog provider
//!
//! API flow:
//! 1. Listings: `/trending/{movie,tv}/week`, `/movie/popular`, `/discover/{movie,tv}`
//!    with a per-category filter set
//! 2. Details: `/movie/{id}` and `/tv/{id}` with `append_to_response=videos`
//! 3. Search: `/search/movie` and `/search/tv`
//!
//! Detail and search responses go through the Redis cache when one is configured.

use reqwest::{Client as HttpClient, StatusCode};
use uuid::Uuid;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{Movie, Series, TmdbMovie, TmdbPage, TmdbSeries},
    services::catalog::{
        genres::{movie_genre_names, tv_genre_names},
        CatalogProvider, MovieCategory, SearchHits, SeriesCategory,
    },
};

const DETAILS_CACHE_TTL: u64 = 86_400; // 1 day
const SEARCH_CACHE_TTL: u64 = 3_600; // 1 hour

/// Year used when the catalog has no release date
pub const FALLBACK_YEAR: i32 = 2023;
const FALLBACK_RUNTIME: &str = "120 min";
const FALLBACK_SEASONS: i32 = 1;
const FALLBACK_EPISODES: i32 = 10;
const UNKNOWN_TITLE: &str = "Unknown Title";
const NO_DESCRIPTION: &str = "No description available";

pub const DEFAULT_IMAGE_URL: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_BACKDROP_URL: &str = "https://image.tmdb.org/t/p/w1280";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    backdrop_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            backdrop_url: DEFAULT_BACKDROP_URL.to_string(),
            cache,
        }
    }

    /// Overrides the poster and backdrop base URLs
    pub fn with_image_urls(mut self, image_url: String, backdrop_url: String) -> Self {
        self.image_url = image_url;
        self.backdrop_url = backdrop_url;
        self
    }

    /// Issues one GET against the catalog API
    ///
    /// A 404 becomes `AppError::NotFound`; any other non-2xx status becomes
    /// `AppError::ExternalApi`.
    pub async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> AppResult<serde_json::Value> {
        let url = format!("{}/{}", self.api_url, endpoint);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB resource {}", endpoint)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    fn image(base: &str, path: Option<&str>) -> String {
        match path {
            Some(path) if !path.is_empty() => format!("{}{}", base, path),
            _ => String::new(),
        }
    }

    /// Maps a catalog movie onto the internal record. Categories are left
    /// empty for the caller to fill in.
    pub fn map_movie(&self, raw: TmdbMovie) -> AppResult<Movie> {
        let genre = if raw.genres.is_empty() {
            movie_genre_names(&raw.genre_ids)
        } else {
            raw.genres.into_iter().map(|g| g.name).collect()
        };

        Ok(Movie {
            id: Uuid::new_v4(),
            tmdb_id: Some(raw.id),
            title: raw.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            description: raw.overview.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            genre,
            rating: raw.vote_average.unwrap_or(0.0),
            year: release_year(raw.release_date.as_deref())?,
            thumbnail: Self::image(&self.image_url, raw.poster_path.as_deref()),
            backdrop_image: Self::image(&self.backdrop_url, raw.backdrop_path.as_deref()),
            trailer_url: raw.videos.and_then(|v| v.trailer_url()),
            categories: Vec::new(),
            duration: Some(match raw.runtime {
                Some(minutes) if minutes > 0 => format!("{} min", minutes),
                _ => FALLBACK_RUNTIME.to_string(),
            }),
            popularity: Some(raw.popularity.unwrap_or(0.0)),
        })
    }

    /// Maps a catalog series onto the internal record
    pub fn map_series(&self, raw: TmdbSeries) -> AppResult<Series> {
        let genre = if raw.genres.is_empty() {
            tv_genre_names(&raw.genre_ids)
        } else {
            raw.genres.into_iter().map(|g| g.name).collect()
        };

        Ok(Series {
            id: Uuid::new_v4(),
            tmdb_id: Some(raw.id),
            title: raw.name.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            description: raw.overview.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            genre,
            rating: raw.vote_average.unwrap_or(0.0),
            year: release_year(raw.first_air_date.as_deref())?,
            thumbnail: Self::image(&self.image_url, raw.poster_path.as_deref()),
            backdrop_image: Self::image(&self.backdrop_url, raw.backdrop_path.as_deref()),
            trailer_url: raw.videos.and_then(|v| v.trailer_url()),
            categories: Vec::new(),
            seasons: Some(raw.number_of_seasons.unwrap_or(FALLBACK_SEASONS)),
            episodes: Some(raw.number_of_episodes.unwrap_or(FALLBACK_EPISODES)),
        })
    }

    /// Maps every entry of a list page, skipping entries that fail to decode
    /// or map, and tags the rest with `category` when given
    pub fn collect_movies(&self, page: TmdbPage, category: Option<&str>) -> Vec<Movie> {
        page.results
            .into_iter()
            .filter_map(|entry| {
                let mapped = serde_json::from_value::<TmdbMovie>(entry)
                    .map_err(|e| AppError::ExternalApi(e.to_string()))
                    .and_then(|raw| self.map_movie(raw));

                match mapped {
                    Ok(mut movie) => {
                        if let Some(category) = category {
                            movie.categories = vec![category.to_string()];
                        }
                        Some(movie)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, category = ?category, "Skipping malformed movie record");
                        None
                    }
                }
            })
            .collect()
    }

    pub fn collect_series(&self, page: TmdbPage, category: Option<&str>) -> Vec<Series> {
        page.results
            .into_iter()
            .filter_map(|entry| {
                let mapped = serde_json::from_value::<TmdbSeries>(entry)
                    .map_err(|e| AppError::ExternalApi(e.to_string()))
                    .and_then(|raw| self.map_series(raw));

                match mapped {
                    Ok(mut series) => {
                        if let Some(category) = category {
                            series.categories = vec![category.to_string()];
                        }
                        Some(series)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, category = ?category, "Skipping malformed series record");
                        None
                    }
                }
            })
            .collect()
    }

    /// Category listing from a decoded page. Categories with a static list
    /// get that list when the page has no usable entries.
    pub fn movies_for_category(&self, category: MovieCategory, page: TmdbPage) -> Vec<Movie> {
        let movies = self.collect_movies(page, Some(category.tag()));
        if movies.is_empty() {
            let fallback = category.static_fallback();
            if !fallback.is_empty() {
                tracing::info!(
                    category = category.tag(),
                    count = fallback.len(),
                    "Catalog returned no entries, serving static list"
                );
                return fallback;
            }
        }
        movies
    }

    async fn fetch_page(
        &self,
        endpoint: &str,
        filters: &[(&str, &str)],
        page: u32,
    ) -> AppResult<TmdbPage> {
        let mut params: Vec<(&str, String)> = vec![("page", page.max(1).to_string())];
        params.extend(filters.iter().map(|(k, v)| (*k, v.to_string())));

        let value = self.fetch(endpoint, &params).await?;
        serde_json::from_value(value)
            .map_err(|e| AppError::ExternalApi(format!("Invalid TMDB page: {}", e)))
    }

    async fn fetch_details<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> AppResult<Option<T>> {
        let params = [("append_to_response", "videos".to_string())];
        match self.fetch(endpoint, &params).await {
            Ok(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| AppError::ExternalApi(format!("Invalid TMDB details: {}", e))),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Year from a `YYYY-MM-DD` date. Absent or empty dates use
/// [`FALLBACK_YEAR`]; anything else that does not start with a year is an error.
pub fn release_year(date: Option<&str>) -> AppResult<i32> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(FALLBACK_YEAR),
        Some(date) => date
            .get(..4)
            .and_then(|year| year.parse().ok())
            .ok_or_else(|| AppError::ExternalApi(format!("Unparseable release date: {}", date))),
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn movies(&self, category: MovieCategory, page: u32) -> AppResult<Vec<Movie>> {
        let data = self
            .fetch_page(category.endpoint(), category.filters(), page)
            .await?;
        let movies = self.movies_for_category(category, data);

        tracing::info!(
            category = category.tag(),
            results = movies.len(),
            provider = "tmdb",
            "Movie category fetched"
        );

        Ok(movies)
    }

    async fn series(&self, category: SeriesCategory, page: u32) -> AppResult<Vec<Series>> {
        let data = self
            .fetch_page(category.endpoint(), category.filters(), page)
            .await?;
        let series = self.collect_series(data, Some(category.tag()));

        tracing::info!(
            category = category.tag(),
            results = series.len(),
            provider = "tmdb",
            "Series category fetched"
        );

        Ok(series)
    }

    async fn movie_details(&self, tmdb_id: i64) -> AppResult<Option<Movie>> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(tmdb_id),
            DETAILS_CACHE_TTL,
            async move {
                match self
                    .fetch_details::<TmdbMovie>(&format!("movie/{}", tmdb_id))
                    .await?
                {
                    Some(raw) => self.map_movie(raw).map(Some),
                    None => Ok(None),
                }
            }
        )
    }

    async fn series_details(&self, tmdb_id: i64) -> AppResult<Option<Series>> {
        cached!(
            self.cache,
            CacheKey::SeriesDetails(tmdb_id),
            DETAILS_CACHE_TTL,
            async move {
                match self
                    .fetch_details::<TmdbSeries>(&format!("tv/{}", tmdb_id))
                    .await?
                {
                    Some(raw) => self.map_series(raw).map(Some),
                    None => Ok(None),
                }
            }
        )
    }

    async fn search(&self, query: &str, page: u32) -> AppResult<SearchHits> {
        cached!(
            self.cache,
            CacheKey::Search {
                query: query.to_string(),
                page,
            },
            SEARCH_CACHE_TTL,
            async move {
                let filters = [("query", query)];
                let movie_page = self.fetch_page("search/movie", &filters, page).await?;
                let series_page = self.fetch_page("search/tv", &filters, page).await?;

                let hits = SearchHits {
                    movies: self.collect_movies(movie_page, None),
                    series: self.collect_series(series_page, None),
                };

                tracing::info!(
                    query = %query,
                    movies = hits.movies.len(),
                    series = hits.series.len(),
                    provider = "tmdb",
                    "Search completed"
                );

                Ok::<_, AppError>(hits)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_provider() -> TmdbProvider {
        let (cache, _handle) = Cache::disabled();
        TmdbProvider::new(
            cache,
            "test_key".to_string(),
            "http://test.local/3/".to_string(),
        )
    }

    fn page(results: Vec<serde_json::Value>) -> TmdbPage {
        TmdbPage { results }
    }

    #[test]
    fn test_api_url_trailing_slash_is_trimmed() {
        assert_eq!(create_test_provider().api_url, "http://test.local/3");
    }

    #[test]
    fn test_release_year_parsing() {
        assert_eq!(release_year(Some("2010-07-15")).unwrap(), 2010);
        assert_eq!(release_year(None).unwrap(), FALLBACK_YEAR);
        assert_eq!(release_year(Some("")).unwrap(), FALLBACK_YEAR);
        assert!(release_year(Some("soon")).is_err());
    }

    #[test]
    fn test_map_movie_uses_genre_ids_when_genres_absent() {
        let provider = create_test_provider();
        let raw: TmdbMovie = serde_json::from_value(json!({
            "id": 27205,
            "title": "Inception",
            "genre_ids": [28, 878],
            "vote_average": 8.4,
            "release_date": "2010-07-15",
            "poster_path": "/poster.jpg"
        }))
        .unwrap();

        let movie = provider.map_movie(raw).unwrap();
        assert_eq!(movie.tmdb_id, Some(27205));
        assert_eq!(movie.genre, vec!["Action", "Science Fiction"]);
        assert_eq!(movie.year, 2010);
        assert_eq!(movie.thumbnail, "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert_eq!(movie.backdrop_image, "");
        assert_eq!(movie.duration.as_deref(), Some("120 min"));
        assert_eq!(movie.description, "No description available");
    }

    #[test]
    fn test_map_movie_prefers_structured_genres_and_runtime() {
        let provider = create_test_provider();
        let raw: TmdbMovie = serde_json::from_value(json!({
            "id": 1,
            "genres": [{"id": 18, "name": "Drama"}],
            "genre_ids": [28],
            "runtime": 148,
            "videos": {"results": [{"key": "YoHD9XEInc0", "site": "YouTube", "type": "Trailer"}]}
        }))
        .unwrap();

        let movie = provider.map_movie(raw).unwrap();
        assert_eq!(movie.title, "Unknown Title");
        assert_eq!(movie.genre, vec!["Drama"]);
        assert_eq!(movie.duration.as_deref(), Some("148 min"));
        assert_eq!(movie.year, FALLBACK_YEAR);
        assert_eq!(
            movie.trailer_url.as_deref(),
            Some("https://www.youtube.com/watch?v=YoHD9XEInc0")
        );
    }

    #[test]
    fn test_map_series_defaults() {
        let provider = create_test_provider();
        let raw: TmdbSeries = serde_json::from_value(json!({
            "id": 1399,
            "name": "Game of Thrones",
            "genre_ids": [10765],
            "first_air_date": "2011-04-17",
            "backdrop_path": "/backdrop.jpg"
        }))
        .unwrap();

        let series = provider.map_series(raw).unwrap();
        assert_eq!(series.genre, vec!["Sci-Fi & Fantasy"]);
        assert_eq!(series.year, 2011);
        assert_eq!(series.seasons, Some(1));
        assert_eq!(series.episodes, Some(10));
        assert_eq!(series.thumbnail, "");
        assert_eq!(
            series.backdrop_image,
            "https://image.tmdb.org/t/p/w1280/backdrop.jpg"
        );
    }

    #[test]
    fn test_collect_movies_skips_malformed_records() {
        let provider = create_test_provider();
        let movies = provider.collect_movies(
            page(vec![
                json!({"id": 1, "title": "Good", "release_date": "2001-01-01"}),
                json!({"title": "No id"}),
                json!({"id": 3, "title": "Bad date", "release_date": "n/a"}),
                json!({"id": 4, "title": "Also good"}),
            ]),
            Some("hindi"),
        );

        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Good", "Also good"]);
        assert!(movies
            .iter()
            .all(|m| m.categories == vec!["hindi".to_string()]));
    }

    #[test]
    fn test_regional_category_with_no_results_serves_static_list() {
        let provider = create_test_provider();
        let movies = provider.movies_for_category(MovieCategory::Punjabi, page(vec![]));

        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].title, "Chal Mera Putt");
        assert!(movies
            .iter()
            .all(|m| m.categories == vec!["punjabi".to_string()]));
    }

    #[test]
    fn test_non_regional_category_with_no_results_stays_empty() {
        let provider = create_test_provider();
        assert!(provider
            .movies_for_category(MovieCategory::Hindi, page(vec![]))
            .is_empty());
    }

    #[test]
    fn test_regional_category_with_results_keeps_them() {
        let provider = create_test_provider();
        let movies = provider.movies_for_category(
            MovieCategory::TrendingPunjabi,
            page(vec![json!({"id": 77, "title": "Carry On Jatta 3"})]),
        );

        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].tmdb_id, Some(77));
        assert_eq!(movies[0].categories, vec!["trending_punjabi"]);
    }

    #[tokio::test]
    async fn test_unreachable_catalog_is_an_error_not_empty() {
        let (cache, _handle) = Cache::disabled();
        let provider = TmdbProvider::new(
            cache,
            "test_key".to_string(),
            "http://127.0.0.1:1/3".to_string(),
        );

        assert!(provider.movies(MovieCategory::Popular, 1).await.is_err());
    }
}
