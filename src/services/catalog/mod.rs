//! Catalog provider abstraction
//!
//! A provider turns category listings, detail lookups and text searches into
//! internal `Movie`/`Series` records. Failures are reported explicitly: a
//! transport error or non-2xx status is an `Err`, while a successful call with
//! no matches is an empty `Ok`. Callers decide how to fall back.

use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{Movie, Series},
};

pub mod fallback;
pub mod genres;
pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Movie listing categories. Each maps to one catalog query and one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieCategory {
    Trending,
    Popular,
    Hindi,
    OldHindi,
    TrendingHindi,
    Punjabi,
    OldPunjabi,
    TrendingPunjabi,
    Anime,
}

impl MovieCategory {
    /// Tag written into `Movie::categories` and used for fallback reads
    pub fn tag(self) -> &'static str {
        match self {
            MovieCategory::Trending => "trending",
            MovieCategory::Popular => "popular",
            MovieCategory::Hindi => "hindi",
            MovieCategory::OldHindi => "old_hindi",
            MovieCategory::TrendingHindi => "trending_hindi",
            MovieCategory::Punjabi => "punjabi",
            MovieCategory::OldPunjabi => "old_punjabi",
            MovieCategory::TrendingPunjabi => "trending_punjabi",
            MovieCategory::Anime => "anime",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            MovieCategory::Trending => "trending/movie/week",
            MovieCategory::Popular => "movie/popular",
            _ => "discover/movie",
        }
    }

    /// Filter set sent along with the page number
    pub fn filters(self) -> &'static [(&'static str, &'static str)] {
        match self {
            MovieCategory::Trending | MovieCategory::Popular => &[],
            MovieCategory::Hindi => &[
                ("with_original_language", "hi"),
                ("sort_by", "popularity.desc"),
            ],
            MovieCategory::OldHindi => &[
                ("with_original_language", "hi"),
                ("primary_release_date.lte", "2000-12-31"),
                ("sort_by", "popularity.desc"),
            ],
            MovieCategory::TrendingHindi => &[
                ("with_original_language", "hi"),
                ("primary_release_date.gte", "2020-01-01"),
                ("sort_by", "vote_average.desc"),
            ],
            MovieCategory::Punjabi => &[
                ("with_original_language", "pa"),
                ("sort_by", "popularity.desc"),
            ],
            MovieCategory::OldPunjabi => &[
                ("with_original_language", "pa"),
                ("primary_release_date.lte", "2010-12-31"),
                ("sort_by", "popularity.desc"),
            ],
            MovieCategory::TrendingPunjabi => &[
                ("with_original_language", "pa"),
                ("primary_release_date.gte", "2018-01-01"),
                ("sort_by", "vote_average.desc"),
            ],
            MovieCategory::Anime => &[
                ("with_genres", "16"),
                ("with_origin_country", "JP"),
                ("sort_by", "popularity.desc"),
            ],
        }
    }

    /// Fixed list substituted when the catalog has no entries for this category
    pub fn static_fallback(self) -> Vec<Movie> {
        fallback::static_movies(self.tag())
    }
}

/// Series listing categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesCategory {
    Trending,
    Web,
}

impl SeriesCategory {
    pub fn tag(self) -> &'static str {
        match self {
            SeriesCategory::Trending => "series",
            SeriesCategory::Web => "web_series",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            SeriesCategory::Trending => "trending/tv/week",
            SeriesCategory::Web => "discover/tv",
        }
    }

    pub fn filters(self) -> &'static [(&'static str, &'static str)] {
        match self {
            SeriesCategory::Trending => &[],
            SeriesCategory::Web => &[
                ("sort_by", "popularity.desc"),
                ("vote_average.gte", "7.0"),
            ],
        }
    }
}

/// External search results, split by kind
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchHits {
    pub movies: Vec<Movie>,
    pub series: Vec<Series>,
}

/// Trait for catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch one page of a movie category, every record tagged with the category
    async fn movies(&self, category: MovieCategory, page: u32) -> AppResult<Vec<Movie>>;

    /// Fetch one page of a series category, every record tagged with the category
    async fn series(&self, category: SeriesCategory, page: u32) -> AppResult<Vec<Series>>;

    /// Look up a movie by catalog id. `Ok(None)` when the catalog does not know it.
    async fn movie_details(&self, tmdb_id: i64) -> AppResult<Option<Movie>>;

    /// Look up a series by catalog id. `Ok(None)` when the catalog does not know it.
    async fn series_details(&self, tmdb_id: i64) -> AppResult<Option<Series>>;

    /// Search movies and series by text
    async fn search(&self, query: &str, page: u32) -> AppResult<SearchHits>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
