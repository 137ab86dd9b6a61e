use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A movie record, either mapped from the catalog provider or seeded locally
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Movie {
    pub id: Uuid,
    /// Catalog provider id; `None` for locally seeded entries
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub genre: Vec<String>,
    pub rating: f64,
    pub year: i32,
    /// Poster URL, empty when the provider has no poster
    pub thumbnail: String,
    /// Backdrop URL, empty when the provider has no backdrop
    pub backdrop_image: String,
    pub trailer_url: Option<String>,
    /// Listing categories this record has been served under
    pub categories: Vec<String>,
    pub duration: Option<String>,
    pub popularity: Option<f64>,
}

/// A TV series record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Series {
    pub id: Uuid,
    pub tmdb_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub genre: Vec<String>,
    pub rating: f64,
    pub year: i32,
    pub thumbnail: String,
    pub backdrop_image: String,
    pub trailer_url: Option<String>,
    pub categories: Vec<String>,
    pub seasons: Option<i32>,
    pub episodes: Option<i32>,
}

/// Shared accessors used by the persistence layer for upserts and merges
pub trait CatalogRecord: Clone + Send + Sync {
    fn id(&self) -> Uuid;
    fn set_id(&mut self, id: Uuid);
    fn tmdb_id(&self) -> Option<i64>;
    fn title(&self) -> &str;
    fn categories(&self) -> &[String];
    fn categories_mut(&mut self) -> &mut Vec<String>;

    /// Takes the optional detail fields this record lacks from the stored
    /// copy, so a listing save never clears what a detail save wrote
    fn keep_details_from(&mut self, stored: &Self);

    fn has_category(&self, category: &str) -> bool {
        self.categories().iter().any(|c| c == category)
    }
}

macro_rules! impl_catalog_record {
    ($ty:ty) => {
        impl CatalogRecord for $ty {
            fn id(&self) -> Uuid {
                self.id
            }

            fn set_id(&mut self, id: Uuid) {
                self.id = id;
            }

            fn tmdb_id(&self) -> Option<i64> {
                self.tmdb_id
            }

            fn title(&self) -> &str {
                &self.title
            }

            fn categories(&self) -> &[String] {
                &self.categories
            }

            fn categories_mut(&mut self) -> &mut Vec<String> {
                &mut self.categories
            }

            fn keep_details_from(&mut self, stored: &Self) {
                self.keep_details(stored);
            }
        }
    };
}

impl_catalog_record!(Movie);
impl_catalog_record!(Series);

fn keep_if_missing<T: Clone>(field: &mut Option<T>, stored: &Option<T>) {
    if field.is_none() {
        field.clone_from(stored);
    }
}

impl Movie {
    fn keep_details(&mut self, stored: &Movie) {
        keep_if_missing(&mut self.trailer_url, &stored.trailer_url);
        keep_if_missing(&mut self.duration, &stored.duration);
        keep_if_missing(&mut self.popularity, &stored.popularity);
    }
}

impl Series {
    fn keep_details(&mut self, stored: &Series) {
        keep_if_missing(&mut self.trailer_url, &stored.trailer_url);
        keep_if_missing(&mut self.seasons, &stored.seasons);
        keep_if_missing(&mut self.episodes, &stored.episodes);
    }
}

/// Appends the categories of `incoming` that `existing` does not carry yet
pub fn merge_categories(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut merged = existing.to_vec();
    for category in incoming {
        if !merged.contains(category) {
            merged.push(category.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_categories_keeps_order_and_dedupes() {
        let existing = vec!["trending".to_string(), "popular".to_string()];
        let incoming = vec!["popular".to_string(), "anime".to_string()];

        assert_eq!(
            merge_categories(&existing, &incoming),
            vec!["trending", "popular", "anime"]
        );
    }

    #[test]
    fn test_movie_serializes_nullable_fields() {
        let movie = Movie {
            id: Uuid::nil(),
            tmdb_id: None,
            title: "Qismat".to_string(),
            description: "A romantic drama".to_string(),
            genre: vec!["Romance".to_string()],
            rating: 8.5,
            year: 2018,
            thumbnail: String::new(),
            backdrop_image: String::new(),
            trailer_url: None,
            categories: vec!["punjabi".to_string()],
            duration: Some("141 min".to_string()),
            popularity: None,
        };

        let json = serde_json::to_value(&movie).unwrap();
        assert!(json["tmdb_id"].is_null());
        assert_eq!(json["thumbnail"], "");
        assert!(movie.has_category("punjabi"));
    }
}
