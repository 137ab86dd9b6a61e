use std::collections::HashSet;

use crate::{models::CatalogRecord, services::catalog::SearchHits};

/// Upper bound on each result list returned to the client
pub const SEARCH_RESULT_CAP: usize = 20;

/// Persisted hits fetched per kind for each search
pub const LOCAL_SEARCH_LIMIT: i64 = 10;

/// External hits first, then local hits whose catalog id is not among them.
/// Local records without a catalog id are never treated as duplicates.
pub fn merge_records<T: CatalogRecord>(external: Vec<T>, local: Vec<T>) -> Vec<T> {
    let seen: HashSet<i64> = external.iter().filter_map(|r| r.tmdb_id()).collect();

    let mut merged = external;
    merged.extend(
        local
            .into_iter()
            .filter(|r| r.tmdb_id().map_or(true, |id| !seen.contains(&id))),
    );
    merged
}

/// Merges external and persisted search results
///
/// Returns each list capped at [`SEARCH_RESULT_CAP`] together with the
/// merged total counted before capping.
pub fn merge_results(external: SearchHits, local: SearchHits) -> (SearchHits, usize) {
    let mut movies = merge_records(external.movies, local.movies);
    let mut series = merge_records(external.series, local.series);
    let total = movies.len() + series.len();

    movies.truncate(SEARCH_RESULT_CAP);
    series.truncate(SEARCH_RESULT_CAP);

    (SearchHits { movies, series }, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;
    use uuid::Uuid;

    fn movie(title: &str, tmdb_id: Option<i64>) -> Movie {
        Movie {
            id: Uuid::new_v4(),
            tmdb_id,
            title: title.to_string(),
            description: String::new(),
            genre: Vec::new(),
            rating: 0.0,
            year: 2020,
            thumbnail: String::new(),
            backdrop_image: String::new(),
            trailer_url: None,
            categories: Vec::new(),
            duration: None,
            popularity: None,
        }
    }

    #[test]
    fn test_external_hits_take_precedence() {
        let external = vec![movie("Dune (catalog)", Some(438631))];
        let local = vec![
            movie("Dune (stored)", Some(438631)),
            movie("Dune: Part Two", Some(693134)),
        ];

        let merged = merge_records(external, local);
        let titles: Vec<&str> = merged.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune (catalog)", "Dune: Part Two"]);
    }

    #[test]
    fn test_local_records_without_catalog_id_are_kept() {
        let merged = merge_records(
            vec![movie("Sufna", Some(1))],
            vec![movie("Sufna", None)],
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_zero_external_hits_returns_local_movie() {
        let local = SearchHits {
            movies: vec![movie("Qismat", None)],
            series: Vec::new(),
        };

        let (hits, total) = merge_results(SearchHits::default(), local);
        assert_eq!(hits.movies.len(), 1);
        assert_eq!(hits.movies[0].title, "Qismat");
        assert!(hits.series.is_empty());
        assert_eq!(total, 1);
    }

    #[test]
    fn test_lists_are_capped_but_total_is_not() {
        let external = SearchHits {
            movies: (0..25).map(|i| movie(&format!("M{}", i), Some(i))).collect(),
            series: Vec::new(),
        };
        let local = SearchHits {
            movies: vec![movie("Local", Some(100))],
            series: Vec::new(),
        };

        let (hits, total) = merge_results(external, local);
        assert_eq!(hits.movies.len(), SEARCH_RESULT_CAP);
        assert_eq!(hits.movies[0].title, "M0");
        assert_eq!(total, 26);
    }
}
