pub mod auth;
pub mod catalog;
pub mod search;
pub mod sports;

pub use auth::CredentialService;
pub use catalog::{CatalogProvider, MovieCategory, SearchHits, SeriesCategory, TmdbProvider};
pub use sports::{EventSource, MockEventProvider};
