//! Static TMDB genre id tables, used when a list response only carries
//! `genre_ids`.

const UNKNOWN_GENRE: &str = "Unknown";

const MOVIE_GENRES: &[(i64, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

const TV_GENRES: &[(i64, &str)] = &[
    (10759, "Action & Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (10762, "Kids"),
    (9648, "Mystery"),
    (10763, "News"),
    (10764, "Reality"),
    (10765, "Sci-Fi & Fantasy"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "War & Politics"),
    (37, "Western"),
];

fn lookup(table: &[(i64, &str)], ids: &[i64]) -> Vec<String> {
    ids.iter()
        .map(|id| {
            table
                .iter()
                .find(|(gid, _)| gid == id)
                .map(|(_, name)| *name)
                .unwrap_or(UNKNOWN_GENRE)
                .to_string()
        })
        .collect()
}

pub fn movie_genre_names(ids: &[i64]) -> Vec<String> {
    lookup(MOVIE_GENRES, ids)
}

pub fn tv_genre_names(ids: &[i64]) -> Vec<String> {
    lookup(TV_GENRES, ids)
}
