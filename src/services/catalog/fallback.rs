//! Fixed regional lists served when the catalog has nothing for a category.

use uuid::Uuid;

use crate::models::Movie;

struct SeedMovie {
    title: &'static str,
    description: &'static str,
    year: i32,
    rating: f64,
    genre: &'static [&'static str],
    thumbnail: &'static str,
    backdrop: &'static str,
    duration: &'static str,
}

const PUNJABI: &[SeedMovie] = &[
    SeedMovie {
        title: "Chal Mera Putt",
        description: "A comedy-drama about Punjabi immigrants living in the UK and their struggles and friendships.",
        year: 2019,
        rating: 8.2,
        genre: &["Comedy", "Drama"],
        thumbnail: "https://images.unsplash.com/photo-1626814026160-2237a95fc5a0?w=300&h=400&fit=crop&sat=1.2&hue=30",
        backdrop: "https://images.unsplash.com/photo-1626814026160-2237a95fc5a0?w=1280&h=720&fit=crop&sat=1.2&hue=30",
        duration: "132 min",
    },
    SeedMovie {
        title: "Qismat",
        description: "A romantic drama about love, destiny, and the choices that shape our lives.",
        year: 2018,
        rating: 8.5,
        genre: &["Romance", "Drama"],
        thumbnail: "https://images.unsplash.com/photo-1572188863110-46d457c9234d?w=300&h=400&fit=crop&sat=1.3&hue=350",
        backdrop: "https://images.unsplash.com/photo-1572188863110-46d457c9234d?w=1280&h=720&fit=crop&sat=1.3&hue=350",
        duration: "141 min",
    },
    SeedMovie {
        title: "Shadaa",
        description: "A comedy about a man in his 30s who is still unmarried and the pressures he faces from family.",
        year: 2019,
        rating: 7.8,
        genre: &["Comedy", "Romance"],
        thumbnail: "https://images.unsplash.com/photo-1616530940355-351fabd9524b?w=300&h=400&fit=crop&sat=1.1&hue=60",
        backdrop: "https://images.unsplash.com/photo-1616530940355-351fabd9524b?w=1280&h=720&fit=crop&sat=1.1&hue=60",
        duration: "127 min",
    },
];

const OLD_PUNJABI: &[SeedMovie] = &[
    SeedMovie {
        title: "Maula Jatt",
        description: "Classic Punjabi action film about a legendary warrior and his battles.",
        year: 1979,
        rating: 8.0,
        genre: &["Action", "Drama"],
        thumbnail: "https://images.unsplash.com/photo-1626814026160-2237a95fc5a0?w=300&h=400&fit=crop&sat=0.8&contrast=1.2",
        backdrop: "https://images.unsplash.com/photo-1626814026160-2237a95fc5a0?w=1280&h=720&fit=crop&sat=0.8&contrast=1.2",
        duration: "135 min",
    },
    SeedMovie {
        title: "Putt Jattan De",
        description: "A classic family drama showcasing Punjabi culture and traditions.",
        year: 1982,
        rating: 7.5,
        genre: &["Drama", "Family"],
        thumbnail: "https://images.unsplash.com/photo-1572188863110-46d457c9234d?w=300&h=400&fit=crop&sat=0.7&sepia=0.3",
        backdrop: "https://images.unsplash.com/photo-1572188863110-46d457c9234d?w=1280&h=720&fit=crop&sat=0.7&sepia=0.3",
        duration: "142 min",
    },
];

const TRENDING_PUNJABI: &[SeedMovie] = &[
    SeedMovie {
        title: "Honsla Rakh",
        description: "A modern comedy-drama about single parenthood and love.",
        year: 2021,
        rating: 8.1,
        genre: &["Comedy", "Romance"],
        thumbnail: "https://images.unsplash.com/photo-1616530940355-351fabd9524b?w=300&h=400&fit=crop&brightness=1.1&hue=45",
        backdrop: "https://images.unsplash.com/photo-1616530940355-351fabd9524b?w=1280&h=720&fit=crop&brightness=1.1&hue=45",
        duration: "145 min",
    },
    SeedMovie {
        title: "Sufna",
        description: "A romantic drama about dreams, aspirations, and the journey of love.",
        year: 2020,
        rating: 8.3,
        genre: &["Romance", "Drama"],
        thumbnail: "https://images.unsplash.com/photo-1626814026160-2237a95fc5a0?w=300&h=400&fit=crop&hue=320&sat=1.2",
        backdrop: "https://images.unsplash.com/photo-1626814026160-2237a95fc5a0?w=1280&h=720&fit=crop&hue=320&sat=1.2",
        duration: "130 min",
    },
];

/// Seed table for a category tag, if the category has one
fn seeds(category: &str) -> Option<&'static [SeedMovie]> {
    match category {
        "punjabi" => Some(PUNJABI),
        "old_punjabi" => Some(OLD_PUNJABI),
        "trending_punjabi" => Some(TRENDING_PUNJABI),
        _ => None,
    }
}

/// Builds the static list for `category`. Ids are derived from the category
/// and title so the same entry always upserts onto the same row.
pub fn static_movies(category: &str) -> Vec<Movie> {
    let Some(table) = seeds(category) else {
        return Vec::new();
    };

    table
        .iter()
        .map(|seed| Movie {
            id: Uuid::new_v5(
                &Uuid::NAMESPACE_URL,
                format!("streamflix:{}:{}", category, seed.title).as_bytes(),
            ),
            tmdb_id: None,
            title: seed.title.to_string(),
            description: seed.description.to_string(),
            genre: seed.genre.iter().map(|g| g.to_string()).collect(),
            rating: seed.rating,
            year: seed.year,
            thumbnail: seed.thumbnail.to_string(),
            backdrop_image: seed.backdrop.to_string(),
            trailer_url: None,
            categories: vec![category.to_string()],
            duration: Some(seed.duration.to_string()),
            popularity: None,
        })
        .collect()
}
