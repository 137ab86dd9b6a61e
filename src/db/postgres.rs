use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    types::Json,
    PgPool,
};
use uuid::Uuid;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::{
        ContentKind, EventStatus, Movie, Preferences, Series, SportsEvent, User, WatchlistItem,
    },
};

/// Creates a PostgreSQL connection pool
///
/// `database_name`, when set, overrides the database named in the URL.
pub async fn create_pool(database_url: &str, database_name: Option<&str>) -> anyhow::Result<PgPool> {
    let mut options = PgConnectOptions::from_str(database_url)?;
    if let Some(name) = database_name {
        options = options.database(name);
    }

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Applies the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const MOVIE_COLUMNS: &str = "id, tmdb_id, title, description, genre, rating, year, thumbnail, \
     backdrop_image, trailer_url, categories, duration, popularity";

const SERIES_COLUMNS: &str = "id, tmdb_id, title, description, genre, rating, year, thumbnail, \
     backdrop_image, trailer_url, categories, seasons, episodes";

const SPORTS_COLUMNS: &str =
    "id, title, sport, status, teams, venue, start_time, image, description";

const USER_COLUMNS: &str = "id, email, name, password_hash, watchlist, preferences, created_at";

/// Union of stored and incoming categories, first occurrence order kept
fn merged_categories_sql(table: &str) -> String {
    format!(
        "ARRAY(SELECT c FROM unnest({table}.categories || EXCLUDED.categories) \
         WITH ORDINALITY AS t(c, n) GROUP BY c ORDER BY min(n))"
    )
}

fn upsert_movie_sql(conflict: &str) -> String {
    format!(
        "INSERT INTO movies ({MOVIE_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         ON CONFLICT ({conflict}) DO UPDATE SET \
             title = EXCLUDED.title, description = EXCLUDED.description, \
             genre = EXCLUDED.genre, rating = EXCLUDED.rating, year = EXCLUDED.year, \
             thumbnail = EXCLUDED.thumbnail, backdrop_image = EXCLUDED.backdrop_image, \
             trailer_url = COALESCE(EXCLUDED.trailer_url, movies.trailer_url), \
             categories = {categories}, \
             duration = COALESCE(EXCLUDED.duration, movies.duration), \
             popularity = COALESCE(EXCLUDED.popularity, movies.popularity), \
             updated_at = now() \
         RETURNING {MOVIE_COLUMNS}",
        categories = merged_categories_sql("movies"),
    )
}

fn upsert_series_sql(conflict: &str) -> String {
    format!(
        "INSERT INTO series ({SERIES_COLUMNS}) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         ON CONFLICT ({conflict}) DO UPDATE SET \
             title = EXCLUDED.title, description = EXCLUDED.description, \
             genre = EXCLUDED.genre, rating = EXCLUDED.rating, year = EXCLUDED.year, \
             thumbnail = EXCLUDED.thumbnail, backdrop_image = EXCLUDED.backdrop_image, \
             trailer_url = COALESCE(EXCLUDED.trailer_url, series.trailer_url), \
             categories = {categories}, \
             seasons = COALESCE(EXCLUDED.seasons, series.seasons), \
             episodes = COALESCE(EXCLUDED.episodes, series.episodes), \
             updated_at = now() \
         RETURNING {SERIES_COLUMNS}",
        categories = merged_categories_sql("series"),
    )
}

fn conflict_target(tmdb_id: Option<i64>) -> &'static str {
    if tmdb_id.is_some() {
        "tmdb_id"
    } else {
        "id"
    }
}

/// ILIKE pattern matching `query` as a literal substring
pub fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    watchlist: Vec<String>,
    preferences: Json<Preferences>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            watchlist: row.watchlist,
            preferences: row.preferences.0,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SportsRow {
    id: Uuid,
    title: String,
    sport: String,
    status: String,
    teams: Vec<String>,
    venue: Option<String>,
    start_time: Option<DateTime<Utc>>,
    image: String,
    description: Option<String>,
}

impl TryFrom<SportsRow> for SportsEvent {
    type Error = AppError;

    fn try_from(row: SportsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            title: row.title,
            sport: row.sport,
            status: row.status.parse().map_err(AppError::Internal)?,
            teams: row.teams,
            venue: row.venue,
            start_time: row.start_time,
            image: row.image,
            description: row.description,
        })
    }
}

#[derive(sqlx::FromRow)]
struct WatchlistRow {
    user_id: Uuid,
    content_id: String,
    content_type: String,
    added_at: DateTime<Utc>,
}

impl TryFrom<WatchlistRow> for WatchlistItem {
    type Error = AppError;

    fn try_from(row: WatchlistRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id,
            content_id: row.content_id,
            content_type: row.content_type.parse::<ContentKind>().map_err(AppError::Internal)?,
            added_at: row.added_at,
        })
    }
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, watchlist, preferences, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.watchlist)
        .bind(Json(&user.preferences))
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::DuplicateEmail);
        }
        Ok(())
    }

    async fn user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn user_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: &Preferences,
    ) -> AppResult<bool> {
        let result = sqlx::query("UPDATE users SET preferences = $2 WHERE id = $1")
            .bind(user_id)
            .bind(Json(preferences))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn save_movies(&self, movies: Vec<Movie>) -> AppResult<Vec<Movie>> {
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(movies.len());

        for movie in movies {
            let row = sqlx::query_as::<_, Movie>(&upsert_movie_sql(conflict_target(movie.tmdb_id)))
                .bind(movie.id)
                .bind(movie.tmdb_id)
                .bind(&movie.title)
                .bind(&movie.description)
                .bind(&movie.genre)
                .bind(movie.rating)
                .bind(movie.year)
                .bind(&movie.thumbnail)
                .bind(&movie.backdrop_image)
                .bind(&movie.trailer_url)
                .bind(&movie.categories)
                .bind(&movie.duration)
                .bind(movie.popularity)
                .fetch_one(&mut *tx)
                .await?;
            stored.push(row);
        }

        tx.commit().await?;
        Ok(stored)
    }

    async fn movies_by_category(&self, category: &str, limit: i64) -> AppResult<Vec<Movie>> {
        let rows = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE $1 = ANY(categories) \
             ORDER BY updated_at DESC LIMIT $2"
        ))
        .bind(category)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn movie_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<Movie>> {
        let row = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE tmdb_id = $1"
        ))
        .bind(tmdb_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn search_movies(&self, query: &str, limit: i64) -> AppResult<Vec<Movie>> {
        let rows = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE title ILIKE $1 LIMIT $2"
        ))
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn save_series(&self, series: Vec<Series>) -> AppResult<Vec<Series>> {
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(series.len());

        for show in series {
            let row = sqlx::query_as::<_, Series>(&upsert_series_sql(conflict_target(show.tmdb_id)))
                .bind(show.id)
                .bind(show.tmdb_id)
                .bind(&show.title)
                .bind(&show.description)
                .bind(&show.genre)
                .bind(show.rating)
                .bind(show.year)
                .bind(&show.thumbnail)
                .bind(&show.backdrop_image)
                .bind(&show.trailer_url)
                .bind(&show.categories)
                .bind(show.seasons)
                .bind(show.episodes)
                .fetch_one(&mut *tx)
                .await?;
            stored.push(row);
        }

        tx.commit().await?;
        Ok(stored)
    }

    async fn series_by_category(&self, category: &str, limit: i64) -> AppResult<Vec<Series>> {
        let rows = sqlx::query_as::<_, Series>(&format!(
            "SELECT {SERIES_COLUMNS} FROM series WHERE $1 = ANY(categories) \
             ORDER BY updated_at DESC LIMIT $2"
        ))
        .bind(category)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn series_by_tmdb_id(&self, tmdb_id: i64) -> AppResult<Option<Series>> {
        let row = sqlx::query_as::<_, Series>(&format!(
            "SELECT {SERIES_COLUMNS} FROM series WHERE tmdb_id = $1"
        ))
        .bind(tmdb_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn search_series(&self, query: &str, limit: i64) -> AppResult<Vec<Series>> {
        let rows = sqlx::query_as::<_, Series>(&format!(
            "SELECT {SERIES_COLUMNS} FROM series WHERE title ILIKE $1 LIMIT $2"
        ))
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn save_sports_events(&self, events: Vec<SportsEvent>) -> AppResult<Vec<SportsEvent>> {
        let sql = format!(
            "INSERT INTO sports ({SPORTS_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT ON CONSTRAINT sports_title_start_time_key DO UPDATE SET \
                 sport = EXCLUDED.sport, status = EXCLUDED.status, teams = EXCLUDED.teams, \
                 venue = EXCLUDED.venue, image = EXCLUDED.image, \
                 description = EXCLUDED.description \
             RETURNING {SPORTS_COLUMNS}"
        );

        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(events.len());

        for event in events {
            let row = sqlx::query_as::<_, SportsRow>(&sql)
                .bind(event.id)
                .bind(&event.title)
                .bind(&event.sport)
                .bind(event.status.as_str())
                .bind(&event.teams)
                .bind(&event.venue)
                .bind(event.start_time)
                .bind(&event.image)
                .bind(&event.description)
                .fetch_one(&mut *tx)
                .await?;
            stored.push(SportsEvent::try_from(row)?);
        }

        tx.commit().await?;
        Ok(stored)
    }

    async fn sports_by_status(
        &self,
        status: EventStatus,
        limit: i64,
    ) -> AppResult<Vec<SportsEvent>> {
        let rows = sqlx::query_as::<_, SportsRow>(&format!(
            "SELECT {SPORTS_COLUMNS} FROM sports WHERE status = $1 \
             ORDER BY start_time NULLS LAST LIMIT $2"
        ))
        .bind(status.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SportsEvent::try_from).collect()
    }

    async fn add_to_watchlist(&self, item: &WatchlistItem) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO watchlist (user_id, content_id, content_type, added_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, content_id) DO NOTHING",
        )
        .bind(item.user_id)
        .bind(&item.content_id)
        .bind(item.content_type.as_str())
        .bind(item.added_at)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        if inserted {
            sqlx::query(
                "UPDATE users SET watchlist = array_append(watchlist, $2) \
                 WHERE id = $1 AND NOT ($2 = ANY(watchlist))",
            )
            .bind(item.user_id)
            .bind(&item.content_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn remove_from_watchlist(&self, user_id: Uuid, content_id: &str) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM watchlist WHERE user_id = $1 AND content_id = $2")
            .bind(user_id)
            .bind(content_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            > 0;

        if removed {
            sqlx::query("UPDATE users SET watchlist = array_remove(watchlist, $2) WHERE id = $1")
                .bind(user_id)
                .bind(content_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(removed)
    }

    async fn watchlist(&self, user_id: Uuid) -> AppResult<Vec<WatchlistItem>> {
        let rows = sqlx::query_as::<_, WatchlistRow>(
            "SELECT user_id, content_id, content_type, added_at FROM watchlist \
             WHERE user_id = $1 ORDER BY added_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WatchlistItem::try_from).collect()
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
