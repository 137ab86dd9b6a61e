use serde::Deserialize;

/// Signing secret used when `JWT_SECRET` is not provided. Only suitable for
/// local development.
pub const DEV_JWT_SECRET: &str = "streamflix-secret-key-change-in-production";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL. When absent the API runs on an in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Overrides the database name carried by `database_url`
    #[serde(default)]
    pub database_name: Option<String>,

    /// Redis connection URL. When absent catalog responses are not cached.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Secret used to sign access tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Access token validity window in days
    #[serde(default = "default_token_validity_days")]
    pub token_validity_days: i64,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL prepended to poster paths
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Base URL prepended to backdrop paths
    #[serde(default = "default_tmdb_backdrop_url")]
    pub tmdb_backdrop_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_token_validity_days() -> i64 {
    30
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_backdrop_url() -> String {
    "https://image.tmdb.org/t/p/w1280".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8001
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    /// Access token lifetime; must be a positive number of days that fits
    /// a `chrono::Duration`
    pub fn token_validity(&self) -> anyhow::Result<chrono::Duration> {
        let days = self.token_validity_days;
        if days <= 0 {
            anyhow::bail!("TOKEN_VALIDITY_DAYS must be positive, got {}", days);
        }
        chrono::Duration::try_days(days)
            .ok_or_else(|| anyhow::anyhow!("TOKEN_VALIDITY_DAYS is out of range: {}", days))
    }
}
