use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Appwrite REST endpoint
    #[serde(default = "default_appwrite_endpoint")]
    pub appwrite_endpoint: String,

    /// Appwrite project identifier. When unset the in-memory document store is used.
    #[serde(default)]
    pub appwrite_project_id: Option<String>,

    /// Optional Appwrite API key for server-side access
    #[serde(default)]
    pub appwrite_api_key: Option<String>,

    /// Database holding both collections
    #[serde(default = "default_database_id")]
    pub appwrite_database_id: String,

    /// Collection storing search popularity counters
    #[serde(default = "default_search_collection_id")]
    pub appwrite_search_collection_id: String,

    /// Collection storing saved movies
    #[serde(default = "default_saved_movies_collection_id")]
    pub appwrite_saved_movies_collection_id: String,

    /// TMDB API read access token
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Quiet period before a typed search query is issued
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Number of trending search terms shown on the home screen
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_appwrite_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_database_id() -> String {
    "movies".to_string()
}

fn default_search_collection_id() -> String {
    "metrics".to_string()
}

fn default_saved_movies_collection_id() -> String {
    "saved_movies".to_string()
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_search_debounce_ms() -> u64 {
    800
}

fn default_trending_limit() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Collection ids used by the popularity tracker and saved movies registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    pub search_popularity: String,
    pub saved_movies: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn collections(&self) -> Collections {
        Collections {
            search_popularity: self.appwrite_search_collection_id.clone(),
            saved_movies: self.appwrite_saved_movies_collection_id.clone(),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
