use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const ENV_API_URL: &str = "WATCHLIST_API_URL";
pub const ENV_DATABASE_URL: &str = "WATCHLIST_DATABASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Remote list API the client persists to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Full resource URL, e.g. `http://127.0.0.1:8787/api/movies`
    #[serde(default)]
    pub url: Option<String>,
}

/// How a blob-backed store answers an update or delete for an id it doesn't hold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingItemPolicy {
    /// Update yields nothing, delete succeeds
    #[default]
    Ignore,
    /// Both report the id as not found
    NotFound,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalConfig {
    #[serde(default)]
    pub missing_items: MissingItemPolicy,
    /// Overrides the default blob location in the data directory
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_results_per_type")]
    pub results_per_type: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// One row per entry in a SQLite collection
    Document,
    /// The whole list as one serialized array under a fixed key
    #[default]
    KeyValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub backend: BackendKind,
    /// SQLite URL for the document backend. Absent means the backend is unconfigured.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Blob file for the key-value backend, defaults to the data directory
    #[serde(default)]
    pub kv_file: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_search_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_results_per_type() -> usize {
    20 // one TMDB page
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            url: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            results_per_type: default_results_per_type(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            backend: BackendKind::default(),
            database_url: None,
            kv_file: None,
        }
    }
}

impl RemoteConfig {
    /// The URL to persist to, or `None` when the remote is disabled or unset
    pub fn active_url(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise start from defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.remote.url = Some(url);
        }
        if let Some(url) = lookup(ENV_DATABASE_URL).filter(|v| !v.trim().is_empty()) {
            self.server.database_url = Some(url);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(url) = self.remote.url.as_deref() {
            if !url.trim().is_empty() && !is_http_url(url) {
                return Err(anyhow::anyhow!("remote.url must start with http:// or https://: {}", url));
            }
        }

        if !is_http_url(&self.search.base_url) {
            return Err(anyhow::anyhow!("search.base_url must start with http:// or https://"));
        }
        if !is_http_url(&self.search.image_base_url) {
            return Err(anyhow::anyhow!("search.image_base_url must start with http:// or https://"));
        }
        if self.search.results_per_type == 0 {
            return Err(anyhow::anyhow!("search.results_per_type must be at least 1"));
        }

        self.bind_addr()?;

        if let Some(url) = self.server.database_url.as_deref() {
            if !url.starts_with("sqlite:") {
                return Err(anyhow::anyhow!("server.database_url must be a sqlite: URL"));
            }
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid server.bind address {:?}: {}", self.server.bind, e))
    }
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}
