use anyhow::Result;
use std::path::{Path, PathBuf};

/// Overrides every location below with `<WATCHLIST_HOME>/…` (containers, tests)
pub const ENV_HOME: &str = "WATCHLIST_HOME";

/// Fixed key the local fallback blob is stored under
pub const LOCAL_STORE_KEY: &str = "watchlist-movies";

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("watchlist");
        let data_dir = dirs::data_dir()
            .map(|d| d.join("watchlist"))
            .unwrap_or_else(|| config_dir.join("data"));

        Ok(Self {
            log_dir: data_dir.join("logs"),
            config_dir,
            data_dir,
        })
    }

    /// Everything under one base directory: config files at the top, data and logs in subdirs
    pub fn from_base(base: &Path) -> Self {
        Self {
            config_dir: base.to_path_buf(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    /// Blob the client falls back to when the remote API is unreachable
    pub fn local_store_file(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", LOCAL_STORE_KEY))
    }

    /// Blob behind the server's key-value backend
    pub fn server_store_file(&self) -> PathBuf {
        self.data_dir.join("server").join("movies.json")
    }

    pub fn server_log_file(&self) -> PathBuf {
        self.log_dir.join("watchlist-server.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        if let Some(base) = std::env::var_os(ENV_HOME).filter(|v| !v.is_empty()) {
            return Self::from_base(Path::new(&base));
        }

        // Platform-specific paths (e.g., ~/.config/watchlist on Linux), or a
        // dot-directory in the working directory when the platform has none
        Self::new().unwrap_or_else(|_| Self::from_base(Path::new(".watchlist")))
    }
}
