use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub const ENV_TMDB_API_KEY: &str = "TMDB_API_KEY";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Secrets kept outside the main config file
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn get_tmdb_api_key(&self) -> Option<&String> {
        self.get("tmdb_api_key")
    }

    pub fn set_tmdb_api_key(&mut self, key: String) {
        self.set("tmdb_api_key".to_string(), key);
    }

    /// The TMDB key to search with: `TMDB_API_KEY` first, then the stored one.
    /// Blank values count as absent.
    pub fn resolve_tmdb_api_key(&self) -> Option<String> {
        self.resolve_tmdb_api_key_from(|key| std::env::var(key).ok())
    }

    pub fn resolve_tmdb_api_key_from(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        lookup(ENV_TMDB_API_KEY)
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.get_tmdb_api_key().cloned())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}
