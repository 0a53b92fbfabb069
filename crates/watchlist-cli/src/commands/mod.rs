pub mod add;
pub mod config;
pub mod item;
pub mod list;
pub mod prompts;
pub mod search;
pub mod serve;
pub mod stats;

use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::Cell;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use watchlist_config::{Config, CredentialStore, PathManager};
use watchlist_core::{SyncService, WatchlistState};
use watchlist_models::{ListItem, SearchResult};
use watchlist_search::TmdbClient;

/// Config file plus environment overrides, validated
pub fn load_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config.apply_env_overrides();
    config
        .validate()
        .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
    Ok(config)
}

/// The list as the backend has it now. A failed load is fatal for a command.
pub async fn load_state(output: &Output) -> Result<WatchlistState> {
    let paths = PathManager::default();
    let config = load_config(&paths)?;
    let sync = SyncService::from_config(&config, &paths);
    if !sync.has_remote() {
        tracing::debug!("No remote configured, working from {}", paths.local_store_file().display());
    }

    let mut state = WatchlistState::new(sync);
    state.load().await;
    if let Some(err) = state.last_error() {
        output.error(err.to_string());
        return Err(eyre!("{}", err));
    }
    Ok(state)
}

pub fn search_client(paths: &PathManager, config: &Config) -> Result<TmdbClient> {
    let mut credentials = CredentialStore::new(paths.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to read credentials: {}", e))?;
    Ok(TmdbClient::new(credentials.resolve_tmdb_api_key(), config.search.clone()))
}

/// Turn the state's last error into the command's result
pub fn finish(state: &WatchlistState, output: &Output, success: impl AsRef<str>) -> Result<()> {
    match state.last_error() {
        Some(err) => {
            output.error(err.to_string());
            Err(eyre!("{}", err))
        }
        None => {
            output.success(success);
            Ok(())
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

pub fn year_cell(year: Option<i32>) -> Cell {
    Cell::new(year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string()))
}

pub fn result_label(result: &SearchResult) -> String {
    let year = result.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    format!("{}{} [{}]", result.title, year, result.media_type.as_str())
}

pub fn item_label(item: &ListItem) -> String {
    format!("{} ({})", item.title.bold(), item.id)
}
