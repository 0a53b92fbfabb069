use super::prompts::prompt_password;
use super::{is_interactive, load_config};
use crate::output::{new_table, Output};
use crate::{BackendArg, ConfigCommands, MissingItemsArg};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::PathBuf;
use watchlist_config::{Config, CredentialStore, PathManager};

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    match cmd {
        ConfigCommands::Show { full } => show_config(&paths, full, output),
        ConfigCommands::Remote { url, enabled } => configure_remote(&paths, url, enabled, output),
        ConfigCommands::Tmdb { api_key } => configure_tmdb(&paths, api_key, output),
        ConfigCommands::Local { missing_items } => configure_local(&paths, missing_items, output),
        ConfigCommands::Server {
            bind,
            backend,
            database_url,
            kv_file,
        } => configure_server(&paths, bind, backend, database_url, kv_file, output),
    }
}

fn show_config(paths: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config = load_config(paths)?;
    let mut credentials = CredentialStore::new(paths.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to read credentials: {}", e))?;

    let api_key = credentials.resolve_tmdb_api_key();
    let api_key_display = match &api_key {
        Some(key) if full => key.clone(),
        Some(key) => mask_string(key),
        None => "<not set>".to_string(),
    };

    if !output.is_human() {
        let mut value = serde_json::to_value(&config)?;
        value["search"]["api_key"] = json!(api_key.map(|_| api_key_display));
        value["paths"] = json!({
            "config_file": paths.config_file(),
            "local_store_file": paths.local_store_file(),
        });
        output.data(&value, new_table);
        return Ok(());
    }

    println!("{}", format!("Config file: {}", paths.config_file().display()).bright_black());
    println!();

    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Setting").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    let remote = match config.remote.active_url() {
        Some(url) => Cell::new(url).fg(Color::Green),
        None if !config.remote.enabled => Cell::new("disabled (local only)").fg(Color::Yellow),
        None => Cell::new("<not set> (local only)").fg(Color::Yellow),
    };
    table.add_row(vec![Cell::new("Remote API"), remote]);
    table.add_row(vec![
        Cell::new("Local store"),
        Cell::new(
            config
                .local
                .file
                .clone()
                .unwrap_or_else(|| paths.local_store_file())
                .display(),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Unknown ids (local)"),
        Cell::new(format!("{:?}", config.local.missing_items)),
    ]);
    table.add_row(vec![Cell::new("TMDB API key"), Cell::new(api_key_display)]);
    table.add_row(vec![Cell::new("TMDB language"), Cell::new(&config.search.language)]);
    table.add_row(vec![
        Cell::new("Results per type"),
        Cell::new(config.search.results_per_type),
    ]);
    table.add_row(vec![
        Cell::new("Search debounce"),
        Cell::new(format!("{} ms", config.search.debounce_ms)),
    ]);
    table.add_row(vec![Cell::new("Server bind"), Cell::new(&config.server.bind)]);
    table.add_row(vec![
        Cell::new("Server backend"),
        Cell::new(format!("{:?}", config.server.backend)),
    ]);
    table.add_row(vec![
        Cell::new("Server database"),
        Cell::new(config.server.database_url.as_deref().unwrap_or("<not set>")),
    ]);
    println!("{}", table);
    Ok(())
}

/// The file as written, without environment overrides, so those never get persisted
fn load_file_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))
}

fn save_config(paths: &PathManager, config: &Config, output: &Output) -> Result<()> {
    if let Err(e) = config.validate() {
        output.error(format!("Not saved: {}", e));
        return Err(eyre!("Invalid configuration: {}", e));
    }
    let config_file = paths.config_file();
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;
    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}

fn configure_remote(paths: &PathManager, url: Option<String>, enabled: Option<bool>, output: &Output) -> Result<()> {
    if url.is_none() && enabled.is_none() {
        output.error("Nothing to change. Pass --url and/or --enabled.");
        return Err(eyre!("No remote settings given"));
    }

    let mut config = load_file_config(paths)?;
    if let Some(url) = url {
        let url = url.trim().to_string();
        config.remote.url = (!url.is_empty()).then_some(url);
    }
    if let Some(enabled) = enabled {
        config.remote.enabled = enabled;
    }
    save_config(paths, &config, output)
}

fn configure_tmdb(paths: &PathManager, api_key: Option<String>, output: &Output) -> Result<()> {
    let api_key = match api_key {
        Some(key) => key,
        None if is_interactive() => prompt_password("TMDB API key (v3)")?,
        None => {
            output.error("No terminal to prompt in. Pass --api-key.");
            return Err(eyre!("API key is required"));
        }
    };

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        output.error("API key cannot be empty");
        return Err(eyre!("API key is required"));
    }

    let mut credentials = CredentialStore::new(paths.credentials_file());
    credentials
        .load()
        .map_err(|e| eyre!("Failed to read credentials: {}", e))?;
    credentials.set_tmdb_api_key(api_key);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.success("TMDB API key saved");
    Ok(())
}

fn configure_local(paths: &PathManager, missing_items: MissingItemsArg, output: &Output) -> Result<()> {
    let mut config = load_file_config(paths)?;
    config.local.missing_items = missing_items.into();
    save_config(paths, &config, output)
}

fn configure_server(
    paths: &PathManager,
    bind: Option<String>,
    backend: Option<BackendArg>,
    database_url: Option<String>,
    kv_file: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config = load_file_config(paths)?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(backend) = backend {
        config.server.backend = backend.into();
    }
    if let Some(url) = database_url {
        config.server.database_url = Some(url);
    }
    if let Some(file) = kv_file {
        config.server.kv_file = Some(file);
    }
    save_config(paths, &config, output)
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_string() {
        assert_eq!(mask_string("abcd"), "****");
        assert_eq!(mask_string("0123456789abcdef"), "01***ef");
    }
}
