use super::{is_interactive, load_config, search_client, year_cell};
use crate::output::{new_table, Output};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use watchlist_config::PathManager;
use watchlist_core::{SearchSession, SearchView};
use watchlist_models::SearchResult;
use watchlist_search::{MetadataSearch, TmdbClient};

pub async fn run_search(query: Option<String>, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config = load_config(&paths)?;
    let client = search_client(&paths, &config)?;
    if !client.is_configured() {
        output.error("No TMDB API key. Set TMDB_API_KEY or run `watchlist config tmdb`.");
        return Err(eyre!("TMDB is not configured"));
    }

    match query {
        Some(query) => {
            let results = search_once(&client, &query, output).await?;
            show_results(&results, output);
            Ok(())
        }
        None => {
            let delay = Duration::from_millis(config.search.debounce_ms);
            search_as_you_type(Arc::new(client), delay, output).await
        }
    }
}

/// Search once, behind a spinner when someone is watching
pub async fn search_once(client: &TmdbClient, query: &str, output: &Output) -> Result<Vec<SearchResult>> {
    let spinner = (is_interactive() && output.is_human() && !output.is_quiet()).then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        spinner.set_message(format!("Searching for '{}'...", query));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    });

    let outcome = client.search_all(query).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    outcome.map_err(|e| {
        output.error(format!("Search failed: {}", e));
        eyre!("{}", e)
    })
}

/// Each stdin line replaces the query. Results are printed once typing
/// settles; stale searches never reach the screen.
async fn search_as_you_type(client: Arc<TmdbClient>, delay: Duration, output: &Output) -> Result<()> {
    let mut session = SearchSession::new(client, delay);
    let mut updates = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if output.is_human() && !output.is_quiet() {
        eprintln!("{}", "Type a title and press enter. Ctrl-D to quit.".bright_black());
    }

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => session.submit(&line),
                    None => break,
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = updates.borrow_and_update().clone();
                show_view(&view, output);
            }
        }
    }

    // input closed while a search was pending
    let view = session.settle().await;
    if updates.has_changed().unwrap_or(false) {
        show_view(&view, output);
    }
    Ok(())
}

fn show_view(view: &SearchView, output: &Output) {
    if view.searching || view.query.is_empty() {
        return;
    }
    match &view.error {
        Some(err) => output.error(format!("Search for '{}' failed: {}", view.query, err)),
        None => {
            if output.is_human() && !output.is_quiet() {
                println!("{}", format!("Results for '{}'", view.query).bold());
            }
            show_results(&view.results, output);
        }
    }
}

fn show_results(results: &[SearchResult], output: &Output) {
    if results.is_empty() && output.is_human() {
        output.info("No results.");
        return;
    }
    output.data(&results, || results_table(results));
}

pub fn results_table(results: &[SearchResult]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("TMDB").add_attribute(Attribute::Bold),
    ]);
    for (n, result) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(n + 1),
            Cell::new(&result.title),
            Cell::new(result.media_type.as_str()),
            year_cell(result.year()),
            Cell::new(result.rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "-".to_string())),
        ]);
    }
    table
}
