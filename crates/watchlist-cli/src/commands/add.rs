use super::prompts::prompt_select;
use super::search::search_once;
use super::{finish, is_interactive, load_config, load_state, result_label, search_client};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use crate::output::Output;
use watchlist_config::PathManager;

/// Search TMDB and add one of the results. `pick` is 1-based.
pub async fn run_add(query: &str, pick: Option<usize>, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config = load_config(&paths)?;
    let client = search_client(&paths, &config)?;
    if !client.is_configured() {
        output.error("No TMDB API key. Set TMDB_API_KEY or run `watchlist config tmdb`.");
        return Err(eyre!("TMDB is not configured"));
    }

    let mut results = search_once(&client, query, output).await?;
    if results.is_empty() {
        output.warn(format!("Nothing found for '{}'", query));
        return Ok(());
    }

    let index = match pick {
        Some(n) if (1..=results.len()).contains(&n) => n - 1,
        Some(n) => {
            output.error(format!("--pick {} is out of range, there are {} results", n, results.len()));
            return Err(eyre!("Pick out of range"));
        }
        None if results.len() == 1 => 0,
        None if is_interactive() => {
            let labels: Vec<String> = results.iter().map(result_label).collect();
            match prompt_select("Add which one?", &labels)? {
                Some(index) => index,
                None => {
                    output.info("Nothing added.");
                    return Ok(());
                }
            }
        }
        None => {
            output.error("Several results and no terminal to choose in. Pass --pick N.");
            return Err(eyre!("No result picked"));
        }
    };

    let chosen = results.swap_remove(index);
    let label = result_label(&chosen);

    let mut state = load_state(output).await?;
    state.add(chosen.into()).await;
    finish(&state, output, format!("Added {}", label))
}
