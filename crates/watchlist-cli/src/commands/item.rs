use super::{finish, item_label, load_state};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use watchlist_core::WatchlistState;
use watchlist_models::{ItemId, WatchStatus};

/// Load the list and make sure `id` is on it
async fn load_with(id: i64, output: &Output) -> Result<(WatchlistState, String)> {
    let state = load_state(output).await?;
    let label = match state.get(ItemId(id)) {
        Some(item) => item_label(item),
        None => {
            output.error(format!("No entry with id {} on your list", id));
            return Err(eyre!("Entry {} not found", id));
        }
    };
    Ok((state, label))
}

pub async fn mark_watched(id: i64, watched: bool, output: &Output) -> Result<()> {
    let (mut state, label) = load_with(id, output).await?;
    let (status, word) = if watched {
        (WatchStatus::Watched, "watched")
    } else {
        (WatchStatus::ToWatch, "to watch")
    };
    state.set_status(ItemId(id), status).await;
    finish(&state, output, format!("{} marked as {}", label, word))
}

pub async fn toggle_favorite(id: i64, output: &Output) -> Result<()> {
    let (mut state, label) = load_with(id, output).await?;
    state.toggle_favorite(ItemId(id)).await;
    let favorite = state.get(ItemId(id)).is_some_and(|item| item.favorite);
    let message = if favorite {
        format!("{} added to favorites", label)
    } else {
        format!("{} removed from favorites", label)
    };
    finish(&state, output, message)
}

pub async fn rate(id: i64, rating: u8, output: &Output) -> Result<()> {
    let (mut state, label) = load_with(id, output).await?;
    state.set_rating(ItemId(id), rating).await;
    finish(&state, output, format!("{} rated {}", label, "★".repeat(rating as usize)))
}

pub async fn remove(id: i64, output: &Output) -> Result<()> {
    let (mut state, label) = load_with(id, output).await?;
    state.remove(ItemId(id)).await;
    finish(&state, output, format!("Removed {}", label))
}
