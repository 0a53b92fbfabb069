use super::{load_state, year_cell};
use crate::output::{new_table, Output};
use crate::{StatusArg, TypeArg};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use watchlist_core::{ListQuery, SortKey};
use watchlist_models::ListItem;

pub async fn run_list(
    status: Option<StatusArg>,
    media_type: Option<TypeArg>,
    search: Option<String>,
    sort: SortKey,
    output: &Output,
) -> Result<()> {
    let state = load_state(output).await?;
    let query = ListQuery {
        status: status.map(Into::into),
        text: search,
        media_type: media_type.map(Into::into),
        sort,
    };
    let items = state.query(&query);

    if items.is_empty() && output.is_human() {
        if state.get_all().is_empty() {
            output.info("Your list is empty. Add something with `watchlist add <title>`.");
        } else {
            output.info("Nothing matches those filters.");
        }
        return Ok(());
    }

    output.data(&items, || items_table(&items));
    Ok(())
}

fn items_table(items: &[ListItem]) -> comfy_table::Table {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Title").add_attribute(Attribute::Bold),
        Cell::new("Type").add_attribute(Attribute::Bold),
        Cell::new("Year").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new("★").add_attribute(Attribute::Bold),
        Cell::new("Rating").add_attribute(Attribute::Bold),
    ]);

    for item in items {
        let status = if item.is_watched() {
            Cell::new("watched").fg(Color::Green)
        } else {
            Cell::new("to watch").fg(Color::Yellow)
        };
        let rating = item
            .personal_rating
            .map(|r| "★".repeat(r as usize))
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(item.id),
            Cell::new(&item.title),
            Cell::new(item.media_type.as_str()),
            year_cell(item.year()),
            status,
            Cell::new(if item.favorite { "★" } else { "" }).fg(Color::Yellow),
            Cell::new(rating),
        ]);
    }
    table
}
