use super::load_state;
use crate::output::{new_table, Output};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};

pub async fn run_stats(output: &Output) -> Result<()> {
    let state = load_state(output).await?;
    let stats = state.get_stats();

    output.data(&stats, || {
        let mut table = new_table();
        table.set_header(vec![
            Cell::new("Your list").fg(Color::Cyan).add_attribute(Attribute::Bold),
            Cell::new(""),
        ]);
        table.add_row(vec![Cell::new("Total"), Cell::new(stats.total)]);
        table.add_row(vec![Cell::new("Watched"), Cell::new(stats.watched).fg(Color::Green)]);
        table.add_row(vec![Cell::new("To watch"), Cell::new(stats.to_watch).fg(Color::Yellow)]);
        table.add_row(vec![Cell::new("Favorites"), Cell::new(stats.favorites)]);
        table.add_row(vec![Cell::new("Movies"), Cell::new(stats.movies_count)]);
        table.add_row(vec![Cell::new("Series"), Cell::new(stats.tv_count)]);
        table
    });
    Ok(())
}
