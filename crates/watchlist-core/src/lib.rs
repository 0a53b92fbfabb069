pub mod debounce;
pub mod query;
pub mod state;
pub mod sync;

#[cfg(test)]
mod fixtures;

pub use debounce::{SearchSession, SearchView};
pub use query::{ListQuery, SortKey};
pub use state::{StateError, WatchlistState};
pub use sync::{SyncError, SyncService};
