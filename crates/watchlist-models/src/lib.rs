pub mod ids;
pub mod item;
pub mod normalize;
pub mod patch;
pub mod search_result;
pub mod stats;

pub use ids::{IdGenerator, ItemId};
pub use item::{iso_timestamp, ListItem, MediaType, NewListItem, WatchStatus};
pub use normalize::{normalize_item, to_wire, WireShape, BACKEND_FIELD_NAMES};
pub use patch::ItemPatch;
pub use search_result::SearchResult;
pub use stats::ListStats;
