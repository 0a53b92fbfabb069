pub mod error;
pub mod tmdb;
pub mod traits;

pub use error::SearchError;
pub use tmdb::TmdbClient;
pub use traits::MetadataSearch;
