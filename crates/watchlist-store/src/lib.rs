pub mod error;
pub mod local;
pub mod remote;
pub mod traits;

pub use error::StoreError;
pub use local::LocalListStore;
pub use remote::{create_remote_client, RemoteListStore};
pub use traits::ListStore;
