pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{BackendKind, Config, LocalConfig, MissingItemPolicy, RemoteConfig, SearchConfig, ServerConfig};
pub use credentials::CredentialStore;
pub use paths::{PathManager, LOCAL_STORE_KEY};
