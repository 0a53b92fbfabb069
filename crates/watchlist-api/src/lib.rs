//! HTTP persistence API for the watchlist.
//!
//! Serves one resource, `/api/movies`, over whichever backend `[server]`
//! selects. This is the remote the client's `RemoteListStore` talks to.

pub mod api;
pub mod error;
pub mod store;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use watchlist_config::{Config, PathManager};
use watchlist_models::IdGenerator;
use watchlist_store::ListStore;

pub use error::ApiError;
pub use store::{build_store, SqliteListStore};

/// Shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when the selected backend has no connection configured
    pub store: Option<Arc<dyn ListStore>>,
    pub ids: Arc<IdGenerator>,
}

impl AppState {
    pub fn new(store: Option<Arc<dyn ListStore>>) -> Self {
        Self {
            store,
            ids: Arc::new(IdGenerator::new()),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new().route(
        "/movies",
        get(api::list_movies)
            .post(api::create_movie)
            .put(api::update_movie)
            .delete(api::delete_movie),
    );

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(api::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `[server] bind` and serve until Ctrl-C
pub async fn serve(config: &Config, paths: &PathManager) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let state = AppState::new(build_store(&config.server, paths));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}/api/movies", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            // if the signal handler can't be installed, run until killed
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
            info!("Shutting down");
        })
        .await?;
    Ok(())
}
