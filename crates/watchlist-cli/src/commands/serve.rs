use super::load_config;
use crate::output::Output;
use crate::BackendArg;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use watchlist_config::PathManager;

pub async fn run_serve(bind: Option<String>, backend: Option<BackendArg>, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let mut config = load_config(&paths)?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(backend) = backend {
        config.server.backend = backend.into();
    }
    config.validate().map_err(|e| eyre!("{}", e))?;

    output.info(format!(
        "Serving /api/movies on http://{} ({:?} backend)",
        config.server.bind, config.server.backend
    ));
    watchlist_api::serve(&config, &paths).await.map_err(|e| {
        output.error(format!("Server stopped: {}", e));
        eyre!("{}", e)
    })
}
