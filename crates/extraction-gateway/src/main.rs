use std::{path::Path, sync::Arc};

use app_backend::{install::Installer, BackendManager, BackendSource};
use app_config::{common::BackendConfig, Config};
use app_extractors::Extractors;
use app_logger::{debug, error, info};
use extraction_gateway::server::{self, AppState};

#[tokio::main]
async fn main() {
    let loaded_dotenv = dotenvy::dotenv();

    app_logger::init();

    match loaded_dotenv {
        Ok(loaded_dotenv) => {
            debug!(path = ?loaded_dotenv, "Loaded dotenv file");
        }
        Err(e) if e.not_found() => {
            debug!("No dotenv file found");
        }
        Err(e) => {
            error!("Failed to load dotenv file: {e:?}");
            panic!("Failed to load dotenv file: {e:?}");
        }
    }

    let config = Config::global();
    debug!(?config, "Running with config");

    if !config.listen.enabled {
        info!("Extraction gateway is disabled in the config file, not starting");
        return;
    }

    let manager = match BackendManager::start(backend_source(&config.backend)).await {
        Ok(manager) => Arc::new(manager),
        Err(e) => {
            error!("Failed to set up yt-dlp: {e}");
            std::process::exit(1);
        }
    };

    app_tasks::start(manager.clone(), &config.backend);

    let state = AppState::new(manager.slot(), Extractors::from_config(&config.extraction));

    if let Err(e) = server::run(state, &config.listen).await {
        error!("Server stopped: {e:?}");
        std::process::exit(1);
    }
}

fn backend_source(config: &BackendConfig) -> BackendSource {
    match config.yt_dlp_path() {
        Some(path) => BackendSource::System(path.to_path_buf()),
        None => BackendSource::Managed(Installer::new(
            config.install_dir(),
            config.python_path().map(Path::to_path_buf),
        )),
    }
}
