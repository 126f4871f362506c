use std::sync::Arc;

use app_backend::BackendManager;
use app_config::common::BackendConfig;
use tokio::task::JoinHandle;

pub(crate) mod cron;

/// Starts every background task the gateway needs
pub fn start(manager: Arc<BackendManager>, config: &BackendConfig) -> Option<JoinHandle<()>> {
    cron::spawn(manager, config)
}
