use std::{sync::Arc, time::Duration};

use app_backend::BackendManager;
use app_config::common::BackendConfig;
use app_logger::{debug, error, info};
use tokio::task::JoinHandle;
use tracing::{info_span, Instrument};

#[tracing::instrument(name = "cron", skip_all)]
pub fn spawn(manager: Arc<BackendManager>, config: &BackendConfig) -> Option<JoinHandle<()>> {
    if config.disable_refresh {
        info!("Backend refresh is disabled");
        return None;
    }

    let interval = Duration::from(&config.refresh_interval);
    debug!(?interval, "Spawning yt-dlp refresh task");

    Some(tokio::task::spawn(
        refresh_loop(manager, interval).instrument(info_span!("refresh")),
    ))
}

/// Never returns. A failed refresh keeps the current backend and waits for the next round.
pub async fn refresh_loop(manager: Arc<BackendManager>, interval: Duration) {
    loop {
        tokio::time::sleep(interval).await;

        match manager.refresh().await {
            Ok(info) => {
                debug!(version = %info.version, "yt-dlp refresh done");
            }
            Err(e) => {
                error!("Failed to refresh yt-dlp: {e}");
            }
        }
    }
}
