use std::path::{Path, PathBuf};

use tracing::trace;

/// Creates the directory (and its parents) if it isn't there yet
pub async fn ensure_dir(path: &Path) -> anyhow::Result<PathBuf> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        trace!(?path, "Creating directory");
        tokio::fs::create_dir_all(path).await?;
    }

    let meta = tokio::fs::metadata(path).await?;
    if !meta.is_dir() {
        anyhow::bail!("{path:?} exists but is not a directory");
    }

    Ok(path.to_path_buf())
}
