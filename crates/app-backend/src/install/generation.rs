use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use tracing::{debug, warn};

pub const GENERATION_PREFIX: &str = "gen-";

/// One installation directory.
///
/// Once retired, the directory is removed as soon as nothing references it anymore.
#[derive(Debug)]
pub struct Generation {
    path: PathBuf,
    retired: AtomicBool,
}

impl Generation {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            retired: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|x| x.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn retire(&self) {
        self.retired.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.retired.load(Ordering::SeqCst)
    }
}

impl Drop for Generation {
    fn drop(&mut self) {
        if !self.is_retired() {
            return;
        }

        let path = std::mem::take(&mut self.path);
        let remove = move || {
            debug!(?path, "Removing retired installation");
            if let Err(e) = std::fs::remove_dir_all(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(?path, "Failed to remove retired installation: {e:?}");
                }
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(remove);
            }
            Err(_) => remove(),
        }
    }
}
