use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::{
    install::{generation::Generation, Installation, Installer},
    yt_dlp::YtDlp,
    BackendHandle, BackendInfo, BackendKind, BackendSlot, Engine, InstallError,
};

/// Where the engine comes from
#[derive(Debug, Clone)]
pub enum BackendSource {
    /// Installed and kept up to date by the gateway itself
    Managed(Installer),
    /// An executable someone else installed, updated in place with `--update`
    System(PathBuf),
}

/// Owns the backend lifecycle: the initial install and every refresh after it.
#[derive(Debug)]
pub struct BackendManager {
    source: BackendSource,
    slot: BackendSlot,
    generation: Mutex<Option<Arc<Generation>>>,
    refresh_lock: tokio::sync::Mutex<()>,
}

impl BackendManager {
    /// Makes sure a usable backend exists before anything gets served
    #[tracing::instrument(skip_all)]
    pub async fn start(source: BackendSource) -> Result<Self, InstallError> {
        let start = Instant::now();

        let (backend, generation) = match &source {
            BackendSource::Managed(installer) => {
                let Installation {
                    backend,
                    generation,
                } = installer.ensure_installed().await?;
                (backend, Some(generation))
            }
            BackendSource::System(executable) => (
                YtDlp::probe(executable.to_path_buf(), BackendKind::System, None, None).await?,
                None,
            ),
        };

        info!(
            backend = ?backend.info(),
            took = ?start.elapsed(),
            "yt-dlp backend ready"
        );

        Ok(Self {
            source,
            slot: BackendSlot::new(Arc::new(backend)),
            generation: Mutex::new(generation),
            refresh_lock: tokio::sync::Mutex::new(()),
        })
    }

    #[must_use]
    pub fn slot(&self) -> BackendSlot {
        self.slot.clone()
    }

    #[must_use]
    pub fn current(&self) -> BackendHandle {
        self.slot.current()
    }

    /// Builds a newer backend and swaps it in.
    ///
    /// On failure the active backend keeps serving and nothing is published.
    /// Concurrent calls are serialized.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&self) -> Result<BackendInfo, InstallError> {
        let _guard = self.refresh_lock.lock().await;
        let start = Instant::now();
        debug!("Refreshing yt-dlp backend");

        let (backend, generation) = match &self.source {
            BackendSource::Managed(installer) => {
                let Installation {
                    backend,
                    generation,
                } = installer.install_fresh().await?;
                (backend, Some(generation))
            }
            BackendSource::System(executable) => (self_update(executable).await?, None),
        };

        let info = backend.info().clone();
        let previous = self.slot.publish(Arc::new(backend));

        let retired = std::mem::replace(&mut *self.generation.lock(), generation);
        if let Some(retired) = retired {
            retired.retire();
        }

        info!(
            from = %previous.info().version,
            to = %info.version,
            took = ?start.elapsed(),
            "Refreshed yt-dlp backend"
        );

        Ok(info)
    }
}

async fn self_update(executable: &Path) -> Result<YtDlp, InstallError> {
    let current = YtDlp::probe(executable.to_path_buf(), BackendKind::System, None, None).await?;

    let mut cmd = current.command();
    cmd.arg("--ignore-config").arg("--update");
    trace!(?cmd, "Updating yt-dlp");

    let res = cmd.output().await.map_err(|source| InstallError::Spawn {
        program: executable.to_string_lossy().into_owned(),
        source,
    })?;

    trace!(?res, "yt-dlp update result");

    if !res.status.success() {
        return Err(InstallError::Step {
            step: "yt-dlp --update",
            output: String::from_utf8_lossy(&res.stderr).trim().to_string(),
        });
    }

    YtDlp::probe(executable.to_path_buf(), BackendKind::System, None, None).await
}

#[cfg(all(test, unix))]
mod tests {
    use std::{fs, os::unix::fs::PermissionsExt};

    use super::*;

    /// Reports the version stored next to it, `--update` bumps it
    const FAKE_YT_DLP: &str = r#"#!/bin/sh
dir="$(dirname "$0")"
for arg in "$@"; do
  case "$arg" in
    --version) cat "$dir/version"; exit 0 ;;
    --update)
      if [ -e "$dir/no-update" ]; then echo "ERROR: You installed yt-dlp with pip" >&2; exit 1; fi
      echo "2025.11.01" > "$dir/version"; exit 0 ;;
  esac
done
exit 1
"#;

    fn fake_yt_dlp(dir: &Path) -> PathBuf {
        let path = dir.join("yt-dlp");
        fs::write(&path, FAKE_YT_DLP).expect("write script");
        fs::write(dir.join("version"), "2025.10.22\n").expect("write version");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    #[tokio::test]
    async fn system_backend_updates_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = BackendManager::start(BackendSource::System(fake_yt_dlp(dir.path())))
            .await
            .expect("start");
        let before = manager.current();

        let info = manager.refresh().await.expect("refresh");

        assert_eq!(before.info().version, "2025.10.22");
        assert_eq!(info.version, "2025.11.01");
        assert_eq!(manager.current().info().version, "2025.11.01");
        assert_eq!(manager.current().info().kind, BackendKind::System);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_the_active_backend() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = BackendManager::start(BackendSource::System(fake_yt_dlp(dir.path())))
            .await
            .expect("start");
        fs::write(dir.path().join("no-update"), "").expect("flag");

        let res = manager.refresh().await;

        assert!(matches!(res, Err(InstallError::Step { .. })));
        assert_eq!(manager.current().info().version, "2025.10.22");
    }

    #[tokio::test]
    async fn start_fails_without_an_executable() {
        let dir = tempfile::tempdir().expect("tempdir");

        let res = BackendManager::start(BackendSource::System(dir.path().join("yt-dlp"))).await;

        assert!(matches!(res, Err(InstallError::MissingEntryPoint(_))));
    }

    const FAKE_PYTHON: &str = r#"#!/bin/sh
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  mkdir -p "$3/bin"
  cp "$0" "$3/bin/python"
  printf '#!/bin/sh\necho 2025.10.22\n' > "$3/bin/yt-dlp"
  chmod +x "$3/bin/python" "$3/bin/yt-dlp"
  exit 0
fi
exit 0
"#;

    #[tokio::test]
    async fn managed_refresh_retires_the_previous_generation() {
        let tools = tempfile::tempdir().expect("tempdir");
        let root = tempfile::tempdir().expect("tempdir");
        let python = tools.path().join("python3");
        fs::write(&python, FAKE_PYTHON).expect("write python");
        fs::set_permissions(&python, fs::Permissions::from_mode(0o755)).expect("chmod");

        let installer = Installer::new(root.path().to_path_buf(), Some(python));
        let manager = BackendManager::start(BackendSource::Managed(installer))
            .await
            .expect("start");
        let old = manager.current();
        let old_dir = old
            .info()
            .location
            .ancestors()
            .nth(2)
            .expect("generation dir")
            .to_path_buf();

        manager.refresh().await.expect("refresh");

        let new_dir = manager
            .current()
            .info()
            .location
            .ancestors()
            .nth(2)
            .expect("generation dir")
            .to_path_buf();
        assert_ne!(old_dir, new_dir);
        assert!(old_dir.exists(), "in-flight handle keeps its generation");

        drop(old);
        for _ in 0..50 {
            if !old_dir.exists() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("retired generation was not removed");
    }
}
