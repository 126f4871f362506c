//! Isolated yt-dlp installations.
//!
//! Every install goes into its own generation directory under the install root,
//! and the `current` marker names the one that was last completed successfully:
//!
//! ```text
//! <root>/
//!   current            -> "gen-1700000000000"
//!   gen-1700000000000/ -> python virtual environment with yt-dlp
//! ```

use std::{path::PathBuf, sync::Arc};

use app_helpers::id::time_token;
use tokio::process::Command;
use tracing::{debug, info, trace, warn};

use self::{
    generation::{Generation, GENERATION_PREFIX},
    layout::VenvLayout,
};
use crate::{yt_dlp::YtDlp, BackendKind, Engine, InstallError};

pub mod generation;
pub mod layout;

pub const CURRENT_MARKER: &str = "current";

const PIP_INSTALLS: &[(&str, &[&str])] = &[
    (
        "pip install yt-dlp",
        &[
            "install",
            "--disable-pip-version-check",
            "--upgrade",
            "--pre",
            "yt-dlp[default,curl-cffi]",
        ],
    ),
    (
        "pip install deno",
        &["install", "--disable-pip-version-check", "--upgrade", "deno"],
    ),
];

#[derive(Debug)]
pub struct Installation {
    pub backend: YtDlp,
    pub generation: Arc<Generation>,
}

#[derive(Debug, Clone)]
pub struct Installer {
    root: PathBuf,
    python: Option<PathBuf>,
}

impl Installer {
    #[must_use]
    pub const fn new(root: PathBuf, python: Option<PathBuf>) -> Self {
        Self { root, python }
    }

    /// Reuses the current installation if it still works, installs a new one otherwise
    #[tracing::instrument(skip(self), fields(root = ?self.root))]
    pub async fn ensure_installed(&self) -> Result<Installation, InstallError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let installation = match self.current_generation().await {
            Some(generation) => match self.open(generation).await {
                Ok(installation) => {
                    info!(
                        generation = %installation.generation.name(),
                        version = %installation.backend.info().version,
                        "Reusing existing yt-dlp installation"
                    );
                    installation
                }
                Err(e) => {
                    warn!("Existing yt-dlp installation is unusable, reinstalling: {e}");
                    self.install_fresh().await?
                }
            },
            None => self.install_fresh().await?,
        };

        self.prune_except(&installation.generation.name()).await;

        Ok(installation)
    }

    /// Installs the latest yt-dlp into a brand new generation.
    ///
    /// A failed install cleans up after itself and leaves the `current` marker alone.
    #[tracing::instrument(skip(self), fields(root = ?self.root))]
    pub async fn install_fresh(&self) -> Result<Installation, InstallError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let generation = Arc::new(Generation::new(
            self.root
                .join(format!("{GENERATION_PREFIX}{token}", token = time_token())),
        ));

        let backend = match self.build(&generation).await {
            Ok(backend) => backend,
            Err(e) => {
                generation.retire();
                return Err(e);
            }
        };

        self.mark_current(&generation).await?;
        info!(
            generation = %generation.name(),
            version = %backend.info().version,
            "Installed yt-dlp"
        );

        Ok(Installation {
            backend,
            generation,
        })
    }

    async fn build(&self, generation: &Arc<Generation>) -> Result<YtDlp, InstallError> {
        let python = self.python.as_ref().ok_or(InstallError::MissingPython)?;
        let layout = VenvLayout::new(generation.path());

        debug!(path = ?layout.root(), "Creating yt-dlp virtual environment");
        let mut cmd = Command::new(python);
        cmd.arg("-m").arg("venv").arg(layout.root());
        run_step("create virtual environment", &mut cmd).await?;

        let environment = layout.environment();
        for (step, args) in PIP_INSTALLS {
            debug!(step, "Installing into the virtual environment");
            let mut cmd = Command::new(layout.python());
            environment.apply(&mut cmd);
            cmd.arg("-m").arg("pip").args(*args);
            run_step(step, &mut cmd).await?;
        }

        YtDlp::probe(
            layout.yt_dlp(),
            BackendKind::Managed,
            Some(environment),
            Some(generation.clone()),
        )
        .await
    }

    async fn open(&self, generation: Arc<Generation>) -> Result<Installation, InstallError> {
        let layout = VenvLayout::new(generation.path());

        let backend = YtDlp::probe(
            layout.yt_dlp(),
            BackendKind::Managed,
            Some(layout.environment()),
            Some(generation.clone()),
        )
        .await?;

        Ok(Installation {
            backend,
            generation,
        })
    }

    async fn current_generation(&self) -> Option<Arc<Generation>> {
        let name = tokio::fs::read_to_string(self.root.join(CURRENT_MARKER))
            .await
            .ok()?;
        let name = name.trim();

        if !is_generation_name(name) {
            warn!(?name, "Ignoring malformed installation marker");
            return None;
        }

        let path = self.root.join(name);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return None;
        }

        Some(Arc::new(Generation::new(path)))
    }

    async fn mark_current(&self, generation: &Generation) -> Result<(), InstallError> {
        let tmp = self.root.join(format!("{CURRENT_MARKER}.tmp"));
        tokio::fs::write(&tmp, generation.name()).await?;
        tokio::fs::rename(&tmp, self.root.join(CURRENT_MARKER)).await?;

        Ok(())
    }

    /// Removes leftovers of earlier runs
    async fn prune_except(&self, keep: &str) {
        let Ok(mut entries) = tokio::fs::read_dir(&self.root).await else {
            return;
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == keep || !is_generation_name(&name) {
                continue;
            }

            debug!(?name, "Removing stale installation");
            if let Err(e) = tokio::fs::remove_dir_all(entry.path()).await {
                warn!(?name, "Failed to remove stale installation: {e:?}");
            }
        }
    }
}

fn is_generation_name(name: &str) -> bool {
    name.strip_prefix(GENERATION_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

async fn run_step(step: &'static str, cmd: &mut Command) -> Result<(), InstallError> {
    cmd.kill_on_drop(true);
    trace!(?cmd, step, "Running install step");

    let out = cmd.output().await.map_err(|source| InstallError::Spawn {
        program: cmd.as_std().get_program().to_string_lossy().into_owned(),
        source,
    })?;

    trace!(status = ?out.status, step, "Install step finished");

    if !out.status.success() {
        return Err(InstallError::Step {
            step,
            output: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use std::{fs, os::unix::fs::PermissionsExt, path::Path};

    use super::*;

    /// Pretends to be python: `-m venv DIR` lays out a venv with a fake yt-dlp,
    /// `-m pip ...` succeeds unless a `fail-pip` file sits in the install root.
    const FAKE_PYTHON: &str = r#"#!/bin/sh
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  mkdir -p "$3/bin"
  cp "$0" "$3/bin/python"
  printf '#!/bin/sh\necho 2025.10.22\n' > "$3/bin/yt-dlp"
  chmod +x "$3/bin/python" "$3/bin/yt-dlp"
  exit 0
fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ]; then
  if [ -e "$(dirname "$0")/../../fail-pip" ]; then echo "pip exploded" >&2; exit 1; fi
  exit 0
fi
exit 2
"#;

    fn fake_python(dir: &Path) -> PathBuf {
        let path = dir.join("python3");
        fs::write(&path, FAKE_PYTHON).expect("write python");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
        path
    }

    fn generations(root: &Path) -> Vec<String> {
        let mut names = fs::read_dir(root)
            .expect("read root")
            .filter_map(Result::ok)
            .map(|x| x.file_name().to_string_lossy().into_owned())
            .filter(|x| is_generation_name(x))
            .collect::<Vec<_>>();
        names.sort();
        names
    }

    #[tokio::test]
    async fn installs_and_marks_a_generation() {
        let tools = tempfile::tempdir().expect("tempdir");
        let root = tempfile::tempdir().expect("tempdir");
        let installer = Installer::new(root.path().to_path_buf(), Some(fake_python(tools.path())));

        let installation = installer.ensure_installed().await.expect("install");

        assert_eq!(installation.backend.info().version, "2025.10.22");
        let marker = fs::read_to_string(root.path().join(CURRENT_MARKER)).expect("marker");
        assert_eq!(marker, installation.generation.name());
        assert_eq!(generations(root.path()), vec![marker]);
    }

    #[tokio::test]
    async fn ensure_installed_is_idempotent() {
        let tools = tempfile::tempdir().expect("tempdir");
        let root = tempfile::tempdir().expect("tempdir");
        let installer = Installer::new(root.path().to_path_buf(), Some(fake_python(tools.path())));

        let first = installer.ensure_installed().await.expect("install");
        let first_name = first.generation.name();
        drop(first);
        let second = installer.ensure_installed().await.expect("install");

        assert_eq!(second.generation.name(), first_name);
        assert_eq!(generations(root.path()).len(), 1);
    }

    #[tokio::test]
    async fn failed_install_leaves_current_alone() {
        let tools = tempfile::tempdir().expect("tempdir");
        let root = tempfile::tempdir().expect("tempdir");
        let installer = Installer::new(root.path().to_path_buf(), Some(fake_python(tools.path())));

        let good = installer.ensure_installed().await.expect("install");

        fs::write(root.path().join("fail-pip"), "").expect("flag");
        let res = installer.install_fresh().await;

        assert!(matches!(res, Err(InstallError::Step { .. })));
        let marker = fs::read_to_string(root.path().join(CURRENT_MARKER)).expect("marker");
        assert_eq!(marker, good.generation.name());
    }

    #[tokio::test]
    async fn missing_python_is_an_install_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let installer = Installer::new(root.path().to_path_buf(), None);

        let res = installer.ensure_installed().await;

        assert!(matches!(res, Err(InstallError::MissingPython)));
    }

    #[test]
    fn generation_names() {
        assert!(is_generation_name("gen-1700000000000"));
        assert!(!is_generation_name("gen-"));
        assert!(!is_generation_name("gen-../../etc"));
        assert!(!is_generation_name("current"));
    }
}
