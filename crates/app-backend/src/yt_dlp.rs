use std::{
    env,
    ffi::OsString,
    path::PathBuf,
    process::Stdio,
    sync::Arc,
};

use chrono::Utc;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::{
    install::generation::Generation, BackendInfo, BackendKind, Engine, EngineFailure,
    ExtractionOptions, InstallError, RawInfo,
};

/// Variables that make child processes behave as if the virtual environment was activated.
///
/// Only ever applied to commands we spawn, the gateway's own environment stays untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenvEnvironment {
    pub virtual_env: PathBuf,
    pub bin_dir: PathBuf,
}

impl VenvEnvironment {
    #[must_use]
    pub fn search_path(&self) -> OsString {
        let inherited = env::var_os("PATH").unwrap_or_default();
        let paths = std::iter::once(self.bin_dir.clone()).chain(env::split_paths(&inherited));

        env::join_paths(paths).unwrap_or_else(|_| self.bin_dir.clone().into_os_string())
    }

    pub fn apply(&self, cmd: &mut Command) {
        cmd.env("VIRTUAL_ENV", &self.virtual_env)
            .env("PATH", self.search_path())
            .env_remove("PYTHONHOME");
    }
}

#[derive(Debug)]
pub struct YtDlp {
    executable: PathBuf,
    environment: Option<VenvEnvironment>,
    info: BackendInfo,
    /// Keeps the installation on disk while this backend is alive
    _generation: Option<Arc<Generation>>,
}

impl YtDlp {
    /// Builds a backend around `executable` after making sure it answers `--version`
    pub async fn probe(
        executable: PathBuf,
        kind: BackendKind,
        environment: Option<VenvEnvironment>,
        generation: Option<Arc<Generation>>,
    ) -> Result<Self, InstallError> {
        if !tokio::fs::try_exists(&executable).await.unwrap_or(false) {
            return Err(InstallError::MissingEntryPoint(executable));
        }

        let mut backend = Self {
            info: BackendInfo {
                kind,
                version: String::new(),
                location: executable.clone(),
                installed_at: Utc::now(),
            },
            executable,
            environment,
            _generation: generation,
        };

        backend.info.version = backend.version().await?;
        debug!(info = ?backend.info, "yt-dlp backend is usable");

        Ok(backend)
    }

    /// A command for the engine with the isolation applied
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        if let Some(environment) = &self.environment {
            environment.apply(&mut cmd);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        cmd
    }

    pub async fn version(&self) -> Result<String, InstallError> {
        let mut cmd = self.command();
        cmd.arg("--ignore-config").arg("--version");

        let out = cmd.output().await.map_err(|source| InstallError::Spawn {
            program: self.executable.to_string_lossy().into_owned(),
            source,
        })?;

        if !out.status.success() {
            return Err(InstallError::Step {
                step: "yt-dlp --version",
                output: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }
}

#[async_trait::async_trait]
impl Engine for YtDlp {
    fn info(&self) -> &BackendInfo {
        &self.info
    }

    #[tracing::instrument(skip(self, options), fields(version = %self.info.version))]
    async fn extract_info(
        &self,
        query: &str,
        options: &ExtractionOptions,
    ) -> Result<RawInfo, EngineFailure> {
        let mut cmd = self.command();
        cmd.args(options.to_args()).arg("--").arg(query);

        trace!(?cmd, "Running yt-dlp");

        let out = cmd
            .output()
            .await
            .map_err(|e| EngineFailure::Other(format!("Failed to run yt-dlp: {e}")))?;

        trace!(status = ?out.status, stderr = %String::from_utf8_lossy(&out.stderr), "yt-dlp finished");

        if !out.status.success() {
            return Err(EngineFailure::from_stderr(&String::from_utf8_lossy(
                &out.stderr,
            )));
        }

        let stdout = String::from_utf8_lossy(&out.stdout);
        let stdout = stdout.trim();
        if stdout.is_empty() {
            return Ok(RawInfo::Null);
        }

        serde_json::from_str(stdout)
            .map_err(|e| EngineFailure::Other(format!("Failed to parse yt-dlp output: {e}")))
    }
}
