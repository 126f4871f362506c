use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{Args, ValueEnum, ValueHint};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    timeframe::Timeframe,
    validators::{
        directory::validate_is_writable_directory,
        file::{validate_is_file, value_parser_parse_valid_file},
    },
    Config,
};

pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

pub const DEFAULT_VIDEO_FORMAT: &str = "bv*[vcodec~='^((he|a)vc|h26[45])']+ba/b";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = Some("Server options"))]
pub struct ServerConfig {
    /// Path to the shared JSON config file.
    ///
    /// The `ytdlp` object of the file is read for `enabled`, `enable_server`,
    /// `server_address` and `server_port`.
    #[arg(short = 'c', long, env = "EXTRACTION_GATEWAY_CONFIG_PATH", value_hint = ValueHint::FilePath, value_parser = value_parser_parse_valid_file())]
    #[validate(custom(function = "validate_is_file"))]
    pub config_path: Option<PathBuf>,

    /// The host on which the server will listen.
    ///
    /// Takes precedence over the config file.
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// The port on which the server will listen.
    ///
    /// Takes precedence over the config file.
    #[arg(long, env = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[allow(clippy::struct_field_names)]
#[clap(next_help_heading = Some("Backend options"))]
pub struct BackendConfig {
    /// Directory into which yt-dlp gets installed.
    ///
    /// Every refresh creates a new installation inside of this directory.
    /// Defaults to a directory inside of the user cache dir.
    #[arg(long, env = "EXTRACTION_GATEWAY_INSTALL_DIR", value_hint = ValueHint::DirPath)]
    install_dir: Option<PathBuf>,

    /// Path to the python interpreter used to create the virtual environment.
    ///
    /// If not provided, `python3` or `python` will be searched for in $PATH
    #[arg(long, env = "EXTRACTION_GATEWAY_PYTHON", value_hint = ValueHint::FilePath, value_parser = value_parser_parse_valid_file())]
    #[validate(custom(function = "validate_is_file"))]
    python_path: Option<PathBuf>,

    /// Path to an already installed yt-dlp executable.
    ///
    /// When set, no virtual environment is managed and refreshes
    /// use the executable's own update mechanism.
    #[arg(long, env = "EXTRACTION_GATEWAY_YT_DLP", value_hint = ValueHint::FilePath, value_parser = value_parser_parse_valid_file())]
    #[validate(custom(function = "validate_is_file"))]
    yt_dlp_path: Option<PathBuf>,

    /// How often the backend gets reinstalled/upgraded.
    ///
    /// Accepts values like `30min`, `12h` or `1d`. Has to be at least a minute.
    #[arg(long, default_value = "1d", env = "EXTRACTION_GATEWAY_REFRESH_INTERVAL", value_parser = Timeframe::parse_str)]
    #[validate(custom(function = "validate_refresh_interval"))]
    pub refresh_interval: Timeframe,

    /// Disable the periodic backend refresh
    #[arg(long, env = "EXTRACTION_GATEWAY_DISABLE_REFRESH")]
    pub disable_refresh: bool,
}
impl BackendConfig {
    #[must_use]
    pub fn install_dir(&self) -> PathBuf {
        self.install_dir
            .clone()
            .unwrap_or_else(|| Config::cache_dir().join("yt-dlp"))
    }

    #[must_use]
    pub fn python_path(&self) -> Option<&Path> {
        self.python_path.as_deref()
    }

    #[must_use]
    pub fn yt_dlp_path(&self) -> Option<&Path> {
        self.yt_dlp_path.as_deref()
    }

    #[must_use]
    pub fn resolve_paths(mut self) -> Self {
        self.with_resolved_paths();
        self
    }

    pub fn with_resolved_paths(&mut self) -> &Self {
        self.python_path = self
            .python_path
            .clone()
            .or_else(|| which::which("python3").ok())
            .or_else(|| which::which("python").ok());

        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Args, Validate)]
#[clap(next_help_heading = Some("Extraction options"))]
pub struct ExtractionConfig {
    /// Directory downloaded short-form videos are written to.
    ///
    /// Will be created if it doesn't exist.
    #[arg(long, default_value = "content/media/video", env = "EXTRACTION_GATEWAY_DOWNLOAD_DIR", value_hint = ValueHint::DirPath)]
    #[validate(custom(function = "validate_download_dir"))]
    pub download_dir: PathBuf,

    /// Format selector used when fetching single videos.
    #[arg(long, default_value = DEFAULT_VIDEO_FORMAT, env = "EXTRACTION_GATEWAY_VIDEO_FORMAT")]
    #[validate(length(min = 1))]
    pub video_format: String,

    /// Player client requested from YouTube.
    #[arg(long, default_value = "web_safari", env = "EXTRACTION_GATEWAY_PLAYER_CLIENT")]
    #[validate(length(min = 1))]
    pub player_client: String,

    /// Remote components yt-dlp is allowed to fetch (eg. the JS challenge solver).
    #[arg(long, default_value = "ejs:github", value_delimiter = ',', env = "EXTRACTION_GATEWAY_REMOTE_COMPONENTS")]
    pub remote_components: Vec<String>,
}
impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from("content/media/video"),
            video_format: DEFAULT_VIDEO_FORMAT.to_string(),
            player_client: "web_safari".to_string(),
            remote_components: vec!["ejs:github".to_string()],
        }
    }
}

/// The download directory may not exist yet, but if it does it has to be writable
fn validate_download_dir(path: &Path) -> Result<(), validator::ValidationError> {
    if path.exists() {
        validate_is_writable_directory(path)?;
    }

    Ok(())
}

fn validate_refresh_interval(interval: &Timeframe) -> Result<(), validator::ValidationError> {
    if Duration::from(interval) < MIN_REFRESH_INTERVAL {
        return Err(validator::ValidationError::new(
            "Refresh interval has to be at least a minute",
        ));
    }

    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ValueEnum)]
pub enum DumpConfigType {
    Json,
    Toml,
}
#[derive(Debug, Clone, Default, Serialize, Deserialize, Args, Validate)]
#[allow(clippy::option_option)]
#[clap(next_help_heading = Some("Run options"))]
pub struct RunConfig {
    /// Dump the config to stdout
    #[arg(long, value_enum, default_value = None)]
    pub dump_config: Option<Option<DumpConfigType>>,
}
