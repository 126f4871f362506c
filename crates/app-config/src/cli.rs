use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};

use crate::common;

/// A local gateway that keeps yt-dlp installed and up to date
/// and serves normalized extraction results over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[clap(disable_help_flag = true)]
pub struct CliArgs {
    /// Print help
    #[clap(action = ArgAction::Help, long)]
    help: Option<bool>,

    #[command(flatten)]
    pub server: common::ServerConfig,

    #[command(flatten)]
    pub backend: common::BackendConfig,

    #[command(flatten)]
    pub extraction: common::ExtractionConfig,

    #[command(flatten)]
    pub run: common::RunConfig,
}
