use app_backend::{Engine, ExtractionOptions};
use app_config::common::{ExtractionConfig, DEFAULT_VIDEO_FORMAT};
use serde_json::Value;

use super::{invoke, Extractor};
use crate::common::{
    error::ExtractionError,
    fields::{int_or_zero, non_empty_str_field, string_or, string_or_empty},
    records::VideoRecord,
};

pub const MISSING_TITLE: &str = "Video title is missing :(";
pub const MISSING_SOURCE_MESSAGE: &str = "Failed to fetch video. Source URL is missing.";
pub const NO_ENTRIES_MESSAGE: &str = "No videos found.";

/// A single video, never a whole playlist even if the query points into one
#[derive(Debug, Clone)]
pub struct VideoExtractor {
    format: String,
    player_client: String,
    remote_components: Vec<String>,
}

impl Default for VideoExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

impl VideoExtractor {
    #[must_use]
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            format: config.video_format.clone(),
            player_client: config.player_client.clone(),
            remote_components: config.remote_components.clone(),
        }
    }

    #[must_use]
    pub fn options(&self) -> ExtractionOptions {
        let format = if self.format.is_empty() {
            DEFAULT_VIDEO_FORMAT
        } else {
            self.format.as_str()
        };

        ExtractionOptions::new()
            .with_playlist_items("1")
            .single()
            .with_format(format)
            .with_player_client(self.player_client.as_str())
            .with_remote_components(self.remote_components.iter().map(String::as_str))
    }
}

#[async_trait::async_trait]
impl Extractor for VideoExtractor {
    type Input = String;
    type Output = VideoRecord;

    fn name(&self) -> &'static str {
        "video"
    }

    async fn extract(
        &self,
        engine: &dyn Engine,
        query: String,
    ) -> Result<VideoRecord, ExtractionError> {
        let info = invoke(engine, &query, &self.options()).await?;

        normalize(pick_entry(&info)?)
    }
}

/// The video itself, or the first real entry when the engine answered with a listing
fn pick_entry(info: &Value) -> Result<&Value, ExtractionError> {
    match info.get("entries") {
        Some(Value::Array(entries)) => entries
            .iter()
            .find(|x| !x.is_null())
            .ok_or_else(|| ExtractionError::NotFound(NO_ENTRIES_MESSAGE.to_string())),
        _ => Ok(info),
    }
}

pub fn normalize(entry: &Value) -> Result<VideoRecord, ExtractionError> {
    let manifest_url = non_empty_str_field(entry, "manifest_url")
        .ok_or_else(|| ExtractionError::MissingSource(MISSING_SOURCE_MESSAGE.to_string()))?;

    Ok(VideoRecord {
        id: string_or_empty(entry, "id"),
        title: string_or(entry, "title", MISSING_TITLE),
        thumbnail: string_or_empty(entry, "thumbnail"),
        original_url: string_or_empty(entry, "original_url"),
        manifest_url: manifest_url.to_string(),
        available_at: int_or_zero(entry, "available_at"),
        duration: int_or_zero(entry, "duration"),
        upload_date: string_or_empty(entry, "upload_date"),
        uploader: string_or_empty(entry, "uploader"),
        artist: string_or_empty(entry, "artist"),
        album: string_or_empty(entry, "album"),
        release_date: string_or_empty(entry, "release_date"),
    })
}
