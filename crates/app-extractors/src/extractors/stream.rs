use app_backend::{Engine, ExtractionOptions};
use serde_json::Value;

use super::{invoke, Extractor};
use crate::common::{
    error::ExtractionError,
    fields::{string_or, string_or_empty},
    records::StreamRecord,
};

pub const UNKNOWN_UPLOADER: &str = "Unknown";
pub const MISSING_DESCRIPTION: &str = "[Stream title is missing]";

/// Live Twitch channels
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamExtractor;

#[async_trait::async_trait]
impl Extractor for StreamExtractor {
    type Input = String;
    type Output = StreamRecord;

    fn name(&self) -> &'static str {
        "stream"
    }

    async fn extract(
        &self,
        engine: &dyn Engine,
        url: String,
    ) -> Result<StreamRecord, ExtractionError> {
        let info = invoke(engine, &url, &ExtractionOptions::new().single()).await?;

        Ok(normalize(&info))
    }
}

#[must_use]
pub fn normalize(info: &Value) -> StreamRecord {
    let uploader = string_or(info, "uploader", UNKNOWN_UPLOADER);
    let description = string_or(info, "description", MISSING_DESCRIPTION);

    StreamRecord {
        id: string_or_empty(info, "id"),
        title: format!("Twitch {uploader} (live) - {description}"),
        thumbnail: string_or_empty(info, "thumbnail"),
        original_url: string_or_empty(info, "original_url"),
        url: string_or_empty(info, "url"),
    }
}
