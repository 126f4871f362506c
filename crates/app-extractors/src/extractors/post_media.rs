use app_backend::{Engine, ExtractionOptions};
use serde_json::Value;

use super::{invoke, Extractor};
use crate::common::{
    error::ExtractionError,
    fields::{array_items, float_or_zero, non_empty_str_field, str_field, string_or_empty},
    records::{PostMediaFormat, PostMediaRecord},
};

/// Videos attached to Twitter/X posts
#[derive(Debug, Clone, Copy, Default)]
pub struct PostMediaExtractor;

#[async_trait::async_trait]
impl Extractor for PostMediaExtractor {
    type Input = String;
    type Output = PostMediaRecord;

    fn name(&self) -> &'static str {
        "post-media"
    }

    async fn extract(
        &self,
        engine: &dyn Engine,
        url: String,
    ) -> Result<PostMediaRecord, ExtractionError> {
        let info = invoke(engine, &url, &ExtractionOptions::new().single()).await?;

        Ok(normalize(&info))
    }
}

#[must_use]
pub fn normalize(info: &Value) -> PostMediaRecord {
    let id = string_or_empty(info, "id");
    let title = str_field(info, "title")
        .map_or_else(|| format!("Twitter video {id}"), ToString::to_string);

    PostMediaRecord {
        title,
        thumbnail: string_or_empty(info, "thumbnail"),
        original_url: string_or_empty(info, "original_url"),
        formats: array_items(info, "formats")
            .filter_map(|x| non_empty_str_field(x, "manifest_url"))
            .map(|manifest_url| PostMediaFormat {
                manifest_url: manifest_url.to_string(),
            })
            .collect(),
        duration: float_or_zero(info, "duration"),
        id,
    }
}
