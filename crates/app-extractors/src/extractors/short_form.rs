use std::path::PathBuf;

use app_backend::{Engine, ExtractionOptions};
use app_helpers::{dirs::ensure_dir, id::time_token};
use app_logger::debug;
use serde_json::Value;

use super::{invoke, Extractor};
use crate::common::{
    error::ExtractionError,
    fields::{non_empty_str_field, string_or, string_or_empty},
    records::ShortFormRecord,
};

pub const MISSING_TITLE: &str = "[Tiktok title is missing]";

/// Short clips (TikTok) are downloaded, their links expire too quickly to pass along
#[derive(Debug, Clone)]
pub struct ShortFormExtractor {
    download_dir: PathBuf,
}

impl ShortFormExtractor {
    #[must_use]
    pub const fn new(download_dir: PathBuf) -> Self {
        Self { download_dir }
    }
}

#[async_trait::async_trait]
impl Extractor for ShortFormExtractor {
    type Input = String;
    type Output = ShortFormRecord;

    fn name(&self) -> &'static str {
        "short-form"
    }

    async fn extract(
        &self,
        engine: &dyn Engine,
        url: String,
    ) -> Result<ShortFormRecord, ExtractionError> {
        ensure_dir(&self.download_dir).await.map_err(|e| {
            ExtractionError::Generic(format!("Failed to prepare download directory: {e}"))
        })?;

        let stem = self.download_dir.join(time_token().to_string());
        let mut template = stem.clone().into_os_string();
        template.push(".%(ext)s");
        debug!(?template, "Downloading short-form video");

        let options = ExtractionOptions::new()
            .with_format("best")
            .downloading_to(template);
        let info = invoke(engine, &url, &options).await?;

        Ok(normalize(&info, &url, stem))
    }
}

/// `fallback_path` is used when the engine doesn't say where the file went
#[must_use]
pub fn normalize(info: &Value, url: &str, fallback_path: PathBuf) -> ShortFormRecord {
    let title = non_empty_str_field(info, "title")
        .or_else(|| non_empty_str_field(info, "description"))
        .unwrap_or(MISSING_TITLE)
        .to_string();

    ShortFormRecord {
        id: string_or_empty(info, "id"),
        title,
        thumbnail: string_or_empty(info, "thumbnail"),
        original_url: string_or(info, "original_url", url),
        url: url.to_string(),
        path: downloaded_path(info).unwrap_or(fallback_path),
    }
}

fn downloaded_path(info: &Value) -> Option<PathBuf> {
    info.get("requested_downloads")
        .and_then(Value::as_array)
        .and_then(|x| x.first())
        .and_then(|x| non_empty_str_field(x, "filepath"))
        .or_else(|| non_empty_str_field(info, "_filename"))
        .or_else(|| non_empty_str_field(info, "filename"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::extractors::testing::ScriptedEngine;

    const URL: &str = "https://www.tiktok.com/@someone/video/7300000000000000000";

    #[tokio::test]
    async fn downloads_into_the_configured_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let download_dir = dir.path().join("media").join("video");
        let engine = ScriptedEngine::returning(json!({
            "id": "7300000000000000000",
            "title": "",
            "description": "a clip #fyp",
            "requested_downloads": [{ "filepath": "/srv/media/7.mp4" }],
        }));

        let record = ShortFormExtractor::new(download_dir.clone())
            .extract(&engine, URL.to_string())
            .await
            .expect("extraction");

        assert!(download_dir.is_dir());
        assert_eq!(record.title, "a clip #fyp");
        assert_eq!(record.path, PathBuf::from("/srv/media/7.mp4"));
        assert_eq!(record.url, URL);
        assert_eq!(record.original_url, URL);

        let calls = engine.calls();
        let (_, options) = &calls[0];
        assert_eq!(options.format.as_deref(), Some("best"));
        let template = options
            .download
            .as_ref()
            .expect("download target")
            .output_template
            .clone();
        assert_eq!(template.parent(), Some(download_dir.as_path()));
        assert!(template.to_string_lossy().ends_with(".%(ext)s"));
    }

    #[tokio::test]
    async fn consecutive_downloads_never_share_a_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let engine = ScriptedEngine::new([Ok(json!({ "id": "a" })), Ok(json!({ "id": "b" }))]);
        let extractor = ShortFormExtractor::new(dir.path().to_path_buf());

        let first = extractor.extract(&engine, URL.to_string()).await.expect("first");
        let second = extractor.extract(&engine, URL.to_string()).await.expect("second");

        assert_ne!(first.path, second.path);
    }

    #[test]
    fn path_falls_back_to_the_template_stem() {
        let record = normalize(&json!({ "id": "x" }), URL, PathBuf::from("content/media/video/17"));

        assert_eq!(record.path, PathBuf::from("content/media/video/17"));
        assert_eq!(record.title, MISSING_TITLE);

        let record = normalize(
            &json!({ "_filename": "content/media/video/17.mp4" }),
            URL,
            PathBuf::from("content/media/video/17"),
        );
        assert_eq!(record.path, PathBuf::from("content/media/video/17.mp4"));
    }
}
