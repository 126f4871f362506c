use app_backend::{Engine, ExtractionOptions, RawInfo};
use app_logger::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{invoke, Extractor};
use crate::common::{
    error::ExtractionError,
    fields::{array_items, non_empty_str_field, string_or_empty, uint_or_zero},
    records::{PlaylistEntry, PlaylistRecord, Thumbnail},
};

/// `start..end` of a listing, zero-based and end-exclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRequest {
    pub query: String,
    pub start: u64,
    pub end: u64,
}

impl PlaylistRequest {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.end.saturating_sub(self.start)).unwrap_or(usize::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub count: u64,
}

impl From<SearchRequest> for PlaylistRequest {
    fn from(value: SearchRequest) -> Self {
        Self {
            query: format!("ytsearch{count}:{query}", count = value.count, query = value.query),
            start: 0,
            end: value.count,
        }
    }
}

/// Flat listing of a playlist, entries are not resolved any further
#[derive(Debug, Clone, Default)]
pub struct PlaylistExtractor {
    remote_components: Vec<String>,
}

impl PlaylistExtractor {
    #[must_use]
    pub const fn new(remote_components: Vec<String>) -> Self {
        Self { remote_components }
    }

    /// Engine bounds are one-based and inclusive
    #[must_use]
    pub fn options(&self, request: &PlaylistRequest) -> ExtractionOptions {
        ExtractionOptions::new()
            .flat()
            .with_playlist_bounds(request.start + 1, request.end)
            .with_remote_components(self.remote_components.iter().map(String::as_str))
    }
}

#[async_trait::async_trait]
impl Extractor for PlaylistExtractor {
    type Input = PlaylistRequest;
    type Output = PlaylistRecord;

    fn name(&self) -> &'static str {
        "playlist"
    }

    async fn extract(
        &self,
        engine: &dyn Engine,
        request: PlaylistRequest,
    ) -> Result<PlaylistRecord, ExtractionError> {
        if request.is_empty() {
            debug!(?request, "Empty range requested, not asking the engine");
            return Ok(PlaylistRecord::empty());
        }

        let options = self.options(&request);
        let mut info = invoke(engine, &request.query, &options).await?;

        if entries_of(&info).is_none() {
            // Some listings only point at the real playlist
            let Some(url) = non_empty_str_field(&info, "url").map(ToString::to_string) else {
                return Ok(PlaylistRecord::empty());
            };

            debug!(?url, "Listing has no entries, resolving it once more");
            info = invoke(engine, &url, &options).await?;
        }

        let Some(entries) = entries_of(&info) else {
            return Ok(PlaylistRecord::empty());
        };

        let entries = entries
            .iter()
            .filter(|x| x.is_object())
            .map(normalize_entry)
            .take(request.len())
            .collect();

        Ok(PlaylistRecord { entries })
    }
}

/// Search results, at most `count` of them, in the order the engine ranked them
#[derive(Debug, Clone, Default)]
pub struct SearchExtractor {
    playlist: PlaylistExtractor,
}

impl SearchExtractor {
    #[must_use]
    pub const fn new(playlist: PlaylistExtractor) -> Self {
        Self { playlist }
    }
}

#[async_trait::async_trait]
impl Extractor for SearchExtractor {
    type Input = SearchRequest;
    type Output = PlaylistRecord;

    fn name(&self) -> &'static str {
        "search"
    }

    async fn extract(
        &self,
        engine: &dyn Engine,
        request: SearchRequest,
    ) -> Result<PlaylistRecord, ExtractionError> {
        self.playlist.extract(engine, request.into()).await
    }
}

fn entries_of(info: &RawInfo) -> Option<&Vec<Value>> {
    info.get("entries").and_then(Value::as_array)
}

fn normalize_entry(entry: &Value) -> PlaylistEntry {
    PlaylistEntry {
        url: string_or_empty(entry, "url"),
        title: string_or_empty(entry, "title"),
        thumbnails: array_items(entry, "thumbnails")
            .filter(|x| x.is_object())
            .map(|x| Thumbnail {
                url: string_or_empty(x, "url"),
                height: uint_or_zero(x, "height"),
                width: uint_or_zero(x, "width"),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::extractors::testing::ScriptedEngine;

    fn entry(n: u32) -> Value {
        json!({
            "url": format!("https://www.youtube.com/watch?v={n}"),
            "title": format!("Video {n}"),
            "thumbnails": [
                { "url": format!("https://i.ytimg.com/{n}.jpg"), "height": 94, "width": 168 },
            ],
        })
    }

    fn request(start: u64, end: u64) -> PlaylistRequest {
        PlaylistRequest {
            query: "https://www.youtube.com/playlist?list=PL".to_string(),
            start,
            end,
        }
    }

    #[tokio::test]
    async fn range_maps_onto_engine_bounds() {
        let engine = ScriptedEngine::returning(json!({ "entries": [entry(3), entry(4)] }));

        let record = PlaylistExtractor::default()
            .extract(&engine, request(2, 4))
            .await
            .expect("extraction");

        let calls = engine.calls();
        let (_, options) = &calls[0];
        assert_eq!(options.playlist_start, Some(3));
        assert_eq!(options.playlist_end, Some(4));
        assert!(options.flat_playlist);
        assert_eq!(record.entries.len(), 2);
        assert_eq!(record.entries[0].title, "Video 3");
        assert_eq!(record.entries[0].thumbnails[0].width, 168);
    }

    #[tokio::test]
    async fn reversed_or_empty_range_never_reaches_the_engine() {
        for (start, end) in [(5, 5), (6, 2)] {
            let engine = ScriptedEngine::new([]);

            let record = PlaylistExtractor::default()
                .extract(&engine, request(start, end))
                .await
                .expect("extraction");

            assert!(record.entries.is_empty());
            assert!(engine.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn wrapper_is_resolved_exactly_once() {
        let engine = ScriptedEngine::new([
            Ok(json!({ "_type": "url", "url": "https://www.youtube.com/playlist?list=REAL" })),
            Ok(json!({ "_type": "url", "url": "https://www.youtube.com/playlist?list=AGAIN" })),
        ]);

        let record = PlaylistExtractor::default()
            .extract(&engine, request(0, 10))
            .await
            .expect("extraction");

        let calls = engine.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, "https://www.youtube.com/playlist?list=REAL");
        assert!(record.entries.is_empty());
    }

    #[tokio::test]
    async fn resolved_wrapper_yields_entries() {
        let engine = ScriptedEngine::new([
            Ok(json!({ "url": "https://www.youtube.com/playlist?list=REAL" })),
            Ok(json!({ "entries": [entry(1)] })),
        ]);

        let record = PlaylistExtractor::default()
            .extract(&engine, request(0, 10))
            .await
            .expect("extraction");

        assert_eq!(record.entries.len(), 1);
    }

    #[tokio::test]
    async fn wrapper_without_url_is_an_empty_playlist() {
        let engine = ScriptedEngine::returning(json!({ "title": "nothing here" }));

        let record = PlaylistExtractor::default()
            .extract(&engine, request(0, 10))
            .await
            .expect("extraction");

        assert!(record.entries.is_empty());
        assert_eq!(engine.calls().len(), 1);
    }

    #[tokio::test]
    async fn odd_entries_are_skipped_or_coerced() {
        let engine = ScriptedEngine::returning(json!({
            "entries": [
                null,
                "https://www.youtube.com/watch?v=loose",
                { "url": 5, "thumbnails": "none" },
                { "url": "u", "title": "t", "thumbnails": [null, { "height": 1.5 }] },
            ],
        }));

        let record = PlaylistExtractor::default()
            .extract(&engine, request(0, 10))
            .await
            .expect("extraction");

        assert_eq!(
            record.entries,
            vec![
                PlaylistEntry {
                    url: String::new(),
                    title: String::new(),
                    thumbnails: vec![],
                },
                PlaylistEntry {
                    url: "u".to_string(),
                    title: "t".to_string(),
                    thumbnails: vec![Thumbnail {
                        url: String::new(),
                        height: 0,
                        width: 0,
                    }],
                },
            ]
        );
    }

    #[tokio::test]
    async fn search_builds_the_query_and_bounds_results() {
        let engine = ScriptedEngine::returning(json!({
            "entries": [entry(1), entry(2), entry(3), entry(4)],
        }));

        let record = SearchExtractor::default()
            .extract(
                &engine,
                SearchRequest {
                    query: "never gonna".to_string(),
                    count: 3,
                },
            )
            .await
            .expect("extraction");

        let calls = engine.calls();
        assert_eq!(calls[0].0, "ytsearch3:never gonna");
        assert_eq!(calls[0].1.playlist_start, Some(1));
        assert_eq!(calls[0].1.playlist_end, Some(3));
        let titles = record
            .entries
            .iter()
            .map(|x| x.title.as_str())
            .collect::<Vec<_>>();
        assert_eq!(titles, vec!["Video 1", "Video 2", "Video 3"]);
    }
}
