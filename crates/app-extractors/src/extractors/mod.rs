use std::{fmt::Debug, time::Instant};

use app_backend::{Engine, ExtractionOptions, RawInfo};
use app_config::common::ExtractionConfig;
use app_logger::{debug, info, trace};
use serde::Serialize;

use self::{
    playlist::{PlaylistExtractor, SearchExtractor},
    post_media::PostMediaExtractor,
    short_form::ShortFormExtractor,
    stream::StreamExtractor,
    video::VideoExtractor,
};
use crate::common::{
    classifier::{classify, NOT_FOUND_MESSAGE},
    error::ExtractionError,
};

pub mod playlist;
pub mod post_media;
pub mod short_form;
pub mod stream;
pub mod video;

#[cfg(test)]
pub(crate) mod testing;

/// One kind of source: which options the engine gets and how its output becomes a record.
#[async_trait::async_trait]
pub trait Extractor: Debug + Send + Sync {
    type Input: Debug + Send;
    type Output: Serialize + Send;

    fn name(&self) -> &'static str;

    async fn extract(
        &self,
        engine: &dyn Engine,
        input: Self::Input,
    ) -> Result<Self::Output, ExtractionError>;
}

/// Every adapter the gateway serves, configured once at startup
#[derive(Debug, Clone)]
pub struct Extractors {
    pub video: VideoExtractor,
    pub playlist: PlaylistExtractor,
    pub search: SearchExtractor,
    pub stream: StreamExtractor,
    pub short_form: ShortFormExtractor,
    pub post_media: PostMediaExtractor,
}

impl Extractors {
    #[must_use]
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let playlist = PlaylistExtractor::new(config.remote_components.clone());

        Self {
            video: VideoExtractor::from_config(config),
            search: SearchExtractor::new(playlist.clone()),
            playlist,
            stream: StreamExtractor,
            short_form: ShortFormExtractor::new(config.download_dir.clone()),
            post_media: PostMediaExtractor,
        }
    }
}

/// Runs `extractor` and logs how long it took
pub async fn extract_timed<E>(
    extractor: &E,
    engine: &dyn Engine,
    input: E::Input,
) -> Result<E::Output, ExtractionError>
where
    E: Extractor + ?Sized,
{
    let start = Instant::now();
    trace!(extractor = extractor.name(), ?input, "Starting extraction");

    let res = extractor.extract(engine, input).await;

    let elapsed = start.elapsed();
    match &res {
        Ok(_) => {
            debug!(extractor = extractor.name(), "Extraction took {elapsed:?}");
        }
        Err(e) => {
            info!(
                extractor = extractor.name(),
                kind = e.kind().as_str(),
                "Extraction failed after {elapsed:?}: {e}"
            );
        }
    }

    res
}

/// One engine invocation, with failures already classified.
///
/// An engine that succeeds without producing anything counts as not finding the query.
pub(crate) async fn invoke(
    engine: &dyn Engine,
    query: &str,
    options: &ExtractionOptions,
) -> Result<RawInfo, ExtractionError> {
    let info = engine
        .extract_info(query, options)
        .await
        .map_err(|e| classify(&e))?;

    if info.is_null() {
        return Err(ExtractionError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    }

    Ok(info)
}
