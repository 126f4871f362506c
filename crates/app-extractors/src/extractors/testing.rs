use std::{collections::VecDeque, path::PathBuf};

use app_backend::{
    BackendInfo, BackendKind, Engine, EngineFailure, ExtractionOptions, RawInfo,
};
use parking_lot::Mutex;

/// Replays canned engine responses in order and remembers what it was asked
#[derive(Debug)]
pub struct ScriptedEngine {
    info: BackendInfo,
    responses: Mutex<VecDeque<Result<RawInfo, EngineFailure>>>,
    calls: Mutex<Vec<(String, ExtractionOptions)>>,
}

impl ScriptedEngine {
    pub fn new<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Result<RawInfo, EngineFailure>>,
    {
        Self {
            info: BackendInfo {
                kind: BackendKind::System,
                version: "test".to_string(),
                location: PathBuf::from("/nowhere/yt-dlp"),
                installed_at: chrono::Utc::now(),
            },
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(info: RawInfo) -> Self {
        Self::new([Ok(info)])
    }

    pub fn failing(failure: EngineFailure) -> Self {
        Self::new([Err(failure)])
    }

    pub fn calls(&self) -> Vec<(String, ExtractionOptions)> {
        self.calls.lock().clone()
    }
}

#[async_trait::async_trait]
impl Engine for ScriptedEngine {
    fn info(&self) -> &BackendInfo {
        &self.info
    }

    async fn extract_info(
        &self,
        query: &str,
        options: &ExtractionOptions,
    ) -> Result<RawInfo, EngineFailure> {
        self.calls.lock().push((query.to_string(), options.clone()));

        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(EngineFailure::Other("no scripted response left".to_string())))
    }
}
