use std::{fmt::Debug, path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineFailure, ExtractionOptions};

/// Whatever the engine printed, untouched.
///
/// The shape changes between platforms and releases,
/// so nothing here is trusted until it has been normalized.
pub type RawInfo = serde_json::Value;

/// The currently active backend.
///
/// Handles are never mutated, a refresh publishes a new one instead.
pub type BackendHandle = Arc<dyn Engine>;

#[async_trait::async_trait]
pub trait Engine: Debug + Send + Sync {
    fn info(&self) -> &BackendInfo;

    async fn extract_info(
        &self,
        query: &str,
        options: &ExtractionOptions,
    ) -> Result<RawInfo, EngineFailure>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackendKind {
    /// Installed into a virtual environment owned by the gateway
    Managed,
    /// An executable provided from the outside
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendInfo {
    pub kind: BackendKind,
    pub version: String,
    pub location: PathBuf,
    pub installed_at: DateTime<Utc>,
}
