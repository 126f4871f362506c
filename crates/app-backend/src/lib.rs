pub use engine::{BackendHandle, BackendInfo, BackendKind, Engine, RawInfo};
pub use error::InstallError;
pub use failure::EngineFailure;
pub use handle::BackendSlot;
pub use manager::{BackendManager, BackendSource};
pub use options::{DownloadTarget, ExtractionOptions};

pub mod engine;
pub mod error;
pub mod failure;
pub mod handle;
pub mod install;
pub mod manager;
pub mod options;
pub mod yt_dlp;
