//! Response records. Field names are part of the wire contract.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub original_url: String,
    /// Always present and non-empty
    pub manifest_url: String,
    pub available_at: i64,
    pub duration: i64,
    pub upload_date: String,
    pub uploader: String,
    pub artist: String,
    pub album: String,
    pub release_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub entries: Vec<PlaylistEntry>,
}

impl PlaylistRecord {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub url: String,
    pub title: String,
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub height: u64,
    pub width: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub original_url: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortFormRecord {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub original_url: String,
    pub url: String,
    /// Where the downloaded file ended up
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMediaRecord {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub original_url: String,
    pub formats: Vec<PostMediaFormat>,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMediaFormat {
    pub manifest_url: String,
}
