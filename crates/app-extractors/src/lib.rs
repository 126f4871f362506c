pub use common::{
    classifier::classify,
    error::{ErrorKind, ExtractionError},
    records,
};
pub use extractors::{
    extract_timed,
    playlist::{PlaylistRequest, SearchRequest},
    Extractor, Extractors,
};

pub mod common;
pub mod extractors;
