use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What went wrong with a single extraction, in words the caller can show to a person.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    GeoRestricted(String),
    #[error("{0}")]
    MissingSource(String),
    #[error("{0}")]
    Generic(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    NotFound,
    Unavailable,
    GeoRestricted,
    MissingSource,
    Generic,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::Unavailable => "unavailable",
            Self::GeoRestricted => "geo-restricted",
            Self::MissingSource => "missing-source",
            Self::Generic => "generic",
        }
    }
}

impl ExtractionError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::GeoRestricted(_) => ErrorKind::GeoRestricted,
            Self::MissingSource(_) => ErrorKind::MissingSource,
            Self::Generic(_) => ErrorKind::Generic,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(x)
            | Self::Unavailable(x)
            | Self::GeoRestricted(x)
            | Self::MissingSource(x)
            | Self::Generic(x) => x,
        }
    }
}
