use thiserror::Error;

const GEO_RESTRICTION_MARKERS: &[&str] = &[
    "geo restriction",
    "geo-restrict",
    "not available from your location",
    "not available in your country",
];

const UNAVAILABLE_VIDEO_MARKERS: &[&str] = &["unable to download video"];

/// A failure as reported by the engine itself.
///
/// This still carries engine wording, it has to go through
/// classification before it is shown to anyone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineFailure {
    /// The engine gave up on the query, `message` is its raw `ERROR:` line
    #[error("{}", message.as_deref().unwrap_or("Download failed"))]
    Download { message: Option<String> },
    #[error("{message}")]
    UnavailableVideo { message: String },
    #[error("{message}")]
    GeoRestricted { message: String },
    #[error("{0}")]
    Other(String),
}

impl EngineFailure {
    /// Turns the engine's stderr into a failure signal.
    ///
    /// The last `ERROR:` line wins since earlier ones are usually retried fragments.
    #[must_use]
    pub fn from_stderr(stderr: &str) -> Self {
        let error_line = stderr
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("ERROR:"))
            .last();

        let Some(line) = error_line else {
            let last_line = stderr
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .last();

            return Self::Other(
                last_line
                    .unwrap_or("yt-dlp exited without any output")
                    .to_string(),
            );
        };

        let lower = line.to_lowercase();

        if GEO_RESTRICTION_MARKERS.iter().any(|m| lower.contains(m)) {
            return Self::GeoRestricted {
                message: line.to_string(),
            };
        }

        if UNAVAILABLE_VIDEO_MARKERS.iter().any(|m| lower.contains(m)) {
            return Self::UnavailableVideo {
                message: line.to_string(),
            };
        }

        let message = if line.trim_start_matches("ERROR:").trim().is_empty() {
            None
        } else {
            Some(line.to_string())
        };

        Self::Download { message }
    }
}
