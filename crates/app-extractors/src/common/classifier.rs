use app_backend::EngineFailure;

use super::error::ExtractionError;

pub const NOT_FOUND_MESSAGE: &str = "Failed to find video.";
pub const UNAVAILABLE_MESSAGE: &str = "Video is not available.";
pub const GEO_RESTRICTED_MESSAGE: &str = "Failed to load video due to geo-restriction.";

const NOT_FOUND_MARKERS: &[&str] = &[
    "not found",
    "does not exist",
    "no video",
    "video unavailable",
    "private video",
    "not a valid url",
    "404",
];

/// Maps an engine failure onto the error taxonomy.
///
/// Pure: the same failure always yields the same kind and message.
#[must_use]
pub fn classify(failure: &EngineFailure) -> ExtractionError {
    match failure {
        EngineFailure::Download { message } => {
            let line = message.as_deref().unwrap_or_default();
            let remainder = strip_error_prefix(line);

            if remainder.is_empty() {
                return ExtractionError::NotFound(NOT_FOUND_MESSAGE.to_string());
            }

            let lower = line.to_lowercase();
            if NOT_FOUND_MARKERS.iter().any(|m| lower.contains(m)) {
                ExtractionError::NotFound(remainder)
            } else {
                ExtractionError::Generic(remainder)
            }
        }
        EngineFailure::UnavailableVideo { .. } => {
            ExtractionError::Unavailable(UNAVAILABLE_MESSAGE.to_string())
        }
        EngineFailure::GeoRestricted { .. } => {
            ExtractionError::GeoRestricted(GEO_RESTRICTED_MESSAGE.to_string())
        }
        EngineFailure::Other(cause) => ExtractionError::Generic(cause.clone()),
    }
}

/// `ERROR: [youtube:tab] abc: Video unavailable` -> `Video unavailable`
///
/// Only the structured prefix goes: the `ERROR:` marker, the extractor tag and,
/// when a tag was present, the id in front of the first `:`.
fn strip_error_prefix(message: &str) -> String {
    let message = message.trim();
    let message = message
        .strip_prefix("ERROR:")
        .map_or(message, str::trim_start);

    let Some(tagged) = message.strip_prefix('[') else {
        return message.to_string();
    };
    let Some((_tag, rest)) = tagged.split_once(']') else {
        return message.to_string();
    };
    let rest = rest.trim_start();

    match rest.split_once(':') {
        Some((id, body)) if !id.is_empty() && !id.contains(char::is_whitespace) => {
            body.trim().to_string()
        }
        _ => rest.trim_end().to_string(),
    }
}
