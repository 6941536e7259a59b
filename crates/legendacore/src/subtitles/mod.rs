//! Caption processing: pick a track, turn its payload into text, strip artifacts.
//!
//! Everything here is pure; network access lives in [`crate::download`].

pub mod clean;
pub mod normalize;
pub mod select;

pub use clean::clean;
pub use normalize::normalize;
pub use select::{pick_format, select_track, SelectionResult, SourceLabel};

use crate::core::error::AppError;

/// Normalizes a payload and cleans the result. Applied to every format.
pub fn to_clean_text(extension: &str, raw: &str) -> Result<String, AppError> {
    normalize(extension, raw).map(|text| clean(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_branches_are_cleaned() {
        let json3 = r#"{"events":[{"segs":[{"utf8":"[Música] olá"}]},{"segs":[{"utf8":">> mundo ♪"}]}]}"#;
        assert_eq!(to_clean_text("json3", json3).unwrap(), "olá mundo");

        let vtt = "WEBVTT\n\n00:00.000 --> 00:01.000\n[Música] olá\n>> mundo ♪\n";
        assert_eq!(to_clean_text("vtt", vtt).unwrap(), "olá mundo");
    }

    #[test]
    fn test_round_trip_clean_is_stable() {
        let payloads = [
            ("json3", r#"{"events":[{"segs":[{"utf8":"a  [x]  b"}]},{"segs":[{"utf8":"♪ c >>"}]}]}"#),
            ("vtt", "WEBVTT\n\n1\n00:00.000 --> 00:01.000\n<c>a</c> [x]\nb  >> c\na [x]\n"),
        ];
        for (ext, raw) in payloads {
            let text = to_clean_text(ext, raw).unwrap();
            assert_eq!(clean(&text), text);
        }
    }
}
