//! Caption track selection.
//!
//! Language resolution: requested → detected → `pt`. Manual tracks win over
//! auto-generated ones; English is the second chance. Within a language the
//! format preference is json3, then vtt, then anything with a URL.

use std::fmt;

use crate::core::config::captions::{DEFAULT_LANGUAGE, FALLBACK_LANGUAGE, FORMAT_PREFERENCE};
use crate::download::metadata::{TrackDescriptor, TrackMap};

/// Where the chosen track came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLabel {
    Manual,
    ManualFallbackEn,
    Auto,
    AutoFallbackEn,
}

impl SourceLabel {
    pub fn is_fallback(self) -> bool {
        matches!(self, SourceLabel::ManualFallbackEn | SourceLabel::AutoFallbackEn)
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceLabel::Manual => "manual",
            SourceLabel::ManualFallbackEn => "manual (en)",
            SourceLabel::Auto => "auto-generated",
            SourceLabel::AutoFallbackEn => "auto-generated (en)",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    pub descriptor: TrackDescriptor,
    pub source: SourceLabel,
    /// Always a key of the mapping `source` refers to
    pub language: String,
}

/// Requested language, else detected, else the default.
pub fn effective_language<'a>(requested: Option<&'a str>, detected: Option<&'a str>) -> &'a str {
    requested
        .filter(|l| !l.trim().is_empty())
        .or_else(|| detected.filter(|l| !l.trim().is_empty()))
        .unwrap_or(DEFAULT_LANGUAGE)
}

/// Chooses one caption format descriptor, or `None` when nothing usable exists.
pub fn select_track(
    manual: &TrackMap,
    auto: &TrackMap,
    requested: Option<&str>,
    detected: Option<&str>,
) -> Option<SelectionResult> {
    let lang = effective_language(requested, detected);

    let candidates = [
        (manual, lang, SourceLabel::Manual),
        (auto, lang, SourceLabel::Auto),
        (manual, FALLBACK_LANGUAGE, SourceLabel::ManualFallbackEn),
        (auto, FALLBACK_LANGUAGE, SourceLabel::AutoFallbackEn),
    ];

    let (tracks, language, source) = candidates.into_iter().find_map(|(map, language, source)| {
        map.get(language)
            .filter(|tracks| !tracks.is_empty())
            .map(|tracks| (tracks, language, source))
    })?;

    // A language key without any downloadable format is still "no captions";
    // we do not fall through to the next mapping.
    let descriptor = pick_format(tracks)?;

    Some(SelectionResult {
        descriptor: descriptor.clone(),
        source,
        language: language.to_string(),
    })
}

/// Preferred format first, then any descriptor with a URL.
pub fn pick_format(tracks: &[TrackDescriptor]) -> Option<&TrackDescriptor> {
    FORMAT_PREFERENCE
        .iter()
        .find_map(|preferred| tracks.iter().find(|t| t.extension == *preferred && t.has_url()))
        .or_else(|| tracks.iter().find(|t| t.has_url()))
}
