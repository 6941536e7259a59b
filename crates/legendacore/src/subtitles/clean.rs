use lazy_regex::{lazy_regex, Lazy};
use regex::Regex;

/// `[Music]`, `[Aplausos]`, `[ __ ]` and similar annotations. Not nesting-aware.
static BRACKETED: Lazy<Regex> = lazy_regex!(r"\[[^\]]*\]");

static MULTI_SPACE: Lazy<Regex> = lazy_regex!(r" {2,}");

const SPEAKER_CHANGE: &str = ">>";
const MUSIC_NOTE: &str = "♪";

/// Removes common YouTube caption artifacts.
///
/// Steps run in a fixed order: bracketed spans, speaker-change markers,
/// music notes, runs of spaces, outer whitespace. An empty result means the
/// track had no usable text.
///
/// # Example
///
/// ```
/// use legendacore::subtitles::clean;
///
/// assert_eq!(
///     clean("Hello [Music] world >> next ♪ song  here"),
///     "Hello world next song here"
/// );
/// ```
pub fn clean(text: &str) -> String {
    let text = BRACKETED.replace_all(text, "");
    let text = text.replace(SPEAKER_CHANGE, "").replace(MUSIC_NOTE, "");
    let text = MULTI_SPACE.replace_all(&text, " ");
    text.trim().to_string()
}
