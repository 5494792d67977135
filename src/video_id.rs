use once_cell::sync::Lazy;
use regex::Regex;

/// Matches an 11-character video identifier following `v=` or a path separator.
static VIDEO_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").unwrap());

static BARE_ID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z_-]{11}$").unwrap());

/// Pulls the video identifier out of a free-form URL.
///
/// Handles `watch?v=`, `youtu.be/`, `/embed/` and `/shorts/` links, and also
/// accepts a bare identifier pasted on its own.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    if BARE_ID_REGEX.is_match(url) {
        return Some(url.to_string());
    }
    VIDEO_ID_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
