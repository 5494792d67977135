//! Relevance filter applied to raw comments before scoring.
//!
//! A comment survives when it is English, contains at least one alphanumeric
//! character, carries no hyperlink, and is not dominated by emoji.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::emoji::count_emoji;

/// ISO 639-1 code every surviving comment must detect as
pub const ENGLISH: &str = "en";

/// Minimum share of text characters when a comment contains emoji
pub const TEXT_RATIO_THRESHOLD: f64 = 0.65;

static HYPERLINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")
        .unwrap()
});

/// Language identification seam. Returns `None` when the text carries too
/// little signal to make a call.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Option<String>;
}

/// Trigram-based detection backed by `whatlang`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        Some(match info.lang() {
            whatlang::Lang::Eng => ENGLISH.to_string(),
            other => other.code().to_string(),
        })
    }
}

/// Why a comment was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    UndetectedLanguage,
    NotEnglish,
    NoAlphanumeric,
    Hyperlink,
    EmojiHeavy,
}

pub fn contains_hyperlink(text: &str) -> bool {
    HYPERLINK_REGEX.is_match(text)
}

/// Non-whitespace characters over non-whitespace characters plus emoji.
/// Emoji code points are part of the numerator, so a lone emoji scores 0.5.
pub fn text_ratio(text: &str) -> f64 {
    let emojis = count_emoji(text);
    if emojis == 0 {
        return 1.0;
    }
    let text_chars = text.chars().filter(|c| !c.is_whitespace()).count();
    text_chars as f64 / (text_chars + emojis) as f64
}

/// Normalises a comment and checks it against every relevance rule.
/// On success returns the lowercased, trimmed text that goes on to scoring.
pub fn check_comment(
    comment: &str,
    detector: &dyn LanguageDetector,
) -> Result<String, Rejection> {
    let text = comment.trim().to_lowercase();

    match detector.detect(&text) {
        None => return Err(Rejection::UndetectedLanguage),
        Some(lang) if lang != ENGLISH => return Err(Rejection::NotEnglish),
        Some(_) => {}
    }

    if !text.chars().any(char::is_alphanumeric) {
        return Err(Rejection::NoAlphanumeric);
    }
    if contains_hyperlink(&text) {
        return Err(Rejection::Hyperlink);
    }
    if text_ratio(&text) <= TEXT_RATIO_THRESHOLD {
        return Err(Rejection::EmojiHeavy);
    }
    Ok(text)
}

/// Keeps the relevant comments, in their original order.
pub fn filter_comments<S: AsRef<str>>(
    comments: &[S],
    detector: &dyn LanguageDetector,
) -> Vec<String> {
    let mut kept = Vec::with_capacity(comments.len());
    let mut dropped = 0usize;

    for comment in comments {
        match check_comment(comment.as_ref(), detector) {
            Ok(text) => kept.push(text),
            Err(reason) => {
                dropped += 1;
                tracing::trace!(?reason, "Dropped comment");
            }
        }
    }

    tracing::debug!(kept = kept.len(), dropped, "Filtered comments");
    kept
}
