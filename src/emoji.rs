//! Emoji counting backed by the Unicode emoji list shipped in `emojis`.

use once_cell::sync::Lazy;
use std::collections::HashSet;

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Every known emoji sequence, fully qualified and with the presentation
/// selector stripped, so "❤" and "❤️" both match.
static SEQUENCES: Lazy<HashSet<String>> = Lazy::new(|| {
    let mut sequences = HashSet::new();
    for emoji in emojis::iter() {
        let variants = std::iter::once(emoji).chain(emoji.skin_tones().into_iter().flatten());
        for variant in variants {
            sequences.insert(variant.as_str().to_string());
            sequences.insert(variant.as_str().replace(VARIATION_SELECTOR, ""));
        }
    }
    sequences.remove("");
    sequences
});

// Longest sequence in chars; bounds the lookahead of `count_emoji`
static LONGEST: Lazy<usize> =
    Lazy::new(|| SEQUENCES.iter().map(|s| s.chars().count()).max().unwrap_or(1));

fn is_trailing_modifier(c: char) -> bool {
    matches!(c as u32, 0xFE0E | 0xFE0F | 0x1F3FB..=0x1F3FF)
}

/// Returns true when `c` on its own is an emoji.
pub fn is_emoji(c: char) -> bool {
    let mut buf = [0u8; 4];
    SEQUENCES.contains(c.encode_utf8(&mut buf) as &str)
}

/// Counts emoji in `text`, treating each multi-codepoint sequence as one.
///
/// Matching is greedy on the longest known sequence, so ZWJ families,
/// skin-tone variants, keycaps (`1️⃣`) and flag pairs count once. A bare
/// digit, `#` or `*` is not an emoji.
pub fn count_emoji(text: &str) -> usize {
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let chars = bounds.len() - 1;

    let mut count = 0;
    let mut i = 0;
    while i < chars {
        let longest = (*LONGEST).min(chars - i);
        let matched = (1..=longest)
            .rev()
            .find(|&len| SEQUENCES.contains(&text[bounds[i]..bounds[i + len]]));

        match matched {
            Some(len) => {
                count += 1;
                i += len;
                // stray selectors or tones left over after an unlisted combination
                while i < chars && text[bounds[i]..].starts_with(is_trailing_modifier) {
                    i += 1;
                }
            }
            None => i += 1,
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_has_no_emoji() {
        assert_eq!(count_emoji("just some words, 123!"), 0);
        assert_eq!(count_emoji(""), 0);
    }

    #[test]
    fn test_single_emoji() {
        assert_eq!(count_emoji("this is amazing 🔥"), 1);
        assert_eq!(count_emoji("❤️"), 1);
        assert_eq!(count_emoji("👍🏽"), 1);
    }

    #[test]
    fn test_repeated_emoji() {
        assert_eq!(count_emoji("🔥🔥🔥"), 3);
        assert_eq!(count_emoji("lol 😂 😂"), 2);
    }

    #[test]
    fn test_sequences_count_once() {
        // family ZWJ sequence
        assert_eq!(count_emoji("👨‍👩‍👧"), 1);
        // flag pair
        assert_eq!(count_emoji("🇺🇸"), 1);
        assert_eq!(count_emoji("🇺🇸🇬🇧"), 2);
        // keycap
        assert_eq!(count_emoji("1️⃣"), 1);
    }

    #[test]
    fn test_digits_are_not_emoji() {
        assert_eq!(count_emoji("1 2 3 # *"), 0);
        assert!(!is_emoji('7'));
        assert!(!is_emoji('#'));
    }

    #[test]
    fn test_shapes_arrows_and_letters() {
        for text in ["🟢", "🟥", "⬆️", "⬅️", "⬇", "🅰️", "🅱️", "🅾️", "🅿️"] {
            assert_eq!(count_emoji(text), 1, "{text}");
        }
        assert_eq!(count_emoji("🟢 🟥 ⬆️ 🅰️ 🅿️ ⬅️"), 6);
        assert!(is_emoji('🟢'));
    }

    #[test]
    fn test_stray_modifiers_fold_into_previous() {
        assert_eq!(count_emoji("🔥\u{FE0F}\u{FE0F}"), 1);
        assert_eq!(count_emoji("\u{FE0F}"), 0);
    }
}
