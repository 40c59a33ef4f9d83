//! Word tokenizer.
//!
//! # Responsibility
//! - Split one message into lowercase word tokens.
//! - Keep emoji as standalone tokens even when glued to words.
//!
//! # Invariants
//! - Pure function; output order follows input order.
//! - Tokens never contain whitespace or any of `. , ! ? ; :`.
//! - ZWJ emoji sequences stay one token; a lone joiner is never a token.
//! - Re-tokenizing the space-joined output yields the same tokens.

use once_cell::sync::Lazy;
use regex::Regex;

/// Emoji grapheme clusters: regional-indicator flag pairs, code points
/// followed by VS16, emoji-presentation code points (with optional
/// skin-tone modifier), each optionally extended by ZWJ-joined emoji.
static EMOJI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?:\p{Regional_Indicator}\p{Regional_Indicator}",
        r"|\p{Emoji}\x{FE0F}",
        r"|\p{Emoji_Presentation}\p{Emoji_Modifier}?)",
        r"(?:\x{200D}\p{Emoji}\x{FE0F}?\p{Emoji_Modifier}?)*",
    ))
    .expect("valid emoji regex")
});
static PUNCTUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,!?;:]").expect("valid punctuation regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Joiner and variation selector carry no glyph of their own.
const INVISIBLE: [char; 2] = ['\u{200d}', '\u{fe0f}'];

/// Normalizes `text` into word tokens.
///
/// Steps: isolate emoji with surrounding spaces, lowercase, strip
/// `. , ! ? ; :`, isolate emoji the stripping brought together, split on
/// whitespace runs, drop empty and glyph-less segments.
pub fn tokenize(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let isolated = EMOJI_RE.replace_all(text, " $0 ");
    let lowered = isolated.to_lowercase();
    let stripped = PUNCTUATION_RE.replace_all(&lowered, "");
    let rejoined = EMOJI_RE.replace_all(&stripped, " $0 ");

    WHITESPACE_RE
        .split(&rejoined)
        .filter(|segment| !segment.chars().all(|ch| INVISIBLE.contains(&ch)))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn strips_punctuation_inside_words_too() {
        assert_eq!(tokenize("e.g. a:b"), vec!["eg", "ab"]);
    }

    #[test]
    fn stripping_punctuation_next_to_vs16_isolates_the_emoji() {
        assert_eq!(tokenize("x\u{2764}.\u{fe0f}"), vec!["x", "\u{2764}\u{fe0f}"]);
    }

    #[test]
    fn blank_and_punctuation_only_text_yield_nothing() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n").is_empty());
        assert!(tokenize("?! ... ;").is_empty());
    }
}
