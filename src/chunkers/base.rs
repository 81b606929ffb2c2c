//! Base trait for all chunkers and the shared token heuristic.

use crate::types::{Chunk, ChunkingConfig};

/// The core trait that all synchronous chunkers implement.
///
/// A chunker takes the whole document and splits it into an ordered
/// sequence of bounded-size chunks. Implementations are pure: the same
/// text and config always yield the same chunk boundaries.
pub trait Chunker: Send + Sync {
    /// Get the name of this chunker.
    fn name(&self) -> &'static str;

    /// Chunk the given text with the provided configuration.
    ///
    /// # Arguments
    /// * `text` - The full document
    /// * `config` - Configuration for chunking
    ///
    /// # Returns
    /// Chunks with contiguous indices starting at 0.
    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Vec<Chunk>;

    /// Get the description of this chunker.
    fn description(&self) -> &'static str {
        "A text chunker"
    }
}

/// Estimate the token count of a text span.
///
/// CJK ideographs and kana count as one token each; every other character
/// counts as a quarter token, with the non-CJK total rounded up.
pub fn estimate_token_count(text: &str) -> usize {
    let (cjk, other) = text.chars().fold((0usize, 0usize), |(cjk, other), c| {
        if is_cjk(c) {
            (cjk + 1, other)
        } else {
            (cjk, other + 1)
        }
    });
    cjk + other.div_ceil(4)
}

/// Whether a character belongs to the CJK ranges counted as whole tokens.
fn is_cjk(c: char) -> bool {
    matches!(
        c as u32,
        0x3040..=0x309F         // Hiragana
            | 0x30A0..=0x30FF   // Katakana
            | 0x3400..=0x4DBF   // CJK Extension A
            | 0x4E00..=0x9FFF   // CJK Unified Ideographs
            | 0xFF66..=0xFF9F   // Half-width Katakana
            | 0x20000..=0x2A6DF // CJK Extension B
            | 0x2A700..=0x2EBEF // CJK Extensions C-F
            | 0x30000..=0x3134F // CJK Extension G
    )
}

/// Length of `text` in characters.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offsets of every character boundary, including the end of the text.
pub(crate) fn char_boundaries(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

/// Slice `text` into windows of `size` characters advancing by `step`.
///
/// Stops once a window reaches the end of the text, so no trailing window
/// made only of overlap is produced and every window is at most `size`
/// characters. `size` and `step` must both be at least 1.
pub(crate) fn char_windows(text: &str, size: usize, step: usize) -> Vec<&str> {
    let bounds = char_boundaries(text);
    let len = bounds.len() - 1;
    let mut windows = Vec::new();
    let mut start = 0;

    while start < len {
        let end = (start + size).min(len);
        windows.push(&text[bounds[start]..bounds[end]]);
        if end == len {
            break;
        }
        start += step;
    }

    windows
}

/// The trailing `count` characters of `text`.
pub(crate) fn tail_chars(text: &str, count: usize) -> &str {
    if count == 0 {
        return "";
    }
    match text.char_indices().rev().nth(count - 1) {
        Some((i, _)) => &text[i..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_heuristic() {
        assert_eq!(estimate_token_count(""), 0);
        assert_eq!(estimate_token_count("测试"), 2);
        assert_eq!(estimate_token_count("abcd"), 1);
        assert_eq!(estimate_token_count("abc"), 1);
        assert_eq!(estimate_token_count("abcde"), 2);
    }

    #[test]
    fn test_token_heuristic_mixed_scripts() {
        // 3 kana + 2 half-width katakana + 5 latin (ceil(5/4) = 2)
        assert_eq!(estimate_token_count("ひらカｱｲhello"), 7);
        // Hangul is outside the counted ranges
        assert_eq!(estimate_token_count("한국어다"), 1);
    }

    #[test]
    fn test_char_windows() {
        assert_eq!(char_windows("abcdefghij", 5, 3), vec!["abcde", "defgh", "ghij"]);
        assert_eq!(char_windows("abc", 5, 5), vec!["abc"]);
        assert_eq!(char_windows("测试测试测", 2, 2), vec!["测试", "测试", "测"]);
        assert!(char_windows("", 3, 1).is_empty());
    }

    #[test]
    fn test_tail_chars() {
        assert_eq!(tail_chars("hello", 2), "lo");
        assert_eq!(tail_chars("hello", 0), "");
        assert_eq!(tail_chars("hi", 5), "hi");
        assert_eq!(tail_chars("测试中", 2), "试中");
    }
}
