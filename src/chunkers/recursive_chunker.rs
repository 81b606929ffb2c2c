//! Recursive text chunker with hierarchical splitting.

use tracing::debug;

use super::base::{char_len, char_windows, tail_chars, Chunker};
use crate::types::{Chunk, ChunkingConfig};

/// Recursive chunker that splits text hierarchically.
///
/// The configured separators are tried in order of preference, e.g.:
/// 1. Double newlines (paragraphs)
/// 2. Single newlines
/// 3. Spaces (words)
/// 4. The empty separator (characters)
///
/// A piece only proceeds to a narrower separator if it is still larger than
/// the chunk size. Once the list is exhausted the piece is hard-split into
/// character windows. The resulting segments are then packed back together
/// up to the chunk size, with the configured overlap carried between chunks.
pub struct RecursiveChunker;

/// A piece of text produced by segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment<'a> {
    text: &'a str,
    /// Hard-split window that already starts with the previous window's overlap
    continues_window: bool,
}

impl<'a> Segment<'a> {
    fn whole(text: &'a str) -> Self {
        Self {
            text,
            continues_window: false,
        }
    }
}

/// Accumulator for packing segments into chunks.
#[derive(Default)]
struct Packing {
    chunks: Vec<String>,
    unit: String,
    unit_len: usize,
}

impl RecursiveChunker {
    /// Create a new recursive chunker.
    pub fn new() -> Self {
        Self
    }

    /// Split text into segments no longer than `size` characters.
    ///
    /// Works through an explicit stack of `(piece, separator index)` pairs so
    /// depth is bounded by the separator count regardless of input size.
    fn segment<'a>(&self, text: &'a str, separators: &[String], size: usize, overlap: usize) -> Vec<Segment<'a>> {
        let mut segments = Vec::new();
        let mut stack: Vec<(&'a str, usize)> = vec![(text, 0)];

        while let Some((piece, depth)) = stack.pop() {
            if piece.is_empty() {
                continue;
            }

            if char_len(piece) <= size {
                segments.push(Segment::whole(piece));
                continue;
            }

            let Some(separator) = separators.get(depth) else {
                let windows = char_windows(piece, size, size - overlap);
                segments.extend(windows.into_iter().enumerate().map(|(i, text)| Segment {
                    text,
                    continues_window: i > 0,
                }));
                continue;
            };

            match split_keeping_separator(piece, separator) {
                // Pushed in reverse so they pop in document order
                Some(pieces) => stack.extend(pieces.into_iter().rev().map(|p| (p, depth + 1))),
                None => stack.push((piece, depth + 1)),
            }
        }

        segments
    }

    /// Pack segments into chunks of at most `size` characters.
    ///
    /// The overlap seed is shortened so that seed plus the next segment never
    /// exceeds `size`. A segment that is itself larger than `size` is kept
    /// whole.
    fn pack(&self, segments: Vec<Segment<'_>>, size: usize, overlap: usize) -> Vec<String> {
        let mut packing = segments.into_iter().fold(Packing::default(), |mut acc, segment| {
            let segment_len = char_len(segment.text);

            if acc.unit_len + segment_len > size && !acc.unit.is_empty() {
                let seed_len = if segment.continues_window {
                    0
                } else {
                    overlap.min(size.saturating_sub(segment_len))
                };
                let seed = tail_chars(&acc.unit, seed_len).to_string();
                acc.chunks.push(std::mem::replace(&mut acc.unit, seed));
                acc.unit_len = char_len(&acc.unit);
            }

            acc.unit.push_str(segment.text);
            acc.unit_len += segment_len;
            acc
        });

        if !packing.unit.is_empty() {
            packing.chunks.push(packing.unit);
        }

        packing.chunks.retain(|c| !c.trim().is_empty());
        packing.chunks
    }

    /// Split and repack `text`, returning raw chunk contents.
    pub(crate) fn split_text(&self, text: &str, config: &ChunkingConfig) -> Vec<String> {
        if text.is_empty() {
            return vec![];
        }

        // A zero size degenerates to character-level splitting
        let size = config.chunk_size.max(1);
        let overlap = config.chunk_overlap.min(size - 1);

        let segments = self.segment(text, &config.separators, size, overlap);
        debug!(size, overlap, segments = segments.len(), "Recursive segmentation");

        self.pack(segments, size, overlap)
    }
}

/// Split on `separator`, reattaching it to the end of every piece but the last.
///
/// Returns `None` when the separator does not occur. The empty separator
/// splits into single characters.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Option<Vec<&'a str>> {
    if separator.is_empty() {
        return Some(
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect(),
        );
    }

    if !text.contains(separator) {
        return None;
    }

    Some(text.split_inclusive(separator).collect())
}

impl Default for RecursiveChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for RecursiveChunker {
    fn name(&self) -> &'static str {
        "recursive"
    }

    fn description(&self) -> &'static str {
        "Hierarchically splits text using multiple separator levels"
    }

    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Vec<Chunk> {
        Chunk::sequence(self.name(), self.split_text(text, config))
    }
}
