//! Sliding-window text chunker.
//!
//! Splits document text into fixed-size character windows with a
//! configurable overlap, so that a fact spanning a window boundary
//! remains retrievable from at least one chunk.
//!
//! # Algorithm
//!
//! 1. If the text fits within `chunk_size` characters, emit it as a
//!    single chunk.
//! 2. Otherwise slide a window of `chunk_size` characters with step
//!    `chunk_size - overlap`: chunk `i` covers the character range
//!    `[i * step, i * step + chunk_size)`, clipped to the text length.
//! 3. Continue until the window start reaches the end of the text.
//!
//! Lengths and offsets are counted in characters, not bytes, so
//! multi-byte UTF-8 text is never split mid-character.
//!
//! # Example
//!
//! ```rust
//! use twinchat::chunk::split_text;
//!
//! let chunks = split_text("Hello world.", 500, 50);
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0], "Hello world.");
//! ```

/// Split text into overlapping character windows.
///
/// `overlap` must be smaller than `chunk_size` (enforced at config
/// validation); equal values would make the window step zero.
///
/// # Guarantees
///
/// - Text of `chunk_size` characters or fewer yields exactly one chunk
///   equal to the input.
/// - Every chunk except possibly the last has exactly `chunk_size`
///   characters.
/// - Adjacent chunks share `overlap` characters, so every character of
///   the input appears in at least one chunk.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let char_count = text.chars().count();
    if char_count <= chunk_size {
        return vec![text.to_string()];
    }

    let step = chunk_size - overlap;
    // Byte offset of every character, so windows can slice without
    // landing inside a multi-byte sequence.
    let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();

    let mut chunks = Vec::new();
    let mut start = 0usize;
    while start < char_count {
        let end = start + chunk_size;
        let byte_start = offsets[start];
        let byte_end = if end < char_count {
            offsets[end]
        } else {
            text.len()
        };
        chunks.push(text[byte_start..byte_end].to_string());
        start += step;
    }

    chunks
}
