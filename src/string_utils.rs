//! UTF-8 safe index helpers
//!
//! egui reports cursor positions as character indices while the formatting
//! code slices strings by byte offsets. These helpers convert between the two
//! and snap arbitrary byte offsets onto character boundaries so slicing never
//! panics on text like `"Blåbær"` or `"你好"`.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundaries
// ─────────────────────────────────────────────────────────────────────────────

/// Largest character boundary `<= index`, clamped to the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest character boundary `>= index`, clamped to the string length.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a character index to a byte offset (string length when past the end).
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte offset to the number of characters before it.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

/// Convert an unordered pair of character indices into a sorted byte range.
pub fn char_range_to_byte_range(s: &str, a: usize, b: usize) -> (usize, usize) {
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    (
        char_index_to_byte_index(s, start),
        char_index_to_byte_index(s, end),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
