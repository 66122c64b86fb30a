//! Preedit edits produced by the transliteration engine.
//!
//! Every key fed to the engine yields a small edit against the text the
//! user currently sees: drop some trailing characters, then append new
//! text. `apply_diff` performs that edit on a UTF-8 buffer without ever
//! splitting a codepoint.

/// Edit returned by the engine for a single key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Codepoints to remove from the tail of the preedit.
    pub delete_count: usize,
    /// UTF-8 text appended after the deletion.
    pub add_text: String,
    /// Engine's current composition length. Zero means the engine
    /// flushed its context and the composition is over.
    pub remaining_len: usize,
}

impl Diff {
    /// Create a diff.
    pub fn new(delete_count: usize, add_text: impl Into<String>, remaining_len: usize) -> Self {
        Self {
            delete_count,
            add_text: add_text.into(),
            remaining_len,
        }
    }

    /// Shortest edit turning `prev` into `next`: keep the common codepoint
    /// prefix, delete the rest of `prev`, append the rest of `next`.
    pub fn between(prev: &str, next: &str, remaining_len: usize) -> Self {
        let common = prev
            .chars()
            .zip(next.chars())
            .take_while(|(a, b)| a == b)
            .count();
        Self {
            delete_count: prev.chars().count() - common,
            add_text: next.chars().skip(common).collect(),
            remaining_len,
        }
    }

    /// Whether the engine signalled the end of the composition.
    pub fn is_flush(&self) -> bool {
        self.remaining_len == 0
    }
}

/// Remove `n` codepoints from the end of `s`.
///
/// Walks backward byte by byte over continuation bytes (`10xxxxxx`) so the
/// buffer always ends on a codepoint boundary. Stops early once empty.
pub fn truncate_last_codepoints(s: &mut String, n: usize) {
    let bytes = s.as_bytes();
    let mut end = bytes.len();
    let mut remaining = n;

    while remaining > 0 && end > 0 {
        end -= 1;
        while end > 0 && (bytes[end] & 0xC0) == 0x80 {
            end -= 1;
        }
        remaining -= 1;
    }

    s.truncate(end);
}

/// Apply `diff` to `preedit`: delete, then append.
pub fn apply_diff(preedit: &mut String, diff: &Diff) {
    if diff.delete_count > 0 {
        truncate_last_codepoints(preedit, diff.delete_count);
    }
    preedit.push_str(&diff.add_text);
}
