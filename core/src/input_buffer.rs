//! Raw key history for one composition.
//!
//! The history holds exactly the ASCII keys fed to the engine since the
//! last clear. It only grows at the end and only shrinks by popping the
//! last key, which is what backspace replay needs.

/// Append-only key history with a poppable tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The keys as a string, oldest first.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Iterate the keys in the order they were fed.
    pub fn chars(&self) -> std::str::Chars<'_> {
        self.text.chars()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Append a key.
    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Remove and return the most recent key.
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }
}
