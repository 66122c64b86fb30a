//! Input-method entry metadata and script derivation.
//!
//! Each host entry (one per script the user enabled) carries a stable
//! unique name such as `translit:translit-devanagari`. The script the
//! engine is asked for is derived from that name.

/// Prefix every entry name of this addon carries.
pub const ADDON_PREFIX: &str = "translit-";

/// Host metadata for one input-method entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputMethodEntry {
    /// Stable unique name, usually derived from the entry's file name
    pub unique_name: String,
    /// Display name, used when the unique name is empty
    pub name: String,
    /// Short label, the last resort
    pub label: String,
}

impl InputMethodEntry {
    pub fn new(unique_name: impl Into<String>) -> Self {
        Self {
            unique_name: unique_name.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Script identifier for this entry.
    ///
    /// Uses the first non-empty of unique name, name and label; keeps the
    /// part after the last `:`; drops a trailing `(...)` qualifier;
    /// normalizes to lower-case hyphenated tokens and strips
    /// [`ADDON_PREFIX`]. The result is stable for a given entry.
    pub fn script(&self) -> String {
        let raw = [&self.unique_name, &self.name, &self.label]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or_default();

        let raw = match raw.rfind(':') {
            Some(pos) => &raw[pos + 1..],
            None => raw,
        };
        let raw = match raw.find('(') {
            Some(pos) => &raw[..pos],
            None => raw,
        };

        let key = normalize_key(raw);
        match key.strip_prefix(ADDON_PREFIX) {
            Some(script) => script.to_string(),
            None => key,
        }
    }
}

/// Lower-case ASCII alphanumerics, collapse `-`/`_` runs into one `-`,
/// drop everything else, and trim hyphens at both ends.
pub fn normalize_key(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_dash = false;

    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if (ch == '-' || ch == '_') && !out.is_empty() && !last_was_dash {
            out.push('-');
            last_was_dash = true;
        }
    }

    if out.ends_with('-') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Tamil_Extended"), "tamil-extended");
        assert_eq!(normalize_key("--Gujarati--"), "gujarati");
        assert_eq!(normalize_key("Old  Brahmi!"), "oldbrahmi");
        assert_eq!(normalize_key("a__-b"), "a-b");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_script_from_unique_name() {
        let entry = InputMethodEntry::new("translit:translit-devanagari");
        assert_eq!(entry.script(), "devanagari");

        let entry = InputMethodEntry::new("Translit-Tamil_Extended");
        assert_eq!(entry.script(), "tamil-extended");
    }

    #[test]
    fn test_script_drops_trailing_qualifier() {
        let entry = InputMethodEntry::new("translit:Translit-Devanagari (Hindi)");
        assert_eq!(entry.script(), "devanagari");
    }

    #[test]
    fn test_script_falls_back_to_name_and_label() {
        let entry = InputMethodEntry::default().with_name("Bengali");
        assert_eq!(entry.script(), "bengali");

        let entry = InputMethodEntry::default().with_label("TE");
        assert_eq!(entry.script(), "te");

        assert_eq!(InputMethodEntry::default().script(), "");
    }

    #[test]
    fn test_script_is_stable() {
        let entry = InputMethodEntry::new("translit:translit-telugu");
        assert_eq!(entry.script(), entry.script());
    }
}
