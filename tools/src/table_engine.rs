//! Rule-table transliteration engine.
//!
//! Tables are JSON objects keyed by script name:
//!
//! ```json
//! { "deva": { "rules": { "k": "क्", "ka": "क" },
//!             "inherent": { "k": "क" },
//!             "digits": "०१२३४५६७८९" } }
//! ```
//!
//! The pending input is re-transliterated by greedy longest match after
//! every key and diffed against the previous output. A key that starts
//! no rule ends the composition: the engine reports `remaining_len == 0`
//! and forgets its pending input.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;
use translit_ime_core::{Diff, EngineError, EngineOption, EngineOptions, TransliterationEngine};

/// Rules for one script.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptTable {
    /// Roman key sequence to output.
    #[serde(default)]
    pub rules: HashMap<String, String>,
    /// Overrides used while the inherent vowel is kept.
    #[serde(default)]
    pub inherent: HashMap<String, String>,
    /// Native digits 0-9, in order.
    #[serde(default)]
    pub digits: Option<String>,
}

impl ScriptTable {
    fn starts_rule(&self, key: &str) -> bool {
        self.rules
            .keys()
            .chain(self.inherent.keys())
            .any(|roman| roman.starts_with(key))
    }

    /// Longest rule matching the start of `rest`. Inherent overrides win
    /// over plain rules of the same length.
    fn longest_match(&self, rest: &str, options: &EngineOptions) -> Option<(usize, &str)> {
        let inherent = options.include_inherent_vowel.then_some(&self.inherent);
        let mut best: Option<(usize, &str)> = None;
        for (roman, text) in self.rules.iter().chain(inherent.into_iter().flatten()) {
            if !rest.starts_with(roman.as_str()) || roman.is_empty() {
                continue;
            }
            match best {
                Some((len, _)) if roman.len() < len => {}
                _ => best = Some((roman.len(), text.as_str())),
            }
        }
        best
    }

    fn digit(&self, ch: char, options: &EngineOptions) -> Option<char> {
        if !options.use_native_numerals {
            return None;
        }
        let d = ch.to_digit(10)?;
        self.digits.as_ref()?.chars().nth(d as usize)
    }

    pub fn transliterate(&self, input: &str, options: &EngineOptions) -> String {
        let mut out = String::new();
        let mut rest = input;
        while let Some(ch) = rest.chars().next() {
            if let Some((len, text)) = self.longest_match(rest, options) {
                out.push_str(text);
                rest = &rest[len..];
            } else {
                out.push(self.digit(ch, options).unwrap_or(ch));
                rest = &rest[ch.len_utf8()..];
            }
        }
        out
    }
}

/// Engine context: the script, its options and the pending composition.
#[derive(Debug)]
pub struct TableContext {
    script: String,
    options: EngineOptions,
    input: String,
    output: String,
}

#[derive(Debug, Default)]
pub struct TableEngine {
    scripts: HashMap<String, ScriptTable>,
}

impl TableEngine {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let scripts: HashMap<String, ScriptTable> =
            serde_json::from_str(json).context("parsing rule table")?;
        Ok(Self { scripts })
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading rule table {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn has_script(&self, script: &str) -> bool {
        self.scripts.contains_key(script)
    }

    /// Script names, sorted.
    pub fn scripts(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scripts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl TransliterationEngine for TableEngine {
    type Handle = TableContext;

    fn default_options(&self) -> EngineOptions {
        EngineOptions::default()
    }

    fn create_context(
        &self,
        script: &str,
        options: &EngineOptions,
    ) -> Result<TableContext, EngineError> {
        if !self.has_script(script) {
            return Err(EngineError::Create {
                script: script.to_string(),
                reason: "no rule table for script".to_string(),
            });
        }
        debug!(script, "table context created");
        Ok(TableContext {
            script: script.to_string(),
            options: *options,
            input: String::new(),
            output: String::new(),
        })
    }

    fn feed_key(&self, handle: &mut TableContext, key: &str) -> Result<Diff, EngineError> {
        let table = self.scripts.get(&handle.script).ok_or_else(|| EngineError::Feed {
            key: key.to_string(),
            reason: format!("rule table for {} is gone", handle.script),
        })?;

        let ends_composition = !table.starts_rule(key);
        handle.input.push_str(key);
        let output = table.transliterate(&handle.input, &handle.options);
        let remaining = if ends_composition {
            0
        } else {
            handle.input.chars().count()
        };
        let diff = Diff::between(&handle.output, &output, remaining);

        if ends_composition {
            handle.input.clear();
            handle.output.clear();
        } else {
            handle.output = output;
        }
        Ok(diff)
    }

    fn reset_composition(&self, handle: &mut TableContext) {
        handle.input.clear();
        handle.output.clear();
    }

    fn set_option(
        &self,
        handle: &mut TableContext,
        option: EngineOption,
    ) -> Result<(), EngineError> {
        option.apply_to(&mut handle.options);
        Ok(())
    }

    fn free_context(&self, handle: TableContext) {
        debug!(script = %handle.script, "table context freed");
    }
}
