// Shared mock engine for the integration tests.
//
// Greedy rule-table transliteration. Diffs are computed against the
// previous output by common codepoint prefix. '.' flushes the
// engine context, '#' is rejected, script "unknown" cannot be created.
// Live handles are tracked so tests can assert exact create/free pairing.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::sync::Arc;

use translit_ime_core::{
    apply_diff, Diff, EngineError, EngineOption, EngineOptions, TransliterationEngine,
};

pub const BAD_SCRIPT: &str = "unknown";
pub const BAD_KEY: char = '#';
pub const FLUSH_KEY: char = '.';

const CONSONANTS: &[(&str, &str)] = &[
    ("kh", "ख"),
    ("k", "क"),
    ("gh", "घ"),
    ("g", "ग"),
    ("m", "म"),
    ("n", "न"),
    ("t", "त"),
    ("r", "र"),
    ("s", "स"),
];
const VOWEL_SIGNS: &[(&str, &str)] = &[
    ("aa", "ा"),
    ("a", ""),
    ("i", "ि"),
    ("u", "ु"),
    ("e", "े"),
];
const VOWELS: &[(&str, &str)] = &[
    ("aa", "आ"),
    ("a", "अ"),
    ("i", "इ"),
    ("u", "उ"),
    ("e", "ए"),
];
const VIRAMA: &str = "्";

fn longest<'a>(rest: &str, table: &'a [(&'a str, &'a str)]) -> Option<(&'a str, &'a str)> {
    table
        .iter()
        .filter(|(roman, _)| rest.starts_with(roman))
        .max_by_key(|(roman, _)| roman.len())
        .copied()
}

/// Transliterate a whole key string. Scripts other than "deva" echo the
/// input upper-cased, which is enough to tell contexts apart.
pub fn transliterate(script: &str, input: &str, options: &EngineOptions) -> String {
    if script != "deva" {
        return input.to_uppercase();
    }

    let mut out = String::new();
    let mut rest = input;
    while let Some(ch) = rest.chars().next() {
        if let Some((roman, letter)) = longest(rest, CONSONANTS) {
            out.push_str(letter);
            rest = &rest[roman.len()..];
            match longest(rest, VOWEL_SIGNS) {
                Some((roman, sign)) => {
                    out.push_str(sign);
                    rest = &rest[roman.len()..];
                }
                None if !options.include_inherent_vowel => out.push_str(VIRAMA),
                None => {}
            }
        } else if let Some((roman, letter)) = longest(rest, VOWELS) {
            out.push_str(letter);
            rest = &rest[roman.len()..];
        } else {
            match ch.to_digit(10) {
                Some(d) if options.use_native_numerals => {
                    out.push(char::from_u32(0x0966 + d).unwrap_or(ch));
                }
                _ => out.push(ch),
            }
            rest = &rest[ch.len_utf8()..];
        }
    }
    out
}

#[derive(Debug)]
pub struct MockHandle {
    id: u64,
    script: String,
    options: EngineOptions,
    input: String,
    output: String,
}

#[derive(Debug, Default)]
pub struct MockEngine {
    next_id: Cell<u64>,
    live: RefCell<HashSet<u64>>,
    created: Cell<usize>,
    freed: Cell<usize>,
    fail_feeds: Cell<bool>,
    script_diffs: RefCell<Vec<Diff>>,
}

impl MockEngine {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn freed(&self) -> usize {
        self.freed.get()
    }

    pub fn live(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn fail_feeds(&self, fail: bool) {
        self.fail_feeds.set(fail);
    }

    /// Queue diffs to return verbatim from the next feeds, ahead of the
    /// rule table.
    pub fn script_diffs(&self, diffs: Vec<Diff>) {
        let mut queue = self.script_diffs.borrow_mut();
        queue.clear();
        queue.extend(diffs.into_iter().rev());
    }
}

impl TransliterationEngine for MockEngine {
    type Handle = MockHandle;

    fn default_options(&self) -> EngineOptions {
        EngineOptions::default()
    }

    fn create_context(
        &self,
        script: &str,
        options: &EngineOptions,
    ) -> Result<MockHandle, EngineError> {
        if script == BAD_SCRIPT || script.is_empty() {
            return Err(EngineError::Create {
                script: script.to_string(),
                reason: "no such script".to_string(),
            });
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.live.borrow_mut().insert(id);
        self.created.set(self.created.get() + 1);
        Ok(MockHandle {
            id,
            script: script.to_string(),
            options: *options,
            input: String::new(),
            output: String::new(),
        })
    }

    fn feed_key(&self, handle: &mut MockHandle, key: &str) -> Result<Diff, EngineError> {
        assert!(self.live.borrow().contains(&handle.id), "feed on a freed handle");
        assert_eq!(key.chars().count(), 1, "keys are fed one character at a time");

        if self.fail_feeds.get() || key.starts_with(BAD_KEY) {
            return Err(EngineError::Feed {
                key: key.to_string(),
                reason: "rejected".to_string(),
            });
        }

        if let Some(diff) = self.script_diffs.borrow_mut().pop() {
            handle.input.push_str(key);
            apply_diff(&mut handle.output, &diff);
            return Ok(diff);
        }

        handle.input.push_str(key);
        let output = transliterate(&handle.script, &handle.input, &handle.options);
        let flush = key.starts_with(FLUSH_KEY);
        let remaining = if flush { 0 } else { handle.input.chars().count() };
        let diff = Diff::between(&handle.output, &output, remaining);

        if flush {
            handle.input.clear();
            handle.output.clear();
        } else {
            handle.output = output;
        }
        Ok(diff)
    }

    fn reset_composition(&self, handle: &mut MockHandle) {
        handle.input.clear();
        handle.output.clear();
    }

    fn set_option(&self, handle: &mut MockHandle, option: EngineOption) -> Result<(), EngineError> {
        option.apply_to(&mut handle.options);
        Ok(())
    }

    fn free_context(&self, handle: MockHandle) {
        let removed = self.live.borrow_mut().remove(&handle.id);
        assert!(removed, "handle {} freed twice", handle.id);
        self.freed.set(self.freed.get() + 1);
    }
}

/// Preedit a fresh context produces for `keys`.
pub fn fresh_output(
    engine: &MockEngine,
    script: &str,
    options: &EngineOptions,
    keys: &str,
) -> String {
    let mut handle = engine
        .create_context(script, options)
        .expect("reference context");
    let mut preedit = String::new();
    for ch in keys.chars() {
        let diff = engine
            .feed_key(&mut handle, &ch.to_string())
            .expect("reference feed");
        apply_diff(&mut preedit, &diff);
    }
    engine.free_context(handle);
    preedit
}
