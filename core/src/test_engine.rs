//! Tiny engine used by the unit tests. Diffs replace the whole output.

use std::cell::Cell;

use crate::diff::Diff;
use crate::translit::{EngineError, EngineOption, EngineOptions, TransliterationEngine};

const VIRAMA: char = '\u{094d}';

/// `k` is the only consonant and `a` after it the only vowel sign;
/// every other key is echoed.
fn transliterate(input: &str, options: &EngineOptions) -> String {
    let mut out = String::new();
    let mut keys = input.chars().peekable();
    while let Some(ch) = keys.next() {
        if ch != 'k' {
            out.push(ch);
            continue;
        }
        out.push('क');
        if keys.next_if_eq(&'a').is_some() {
            out.push('ा');
        } else if !options.include_inherent_vowel {
            out.push(VIRAMA);
        }
    }
    out
}

#[derive(Debug)]
pub(crate) struct TestHandle {
    options: EngineOptions,
    input: String,
    output: String,
}

#[derive(Debug, Default)]
pub(crate) struct TestEngine {
    created: Cell<usize>,
    freed: Cell<usize>,
    option_calls: Cell<usize>,
    reject_options: Cell<bool>,
    fail_feeds: Cell<bool>,
}

impl TestEngine {
    pub const BAD_SCRIPT: &'static str = "unknown";
    pub const BAD_KEY: char = '#';
    pub const FLUSH_KEY: char = '.';

    pub fn created(&self) -> usize {
        self.created.get()
    }

    pub fn freed(&self) -> usize {
        self.freed.get()
    }

    pub fn option_calls(&self) -> usize {
        self.option_calls.get()
    }

    pub fn reject_options(&self, reject: bool) {
        self.reject_options.set(reject);
    }

    pub fn fail_feeds(&self, fail: bool) {
        self.fail_feeds.set(fail);
    }
}

impl TransliterationEngine for TestEngine {
    type Handle = TestHandle;

    fn default_options(&self) -> EngineOptions {
        EngineOptions::default()
    }

    fn create_context(
        &self,
        script: &str,
        options: &EngineOptions,
    ) -> Result<TestHandle, EngineError> {
        if script == Self::BAD_SCRIPT {
            return Err(EngineError::Create {
                script: script.to_string(),
                reason: "no such script".to_string(),
            });
        }
        self.created.set(self.created.get() + 1);
        Ok(TestHandle {
            options: *options,
            input: String::new(),
            output: String::new(),
        })
    }

    fn feed_key(&self, handle: &mut TestHandle, key: &str) -> Result<Diff, EngineError> {
        if self.fail_feeds.get() || key.starts_with(Self::BAD_KEY) {
            return Err(EngineError::Feed {
                key: key.to_string(),
                reason: "rejected".to_string(),
            });
        }

        handle.input.push_str(key);
        let output = transliterate(&handle.input, &handle.options);
        let diff_delete = handle.output.chars().count();

        let remaining = if key.starts_with(Self::FLUSH_KEY) {
            handle.input.clear();
            handle.output.clear();
            0
        } else {
            handle.output.clone_from(&output);
            handle.input.chars().count()
        };

        Ok(Diff::new(diff_delete, output, remaining))
    }

    fn reset_composition(&self, handle: &mut TestHandle) {
        handle.input.clear();
        handle.output.clear();
    }

    fn set_option(
        &self,
        handle: &mut TestHandle,
        option: EngineOption,
    ) -> Result<(), EngineError> {
        self.option_calls.set(self.option_calls.get() + 1);
        if self.reject_options.get() {
            return Err(EngineError::OptionRejected {
                option,
                reason: "read-only".to_string(),
            });
        }
        option.apply_to(&mut handle.options);
        Ok(())
    }

    fn free_context(&self, _handle: TestHandle) {
        self.freed.set(self.freed.get() + 1);
    }
}
