//! Contract with the external transliteration engine.
//!
//! The engine is opaque: the core only creates contexts, feeds single
//! keys, resets composition state and flips the few options that have
//! in-place setters. Handles are wrapped in [`EngineContext`], which is
//! the only place a handle is ever released.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::diff::Diff;

/// Engine default for the inactivity timeout after which the engine
/// drops its own composition context.
pub const DEFAULT_AUTO_CONTEXT_CLEAR_TIME_MS: u64 = 4500;
/// Engine default for native numerals.
pub const DEFAULT_USE_NATIVE_NUMERALS: bool = true;
/// Engine default for inherent vowel inclusion.
pub const DEFAULT_INCLUDE_INHERENT_VOWEL: bool = false;

/// Options a context is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Inactivity timeout handled entirely inside the engine. No setter:
    /// changing it requires a new context.
    pub auto_context_clear_time_ms: u64,
    /// Emit script-native digits instead of ASCII digits.
    pub use_native_numerals: bool,
    /// Keep the inherent vowel on bare consonants.
    pub include_inherent_vowel: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            auto_context_clear_time_ms: DEFAULT_AUTO_CONTEXT_CLEAR_TIME_MS,
            use_native_numerals: DEFAULT_USE_NATIVE_NUMERALS,
            include_inherent_vowel: DEFAULT_INCLUDE_INHERENT_VOWEL,
        }
    }
}

impl EngineOptions {
    /// True when moving from `self` to `target` touches an option that has
    /// no in-place setter.
    pub fn requires_recreation(&self, target: &EngineOptions) -> bool {
        self.auto_context_clear_time_ms != target.auto_context_clear_time_ms
    }

    /// Setter calls needed to move a live context from `self` to `target`.
    pub fn incremental_changes(&self, target: &EngineOptions) -> Vec<EngineOption> {
        let mut changes = Vec::new();
        if self.use_native_numerals != target.use_native_numerals {
            changes.push(EngineOption::UseNativeNumerals(target.use_native_numerals));
        }
        if self.include_inherent_vowel != target.include_inherent_vowel {
            changes.push(EngineOption::IncludeInherentVowel(target.include_inherent_vowel));
        }
        changes
    }
}

/// Options that can be changed on a live context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOption {
    UseNativeNumerals(bool),
    IncludeInherentVowel(bool),
}

impl EngineOption {
    /// Host-facing option name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UseNativeNumerals(_) => "UseNativeNumerals",
            Self::IncludeInherentVowel(_) => "IncludeInherentVowel",
        }
    }

    /// Write this option into an options snapshot.
    pub fn apply_to(&self, options: &mut EngineOptions) {
        match *self {
            Self::UseNativeNumerals(v) => options.use_native_numerals = v,
            Self::IncludeInherentVowel(v) => options.include_inherent_vowel = v,
        }
    }
}

impl fmt::Display for EngineOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UseNativeNumerals(v) | Self::IncludeInherentVowel(v) => {
                write!(f, "{}={}", self.name(), v)
            }
        }
    }
}

/// Failures reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("cannot create context for script '{script}': {reason}")]
    Create { script: String, reason: String },

    #[error("key {key:?} rejected: {reason}")]
    Feed { key: String, reason: String },

    #[error("option {option} rejected: {reason}")]
    OptionRejected { option: EngineOption, reason: String },

    #[error("engine context already released")]
    Released,
}

/// Request/response surface of a transliteration engine.
///
/// All calls are synchronous. Implementations own whatever state sits
/// behind `Handle`; the core never inspects it.
pub trait TransliterationEngine {
    /// Per-context state owned by one session.
    type Handle;

    /// Baseline options the caller's configuration is overlaid on.
    fn default_options(&self) -> EngineOptions;

    /// Build a context for `script`.
    fn create_context(
        &self,
        script: &str,
        options: &EngineOptions,
    ) -> Result<Self::Handle, EngineError>;

    /// Feed one key, given as a single-character string.
    fn feed_key(&self, handle: &mut Self::Handle, key: &str) -> Result<Diff, EngineError>;

    /// Drop in-engine composition state, keeping the context alive.
    fn reset_composition(&self, handle: &mut Self::Handle);

    /// Change an option in place.
    fn set_option(
        &self,
        handle: &mut Self::Handle,
        option: EngineOption,
    ) -> Result<(), EngineError>;

    /// Release a context. Called exactly once per successful `create_context`.
    fn free_context(&self, handle: Self::Handle);
}

/// Exclusively owned engine context.
///
/// Created only by the session lifecycle code and released in `Drop`,
/// so every discard path (recreation, teardown, failure cleanup) frees
/// the handle exactly once.
pub struct EngineContext<E: TransliterationEngine> {
    engine: Arc<E>,
    handle: Option<E::Handle>,
}

impl<E: TransliterationEngine> EngineContext<E> {
    pub(crate) fn create(
        engine: &Arc<E>,
        script: &str,
        options: &EngineOptions,
    ) -> Result<Self, EngineError> {
        let handle = engine.create_context(script, options)?;
        Ok(Self {
            engine: Arc::clone(engine),
            handle: Some(handle),
        })
    }

    /// Feed a single character.
    pub fn feed_char(&mut self, ch: char) -> Result<Diff, EngineError> {
        let handle = self.handle.as_mut().ok_or(EngineError::Released)?;
        let mut buf = [0u8; 4];
        self.engine.feed_key(handle, ch.encode_utf8(&mut buf))
    }

    pub fn reset_composition(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            self.engine.reset_composition(handle);
        }
    }

    pub fn set_option(&mut self, option: EngineOption) -> Result<(), EngineError> {
        let handle = self.handle.as_mut().ok_or(EngineError::Released)?;
        self.engine.set_option(handle, option)
    }
}

impl<E: TransliterationEngine> Drop for EngineContext<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.engine.free_context(handle);
        }
    }
}

impl<E: TransliterationEngine> fmt::Debug for EngineContext<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineContext")
            .field("live", &self.handle.is_some())
            .finish()
    }
}
