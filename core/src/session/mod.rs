//! Per-input-context composition state.
//!
//! A `CompositionSession` holds the raw key history, the preedit derived
//! from it, and the engine context that produced it. The two buffers are
//! kept consistent: feeding `raw_keys` to a fresh context with the
//! current script and options always reproduces `preedit`.
//!
//! The engine context is written only by the lifecycle code in
//! [`lifecycle`]; typing and backspace replay live in [`replay`].

pub mod lifecycle;
pub mod replay;

use crate::input_buffer::InputBuffer;
use crate::translit::{EngineContext, EngineOptions, TransliterationEngine};

/// Composition state for one input context.
#[derive(Debug)]
pub struct CompositionSession<E: TransliterationEngine> {
    /// Keys fed to the engine since the last clear
    raw_keys: InputBuffer,

    /// Uncommitted text shown to the user
    preedit: String,

    /// Live engine context, if one exists for `script`
    context: Option<EngineContext<E>>,

    /// Script the context was built for (empty without a context)
    script: String,

    /// Options the context was built with, updated by in-place setters
    applied_options: Option<EngineOptions>,
}

impl<E: TransliterationEngine> CompositionSession<E> {
    /// Create an empty session with no engine context.
    pub fn new() -> Self {
        Self {
            raw_keys: InputBuffer::new(),
            preedit: String::new(),
            context: None,
            script: String::new(),
            applied_options: None,
        }
    }

    /// Key history since the last clear.
    pub fn raw_keys(&self) -> &str {
        self.raw_keys.text()
    }

    pub fn preedit(&self) -> &str {
        &self.preedit
    }

    /// Script of the live context, empty if there is none.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Options snapshot of the live context.
    pub fn applied_options(&self) -> Option<EngineOptions> {
        self.applied_options
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Whether anything is being composed.
    pub fn is_composing(&self) -> bool {
        !self.preedit.is_empty() || !self.raw_keys.is_empty()
    }

    /// Drop the composition, keeping the engine context alive.
    pub fn clear(&mut self) {
        self.raw_keys.clear();
        self.preedit.clear();
        if let Some(context) = self.context.as_mut() {
            context.reset_composition();
        }
    }
}

impl<E: TransliterationEngine> Default for CompositionSession<E> {
    fn default() -> Self {
        Self::new()
    }
}
