//! Engine context lifecycle for a session.
//!
//! This is the only code that creates, replaces or discards a session's
//! [`EngineContext`]. Discarding drops the context, and dropping is what
//! releases the engine handle.

use std::sync::Arc;

use tracing::{debug, warn};

use super::CompositionSession;
use crate::config::Config;
use crate::translit::{EngineContext, EngineOptions, TransliterationEngine};

impl<E: TransliterationEngine> CompositionSession<E> {
    /// Make sure a context for `script` built from `config` exists.
    ///
    /// A live context for the same script is kept and brought up to date
    /// with the option setters. A changed auto-clear timeout, a rejected
    /// setter or a different script rebuilds the context from scratch,
    /// which drops any composition in progress.
    ///
    /// Returns `false` when the engine refuses to build a context; the
    /// session is then left empty and without a context.
    pub fn ensure_context(&mut self, engine: &Arc<E>, script: &str, config: &Config) -> bool {
        let requested = config.engine_options(engine.default_options());

        if self.context.is_some() && self.script == script {
            if let Some(applied) = self.applied_options {
                if applied == requested {
                    return true;
                }
                if !applied.requires_recreation(&requested)
                    && self.update_options(applied, requested)
                {
                    return true;
                }
            }
            debug!(script, "options changed without a setter, recreating context");
        }

        self.create_context(engine, script, requested)
    }

    /// Drop the engine context along with any composition.
    pub fn discard_context(&mut self) {
        self.raw_keys.clear();
        self.preedit.clear();
        self.script.clear();
        self.applied_options = None;
        self.context = None;
    }

    fn create_context(&mut self, engine: &Arc<E>, script: &str, options: EngineOptions) -> bool {
        self.discard_context();

        match EngineContext::create(engine, script, &options) {
            Ok(context) => {
                debug!(script, ?options, "created engine context");
                self.context = Some(context);
                self.script = script.to_string();
                self.applied_options = Some(options);
                true
            }
            Err(error) => {
                warn!(script, %error, "engine refused to create context");
                false
            }
        }
    }

    /// Apply in-place option changes. Returns `false` if a setter failed,
    /// in which case the caller rebuilds the context.
    fn update_options(&mut self, applied: EngineOptions, requested: EngineOptions) -> bool {
        let Some(context) = self.context.as_mut() else {
            return false;
        };

        let mut options = applied;
        for change in applied.incremental_changes(&requested) {
            if let Err(error) = context.set_option(change) {
                warn!(script = %self.script, %error, "option setter failed");
                return false;
            }
            change.apply_to(&mut options);
        }
        self.applied_options = Some(options);

        // Keep preedit equal to what the new options would produce.
        if self.is_composing() {
            // A failed replay already left the session empty.
            let _ = self.rebuild_from_raw();
        }
        true
    }
}
