//! Typing and backspace replay.
//!
//! The engine has no "undo last key", so backspace pops the last raw key
//! and replays the remaining history into a reset context. This costs
//! O(history) per backspace and is exact by construction.

use tracing::{debug, warn};

use super::CompositionSession;
use crate::diff::{apply_diff, Diff};
use crate::translit::{EngineError, TransliterationEngine};

impl<E: TransliterationEngine> CompositionSession<E> {
    /// Feed one key and apply the resulting diff.
    ///
    /// On failure nothing is recorded; the caller decides how to recover.
    pub fn feed_char(&mut self, ch: char) -> Result<Diff, EngineError> {
        let context = self.context.as_mut().ok_or(EngineError::Released)?;
        let diff = context.feed_char(ch)?;

        self.raw_keys.push(ch);
        apply_diff(&mut self.preedit, &diff);
        Ok(diff)
    }

    /// Remove the most recent key and rebuild the preedit without it.
    ///
    /// Returns `None` when there is no key to remove.
    pub fn backspace(&mut self) -> Option<Result<(), EngineError>> {
        self.raw_keys.pop()?;
        Some(self.rebuild_from_raw())
    }

    /// Recompute `preedit` by replaying `raw_keys` into a reset context.
    ///
    /// Any feed failure clears the whole session rather than leaving a
    /// partial preedit.
    pub fn rebuild_from_raw(&mut self) -> Result<(), EngineError> {
        self.preedit.clear();

        let Some(context) = self.context.as_mut() else {
            if self.raw_keys.is_empty() {
                return Ok(());
            }
            self.raw_keys.clear();
            return Err(EngineError::Released);
        };

        context.reset_composition();

        let mut failure = None;
        for ch in self.raw_keys.chars() {
            match context.feed_char(ch) {
                Ok(diff) => apply_diff(&mut self.preedit, &diff),
                Err(error) => {
                    failure = Some(error);
                    break;
                }
            }
        }

        if let Some(error) = failure {
            warn!(script = %self.script, %error, "replay failed, clearing composition");
            self.clear();
            return Err(error);
        }

        debug!(keys = self.raw_keys.len(), "replayed key history");
        Ok(())
    }
}
