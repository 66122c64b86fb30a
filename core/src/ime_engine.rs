//! Key event routing and session registry.
//!
//! `ImeEngine` owns one [`CompositionSession`] per host input context and
//! turns each key event into a complete transaction against that
//! session: feed, commit, cancel, backspace replay or pass-through. After
//! every transaction the host has been told exactly what it needs to show.
//!
//! # Example
//!
//! ```rust,ignore
//! use translit_ime_core::{ImeEngine, InputMethodEntry, KeyEvent, RecordingHost, SessionId};
//!
//! let mut ime = ImeEngine::new(engine);
//! let mut host = RecordingHost::new();
//! let entry = InputMethodEntry::new("translit:translit-devanagari");
//! let id = SessionId(1);
//!
//! ime.process_key(&mut host, id, &entry, KeyEvent::press('k'));
//! ime.process_key(&mut host, id, &entry, KeyEvent::press('a'));
//! ime.process_key(&mut host, id, &entry, KeyEvent::press(' '));
//! assert_eq!(host.committed(id), "का ");
//! ```

use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::config::{Config, ConfigError};
use crate::entry::InputMethodEntry;
use crate::host::{InputHost, SessionId};
use crate::key::{Key, KeyEvent};
use crate::session::CompositionSession;
use crate::translit::TransliterationEngine;

/// Result of processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Key was consumed by the IME
    Handled,
    /// Key was not consumed (pass through to application)
    NotHandled,
}

/// Router plus registry of live sessions.
pub struct ImeEngine<E: TransliterationEngine> {
    engine: Arc<E>,
    config: Config,
    sessions: AHashMap<SessionId, CompositionSession<E>>,
}

impl<E: TransliterationEngine> ImeEngine<E> {
    /// Create a router around `engine` with default configuration.
    pub fn new(engine: E) -> Self {
        Self::from_arc(Arc::new(engine))
    }

    /// Create a router from an already shared engine.
    pub fn from_arc(engine: Arc<E>) -> Self {
        Self {
            engine,
            config: Config::default(),
            sessions: AHashMap::new(),
        }
    }

    /// Start with `config` instead of the defaults.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a session for a newly created input context.
    ///
    /// Optional: `process_key` creates sessions on first use.
    pub fn create_session(&mut self, id: SessionId) {
        self.sessions.entry(id).or_default();
    }

    /// Drop the session of a destroyed input context, releasing its
    /// engine context. Returns whether a session existed.
    pub fn destroy_session(&mut self, id: SessionId) -> bool {
        self.sessions.remove(&id).is_some()
    }

    pub fn session(&self, id: SessionId) -> Option<&CompositionSession<E>> {
        self.sessions.get(&id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Process one key event for session `id`.
    ///
    /// Returns `KeyResult::Handled` if the IME consumed the key,
    /// or `KeyResult::NotHandled` if it should pass through to the application.
    pub fn process_key<H>(
        &mut self,
        host: &mut H,
        id: SessionId,
        entry: &InputMethodEntry,
        event: KeyEvent,
    ) -> KeyResult
    where
        H: InputHost + ?Sized,
    {
        if event.is_release || event.modifiers.has_command_modifier() {
            return KeyResult::NotHandled;
        }

        let script = entry.script();
        let Self {
            engine,
            config,
            sessions,
        } = self;
        let session = sessions.entry(id).or_default();

        let was_composing = session.is_composing();
        let ready = session.ensure_context(engine, &script, config);
        if was_composing && !session.is_composing() {
            // Recreation dropped the composition the host is still showing.
            host.update_preedit(id, "");
        }
        if !ready {
            return KeyResult::NotHandled;
        }

        match event.key {
            Key::Escape => {
                if !session.is_composing() {
                    return KeyResult::NotHandled;
                }
                session.clear();
                host.update_preedit(id, "");
                KeyResult::Handled
            }
            Key::Return | Key::KeypadEnter | Key::ShiftLeft | Key::ShiftRight => {
                commit_preedit(host, id, session, None)
            }
            Key::BackSpace => match session.backspace() {
                None => KeyResult::NotHandled,
                Some(result) => {
                    if let Err(error) = result {
                        debug!(session = %id, %error, "backspace replay dropped the composition");
                    }
                    host.update_preedit(id, session.preedit());
                    KeyResult::Handled
                }
            },
            Key::Space | Key::Char(' ') => commit_preedit(host, id, session, Some(" ")),
            key => match key.text_char() {
                Some(ch) => type_char(host, id, session, ch),
                None => {
                    // Not text: drop the composition so it cannot desync
                    // from whatever the application does with this key.
                    if session.is_composing() {
                        session.clear();
                        host.update_preedit(id, "");
                    }
                    KeyResult::NotHandled
                }
            },
        }
    }

    // ========== Configuration Management API ==========

    /// Replace the configuration and rebuild every session's context.
    pub fn reload_config<H>(&mut self, config: Config, host: &mut H)
    where
        H: InputHost + ?Sized,
    {
        self.config = config;
        self.refresh_all_contexts(host);
    }

    /// Load configuration from a TOML file, then rebuild every context.
    ///
    /// On error the current configuration and sessions are left untouched.
    pub fn load_config_file<P, H>(&mut self, path: P, host: &mut H) -> Result<(), ConfigError>
    where
        P: AsRef<Path>,
        H: InputHost + ?Sized,
    {
        let config = Config::load_toml(path)?;
        self.reload_config(config, host);
        Ok(())
    }

    /// Discard every session's engine context and push the now empty
    /// preedit. In-progress compositions are lost; each session rebuilds
    /// its context under the current configuration on its next key.
    pub fn refresh_all_contexts<H>(&mut self, host: &mut H)
    where
        H: InputHost + ?Sized,
    {
        debug!(sessions = self.sessions.len(), "refreshing all engine contexts");
        for (id, session) in self.sessions.iter_mut() {
            session.discard_context();
            host.update_preedit(*id, session.preedit());
        }
    }
}

/// Commit a non-empty preedit (plus `suffix`), then clear.
fn commit_preedit<E, H>(
    host: &mut H,
    id: SessionId,
    session: &mut CompositionSession<E>,
    suffix: Option<&str>,
) -> KeyResult
where
    E: TransliterationEngine,
    H: InputHost + ?Sized,
{
    if session.preedit().is_empty() {
        return KeyResult::NotHandled;
    }

    host.commit_string(id, session.preedit());
    if let Some(suffix) = suffix {
        host.commit_string(id, suffix);
    }
    session.clear();
    host.update_preedit(id, "");
    KeyResult::Handled
}

fn type_char<E, H>(
    host: &mut H,
    id: SessionId,
    session: &mut CompositionSession<E>,
    ch: char,
) -> KeyResult
where
    E: TransliterationEngine,
    H: InputHost + ?Sized,
{
    match session.feed_char(ch) {
        Err(error) => {
            warn!(session = %id, key = %ch, %error, "engine rejected key, dropping composition");
            session.clear();
            host.update_preedit(id, "");
        }
        Ok(diff) if diff.is_flush() => {
            debug!(session = %id, "engine flushed its context, committing");
            if !session.preedit().is_empty() {
                host.commit_string(id, session.preedit());
            }
            session.clear();
            host.update_preedit(id, "");
        }
        Ok(_) => host.update_preedit(id, session.preedit()),
    }
    KeyResult::Handled
}

impl<E: TransliterationEngine> std::fmt::Debug for ImeEngine<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImeEngine")
            .field("config", &self.config)
            .field("sessions", &self.sessions.len())
            .finish()
    }
}
