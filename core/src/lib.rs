//! translit-ime-core
//!
//! Per-session composition state machine sitting between a host text-input
//! framework and an external transliteration engine. Each key is fed to the
//! engine, the returned edit is applied to a local preedit buffer, and the
//! host is told what to display or commit.
//!
//! Public API:
//! - `ImeEngine` - Key event router and session registry
//! - `CompositionSession` - Raw key history, preedit and engine context of one input context
//! - `TransliterationEngine` - Contract the external engine implements
//! - `Diff` / `apply_diff` - Codepoint-safe preedit edits
//! - `InputHost` - Commit and preedit callbacks into the host
//! - `Config` - User options and TOML loading

pub mod diff;
pub use diff::{apply_diff, truncate_last_codepoints, Diff};

pub mod translit;
pub use translit::{EngineContext, EngineError, EngineOption, EngineOptions, TransliterationEngine};

pub mod config;
pub use config::{Config, ConfigError};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod session;
pub use session::CompositionSession;

pub mod key;
pub use key::{Key, KeyEvent, Modifiers};

pub mod host;
pub use host::{HostEvent, InputHost, RecordingHost, SessionId};

pub mod entry;
pub use entry::InputMethodEntry;

pub mod ime_engine;
pub use ime_engine::{ImeEngine, KeyResult};

#[cfg(test)]
mod test_engine;
