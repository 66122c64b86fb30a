//! Callbacks into the host input framework.
//!
//! The host inserts committed text into the focused application and
//! redraws the preedit. Both are fire-and-forget; the router calls them
//! in the order that keeps the screen in step with session state.

use std::fmt;

/// Host-assigned identifier of one input context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the core needs from the host framework.
pub trait InputHost {
    /// Insert finalized text into the target application.
    fn commit_string(&mut self, session: SessionId, text: &str);

    /// Replace the displayed preedit. An empty string clears it.
    fn update_preedit(&mut self, session: SessionId, text: &str);
}

/// A single host callback, as recorded by [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Commit { session: SessionId, text: String },
    Preedit { session: SessionId, text: String },
}

/// Host that records every callback in order.
///
/// Useful for headless hosts, replay tools and tests: the platform reads
/// the log after each key instead of receiving callbacks.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    events: Vec<HostEvent>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// All callbacks so far, oldest first.
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Take the recorded callbacks, leaving the log empty.
    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Everything committed to `session`, concatenated.
    pub fn committed(&self, session: SessionId) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Commit { session: s, text } if *s == session => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Most recent preedit pushed to `session`.
    pub fn preedit(&self, session: SessionId) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            HostEvent::Preedit { session: s, text } if *s == session => Some(text.as_str()),
            _ => None,
        })
    }
}

impl InputHost for RecordingHost {
    fn commit_string(&mut self, session: SessionId, text: &str) {
        self.events.push(HostEvent::Commit {
            session,
            text: text.to_string(),
        });
    }

    fn update_preedit(&mut self, session: SessionId, text: &str) {
        self.events.push(HostEvent::Preedit {
            session,
            text: text.to_string(),
        });
    }
}
