//! Error taxonomy for the scripting core.
//!
//! Three severities, matched to how much of the running script survives:
//! a [`Severity::Warning`] is logged and execution continues; a
//! [`ScriptError`] unwinds the callback that raised it, leaving sibling
//! callbacks alive; a [`HostError`] is a non-scriptable engine-side failure
//! (pool exhaustion outside of a script call) that is only ever logged.

use std::error::Error;
use std::fmt;

/// How badly a failure inside a built-in function should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Logged, script continues. Used for e.g. an out-of-range argument
    /// that was clamped, or a note id of 0 passed where a live note was
    /// expected.
    Warning,
    /// Terminates the current callback's execution context.
    ScriptError,
}

/// Raised by a built-in to abort the current callback. Other concurrently
/// running callbacks on the same engine channel are unaffected.
#[derive(Debug, Clone)]
pub struct ScriptError {
    pub message: String,
}

impl ScriptError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl Error for ScriptError {}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "script error: {}", self.message)
    }
}

/// A failure in a non-scriptable engine path, e.g. note-pool exhaustion
/// reached from outside the VM. Never propagated to script code; only
/// logged via [`log::error!`].
#[derive(Debug, Clone)]
pub enum HostError {
    NotePoolExhausted,
    VoicePoolExhausted { note: crate::note::NoteId },
    CallbackPoolExhausted,
}

impl Error for HostError {}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::NotePoolExhausted => write!(f, "note pool exhausted"),
            HostError::VoicePoolExhausted { note } => {
                write!(f, "voice pool exhausted for note {note:?}")
            }
            HostError::CallbackPoolExhausted => write!(f, "script callback pool exhausted"),
        }
    }
}
