//! Callback control flow: `fork`/`abort`/`callback_status`, layered on top
//! of [`crate::scheduler::Scheduler`]'s callback id table, plus
//! `event_status`, a note-presence query against the scheduler's separate
//! note id table. The two status types are unrelated: `CallbackStatus`
//! describes a script callback's own lifecycle, `EventStatus` describes
//! whether a particular note is still alive on the engine. Simplified to
//! what a single cooperative VM instance needs to drive from its execution
//! loop.

use crate::error::HostError;
use crate::note::NoteId;
use crate::scheduler::{CallbackId, Scheduler};

/// Lifecycle state a running or finished callback may report through
/// `callback_status()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStatus {
    /// Executing or waiting to be scheduled a time slice; not suspended.
    Running,
    /// Parked on a `wait()` or pending-event resume.
    Suspended,
    /// Ran to completion without being aborted.
    TerminatedNormally,
    /// Removed via `abort()`, directly or via an auto-abort cascade.
    TerminatedByAbort,
}

/// Forks a child callback from `parent`, honoring both the global
/// callback-pool limit and `parent`'s per-handler fork limit. Mirrors
/// `fork()`'s `-1` return on exhaustion, surfaced here as a typed error so
/// callers can log with `HostError`'s `Display` impl.
pub fn fork(scheduler: &mut Scheduler, parent: CallbackId, auto_abort: bool) -> Result<CallbackId, HostError> {
    scheduler.fork_callback(parent, auto_abort).ok_or(HostError::CallbackPoolExhausted)
}

/// Aborts `id` and every `auto_abort`-flagged descendant, returning every
/// id actually removed (for status bookkeeping by the caller).
pub fn abort(scheduler: &mut Scheduler, id: CallbackId) -> Vec<CallbackId> {
    scheduler.abort_callback(id)
}

/// Reports a callback's lifecycle state. A callback the scheduler has no
/// record of is reported `TerminatedByAbort` — once removed, a callback
/// entry carries no distinction between "ran to completion" and "was
/// aborted", so the VM's execution loop is responsible for recording
/// normal completion before the entry is dropped.
pub fn callback_status(scheduler: &Scheduler, id: CallbackId) -> CallbackStatus {
    match scheduler.callback_by_id(id) {
        Some(entry) if entry.waiting_on.is_some() => CallbackStatus::Suspended,
        Some(_) => CallbackStatus::Running,
        None => CallbackStatus::TerminatedByAbort,
    }
}

/// Whether a note is still tracked by the engine, as reported by
/// `event_status()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventStatus {
    /// The note is still alive on the engine.
    Active,
    /// The note has already been released or was never found.
    Inactive,
}

/// Reports whether `note` still exists on the engine.
pub fn event_status(scheduler: &Scheduler, note: NoteId) -> EventStatus {
    if scheduler.note_by_id(note).is_some() {
        EventStatus::Active
    } else {
        EventStatus::Inactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn cfg() -> EngineConfig {
        EngineConfig { max_script_callbacks: 2, max_forks_per_handler: 1, ..EngineConfig::default() }
    }

    #[test]
    fn fork_reports_exhaustion_as_host_error() {
        let mut sched = Scheduler::new(cfg());
        let root = sched.register_root_callback().unwrap();
        assert!(fork(&mut sched, root, false).is_ok());
        assert!(matches!(fork(&mut sched, root, false), Err(HostError::CallbackPoolExhausted)));
    }

    #[test]
    fn callback_status_reflects_presence() {
        let mut sched = Scheduler::new(cfg());
        let root = sched.register_root_callback().unwrap();
        assert_eq!(callback_status(&sched, root), CallbackStatus::Running);
        abort(&mut sched, root);
        assert_eq!(callback_status(&sched, root), CallbackStatus::TerminatedByAbort);
    }

    #[test]
    fn event_status_reflects_note_presence() {
        use crate::note::Note;

        let mut sched = Scheduler::new(cfg());
        let id = sched.schedule_note(Note::new(NoteId(0), 60, 0, 0), 0).unwrap();
        assert_eq!(event_status(&sched, id), EventStatus::Active);
        sched.remove_note(id);
        assert_eq!(event_status(&sched, id), EventStatus::Inactive);
        assert_eq!(event_status(&sched, NoteId(9999)), EventStatus::Inactive);
    }
}
