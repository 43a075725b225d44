//! Real-time instrument scripting VM: owns the scheduler, event-mark
//! groups, and engine configuration a running script's built-in calls act
//! on, and resolves dynamic variables on demand. Collapsed into one
//! cooperatively-scheduled struct per engine channel since this crate
//! does not carry a separate bytecode compiler.

pub mod builtins;
pub mod callback;
pub mod dynvars;
pub mod groups;
pub mod value;

use smallvec::SmallVec;

use crate::config::EngineConfig;
use crate::error::HostError;
use crate::note::NoteId;
use crate::scheduler::{CallbackId, Scheduler};

pub use builtins::BuiltinOutcome;
pub use value::{ExprType, MetricPrefix, StdUnit, Value, VarSigil};

/// Per-channel script execution context: the scheduler it dispatches
/// against, event-mark group membership, and the callback currently
/// executing (built-ins that implicitly target "the current note/event"
/// read this).
pub struct Vm {
    pub config: EngineConfig,
    pub scheduler: Scheduler,
    pub groups: groups::EventGroups,
    /// Id of the callback presently executing a statement. `None` before
    /// the first handler has been entered.
    pub current_callback: Option<CallbackId>,
    /// The note a `play_note()`-triggered handler is implicitly operating
    /// on (`change_vol()` with no explicit note id targets this).
    pub current_note: Option<NoteId>,
    /// Absolute frame count the engine has rendered so far, for
    /// `$ENGINE_UPTIME`.
    pub frame_time: u64,
    /// Offset within the current render slice of the event that triggered
    /// the running callback.
    pub fragment_position: u32,
    /// Scratch buffer `%ALL_EVENTS` is refreshed into, sized once at
    /// construction to `max_notes` so no allocation happens on access.
    all_events_buffer: Vec<NoteId>,
    all_events_dirty: bool,
}

impl Vm {
    pub fn new(config: EngineConfig) -> Self {
        let max_notes = config.max_notes;
        let max_event_groups = config.max_event_groups;
        Self {
            scheduler: Scheduler::new(config),
            groups: groups::EventGroups::new(max_event_groups),
            config,
            current_callback: None,
            current_note: None,
            frame_time: 0,
            fragment_position: 0,
            all_events_buffer: vec![NoteId(0); max_notes],
            all_events_dirty: true,
        }
    }

    /// Enters a freshly-triggered handler, registering its root callback.
    /// Fails if the callback pool is already exhausted.
    pub fn enter_handler(&mut self, note: Option<NoteId>) -> Result<CallbackId, HostError> {
        let id = self.scheduler.register_root_callback().ok_or(HostError::CallbackPoolExhausted)?;
        self.current_callback = Some(id);
        self.current_note = note;
        Ok(id)
    }

    pub fn warn(&self, message: &str) {
        log::warn!("{message}");
    }

    /// `$ENGINE_UPTIME`.
    pub fn engine_uptime_ms(&self) -> i64 {
        dynvars::engine_uptime_ms(self.frame_time, self.fragment_position, self.config.sample_rate)
    }

    /// Absolute scheduler time "now", in microseconds — the base every
    /// built-in's scheduling offset is relative to.
    pub fn now_micros(&self) -> i64 {
        let frames = self.frame_time + self.fragment_position as u64;
        ((frames * 1_000_000) / self.config.sample_rate as u64) as i64
    }

    /// `$NI_CALLBACK_ID`.
    pub fn ni_callback_id(&self) -> i64 {
        self.current_callback.map(dynvars::ni_callback_id).unwrap_or(-1)
    }

    /// `%NKSP_CALLBACK_CHILD_ID[i]`.
    pub fn callback_child_ids(&self) -> SmallVec<[i64; 8]> {
        match self.current_callback {
            Some(id) => dynvars::callback_child_ids(&self.scheduler, id),
            None => SmallVec::new(),
        }
    }

    pub fn invalidate_all_events(&mut self) {
        self.all_events_dirty = true;
    }

    /// `%ALL_EVENTS[i]`: refreshes lazily, only re-copying ids the first
    /// time this is accessed since the last note was triggered or freed.
    pub fn all_events(&mut self) -> &[NoteId] {
        if self.all_events_dirty {
            let n = dynvars::update_note_ids(&self.scheduler, &mut self.all_events_buffer);
            self.all_events_buffer.truncate(n);
            self.all_events_dirty = false;
        }
        &self.all_events_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_handler_assigns_root_callback() {
        let mut vm = Vm::new(EngineConfig::default());
        let id = vm.enter_handler(None).unwrap();
        assert_eq!(vm.current_callback, Some(id));
    }

    #[test]
    fn ni_callback_id_is_minus_one_before_any_handler() {
        let vm = Vm::new(EngineConfig::default());
        assert_eq!(vm.ni_callback_id(), -1);
    }

    #[test]
    fn all_events_refreshes_after_invalidation() {
        let mut vm = Vm::new(EngineConfig::default());
        assert!(vm.all_events().is_empty());
        vm.scheduler.schedule_note(crate::note::Note::new(NoteId(0), 60, 0, 0), 0).unwrap();
        vm.invalidate_all_events();
        assert_eq!(vm.all_events().len(), 1);
    }
}
