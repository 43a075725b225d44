//! Sample-accurate scheduler: owns every live note, pending event, and
//! running script callback, keyed by stable ids with O(1) lookup
//! (`FnvHashMap`) and strict
//! insertion-ordered due-time queues (`BTreeMap<(micros, insertion_seq),
//! _>`, giving FIFO tie-breaking for same-microsecond entries without a
//! separate sequence-comparison `Ord` impl).

use fnv::FnvHashMap;
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::event::{Event, EventId};
use crate::note::{Note, NoteId};

/// Identifier for a running script callback (a handler invocation or one
/// of its `fork()`ed children).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(pub u64);

#[derive(Debug, Clone)]
pub struct CallbackEntry {
    pub id: CallbackId,
    pub parent: Option<CallbackId>,
    /// If true, this callback aborts automatically when its parent does.
    pub auto_abort: bool,
    pub children: SmallVec<[CallbackId; 8]>,
    /// Event, if any, this callback is currently bound to resume on.
    pub waiting_on: Option<EventId>,
}

struct DueQueue<K> {
    order: BTreeMap<(i64, u64), K>,
}

impl<K: Copy + Ord> DueQueue<K> {
    fn new() -> Self {
        Self { order: BTreeMap::new() }
    }

    fn insert(&mut self, due: i64, seq: u64, key: K) {
        self.order.insert((due, seq), key);
    }

    fn remove_key(&mut self, due: i64, seq: u64) {
        self.order.remove(&(due, seq));
    }

    /// Pops every entry due at or before `now`, in strict-weak order.
    fn drain_due(&mut self, now: i64) -> Vec<K> {
        let ready: Vec<(i64, u64)> =
            self.order.range(..=(now, u64::MAX)).map(|(k, _)| *k).collect();
        ready.into_iter().filter_map(|k| self.order.remove(&k)).collect()
    }
}

/// Owns the live entity tables and due-time queues for notes, events, and
/// script callbacks.
pub struct Scheduler {
    config: EngineConfig,
    notes: FnvHashMap<NoteId, Note>,
    events: FnvHashMap<EventId, Event>,
    callbacks: FnvHashMap<CallbackId, CallbackEntry>,
    event_owner: FnvHashMap<EventId, CallbackId>,

    note_queue: DueQueue<NoteId>,
    event_queue: DueQueue<EventId>,
    resume_queue: DueQueue<CallbackId>,

    next_note_id: u64,
    next_event_id: u64,
    next_callback_id: u64,
    insertion_seq: u64,
}

impl Scheduler {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            notes: FnvHashMap::default(),
            events: FnvHashMap::default(),
            callbacks: FnvHashMap::default(),
            event_owner: FnvHashMap::default(),
            note_queue: DueQueue::new(),
            event_queue: DueQueue::new(),
            resume_queue: DueQueue::new(),
            next_note_id: 1,
            next_event_id: 1,
            next_callback_id: 1,
            insertion_seq: 0,
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.insertion_seq += 1;
        self.insertion_seq
    }

    /// Registers `note` to fire at `due_micros`, returning its id. Fails
    /// (returning `None`) once `max_notes` live notes are already tracked.
    pub fn schedule_note(&mut self, mut note: Note, due_micros: i64) -> Option<NoteId> {
        if self.notes.len() >= self.config.max_notes {
            return None;
        }
        let id = NoteId(self.next_note_id);
        self.next_note_id += 1;
        note.id = id;
        let seq = self.next_seq();
        self.note_queue.insert(due_micros, seq, id);
        self.notes.insert(id, note);
        Some(id)
    }

    pub fn schedule_event(&mut self, mut event: Event, due_micros: i64) -> EventId {
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;
        event.id = id;
        event.sched_time = due_micros;
        let seq = self.next_seq();
        self.event_queue.insert(due_micros, seq, id);
        self.events.insert(id, event);
        id
    }

    /// Schedules `callback` to resume at `base_time` (absolute
    /// microseconds). If `disable_wait` is set the callback is woken
    /// immediately regardless of `base_time` having already elapsed this
    /// slice — the scheduler does not itself interpret this flag beyond
    /// accepting any `base_time <= now` as already-due.
    pub fn schedule_resume(&mut self, callback: CallbackId, base_time: i64, disable_wait: bool) {
        let due = if disable_wait { i64::MIN } else { base_time };
        let seq = self.next_seq();
        self.resume_queue.insert(due, seq, callback);
    }

    pub fn note_by_id(&self, id: NoteId) -> Option<&Note> {
        self.notes.get(&id)
    }

    pub fn note_by_id_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.notes.get_mut(&id)
    }

    pub fn event_by_id(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    pub fn callback_by_id(&self, id: CallbackId) -> Option<&CallbackEntry> {
        self.callbacks.get(&id)
    }

    pub fn callback_id_of(&self, event: EventId) -> Option<CallbackId> {
        self.event_owner.get(&event).copied()
    }

    pub fn bind_event_to_callback(&mut self, event: EventId, callback: CallbackId) {
        self.event_owner.insert(event, callback);
    }

    /// Copies every live note's id into `out`, returning how many were
    /// written. Stops at `out.len()` rather than reallocating, matching
    /// `%ALL_EVENTS`'s preallocated-buffer contract.
    pub fn all_note_ids(&self, out: &mut [NoteId]) -> usize {
        let mut n = 0;
        for id in self.notes.keys() {
            if n >= out.len() {
                break;
            }
            out[n] = *id;
            n += 1;
        }
        n
    }

    pub fn has_free_callbacks(&self, n: usize) -> bool {
        self.callbacks.len() + n <= self.config.max_script_callbacks
    }

    /// Registers a new forked callback under `parent`. Returns `None` if
    /// the callback pool is exhausted or `parent` already has
    /// `max_forks_per_handler` children.
    pub fn fork_callback(&mut self, parent: CallbackId, auto_abort: bool) -> Option<CallbackId> {
        if !self.has_free_callbacks(1) {
            return None;
        }
        let sibling_count = self.callbacks.get(&parent).map(|p| p.children.len()).unwrap_or(0);
        if sibling_count >= self.config.max_forks_per_handler {
            return None;
        }
        let id = CallbackId(self.next_callback_id);
        self.next_callback_id += 1;
        self.callbacks.insert(
            id,
            CallbackEntry { id, parent: Some(parent), auto_abort, children: SmallVec::new(), waiting_on: None },
        );
        if let Some(p) = self.callbacks.get_mut(&parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Registers a top-level callback (a fresh handler invocation, no
    /// parent) for the scheduler to track. Fails if the pool is full.
    pub fn register_root_callback(&mut self) -> Option<CallbackId> {
        if !self.has_free_callbacks(1) {
            return None;
        }
        let id = CallbackId(self.next_callback_id);
        self.next_callback_id += 1;
        self.callbacks.insert(
            id,
            CallbackEntry { id, parent: None, auto_abort: false, children: SmallVec::new(), waiting_on: None },
        );
        Some(id)
    }

    /// Removes `id` and cascades to every descendant flagged
    /// `auto_abort`, returning every id actually removed (id first, then
    /// descendants in removal order).
    pub fn abort_callback(&mut self, id: CallbackId) -> Vec<CallbackId> {
        let mut removed = Vec::new();
        let mut frontier = vec![id];
        while let Some(current) = frontier.pop() {
            if let Some(entry) = self.callbacks.remove(&current) {
                removed.push(current);
                for child in entry.children {
                    if self.callbacks.get(&child).map(|c| c.auto_abort).unwrap_or(false) {
                        frontier.push(child);
                    }
                }
            }
        }
        removed
    }

    pub fn drain_due_notes(&mut self, now: i64) -> Vec<NoteId> {
        self.note_queue.drain_due(now)
    }

    pub fn drain_due_events(&mut self, now: i64) -> Vec<EventId> {
        self.event_queue.drain_due(now)
    }

    pub fn drain_due_resumes(&mut self, now: i64) -> Vec<CallbackId> {
        self.resume_queue.drain_due(now)
    }

    pub fn remove_note(&mut self, id: NoteId) -> Option<Note> {
        self.notes.remove(&id)
    }

    pub fn remove_event(&mut self, id: EventId) -> Option<Event> {
        self.event_owner.remove(&id);
        self.events.remove(&id)
    }
}
