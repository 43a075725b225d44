//! Real-time instrument scripting VM and LFO bank: a sample-accurate
//! scheduler, script-driven note-parameter overrides, and a bank of
//! branch-free LFO kernels, built for a modular software sampler's
//! per-voice scripting layer.

mod config;
mod error;
mod event;
mod garbage_collector;
mod lfo;
mod note;
mod rt_ref;
mod scheduler;
mod thread;
mod tokenizer;
mod vm;

pub use config::EngineConfig;
pub use error::{HostError, ScriptError, Severity};
pub use event::{apply_to_note, Event, EventId, EventPayload, NoteParamField, NoteSynthParam, ValueScope};
pub use garbage_collector::run_garbage_collector_thread;
pub use lfo::{Lfo, LfoCluster, Range, Saw, Shape, Sine, Square, StartLevel, Triangle, TriangleAlgorithm};
pub use note::{FadeCurve, Note, NoteId, Norm, Override, Param, ParamScope, SNorm, DEFAULT_OVERRIDE_TIME_S};
pub use rt_ref::{RtRef, RtRefView};
pub use scheduler::{CallbackEntry, CallbackId, Scheduler};
pub use thread::{CancelGuard, RtThread, SchedulePolicy, ThreadState};
pub use tokenizer::{tokenize, BaseType, ExtType, SourceToken};
pub use vm::builtins::{self, BuiltinOutcome};
pub use vm::callback::{self, CallbackStatus, EventStatus};
pub use vm::dynvars;
pub use vm::groups::EventGroups;
pub use vm::value::{ExprType, MetricPrefix, StdUnit, Value, VarSigil};
pub use vm::Vm;
