//! Event model: what the scheduler moves around and what script built-ins
//! construct. Its shape follows what note override application needs
//! from a scheduled value change, plus the MIDI/script event kinds the
//! built-in function surface constructs.

use crate::note::{NoteId, Override, SNorm};

/// Unique identifier for a scheduled event, distinct from a [`NoteId`] even
/// though both are plain integers under the hood (the "Script ID" concept:
/// script code must not be able to confuse the two).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u64);

/// How an incoming change to a note parameter composes with the value
/// already stored in the note's override, mirroring `Event::ValueScope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueScope {
    /// Multiply into the existing value, but only this write's call stays
    /// in scope for future final-ness checks (i.e. does not claim final).
    SelfRelative,
    /// Replace the value outright, non-final.
    Relative,
    /// Multiply into the existing value, and claim final status.
    FinalSelfRelative,
    /// Replace the value outright, in normalized range, claiming final
    /// status.
    FinalNorm,
    /// Replace the value outright, in the parameter's native unit,
    /// claiming final status. Only meaningful for [`crate::note::Param`]
    /// fields.
    FinalNative,
}

/// Which field of a note's [`Override`] an event's synth-param payload
/// targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteParamField {
    Volume,
    Pitch,
    Pan,
    Cutoff,
    Resonance,
    Attack,
    Decay,
    Sustain,
    Release,
    CutoffAttack,
    CutoffDecay,
    CutoffSustain,
    CutoffRelease,
    AmpLfoDepth,
    AmpLfoFreq,
    CutoffLfoDepth,
    CutoffLfoFreq,
    PitchLfoDepth,
    PitchLfoFreq,
}

/// The payload carried by a `NoteSynthParam`-kind event: the incoming
/// delta and the scope it should be applied under. `abs_value` is filled
/// in once [`apply_to_note`] resolves it, so downstream consumers (e.g. a
/// voice picking up a freshly-applied cutoff) don't need to recompute it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteSynthParam {
    pub delta: f32,
    pub scope: ValueScope,
    pub abs_value: f32,
}

impl NoteSynthParam {
    pub fn new(delta: f32, scope: ValueScope) -> Self {
        Self { delta, scope, abs_value: delta }
    }
}

/// Discriminated payload an [`Event`] carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventPayload {
    NoteOn { key: u8, velocity: u8 },
    NoteOff { key: u8, velocity: u8 },
    Control { controller: u8, value: u8 },
    Rpn { parameter: u16, value: u16 },
    Nrpn { parameter: u16, value: u16 },
    PitchBend { value: i16 },
    /// A script's `change_*()` call targeting one note's override field.
    NoteParam { note: NoteId, field: NoteParamField, param: NoteSynthParam },
}

/// One scheduled occurrence: a MIDI-originated event, or a script-authored
/// parameter change, carrying enough timing information for the scheduler
/// to place it precisely within a rendering slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub id: EventId,
    /// Scheduler time (microseconds) at which this event should fire.
    pub sched_time: i64,
    /// Offset within the current rendering slice, in frames, once the
    /// event has reached the slice it will actually be processed in.
    pub fragment_position: u32,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, sched_time: i64, payload: EventPayload) -> Self {
        Self { id, sched_time, fragment_position: 0, payload }
    }
}

/// Applies a `NoteParam` event's delta/scope to the targeted field of
/// `overrides`, resolving and returning the event's absolute value. This
/// is the generic dispatch `Note::apply(event, field_selector)`'s
/// reference-implementation pointer-to-member trick stands in for in Rust.
pub fn apply_to_note(overrides: &mut Override, field: NoteParamField, param: &mut NoteSynthParam) {
    let abs = match field {
        NoteParamField::Volume => overrides.volume.apply(param.delta, param.scope),
        NoteParamField::Pitch => overrides.pitch.apply(param.delta, param.scope),
        NoteParamField::Pan => snorm_abs(&mut overrides.pan, param.delta, param.scope),
        NoteParamField::Cutoff => Some(overrides.cutoff.apply(param.delta, param.scope)),
        NoteParamField::Resonance => overrides.resonance.apply(param.delta, param.scope),
        NoteParamField::Attack => Some(overrides.attack.apply(param.delta, param.scope)),
        NoteParamField::Decay => Some(overrides.decay.apply(param.delta, param.scope)),
        NoteParamField::Sustain => overrides.sustain.apply(param.delta, param.scope),
        NoteParamField::Release => Some(overrides.release.apply(param.delta, param.scope)),
        NoteParamField::CutoffAttack => Some(overrides.cutoff_attack.apply(param.delta, param.scope)),
        NoteParamField::CutoffDecay => Some(overrides.cutoff_decay.apply(param.delta, param.scope)),
        NoteParamField::CutoffSustain => overrides.cutoff_sustain.apply(param.delta, param.scope),
        NoteParamField::CutoffRelease => Some(overrides.cutoff_release.apply(param.delta, param.scope)),
        NoteParamField::AmpLfoDepth => overrides.amp_lfo_depth.apply(param.delta, param.scope),
        NoteParamField::AmpLfoFreq => Some(overrides.amp_lfo_freq.apply(param.delta, param.scope)),
        NoteParamField::CutoffLfoDepth => overrides.cutoff_lfo_depth.apply(param.delta, param.scope),
        NoteParamField::CutoffLfoFreq => Some(overrides.cutoff_lfo_freq.apply(param.delta, param.scope)),
        NoteParamField::PitchLfoDepth => overrides.pitch_lfo_depth.apply(param.delta, param.scope),
        NoteParamField::PitchLfoFreq => Some(overrides.pitch_lfo_freq.apply(param.delta, param.scope)),
    };
    if let Some(abs) = abs {
        param.abs_value = abs;
    }
}

fn snorm_abs(field: &mut SNorm, delta: f32, scope: ValueScope) -> Option<f32> {
    field.apply(delta, scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Note;

    #[test]
    fn apply_to_note_resolves_volume_and_writes_abs_value() {
        let mut note = Note::new(NoteId(1), 60, 0, 0);
        let mut param = NoteSynthParam::new(0.5, ValueScope::FinalNorm);
        apply_to_note(&mut note.overrides, NoteParamField::Volume, &mut param);
        assert_eq!(param.abs_value, 0.5);
        assert_eq!(note.overrides.volume.value, 0.5);
        assert!(note.overrides.volume.is_final);
    }

    #[test]
    fn apply_to_note_leaves_abs_value_untouched_on_rejected_native_write() {
        let mut note = Note::new(NoteId(1), 60, 0, 0);
        let mut param = NoteSynthParam::new(123.0, ValueScope::FinalNative);
        param.abs_value = -1.0;
        apply_to_note(&mut note.overrides, NoteParamField::Sustain, &mut param);
        assert_eq!(param.abs_value, -1.0);
    }
}
