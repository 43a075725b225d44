//! Note model: the record a played note's voices hang off of, and the
//! parameter-override composition rules a script's `change_*()` calls
//! write through.
//!
//! Three value containers exist because overrides split into three
//! numeric domains by how "final" composes:
//! - [`Param`]: used where native-unit final values make sense (cutoff,
//!   envelope stage times); tracks a 3-way scope instead of a bare flag.
//! - [`Norm`]: a plain `(value, final)` pair for normalized-range-only
//!   parameters (volume, sustain level, LFO depths).
//! - [`SNorm`]: like [`Norm`] but signed (-1..+1) and additionally tracks
//!   how many relative writes have contributed, to support pan's
//!   running-average semantics.

use smallvec::SmallVec;

use crate::event::ValueScope;

/// Unique identifier for a live note, scoped to one engine channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub u64);

/// Fade shape used when transitioning a note parameter from its previous
/// value to a new override target over the override's configured time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeCurve {
    Linear,
    EaseIn,
    EaseOut,
}

impl Default for FadeCurve {
    fn default() -> Self {
        FadeCurve::Linear
    }
}

/// Default transition time (seconds) for volume, pitch, and pan overrides.
pub const DEFAULT_OVERRIDE_TIME_S: f32 = 0.013;

/// A native-unit-capable override value (e.g. cutoff, attack/decay/release
/// times). Scope tracks whether the value is a running relative multiplier
/// or a final replacement, and if final, whether it is normalized (0..1) or
/// already in the parameter's native unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param {
    pub value: f32,
    pub scope: ParamScope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamScope {
    Relative,
    FinalNorm,
    FinalNative,
}

impl Default for Param {
    fn default() -> Self {
        Self { value: 1.0, scope: ParamScope::Relative }
    }
}

impl Param {
    pub fn is_final(&self) -> bool {
        matches!(self.scope, ParamScope::FinalNorm | ParamScope::FinalNative)
    }

    /// Applies an incoming event's delta under `scope`, mutating this
    /// override in place, and returns the event's resolved absolute value
    /// (what the caller should stash back onto the originating event).
    pub fn apply(&mut self, delta: f32, scope: ValueScope) -> f32 {
        match scope {
            ValueScope::SelfRelative => {
                if self.scope == ParamScope::FinalNative {
                    *self = Param::default();
                }
                self.value *= delta;
                self.scope = ParamScope::Relative;
                self.value
            }
            ValueScope::Relative => {
                self.value = delta;
                self.scope = ParamScope::Relative;
                delta
            }
            ValueScope::FinalSelfRelative => {
                if self.scope == ParamScope::FinalNative {
                    *self = Param::default();
                }
                self.value *= delta;
                self.scope = ParamScope::FinalNorm;
                self.value
            }
            ValueScope::FinalNorm => {
                self.value = delta;
                self.scope = ParamScope::FinalNorm;
                delta
            }
            ValueScope::FinalNative => {
                self.value = delta;
                self.scope = ParamScope::FinalNative;
                delta
            }
        }
    }
}

/// A normalized-range-only (0..1) override value: volume, resonance,
/// sustain level, LFO depths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Norm {
    pub value: f32,
    pub is_final: bool,
}

impl Default for Norm {
    fn default() -> Self {
        Self { value: 1.0, is_final: false }
    }
}

impl Norm {
    /// Returns `Some(abs_value)` on success; `None` if the event tried to
    /// assign a native-unit final value to a normalized-only parameter
    /// (a script bug — logged, not propagated).
    pub fn apply(&mut self, delta: f32, scope: ValueScope) -> Option<f32> {
        match scope {
            ValueScope::SelfRelative => {
                self.value *= delta;
                self.is_final = false;
                Some(self.value)
            }
            ValueScope::Relative => {
                self.value = delta;
                self.is_final = false;
                Some(delta)
            }
            ValueScope::FinalSelfRelative => {
                self.value *= delta;
                self.is_final = true;
                Some(self.value)
            }
            ValueScope::FinalNorm => {
                self.value = delta;
                self.is_final = true;
                Some(delta)
            }
            ValueScope::FinalNative => {
                log::warn!("attempt to assign a native-unit value to a normalized-only note parameter");
                None
            }
        }
    }
}

/// A signed normalized-range (-1..+1) override value with running-average
/// bookkeeping, used for pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SNorm {
    pub value: f32,
    pub is_final: bool,
    /// Count of relative writes contributing to the running average.
    pub sources: i64,
}

impl Default for SNorm {
    fn default() -> Self {
        Self { value: 0.0, is_final: false, sources: 0 }
    }
}

impl SNorm {
    pub fn apply(&mut self, delta: f32, scope: ValueScope) -> Option<f32> {
        match scope {
            ValueScope::SelfRelative => {
                self.sources += 1;
                self.value = relative_summed_avg(self.value, delta, self.sources);
                self.is_final = false;
                Some(self.value)
            }
            ValueScope::Relative => {
                self.value = delta;
                // A non-relative write collapses history down to exactly
                // one prior source, so the next relative write averages
                // against this value rather than against nothing.
                self.sources = 1;
                self.is_final = false;
                Some(delta)
            }
            ValueScope::FinalSelfRelative => {
                self.sources += 1;
                self.value = relative_summed_avg(self.value, delta, self.sources);
                self.is_final = true;
                Some(self.value)
            }
            ValueScope::FinalNorm => {
                self.value = delta;
                self.sources = 1;
                self.is_final = true;
                Some(delta)
            }
            ValueScope::FinalNative => {
                log::warn!("attempt to assign a native-unit value to a signed normalized-only note parameter");
                None
            }
        }
    }
}

/// `(value * sources_before + delta) / (sources_before + 1)`, where
/// `sources_after` is the already-incremented count (so
/// `sources_before = sources_after - 1`).
fn relative_summed_avg(value: f32, delta: f32, sources_after: i64) -> f32 {
    let n = sources_after.max(1);
    (value * (n - 1) as f32 + delta) / n as f32
}

/// All synthesis parameters a running note may have overridden via script
/// `change_*()` calls, one field per overridable parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Override {
    pub volume: Norm,
    pub volume_time: f32,
    pub pitch: Norm,
    pub pitch_time: f32,
    pub pan: SNorm,
    pub pan_time: f32,
    pub cutoff: Param,
    pub resonance: Norm,
    pub attack: Param,
    pub decay: Param,
    pub sustain: Norm,
    pub release: Param,
    pub cutoff_attack: Param,
    pub cutoff_decay: Param,
    pub cutoff_sustain: Norm,
    pub cutoff_release: Param,
    pub amp_lfo_depth: Norm,
    pub amp_lfo_freq: Param,
    pub cutoff_lfo_depth: Norm,
    pub cutoff_lfo_freq: Param,
    pub pitch_lfo_depth: Norm,
    pub pitch_lfo_freq: Param,
    pub volume_curve: FadeCurve,
    pub pitch_curve: FadeCurve,
    pub pan_curve: FadeCurve,
    /// Microseconds into the sample at which playback should start, or
    /// `None` for the sample's natural start.
    pub sample_offset: Option<u32>,
}

impl Default for Override {
    fn default() -> Self {
        Self {
            volume: Norm::default(),
            volume_time: DEFAULT_OVERRIDE_TIME_S,
            pitch: Norm::default(),
            pitch_time: DEFAULT_OVERRIDE_TIME_S,
            pan: SNorm::default(),
            pan_time: DEFAULT_OVERRIDE_TIME_S,
            cutoff: Param::default(),
            resonance: Norm::default(),
            attack: Param::default(),
            decay: Param::default(),
            sustain: Norm::default(),
            release: Param::default(),
            cutoff_attack: Param::default(),
            cutoff_decay: Param::default(),
            cutoff_sustain: Norm::default(),
            cutoff_release: Param::default(),
            amp_lfo_depth: Norm::default(),
            amp_lfo_freq: Param::default(),
            cutoff_lfo_depth: Norm::default(),
            cutoff_lfo_freq: Param::default(),
            pitch_lfo_depth: Norm::default(),
            pitch_lfo_freq: Param::default(),
            volume_curve: FadeCurve::default(),
            pitch_curve: FadeCurve::default(),
            pan_curve: FadeCurve::default(),
            sample_offset: None,
        }
    }
}

/// A triggered note: the voices it spawned share this record's id and its
/// parameter overrides. Child notes (spawned by a script's `play_note()`)
/// carry `parent_note` pointing back here and are listed in
/// `child_notes` so a release of the parent can cascade to them.
#[derive(Debug, Clone)]
pub struct Note {
    pub id: NoteId,
    /// MIDI key this note sounds on (the parent's key, for child notes).
    pub host_key: u8,
    pub parent_note: Option<NoteId>,
    pub child_notes: SmallVec<[NoteId; 4]>,
    pub event_id: u64,
    /// Scheduler time (microseconds) at which this note was triggered.
    pub trigger_sched_time: i64,
    pub overrides: Override,
    /// `$EVENT_PAR_0`..`$EVENT_PAR_3` script-author scratch storage.
    pub user_par: [i64; 4],
}

impl Note {
    pub fn new(id: NoteId, host_key: u8, event_id: u64, trigger_sched_time: i64) -> Self {
        Self {
            id,
            host_key,
            parent_note: None,
            child_notes: SmallVec::new(),
            event_id,
            trigger_sched_time,
            overrides: Override::default(),
            user_par: [0; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_self_relative_multiplies_and_reports_abs_value() {
        let mut p = Param::default();
        let abs = p.apply(0.5, ValueScope::SelfRelative);
        assert_eq!(abs, 0.5);
        assert_eq!(p.value, 0.5);
        assert_eq!(p.scope, ParamScope::Relative);
    }

    #[test]
    fn param_final_native_then_self_relative_resets_first() {
        let mut p = Param::default();
        p.apply(440.0, ValueScope::FinalNative);
        assert_eq!(p.scope, ParamScope::FinalNative);
        // A self-relative write after a final-native one must reset to the
        // default before multiplying, not compound onto the native value.
        let abs = p.apply(0.5, ValueScope::SelfRelative);
        assert_eq!(abs, 0.5);
        assert_eq!(p.scope, ParamScope::Relative);
    }

    #[test]
    fn norm_final_native_is_rejected() {
        let mut n = Norm::default();
        assert_eq!(n.apply(1.0, ValueScope::FinalNative), None);
        assert_eq!(n.value, 1.0); // untouched
    }

    #[test]
    fn snorm_relative_write_resets_sources_to_one() {
        let mut pan = SNorm::default();
        pan.apply(0.5, ValueScope::Relative);
        assert_eq!(pan.sources, 1);
        assert_eq!(pan.value, 0.5);

        // A subsequent self-relative write averages against that single
        // prior source, per the resolved Sources=1 semantics.
        let abs = pan.apply(1.0, ValueScope::SelfRelative).unwrap();
        assert!((abs - 0.75).abs() < 1e-6, "expected average of 0.5 and 1.0, got {abs}");
    }

    #[test]
    fn snorm_self_relative_from_fresh_note_averages_against_zero_sources() {
        let mut pan = SNorm::default();
        let abs = pan.apply(1.0, ValueScope::SelfRelative).unwrap();
        // sources goes 0 -> 1, so this is (0*0 + 1.0)/1 == 1.0.
        assert!((abs - 1.0).abs() < 1e-6);
    }

    #[test]
    fn note_new_has_empty_child_list_and_default_overrides() {
        let note = Note::new(NoteId(7), 60, 1, 0);
        assert!(note.child_notes.is_empty());
        assert_eq!(note.overrides.volume_time, DEFAULT_OVERRIDE_TIME_S);
    }
}
