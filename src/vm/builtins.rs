//! Script built-in functions: `play_note`, `change_*`, event marks,
//! callback control flow, and the rest of the function surface a running
//! script calls into. Each is a plain Rust function taking `&mut Vm` plus
//! already-type-checked arguments — static argument validation (arg-count
//! range, per-argument type/unit/prefix acceptance) belongs to a
//! parser/compiler stage out of scope for this crate, which implements
//! the VM's runtime surface.

use smallvec::SmallVec;

use super::value::Value;
use super::Vm;
use crate::event::{apply_to_note, Event, EventId, EventPayload, NoteParamField, NoteSynthParam, ValueScope};
use crate::note::{FadeCurve, Note, NoteId};
use crate::scheduler::CallbackId;

/// Result of running a built-in. Warnings are a side channel
/// (`Vm::warn`) and never appear here — only a function that cannot
/// proceed at all surfaces as `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinOutcome {
    Success,
    Value(Value),
    Error(String),
}

fn note_mut<'a>(vm: &'a mut Vm, id: NoteId) -> Result<&'a mut Note, BuiltinOutcome> {
    vm.scheduler.note_by_id_mut(id).ok_or_else(|| BuiltinOutcome::Error(format!("no such note: {id:?}")))
}

/// `play_note(key, velocity, sample_offset, duration_us)`. Triggers a
/// child note under the currently executing note (or a top-level note if
/// none is active), scheduled "now". Never allocates beyond the
/// scheduler's already-preallocated note table.
pub fn play_note(vm: &mut Vm, key: u8, velocity: u8, sample_offset: Option<u32>, duration_us: Option<i64>) -> BuiltinOutcome {
    let now = vm.now_micros();
    let parent = vm.current_note;
    let event_id = vm.current_callback.map(|c| c.0).unwrap_or(0);
    let mut note = Note::new(NoteId(0), key, event_id, now);
    note.parent_note = parent;
    note.overrides.sample_offset = sample_offset;

    let id = match vm.scheduler.schedule_note(note, now) {
        Some(id) => id,
        None => return BuiltinOutcome::Error("note pool exhausted".into()),
    };
    if let Some(parent_id) = parent {
        if let Some(parent_note) = vm.scheduler.note_by_id_mut(parent_id) {
            parent_note.child_notes.push(id);
        }
    }
    vm.invalidate_all_events();

    if let Some(duration) = duration_us {
        let off_event = Event::new(EventId(0), now + duration, EventPayload::NoteOff { key, velocity: 0 });
        vm.scheduler.schedule_event(off_event, now + duration);
    }

    BuiltinOutcome::Value(Value::int(id.0 as i64))
}

/// `note_off(id, velocity)`.
pub fn note_off(vm: &mut Vm, id: NoteId, velocity: u8) -> BuiltinOutcome {
    let now = vm.now_micros();
    let host_key = match vm.scheduler.note_by_id(id) {
        Some(n) => n.host_key,
        None => return BuiltinOutcome::Error(format!("no such note: {id:?}")),
    };
    vm.scheduler.schedule_event(
        Event::new(EventId(0), now, EventPayload::NoteOff { key: host_key, velocity }),
        now,
    );
    BuiltinOutcome::Success
}

/// `change_note(id, key)`: re-targets which MIDI key a live note sounds
/// on, e.g. for `change_tune` scripts that also want pitch-table lookups
/// to follow. Only effective while `id` is still in its trigger slice;
/// otherwise it warns and is a no-op.
pub fn change_note(vm: &mut Vm, id: NoteId, key: u8) -> BuiltinOutcome {
    let now = vm.now_micros();
    let trigger_time = match vm.scheduler.note_by_id(id) {
        Some(n) => n.trigger_sched_time,
        None => return BuiltinOutcome::Error(format!("no such note: {id:?}")),
    };
    if now != trigger_time {
        vm.warn(&format!("change_note: note {id:?} is past its trigger slice, ignoring"));
        return BuiltinOutcome::Success;
    }
    match note_mut(vm, id) {
        Ok(note) => {
            note.host_key = key;
            BuiltinOutcome::Success
        }
        Err(e) => e,
    }
}

/// `change_velo(id, velocity)`. Velocity itself isn't stored on `Note` in
/// this crate (voices own it); exposed here as a pass-through that warns
/// and otherwise no-ops on a stale note id rather than erroring.
pub fn change_velo(vm: &mut Vm, id: NoteId, _velocity: u8) -> BuiltinOutcome {
    if vm.scheduler.note_by_id(id).is_none() {
        vm.warn(&format!("change_velo: no such note {id:?}"));
        return BuiltinOutcome::Success;
    }
    BuiltinOutcome::Success
}

/// `change_play_pos(id, sample_offset_us)`. Only effective while `id` is
/// still in its trigger slice; otherwise it warns and is a no-op.
pub fn change_play_pos(vm: &mut Vm, id: NoteId, sample_offset_us: u32) -> BuiltinOutcome {
    let now = vm.now_micros();
    let trigger_time = match vm.scheduler.note_by_id(id) {
        Some(n) => n.trigger_sched_time,
        None => return BuiltinOutcome::Error(format!("no such note: {id:?}")),
    };
    if now != trigger_time {
        vm.warn(&format!("change_play_pos: note {id:?} is past its trigger slice, ignoring"));
        return BuiltinOutcome::Success;
    }
    match note_mut(vm, id) {
        Ok(note) => {
            note.overrides.sample_offset = Some(sample_offset_us);
            BuiltinOutcome::Success
        }
        Err(e) => e,
    }
}

/// `ignore_event(id)`: removes a still-pending event before it fires.
pub fn ignore_event(vm: &mut Vm, id: EventId) -> BuiltinOutcome {
    match vm.scheduler.remove_event(id) {
        Some(_) => BuiltinOutcome::Success,
        None => {
            vm.warn(&format!("ignore_event: no such event {id:?}"));
            BuiltinOutcome::Success
        }
    }
}

/// `ignore_controller(cc)`: suppresses the default engine handling of a
/// controller the script wants exclusive control over.
pub fn ignore_controller(vm: &mut Vm, controller: u8) -> BuiltinOutcome {
    vm.scheduler.schedule_event(
        Event::new(EventId(0), vm.now_micros(), EventPayload::Control { controller, value: 0 }),
        i64::MAX,
    );
    BuiltinOutcome::Success
}

/// Generic `change_*` dispatch: applies `delta` under `scope` to `field`
/// of `note`'s overrides, following the apply-now rule — if the current
/// scheduler time still equals the note's trigger time, the override is
/// mutated directly and the resolved absolute value is reported back;
/// otherwise a `NoteParam` event carrying the same delta/scope is
/// scheduled at "now" instead, since the note may already be observed by
/// rendering and can no longer be mutated out from under it.
pub fn change_param(vm: &mut Vm, note: NoteId, field: NoteParamField, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    let now = vm.now_micros();
    let trigger_time = match vm.scheduler.note_by_id(note) {
        Some(n) => n.trigger_sched_time,
        None => return BuiltinOutcome::Error(format!("no such note: {note:?}")),
    };

    if now == trigger_time {
        let n = match note_mut(vm, note) {
            Ok(n) => n,
            Err(e) => return e,
        };
        let mut param = NoteSynthParam::new(delta, scope);
        apply_to_note(&mut n.overrides, field, &mut param);
        BuiltinOutcome::Value(Value::real(param.abs_value as f64))
    } else {
        let param = NoteSynthParam::new(delta, scope);
        vm.scheduler.schedule_event(Event::new(EventId(0), now, EventPayload::NoteParam { note, field, param }), now);
        BuiltinOutcome::Success
    }
}

/// `change_vol(id, delta, scope)` and friends that carry a unit-bearing
/// native value (cutoff, envelope times) go through [`change_param`]
/// too; `delta` here is assumed already resolved to the field's native
/// unit by the caller via [`Value::eval_real`].
pub fn change_vol(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::Volume, delta, scope)
}

pub fn change_tune(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::Pitch, delta, scope)
}

pub fn change_pan(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::Pan, delta, scope)
}

pub fn change_cutoff(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::Cutoff, delta, scope)
}

pub fn change_reso(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::Resonance, delta, scope)
}

pub fn change_attack(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::Attack, delta, scope)
}

pub fn change_decay(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::Decay, delta, scope)
}

pub fn change_release(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::Release, delta, scope)
}

pub fn change_sustain(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::Sustain, delta, scope)
}

pub fn change_cutoff_attack(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::CutoffAttack, delta, scope)
}

pub fn change_cutoff_decay(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::CutoffDecay, delta, scope)
}

pub fn change_cutoff_sustain(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::CutoffSustain, delta, scope)
}

pub fn change_cutoff_release(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::CutoffRelease, delta, scope)
}

pub fn change_amp_lfo_depth(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::AmpLfoDepth, delta, scope)
}

pub fn change_amp_lfo_freq(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::AmpLfoFreq, delta, scope)
}

pub fn change_cutoff_lfo_depth(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::CutoffLfoDepth, delta, scope)
}

pub fn change_cutoff_lfo_freq(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::CutoffLfoFreq, delta, scope)
}

pub fn change_pitch_lfo_depth(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::PitchLfoDepth, delta, scope)
}

pub fn change_pitch_lfo_freq(vm: &mut Vm, note: NoteId, delta: f32, scope: ValueScope) -> BuiltinOutcome {
    change_param(vm, note, NoteParamField::PitchLfoFreq, delta, scope)
}

pub fn change_vol_time(vm: &mut Vm, note: NoteId, seconds: f32) -> BuiltinOutcome {
    match note_mut(vm, note) {
        Ok(n) => {
            n.overrides.volume_time = seconds;
            BuiltinOutcome::Success
        }
        Err(e) => e,
    }
}

pub fn change_tune_time(vm: &mut Vm, note: NoteId, seconds: f32) -> BuiltinOutcome {
    match note_mut(vm, note) {
        Ok(n) => {
            n.overrides.pitch_time = seconds;
            BuiltinOutcome::Success
        }
        Err(e) => e,
    }
}

pub fn change_pan_time(vm: &mut Vm, note: NoteId, seconds: f32) -> BuiltinOutcome {
    match note_mut(vm, note) {
        Ok(n) => {
            n.overrides.pan_time = seconds;
            BuiltinOutcome::Success
        }
        Err(e) => e,
    }
}

pub fn change_vol_curve(vm: &mut Vm, note: NoteId, curve: FadeCurve) -> BuiltinOutcome {
    match note_mut(vm, note) {
        Ok(n) => {
            n.overrides.volume_curve = curve;
            BuiltinOutcome::Success
        }
        Err(e) => e,
    }
}

pub fn change_tune_curve(vm: &mut Vm, note: NoteId, curve: FadeCurve) -> BuiltinOutcome {
    match note_mut(vm, note) {
        Ok(n) => {
            n.overrides.pitch_curve = curve;
            BuiltinOutcome::Success
        }
        Err(e) => e,
    }
}

pub fn change_pan_curve(vm: &mut Vm, note: NoteId, curve: FadeCurve) -> BuiltinOutcome {
    match note_mut(vm, note) {
        Ok(n) => {
            n.overrides.pan_curve = curve;
            BuiltinOutcome::Success
        }
        Err(e) => e,
    }
}

/// `fade_in(id, duration_us)`: a volume ramp from 0 to the note's current
/// target over `duration_us`, implemented as a relative change to 0
/// followed by a final-norm change scheduled one microsecond later — the
/// `+1` ordering idiom ensures the ramp's start and end are processed in
/// two distinct scheduler slots even when `duration_us` is 0.
pub fn fade_in(vm: &mut Vm, note: NoteId, duration_us: i64) -> BuiltinOutcome {
    fade(vm, note, duration_us, 0.0, 1.0)
}

/// `fade_out(id, duration_us)`: the inverse ramp, 1.0 down to 0.0.
pub fn fade_out(vm: &mut Vm, note: NoteId, duration_us: i64) -> BuiltinOutcome {
    fade(vm, note, duration_us, 1.0, 0.0)
}

fn fade(vm: &mut Vm, note: NoteId, duration_us: i64, from: f32, to: f32) -> BuiltinOutcome {
    if let Err(e) = note_mut(vm, note) {
        return e;
    }
    change_param(vm, note, NoteParamField::Volume, from, ValueScope::FinalNorm);
    let now = vm.now_micros();
    let target = NoteSynthParam::new(to, ValueScope::FinalNorm);
    vm.scheduler.schedule_event(
        Event::new(EventId(0), now + duration_us + 1, EventPayload::NoteParam { note, field: NoteParamField::Volume, param: target }),
        now + duration_us + 1,
    );
    BuiltinOutcome::Success
}

/// `set_event_mark(id, group)`.
pub fn set_event_mark(vm: &mut Vm, note: NoteId, group: usize) -> BuiltinOutcome {
    vm.groups.set_mark(note, group);
    BuiltinOutcome::Success
}

/// `delete_event_mark(id, group)`.
pub fn delete_event_mark(vm: &mut Vm, note: NoteId, group: usize) -> BuiltinOutcome {
    vm.groups.delete_mark(note, group);
    BuiltinOutcome::Success
}

/// `by_marks(group)`: returns the note ids currently carrying `group`'s
/// mark as an int array.
pub fn by_marks(vm: &mut Vm, group: usize) -> BuiltinOutcome {
    let mut buf = vec![NoteId(0); vm.config.max_notes];
    let n = vm.groups.by_marks(group, &mut buf);
    BuiltinOutcome::Value(Value::IntArray(buf[..n].iter().map(|id| id.0 as i64).collect()))
}

/// `wait(duration_us, disable_wait_script_ctx)`: parks the current
/// callback, to be resumed once `duration_us` microseconds have elapsed.
pub fn wait(vm: &mut Vm, duration_us: i64, disable_wait: bool) -> BuiltinOutcome {
    let Some(current) = vm.current_callback else {
        return BuiltinOutcome::Error("wait() called outside a running callback".into());
    };
    let base = vm.now_micros() + duration_us;
    vm.scheduler.schedule_resume(current, base, disable_wait);
    BuiltinOutcome::Success
}

/// `stop_wait(id, disable_wait_script_ctx)`: wakes a suspended callback
/// immediately, regardless of its originally scheduled resume time.
pub fn stop_wait(vm: &mut Vm, id: CallbackId, disable_wait: bool) -> BuiltinOutcome {
    vm.scheduler.schedule_resume(id, vm.now_micros(), disable_wait);
    BuiltinOutcome::Success
}

/// `abort(id)`.
pub fn abort(vm: &mut Vm, id: CallbackId) -> BuiltinOutcome {
    super::callback::abort(&mut vm.scheduler, id);
    BuiltinOutcome::Success
}

/// `fork(auto_abort)`.
pub fn fork(vm: &mut Vm, auto_abort: bool) -> BuiltinOutcome {
    let Some(current) = vm.current_callback else {
        return BuiltinOutcome::Error("fork() called outside a running callback".into());
    };
    match super::callback::fork(&mut vm.scheduler, current, auto_abort) {
        Ok(child) => BuiltinOutcome::Value(Value::int(child.0 as i64)),
        Err(e) => BuiltinOutcome::Error(e.to_string()),
    }
}

/// `callback_status(id)`.
pub fn callback_status(vm: &Vm, id: CallbackId) -> BuiltinOutcome {
    BuiltinOutcome::Value(Value::int(super::callback::callback_status(&vm.scheduler, id) as i64))
}

/// `event_status(id)`: whether a note is still alive on the engine.
pub fn event_status(vm: &Vm, note: NoteId) -> BuiltinOutcome {
    BuiltinOutcome::Value(Value::int(super::callback::event_status(&vm.scheduler, note) as i64))
}

/// `get_event_par(id, index)`: reads one of a note's four script-author
/// scratch slots.
pub fn get_event_par(vm: &Vm, note: NoteId, index: usize) -> BuiltinOutcome {
    match vm.scheduler.note_by_id(note) {
        Some(n) if index < n.user_par.len() => BuiltinOutcome::Value(Value::int(n.user_par[index])),
        Some(_) => BuiltinOutcome::Error("event parameter index out of range".into()),
        None => BuiltinOutcome::Error(format!("no such note: {note:?}")),
    }
}

/// `set_event_par(id, index, value)`.
pub fn set_event_par(vm: &mut Vm, note: NoteId, index: usize, value: i64) -> BuiltinOutcome {
    match vm.scheduler.note_by_id_mut(note) {
        Some(n) if index < n.user_par.len() => {
            n.user_par[index] = value;
            BuiltinOutcome::Success
        }
        Some(_) => BuiltinOutcome::Error("event parameter index out of range".into()),
        None => BuiltinOutcome::Error(format!("no such note: {note:?}")),
    }
}

/// `set_controller(cc, value)`.
pub fn set_controller(vm: &mut Vm, controller: u8, value: u8) -> BuiltinOutcome {
    let now = vm.now_micros();
    vm.scheduler.schedule_event(Event::new(EventId(0), now, EventPayload::Control { controller, value }), now);
    BuiltinOutcome::Success
}

/// `set_rpn(parameter, value)`.
pub fn set_rpn(vm: &mut Vm, parameter: u16, value: u16) -> BuiltinOutcome {
    let now = vm.now_micros();
    vm.scheduler.schedule_event(Event::new(EventId(0), now, EventPayload::Rpn { parameter, value }), now);
    BuiltinOutcome::Success
}

/// `set_nrpn(parameter, value)`.
pub fn set_nrpn(vm: &mut Vm, parameter: u16, value: u16) -> BuiltinOutcome {
    let now = vm.now_micros();
    vm.scheduler.schedule_event(Event::new(EventId(0), now, EventPayload::Nrpn { parameter, value }), now);
    BuiltinOutcome::Success
}

/// `message(text)`: non-real-time-critical debug output.
pub fn message(text: &str) -> BuiltinOutcome {
    log::info!("{text}");
    BuiltinOutcome::Success
}

/// `exit()`: aborts the currently executing callback immediately.
pub fn exit(vm: &mut Vm) -> BuiltinOutcome {
    if let Some(current) = vm.current_callback {
        super::callback::abort(&mut vm.scheduler, current);
    }
    BuiltinOutcome::Success
}

/// `array_equal(a, b)`.
pub fn array_equal(a: &[i64], b: &[i64]) -> BuiltinOutcome {
    BuiltinOutcome::Value(Value::int((a == b) as i64))
}

/// `search(array, value)`: index of the first match, or -1.
pub fn search(array: &[i64], value: i64) -> BuiltinOutcome {
    let idx = array.iter().position(|v| *v == value).map(|i| i as i64).unwrap_or(-1);
    BuiltinOutcome::Value(Value::int(idx))
}

/// `sort(array, ascending)`.
pub fn sort(array: &[i64], ascending: bool) -> BuiltinOutcome {
    let mut sorted: SmallVec<[i64; 16]> = array.iter().copied().collect();
    if ascending {
        sorted.sort_unstable();
    } else {
        sorted.sort_unstable_by(|a, b| b.cmp(a));
    }
    BuiltinOutcome::Value(Value::IntArray(sorted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn vm() -> Vm {
        Vm::new(EngineConfig::default())
    }

    #[test]
    fn play_note_schedules_a_note_and_returns_its_id() {
        let mut vm = vm();
        let outcome = play_note(&mut vm, 60, 100, None, None);
        match outcome {
            BuiltinOutcome::Value(Value::Int { value, .. }) => assert!(value >= 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn change_vol_applies_final_norm_and_reports_abs_value() {
        let mut vm = vm();
        let id = match play_note(&mut vm, 60, 100, None, None) {
            BuiltinOutcome::Value(Value::Int { value, .. }) => NoteId(value as u64),
            _ => panic!("expected note id"),
        };
        let outcome = change_vol(&mut vm, id, 0.5, ValueScope::FinalNorm);
        assert_eq!(outcome, BuiltinOutcome::Value(Value::real(0.5)));
    }

    #[test]
    fn change_param_on_missing_note_is_an_error() {
        let mut vm = vm();
        let outcome = change_vol(&mut vm, NoteId(999), 0.5, ValueScope::FinalNorm);
        assert!(matches!(outcome, BuiltinOutcome::Error(_)));
    }

    #[test]
    fn fork_outside_callback_errors() {
        let mut vm = vm();
        assert!(matches!(fork(&mut vm, false), BuiltinOutcome::Error(_)));
    }

    #[test]
    fn fork_inside_callback_returns_child_id() {
        let mut vm = vm();
        vm.enter_handler(None).unwrap();
        let outcome = fork(&mut vm, true);
        assert!(matches!(outcome, BuiltinOutcome::Value(Value::Int { .. })));
    }

    #[test]
    fn search_returns_negative_one_when_absent() {
        assert_eq!(search(&[1, 2, 3], 9), BuiltinOutcome::Value(Value::int(-1)));
        assert_eq!(search(&[1, 2, 3], 2), BuiltinOutcome::Value(Value::int(1)));
    }

    #[test]
    fn sort_orders_ascending_and_descending() {
        let asc = sort(&[3, 1, 2], true);
        assert_eq!(asc, BuiltinOutcome::Value(Value::IntArray(SmallVec::from_slice(&[1, 2, 3]))));
        let desc = sort(&[3, 1, 2], false);
        assert_eq!(desc, BuiltinOutcome::Value(Value::IntArray(SmallVec::from_slice(&[3, 2, 1]))));
    }

    #[test]
    fn by_marks_returns_members_of_the_named_group() {
        let mut vm = vm();
        set_event_mark(&mut vm, NoteId(1), 0);
        set_event_mark(&mut vm, NoteId(1), 1);
        set_event_mark(&mut vm, NoteId(2), 0);

        let outcome = by_marks(&mut vm, 1);
        assert_eq!(outcome, BuiltinOutcome::Value(Value::IntArray(SmallVec::from_slice(&[1]))));

        match by_marks(&mut vm, 0) {
            BuiltinOutcome::Value(Value::IntArray(ids)) => {
                let mut ids = ids.into_vec();
                ids.sort_unstable();
                assert_eq!(ids, vec![1, 2]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
