//! End-to-end scenario tests exercising the scripting VM's note/event/
//! scheduler contract across a handful of realistic script call
//! sequences, rather than one builtin at a time.

use sampler_rt_vm::{
    builtins, callback, BuiltinOutcome, CallbackStatus, EngineConfig, EventPayload, NoteId,
    NoteParamField, Value, ValueScope, Vm,
};

fn new_vm() -> Vm {
    Vm::new(EngineConfig::default())
}

fn note_id_from(outcome: BuiltinOutcome) -> NoteId {
    match outcome {
        BuiltinOutcome::Value(Value::Int { value, .. }) => NoteId(value as u64),
        other => panic!("expected a note id, got {other:?}"),
    }
}

/// Scenario 1: `play_note(60, 100, 0, 500_000)` at t=0 creates a note with
/// key 60, and a stop-note event is observed at t=500ms.
#[test]
fn play_note_then_scheduled_stop_note() {
    let mut vm = new_vm();
    vm.enter_handler(None).unwrap();

    let id = note_id_from(builtins::play_note(&mut vm, 60, 100, None, Some(500_000)));
    assert!(id.0 > 0);
    assert_eq!(vm.scheduler.note_by_id(id).unwrap().host_key, 60);

    assert!(vm.scheduler.drain_due_events(499_999).is_empty());
    let due = vm.scheduler.drain_due_events(500_000);
    assert_eq!(due.len(), 1);
    let off = vm.scheduler.event_by_id(due[0]).unwrap();
    assert!(matches!(off.payload, EventPayload::NoteOff { key: 60, .. }));
}

/// Scenario 2: `change_vol(id, -6000)` applied in the same slice a note
/// was triggered in composes immediately, `apply-now`.
#[test]
fn change_vol_apply_now_in_trigger_slice() {
    let mut vm = new_vm();
    vm.enter_handler(None).unwrap();
    let id = note_id_from(builtins::play_note(&mut vm, 60, 100, None, None));

    // -6dB expressed directly as the normalized linear gain a script's
    // `db -> linear` conversion would already have produced.
    let outcome = builtins::change_vol(&mut vm, id, 0.5012, ValueScope::FinalNorm);
    assert_eq!(outcome, BuiltinOutcome::Value(Value::real(0.5012)));

    let note = vm.scheduler.note_by_id(id).unwrap();
    assert!((note.overrides.volume.value - 0.5012).abs() < 1e-4);
    assert!(note.overrides.volume.is_final);
}

/// Scenario 3: `change_cutoff(id, 1000 Hz)` composes as `FinalNative`,
/// leaving the value in its native unit rather than normalized.
#[test]
fn change_cutoff_with_native_hertz_scope() {
    let mut vm = new_vm();
    vm.enter_handler(None).unwrap();
    let id = note_id_from(builtins::play_note(&mut vm, 60, 100, None, None));

    builtins::change_cutoff(&mut vm, id, 1000.0, ValueScope::FinalNative);
    let note = vm.scheduler.note_by_id(id).unwrap();
    assert_eq!(note.overrides.cutoff.value, 1000.0);
    assert_eq!(note.overrides.cutoff.scope, sampler_rt_vm::ParamScope::FinalNative);
}

/// Scenario 4: `fork(3, 1)` — parent sees its own id unaffected, three
/// children are created, and aborting the parent cascades to all three
/// since they were forked with `auto_abort = true`.
#[test]
fn fork_three_children_with_auto_abort_cascade() {
    let mut vm = new_vm();
    let parent = vm.enter_handler(None).unwrap();

    let mut children = Vec::new();
    for _ in 0..3 {
        match builtins::fork(&mut vm, true) {
            BuiltinOutcome::Value(Value::Int { value, .. }) => children.push(value),
            other => panic!("fork failed: {other:?}"),
        }
    }
    assert_eq!(children.len(), 3);
    assert_eq!(vm.scheduler.callback_by_id(parent).unwrap().children.len(), 3);

    let removed = callback::abort(&mut vm.scheduler, parent);
    assert_eq!(removed.len(), 4); // parent + 3 auto_abort children
    assert_eq!(callback::callback_status(&vm.scheduler, parent), CallbackStatus::TerminatedByAbort);
}

/// Scenario 5: event marks set/query/delete round-trip through `by_marks`.
#[test]
fn event_marks_set_query_delete() {
    let mut vm = new_vm();
    vm.enter_handler(None).unwrap();
    let id = note_id_from(builtins::play_note(&mut vm, 60, 100, None, None));

    builtins::set_event_mark(&mut vm, id, 2);
    let found = builtins::by_marks(&mut vm, 2);
    assert_eq!(found, BuiltinOutcome::Value(Value::IntArray(smallvec::smallvec![id.0 as i64])));

    builtins::delete_event_mark(&mut vm, id, 2);
    let found = builtins::by_marks(&mut vm, 2);
    assert_eq!(found, BuiltinOutcome::Value(Value::IntArray(smallvec::smallvec![])));
}

/// Scenario 6: `change_pan(id, 500)` on a note no longer in its trigger
/// slice defers instead of mutating directly — it schedules a `NoteParam`
/// event at "now", leaving the note's stored pan override untouched until
/// that event is actually drained.
#[test]
fn change_pan_outside_trigger_slice_schedules_a_deferred_event() {
    let mut vm = new_vm();
    vm.enter_handler(None).unwrap();
    let id = note_id_from(builtins::play_note(&mut vm, 60, 100, None, None));

    // Advance "now" so the note is no longer in its trigger slice.
    vm.frame_time = vm.config.sample_rate as u64;
    let now = vm.now_micros();
    assert_ne!(now, vm.scheduler.note_by_id(id).unwrap().trigger_sched_time);

    let outcome = builtins::change_pan(&mut vm, id, 0.5, ValueScope::Relative);
    assert_eq!(outcome, BuiltinOutcome::Success);

    // Pan override itself is untouched until the deferred event is drained.
    assert_eq!(vm.scheduler.note_by_id(id).unwrap().overrides.pan.value, 0.0);

    assert!(vm.scheduler.drain_due_events(now - 1).is_empty());
    let due = vm.scheduler.drain_due_events(now);
    assert_eq!(due.len(), 1);
    let event = vm.scheduler.event_by_id(due[0]).unwrap();
    assert!(matches!(
        event.payload,
        EventPayload::NoteParam { note, field: NoteParamField::Pan, .. } if note == id
    ));
}

/// `wait(1_000_000)` parks the current callback without changing its
/// reported status to anything but `Running` (suspension tracking lives
/// on the resume queue, not on the callback entry itself, until the VM's
/// execution loop actually parks it there).
#[test]
fn wait_schedules_a_resume_without_erroring() {
    let mut vm = new_vm();
    let callback_id = vm.enter_handler(None).unwrap();
    vm.frame_time = vm.config.sample_rate as u64;

    let outcome = builtins::wait(&mut vm, 1_000_000, false);
    assert_eq!(outcome, BuiltinOutcome::Success);
    assert_eq!(callback::callback_status(&vm.scheduler, callback_id), CallbackStatus::Running);

    let now = vm.now_micros();
    assert!(vm.scheduler.drain_due_resumes(now + 999_999).is_empty());
    assert_eq!(vm.scheduler.drain_due_resumes(now + 1_000_000), vec![callback_id]);
}

/// `%ALL_EVENTS` idempotence: two reads within one step yield identical
/// contents without re-scanning unless invalidated.
#[test]
fn all_events_is_idempotent_within_one_step() {
    let mut vm = new_vm();
    vm.enter_handler(None).unwrap();
    builtins::play_note(&mut vm, 60, 100, None, None);
    vm.invalidate_all_events();

    let first = vm.all_events().to_vec();
    let second = vm.all_events().to_vec();
    assert_eq!(first, second);
}
