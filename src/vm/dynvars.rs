//! Script dynamic variables: non-assignable names resolved live against
//! engine/scheduler state, as opposed to user-declared `$foo`/`%foo`
//! variables (`ENGINE_UPTIME`, `NI_CALLBACK_ID`, `NKSP_CALLBACK_CHILD_ID`,
//! `ALL_EVENTS`).

use smallvec::SmallVec;

use crate::note::NoteId;
use crate::scheduler::{CallbackId, Scheduler};

/// `$ENGINE_UPTIME`: milliseconds of engine playtime elapsed so far,
/// monotonic across offline bounces (frame time plus the current event's
/// in-buffer offset, scaled by sample rate).
pub fn engine_uptime_ms(frame_time_frames: u64, fragment_position: u32, sample_rate: u32) -> i64 {
    let frames = frame_time_frames + fragment_position as u64;
    ((frames * 1000) / sample_rate as u64) as i64
}

/// `$NI_CALLBACK_ID`: the id of the callback currently executing.
pub fn ni_callback_id(current: CallbackId) -> i64 {
    current.0 as i64
}

/// `%NKSP_CALLBACK_CHILD_ID[i]`: ids of `current`'s forked children, in
/// fork order.
pub fn callback_child_ids(scheduler: &Scheduler, current: CallbackId) -> SmallVec<[i64; 8]> {
    scheduler
        .callback_by_id(current)
        .map(|entry| entry.children.iter().map(|c| c.0 as i64).collect())
        .unwrap_or_default()
}

/// `%ALL_EVENTS[i]`: lazily refreshed live-note id snapshot, copying at
/// most `max_notes` ids into a preallocated buffer (never reallocates on
/// the audio thread).
pub fn update_note_ids(scheduler: &Scheduler, buffer: &mut [NoteId]) -> usize {
    scheduler.all_note_ids(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_uptime_converts_frames_to_milliseconds() {
        assert_eq!(engine_uptime_ms(44_100, 0, 44_100), 1000);
    }

    #[test]
    fn engine_uptime_includes_fragment_offset() {
        assert_eq!(engine_uptime_ms(0, 22_050, 44_100), 500);
    }

    #[test]
    fn ni_callback_id_passes_through_raw_id() {
        assert_eq!(ni_callback_id(CallbackId(42)), 42);
    }
}
