//! Engine configuration injected once at construction time.
//!
//! None of these values change once the audio thread starts rendering;
//! they are read freely from any thread without synchronization.

/// Numeric limits and timing constants the scripting core needs from the
/// host engine. Analogous to `ActivateEngineSettings` in a DAW-graph host,
/// but scoped to what the script VM and scheduler actually consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: u32,
    /// Upper bound on simultaneously alive notes (`GLOBAL_MAX_NOTES`).
    pub max_notes: usize,
    /// Upper bound on voices any single note may own.
    pub max_voices_per_note: usize,
    /// Upper bound on script callbacks (handlers + forked children) live at
    /// once, per engine channel.
    pub max_script_callbacks: usize,
    /// Upper bound on children a single `fork()` call may spawn.
    pub max_forks_per_handler: usize,
    /// Number of event-mark groups available to `set_event_mark`/`by_marks`.
    pub max_event_groups: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            max_notes: 1024,
            max_voices_per_note: 32,
            max_script_callbacks: 256,
            max_forks_per_handler: 32,
            max_event_groups: 32,
        }
    }
}
