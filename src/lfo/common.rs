//! Shared bookkeeping every LFO kernel carries, mirroring the reference
//! implementation's `LFOBase` POD plus its `pFinalDepth`/`pFinalFrequency`
//! "final source" pointers (represented here as plain flags since Rust has
//! no pointer-to-member equivalent worth reaching for).

use super::Range;

#[derive(Debug, Clone, Copy)]
pub(super) struct LfoBase {
    pub max: f32,
    pub range: Range,
    pub internal_depth: f32,
    pub ext_control_depth_coeff: f32,
    pub ext_control_value: u16,
    pub frequency: f32,
    pub script_depth_factor: f32,
    pub script_frequency_factor: f32,
    /// `true` once a script has claimed depth as a final, sole source.
    pub final_depth: bool,
    /// `true` once a script has claimed frequency as a final, sole source.
    pub final_frequency: bool,
}

impl LfoBase {
    pub fn new(max: f32, range: Range) -> Self {
        Self {
            max,
            range,
            internal_depth: 0.0,
            ext_control_depth_coeff: 0.0,
            ext_control_value: 0,
            frequency: 20.0,
            script_depth_factor: 1.0,
            script_frequency_factor: 1.0,
            final_depth: false,
            final_frequency: false,
        }
    }

    /// Common half of `trigger()`: depth coefficients and the two
    /// script-factor resets, shared by every kernel regardless of its
    /// render algorithm.
    pub fn trigger_depth(&mut self, internal_depth: u16, ext_control_depth: u16, harmonic_compensation: f32) {
        self.script_frequency_factor = 1.0;
        self.script_depth_factor = 1.0;
        self.final_depth = false;
        self.final_frequency = false;
        self.internal_depth = (internal_depth as f32 / 1200.0) * self.max / harmonic_compensation;
        self.ext_control_depth_coeff =
            ((ext_control_depth as f32 / 1200.0) / 127.0) * self.max / harmonic_compensation;
        if self.range == Range::Unsigned {
            self.internal_depth *= 2.0;
            self.ext_control_depth_coeff *= 2.0;
        }
    }

    pub fn max_depth(&self) -> f32 {
        (self.internal_depth + self.ext_control_value as f32 * self.ext_control_depth_coeff)
            * self.script_depth_factor
    }

    /// `setScriptDepthFactor`'s final-source bookkeeping, common to every
    /// kernel: claims or releases sole ownership of depth, then asks the
    /// caller to recompute its denormalizer via `recompute`.
    pub fn set_script_depth_factor(&mut self, factor: f32, is_final: bool) {
        self.script_depth_factor = factor;
        if is_final && !self.final_depth {
            self.final_depth = true;
        } else if !is_final && self.final_depth {
            self.final_depth = false;
        }
    }

    /// `setScriptFrequencyFactor`'s final-source bookkeeping.
    pub fn set_script_frequency_factor(&mut self, factor: f32) {
        self.script_frequency_factor = factor;
        self.final_frequency = false;
    }

    /// `setScriptFrequencyFinal`'s final-source bookkeeping.
    pub fn set_script_frequency_final(&mut self, hz: f32) {
        self.script_frequency_factor = hz;
        self.final_frequency = true;
    }

    pub fn effective_frequency(&self) -> f32 {
        self.frequency * self.script_frequency_factor
    }
}
