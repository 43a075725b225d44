//! Saw LFO, integer-math implementation: a wrapping `u32` accumulator
//! advanced by a per-sample step `c`, denormalized to the configured
//! amplitude range. No branches in the hot path.

use super::common::LfoBase;
use super::{Lfo, Range, StartLevel};

pub struct Saw {
    base: LfoBase,
    slope: u32,
    c: u32,
    offset: f32,
    denormalizer: f32,
    flip_phase_factor: f32,
}

impl Saw {
    pub fn new(max: f32, range: Range) -> Self {
        Self {
            base: LfoBase::new(max, range),
            slope: 0,
            c: 0,
            offset: 0.0,
            denormalizer: 0.0,
            flip_phase_factor: 1.0,
        }
    }

    fn recompute_denormalizer(&mut self) {
        let max = self.base.max_depth();
        let int_limit = u32::MAX as f32;
        if self.base.range == Range::Unsigned {
            self.denormalizer = max / int_limit / 2.0;
        } else {
            self.denormalizer = max / int_limit * 2.0;
            self.offset = -max;
        }
    }

    fn recompute_step(&mut self, sample_rate: u32) {
        let freq = self.base.effective_frequency();
        let r = freq / sample_rate as f32;
        let int_limit = u32::MAX as f32;
        self.c = (int_limit * r * self.flip_phase_factor) as i64 as u32;
    }
}

impl Lfo for Saw {
    fn trigger(
        &mut self,
        frequency: f32,
        start_level: StartLevel,
        internal_depth: u16,
        ext_control_depth: u16,
        flip_phase: bool,
        sample_rate: u32,
    ) {
        self.base.frequency = frequency;
        self.base.trigger_depth(internal_depth, ext_control_depth, 1.0);
        self.flip_phase_factor = if flip_phase { -1.0 } else { 1.0 };
        self.recompute_step(sample_rate);
        self.recompute_denormalizer();

        let slope_at_mid = if self.base.range == Range::Unsigned { u32::MAX / 2 } else { u32::MAX };
        let slope_at_min = if self.base.range == Range::Unsigned { u32::MAX } else { u32::MAX / 2 };

        // Saw's min and max are the same phase regardless of flip_phase.
        self.slope = match start_level {
            StartLevel::Mid => slope_at_mid,
            StartLevel::Max | StartLevel::Min => slope_at_min,
        };
    }

    fn set_phase(&mut self, degrees: f32) {
        let degrees = degrees.clamp(0.0, 360.0);
        let phase = degrees / 360.0;
        let int_limit = u32::MAX as f32;
        let delta = (int_limit * phase * self.flip_phase_factor) as i64;
        self.slope = self.slope.wrapping_add(delta as u32);
    }

    fn set_frequency(&mut self, frequency: f32, sample_rate: u32) {
        self.base.frequency = frequency;
        self.recompute_step(sample_rate);
    }

    fn update_by_midi_ctrl_value(&mut self, value: u16) {
        self.base.ext_control_value = value;
        self.recompute_denormalizer();
    }

    fn set_script_depth_factor(&mut self, factor: f32, is_final: bool) {
        self.base.set_script_depth_factor(factor, is_final);
        self.recompute_denormalizer();
    }

    fn set_script_frequency_factor(&mut self, factor: f32, sample_rate: u32) {
        self.base.set_script_frequency_factor(factor);
        self.recompute_step(sample_rate);
    }

    fn set_script_frequency_final(&mut self, hz: f32, sample_rate: u32) {
        self.base.set_script_frequency_final(hz);
        self.recompute_step(sample_rate);
    }

    fn render(&mut self) -> f32 {
        self.slope = self.slope.wrapping_add(self.c);
        if self.base.range == Range::Unsigned {
            self.denormalizer * self.slope as f32
        } else {
            self.denormalizer * (self.slope as i32 as f32 + self.offset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_saw_ramps_from_min_to_max() {
        let mut saw = Saw::new(1.0, Range::Signed);
        saw.trigger(1.0, StartLevel::Min, 1200, 0, false, 100);
        let first = saw.render();
        let mut last = first;
        for _ in 0..98 {
            last = saw.render();
        }
        assert!(last > first, "saw should ramp upward: {first} -> {last}");
    }

    #[test]
    fn unsigned_saw_stays_nonnegative() {
        let mut saw = Saw::new(1.0, Range::Unsigned);
        saw.trigger(1.0, StartLevel::Min, 1200, 0, false, 100);
        for _ in 0..200 {
            assert!(saw.render() >= -1e-4);
        }
    }
}
