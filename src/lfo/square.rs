//! Square LFo, integer-math implementation: same wrapping accumulator idea
//! as [`super::saw::Saw`], but `render()` only looks at the accumulator's
//! sign bit, branch-free.

use super::common::LfoBase;
use super::{Lfo, Range, StartLevel};

pub struct Square {
    base: LfoBase,
    slope: u32,
    c: u32,
    denormalizer: f32,
}

impl Square {
    pub fn new(max: f32, range: Range) -> Self {
        Self { base: LfoBase::new(max, range), slope: 0, c: 0, denormalizer: 0.0 }
    }

    fn recompute_denormalizer(&mut self) {
        let max = self.base.max_depth();
        self.denormalizer = if self.base.range == Range::Unsigned { max / 2.0 } else { max };
    }

    fn recompute_step(&mut self, sample_rate: u32) {
        let freq = self.base.effective_frequency();
        let r = freq / sample_rate as f32;
        let int_limit = u32::MAX as f32;
        self.c = (int_limit * r) as i64 as u32;
    }
}

impl Lfo for Square {
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
        self.recompute_step(sample_rate);
        self.recompute_denormalizer();

        let slope_at_max = if self.base.range == Range::Unsigned { u32::MAX / 2 } else { u32::MAX };
        let slope_at_min = if self.base.range == Range::Unsigned { u32::MAX } else { u32::MAX / 2 };

        self.slope = match start_level {
            // Mid doesn't make sense for a square wave; mapped onto Max.
            StartLevel::Mid | StartLevel::Max => if flip_phase { slope_at_min } else { slope_at_max },
            StartLevel::Min => if flip_phase { slope_at_max } else { slope_at_min },
        };
    }

    fn set_phase(&mut self, degrees: f32) {
        let degrees = degrees.clamp(0.0, 360.0);
        let phase = degrees / 360.0;
        let int_limit = u32::MAX as f32;
        let delta = (int_limit * phase) as i64;
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
            self.denormalizer * ((self.slope >> 31) as f32)
        } else {
            let sign = ((self.slope as i32) >> 31) | 1;
            self.denormalizer * sign as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_square_alternates_between_plus_and_minus_max() {
        let mut sq = Square::new(1.0, Range::Signed);
        sq.trigger(10.0, StartLevel::Max, 1200, 0, false, 1000);
        let mut saw_high = false;
        let mut saw_low = false;
        for _ in 0..200 {
            let v = sq.render();
            if v > 0.9 {
                saw_high = true;
            }
            if v < -0.9 {
                saw_low = true;
            }
        }
        assert!(saw_high && saw_low);
    }
}
