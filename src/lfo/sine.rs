//! Sine LFO, numeric-complex-number implementation: each sample rotates a
//! unit(-ish) complex number by a small fixed angle instead of calling
//! `sin`/`cos` per sample.

use std::f64::consts::PI;

use super::common::LfoBase;
use super::{Lfo, Range, StartLevel};

pub struct Sine {
    base: LfoBase,
    c: f32,
    real: f32,
    imag: f32,
    normalizer: f32,
    offset: f32,
    start_phase: f64,
}

impl Sine {
    pub fn new(max: f32, range: Range) -> Self {
        Self {
            base: LfoBase::new(max, range),
            c: 0.0,
            real: 1.0,
            imag: 0.0,
            normalizer: 0.0,
            offset: 0.0,
            start_phase: 0.0,
        }
    }

    fn recompute_normalizer(&mut self) {
        let max = self.base.max_depth();
        if self.base.range == Range::Unsigned {
            self.normalizer = max * 0.5;
            self.offset = self.normalizer;
        } else {
            self.normalizer = max;
        }
    }

    fn recompute_step(&mut self, sample_rate: u32) {
        let freq = self.base.effective_frequency();
        self.c = 2.0 * std::f32::consts::PI * freq / sample_rate as f32;
    }
}

impl Lfo for Sine {
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

        self.start_phase = match start_level {
            StartLevel::Mid => if flip_phase { 0.5 * PI } else { 1.5 * PI },
            StartLevel::Max => if flip_phase { PI } else { 0.0 },
            StartLevel::Min => if flip_phase { 0.0 } else { PI },
        };
        self.real = self.start_phase.cos() as f32;
        self.imag = self.start_phase.sin() as f32;

        self.recompute_normalizer();
    }

    fn set_phase(&mut self, degrees: f32) {
        let degrees = degrees.clamp(0.0, 360.0);
        let phase = (degrees / 360.0) as f64 * 2.0 * PI;
        self.real = (self.start_phase + phase).cos() as f32;
        self.imag = (self.start_phase + phase).sin() as f32;
    }

    fn set_frequency(&mut self, frequency: f32, sample_rate: u32) {
        self.base.frequency = frequency;
        self.recompute_step(sample_rate);
    }

    fn update_by_midi_ctrl_value(&mut self, value: u16) {
        self.base.ext_control_value = value;
        self.recompute_normalizer();
    }

    fn set_script_depth_factor(&mut self, factor: f32, is_final: bool) {
        self.base.set_script_depth_factor(factor, is_final);
        self.recompute_normalizer();
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
        self.real -= self.c * self.imag;
        self.imag += self.c * self.real;
        if self.base.range == Range::Unsigned {
            self.real * self.normalizer + self.offset
        } else {
            self.real * self.normalizer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_sine_starting_at_max_begins_near_its_peak() {
        let mut sine = Sine::new(1.0, Range::Signed);
        sine.trigger(5.0, StartLevel::Max, 1200, 0, false, 48_000);
        let first = sine.render();
        assert!(first > 0.95, "expected near-peak start, got {first}");
    }

    #[test]
    fn unsigned_sine_stays_within_0_and_2max() {
        let mut sine = Sine::new(1.0, Range::Unsigned);
        sine.trigger(5.0, StartLevel::Min, 1200, 0, false, 48_000);
        for _ in 0..500 {
            let v = sine.render();
            assert!((-1e-3..=2.0 + 1e-3).contains(&v), "out of range: {v}");
        }
    }
}
