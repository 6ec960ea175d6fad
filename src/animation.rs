//! Time-driven joint angles.
//!
//! Every animated quantity is `amplitude * sin(t * frequency + phase)`, a pure
//! function of the elapsed time. Nothing is integrated frame to frame, so a
//! given `(elapsed, enabled)` pair always produces the same pose and any
//! moment of the animation can be replayed.
//!
//! | Signal     | Amplitude | Frequency |
//! |------------|-----------|-----------|
//! | body sway  | 3°        | 1.5       |
//! | tail wag   | 35°       | 6         |
//! | leg swing  | 20°       | 3         |
//! | ear flop   | 10°       | 2         |
//! | hover      | 0.08      | 1.5       |
//! | breathe    | 5°        | 1.2       |
//! | head tilt  | 5°        | 0.8       |
//! | head nod   | 15°       | 1         |

use serde::Deserialize;

/// One periodic signal.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Signal {
    pub amplitude: f32,
    /// Angular frequency in radians per second.
    pub frequency: f32,
    /// Phase offset in radians.
    #[serde(default)]
    pub phase: f32,
}

impl Signal {
    pub const fn new(amplitude: f32, frequency: f32) -> Self {
        Self {
            amplitude,
            frequency,
            phase: 0.0,
        }
    }

    pub const fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    /// Value at `seconds`. Evaluated in `f64` so long sessions keep their precision.
    pub fn value(&self, seconds: f64) -> f32 {
        let angle = seconds * f64::from(self.frequency) + f64::from(self.phase);
        self.amplitude * angle.sin() as f32
    }
}

/// Amplitude and frequency for every animated quantity.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationParams {
    pub body_sway: Signal,
    pub tail_wag: Signal,
    pub leg_swing: Signal,
    pub ear_flop: Signal,
    pub hover: Signal,
    pub breathe: Signal,
    pub head_tilt: Signal,
    pub head_nod: Signal,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            body_sway: Signal::new(3.0, 1.5),
            tail_wag: Signal::new(35.0, 6.0),
            leg_swing: Signal::new(20.0, 3.0),
            ear_flop: Signal::new(10.0, 2.0),
            hover: Signal::new(0.08, 1.5),
            breathe: Signal::new(5.0, 1.2),
            head_tilt: Signal::new(5.0, 0.8),
            head_nod: Signal::new(15.0, 1.0),
        }
    }
}

/// Joint angles (degrees) and offsets (world units) for one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationState {
    pub body_sway: f32,
    pub tail_wag: f32,
    pub leg_swing: f32,
    pub ear_flop: f32,
    pub hover: f32,
    pub breathe: f32,
    pub head_tilt: f32,
    pub head_nod: f32,
}

impl AnimationState {
    /// Every angle and offset at zero.
    pub fn rest() -> Self {
        Self::default()
    }
}

/// Maps elapsed time to an [`AnimationState`].
#[derive(Clone, Debug, Default)]
pub struct AnimationClock {
    params: AnimationParams,
}

impl AnimationClock {
    pub fn new(params: AnimationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AnimationParams {
        &self.params
    }

    /// Samples every signal at `elapsed` seconds.
    ///
    /// With `enabled == false` the clock is frozen at t = 0, so the pose does
    /// not depend on `elapsed`. The caller's elapsed time keeps running, and
    /// re-enabling resumes at the current wall-clock position.
    pub fn sample(&self, elapsed: f64, enabled: bool) -> AnimationState {
        let t = if enabled { elapsed } else { 0.0 };
        let p = &self.params;
        AnimationState {
            body_sway: p.body_sway.value(t),
            tail_wag: p.tail_wag.value(t),
            leg_swing: p.leg_swing.value(t),
            ear_flop: p.ear_flop.value(t),
            hover: p.hover.value(t),
            breathe: p.breathe.value(t),
            head_tilt: p.head_tilt.value(t),
            head_nod: p.head_nod.value(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn as_array(s: &AnimationState) -> [f32; 8] {
        [
            s.body_sway,
            s.tail_wag,
            s.leg_swing,
            s.ear_flop,
            s.hover,
            s.breathe,
            s.head_tilt,
            s.head_nod,
        ]
    }

    #[test]
    fn sampling_is_idempotent() {
        let clock = AnimationClock::default();
        for t in [0.0, 0.016, 1.234, 98765.4321] {
            let a = clock.sample(t, true);
            let b = clock.sample(t, true);
            let bits_a = as_array(&a).map(f32::to_bits);
            let bits_b = as_array(&b).map(f32::to_bits);
            assert_eq!(bits_a, bits_b);
        }
    }

    #[test]
    fn every_signal_is_zero_at_time_zero() {
        let clock = AnimationClock::new(AnimationParams {
            body_sway: Signal::new(1234.0, 99.0),
            tail_wag: Signal::new(-7.0, 0.001),
            hover: Signal::new(5.0, -3.0),
            ..AnimationParams::default()
        });
        assert_eq!(clock.sample(0.0, true), AnimationState::rest());
    }

    #[test]
    fn disabled_clock_ignores_elapsed_time() {
        let clock = AnimationClock::default();
        let frozen = clock.sample(0.0, false);
        for t in [0.1, 1.0, 7.77, 1e6] {
            assert_eq!(clock.sample(t, false), frozen);
        }
    }

    #[test]
    fn disabled_clock_holds_phase_offsets() {
        let clock = AnimationClock::new(AnimationParams {
            ear_flop: Signal::new(10.0, 2.0).with_phase(std::f32::consts::FRAC_PI_2),
            ..AnimationParams::default()
        });
        let state = clock.sample(42.0, false);
        assert!((state.ear_flop - 10.0).abs() < 1e-5);
    }

    #[test]
    fn tail_wag_peaks_at_a_twelfth_of_pi() {
        let clock = AnimationClock::default();
        let state = clock.sample(PI / 12.0, true);
        assert!((state.tail_wag - 35.0).abs() < 1e-4);
    }

    #[test]
    fn signals_follow_their_own_frequency() {
        let clock = AnimationClock::default();
        // sin(3 * pi/6) = 1, so leg swing peaks while head tilt is small.
        let state = clock.sample(PI / 6.0, true);
        assert!((state.leg_swing - 20.0).abs() < 1e-4);
        let expected_tilt = 5.0 * (0.8 * PI / 6.0).sin() as f32;
        assert!((state.head_tilt - expected_tilt).abs() < 1e-5);
    }
}
