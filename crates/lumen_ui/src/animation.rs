//! Per-state color transitions.
//!
//! The only animation the toolkit carries: a widget switching state
//! (hover, press, disable) blends from its current color to the new
//! state's color over a short duration.

use crate::style::Color;

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Exponential ease-out: snaps most of the way early.
    #[default]
    ExponentialOut,
    /// Exponential ease-in (accelerating).
    ExponentialIn,
    /// Exponential ease-in-out.
    ExponentialInOut,
    /// Jump straight to the target.
    Instant,
}

impl Easing {
    /// Applies the easing function to a t value (0-1).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };

        match self {
            Self::Linear => t,
            Self::ExponentialOut => {
                // 1 - 2^(-10t)
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            Self::ExponentialIn => {
                if t <= 0.0 {
                    0.0
                } else {
                    2.0_f32.powf(10.0 * (t - 1.0))
                }
            }
            Self::ExponentialInOut => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0_f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::Instant => 1.0,
        }
    }
}

/// A color blending toward a target.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTransition {
    start: Color,
    current: Color,
    target: Color,
    /// Progress in 0..=1.
    progress: f32,
    /// Seconds; 0 snaps.
    duration: f32,
    easing: Easing,
}

impl ColorTransition {
    /// Default transition duration in seconds.
    pub const DEFAULT_DURATION: f32 = 0.12;

    /// Creates a settled transition at `color`.
    #[must_use]
    pub fn new(color: Color) -> Self {
        Self {
            start: color,
            current: color,
            target: color,
            progress: 1.0,
            duration: Self::DEFAULT_DURATION,
            easing: Easing::default(),
        }
    }

    /// Builder: sets the duration. Negative or non-finite becomes 0.
    #[must_use]
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self
    }

    /// Builder: sets the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Current blended color.
    #[must_use]
    pub fn value(&self) -> Color {
        self.current
    }

    /// Color being approached.
    #[must_use]
    pub fn target(&self) -> Color {
        self.target
    }

    /// Returns true once the target is reached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Starts blending from the current color toward `target`.
    pub fn set_target(&mut self, target: Color) {
        if target == self.target {
            return;
        }
        self.start = self.current;
        self.target = target;
        if self.duration <= 0.0 || self.easing == Easing::Instant {
            self.snap(target);
        } else {
            self.progress = 0.0;
        }
    }

    /// Jumps to `color` without blending.
    pub fn snap(&mut self, color: Color) {
        self.start = color;
        self.current = color;
        self.target = color;
        self.progress = 1.0;
    }

    /// Advances by `dt` seconds. Returns true if the color changed.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.is_complete() {
            return false;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.progress = (self.progress + dt / self.duration).min(1.0);

        let before = self.current;
        self.current = if self.is_complete() {
            self.target
        } else {
            self.start.lerp(self.target, self.easing.apply(self.progress))
        };
        before != self.current
    }
}

impl Default for ColorTransition {
    fn default() -> Self {
        Self::new(Color::TRANSPARENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_out_is_sharp() {
        let value = Easing::ExponentialOut.apply(0.3);
        assert!(value > 0.8, "exponential out should snap quickly: {value}");
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::ExponentialOut,
            Easing::ExponentialIn,
            Easing::ExponentialInOut,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-3, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn test_transition_reaches_target() {
        let mut t = ColorTransition::new(Color::BLACK);
        t.set_target(Color::WHITE);
        assert!(!t.is_complete());

        for _ in 0..20 {
            t.update(0.016);
        }

        assert!(t.is_complete());
        assert_eq!(t.value(), Color::WHITE);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut t = ColorTransition::new(Color::BLACK).with_duration(0.0);
        t.set_target(Color::RED);
        assert_eq!(t.value(), Color::RED);
        assert!(!t.update(0.016));
    }

    #[test]
    fn test_retarget_starts_from_current() {
        let mut t = ColorTransition::new(Color::BLACK).with_easing(Easing::Linear).with_duration(1.0);
        t.set_target(Color::WHITE);
        t.update(0.5);
        let mid = t.value();
        t.set_target(Color::BLACK);
        t.update(0.0);
        assert_eq!(t.value(), mid);
    }
}
