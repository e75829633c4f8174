//! Timing curves that map linear animation progress to eased progress.

use crate::error::AnimationError;

/// Pacing of an animation over one pass of its duration.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum TimingFunction {
    /// Constant rate.
    #[default]
    Linear,
    /// Starts slow, then speeds up.
    EaseIn,
    /// Starts fast, then slows down.
    EaseOut,
    /// Slow at both ends.
    EaseInEaseOut,
    /// A cubic bezier running from (0, 0) to (1, 1) through two control
    /// points.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl TimingFunction {
    /// Builds a custom cubic curve.
    ///
    /// The x coordinates must lie in `[0, 1]` so that the curve stays a
    /// function of time. The y coordinates may overshoot.
    pub fn cubic(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, AnimationError> {
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Err(AnimationError::NonFiniteControlPoint);
        }
        for (index, value) in [(1, x1), (2, x2)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnimationError::ControlPointOutOfRange { index, value });
            }
        }
        Ok(Self::CubicBezier { x1, y1, x2, y2 })
    }

    /// The two control points of the equivalent cubic curve.
    pub fn control_points(self) -> [f32; 4] {
        match self {
            Self::Linear => [0.0, 0.0, 1.0, 1.0],
            Self::EaseIn => [0.42, 0.0, 1.0, 1.0],
            Self::EaseOut => [0.0, 0.0, 0.58, 1.0],
            Self::EaseInEaseOut => [0.42, 0.0, 0.58, 1.0],
            Self::CubicBezier { x1, y1, x2, y2 } => [x1, y1, x2, y2],
        }
    }

    /// Maps linear progress in `[0, 1]` to eased progress.
    pub fn transform(self, progress: f32) -> f32 {
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        match self {
            Self::Linear => progress,
            _ => {
                let [x1, y1, x2, y2] = self.control_points();
                cubic_bezier_easing(progress, x1, y1, x2, y2)
            }
        }
    }
}

fn cubic_bezier(t: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    let u = 1.0 - t;
    (u * u * u * a) + (3.0 * u * u * t * b) + (3.0 * u * t * t * c) + (t * t * t * d)
}

fn cubic_bezier_easing(x: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    // x(t) is monotonic for control points in [0, 1], so bisection converges.
    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut t = x;
    for _ in 0..24 {
        t = (lo + hi) * 0.5;
        if cubic_bezier(t, 0.0, x1, x2, 1.0) < x {
            lo = t;
        } else {
            hi = t;
        }
    }

    cubic_bezier(t, 0.0, y1, y2, 1.0)
}
