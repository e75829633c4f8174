//! Per-frame draw output for stroked circular arcs.

use crate::{color::Color, geometry::Point, path::LineCap};

/// Draw command for a circular arc stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCommand {
    /// Arc center in view coordinates.
    pub center: Point,
    /// Radius measured to the middle of the stroke.
    pub radius: f32,
    /// Stroke color.
    pub color: Color,
    /// Stroke width in layout points.
    pub stroke_width: f32,
    /// Start angle in degrees, where 0° is at 3 o'clock.
    pub start_angle_degrees: f32,
    /// Sweep angle in degrees, in the clockwise direction.
    pub sweep_angle_degrees: f32,
    /// Stroke cap applied to arc ends.
    pub cap: LineCap,
}

impl ArcCommand {
    /// Multiplies the stroke alpha by `opacity`.
    pub fn apply_opacity(&mut self, opacity: f32) {
        self.color = self
            .color
            .with_alpha(self.color.a * opacity.clamp(0.0, 1.0));
    }

    /// Whether the arc closes on itself.
    pub fn is_full_circle(&self) -> bool {
        self.sweep_angle_degrees >= 360.0 - f32::EPSILON * 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_scales_alpha() {
        let mut command = ArcCommand {
            center: Point::ZERO,
            radius: 10.0,
            color: Color::new(1.0, 0.0, 0.0, 0.8),
            stroke_width: 2.0,
            start_angle_degrees: 0.0,
            sweep_angle_degrees: 90.0,
            cap: LineCap::Round,
        };
        command.apply_opacity(0.5);
        assert!((command.color.a - 0.4).abs() < 1e-6);
        command.apply_opacity(7.0);
        assert!((command.color.a - 0.4).abs() < 1e-6);
        assert!(!command.is_full_circle());
    }
}
