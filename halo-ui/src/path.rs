//! Circular stroke paths.
//!
//! A [`CirclePath`] always covers one full turn; its start angle only decides
//! where the stroke head sits when a layer draws a fraction of it.

use std::f32::consts::TAU;

use lyon_geom::{Angle, Arc, point, vector};
use lyon_path::Path;

use crate::geometry::{Point, Rect};

/// Stroke cap used for path ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    /// Flat stroke ends.
    #[default]
    Butt,
    /// Rounded stroke ends.
    Round,
}

/// A closed, clockwise circle that starts at `start_angle`.
#[derive(Debug, Clone)]
pub struct CirclePath {
    arc: Arc<f32>,
}

impl CirclePath {
    /// Builds the circle. Negative radii collapse to a degenerate circle at
    /// `center`.
    pub fn new(center: Point, radius: f32, start_angle: f32) -> Self {
        let radius = radius.max(0.0);
        let arc = Arc {
            center: point(center.x, center.y),
            radii: vector(radius, radius),
            start_angle: Angle::radians(start_angle),
            sweep_angle: Angle::radians(TAU),
            x_rotation: Angle::zero(),
        };

        Self { arc }
    }

    pub fn center(&self) -> Point {
        self.arc.center.into()
    }

    pub fn radius(&self) -> f32 {
        self.arc.radii.x
    }

    /// Angle in radians at which the stroke begins.
    pub fn start_angle(&self) -> f32 {
        self.arc.start_angle.radians
    }

    /// Total sweep in radians; always one full turn.
    pub fn sweep_angle(&self) -> f32 {
        self.arc.sweep_angle.radians
    }

    /// Tight bounds of the geometric circle, ignoring stroke width.
    pub fn bounding_box(&self) -> Rect {
        self.arc.bounding_box().into()
    }

    /// Builds the curve representation handed to tessellators.
    pub fn to_path(&self) -> Path {
        let mut builder = Path::builder();
        builder.begin(self.arc.from());
        self.arc.for_each_quadratic_bezier(&mut |segment| {
            builder.quadratic_bezier_to(segment.ctrl, segment.to);
        });
        builder.end(true);
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use lyon_path::PathEvent;

    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn bounding_box_covers_full_circle() {
        let circle = CirclePath::new(Point::new(50.0, 50.0), 45.0, -PI / 2.0);
        let bounds = circle.bounding_box();
        assert!(approx(bounds.origin.x, 5.0));
        assert!(approx(bounds.origin.y, 5.0));
        assert!(approx(bounds.size.width, 90.0));
        assert!(approx(bounds.size.height, 90.0));
    }

    fn head(circle: &CirclePath) -> Point {
        match circle.to_path().iter().next() {
            Some(PathEvent::Begin { at }) => at.into(),
            other => panic!("path must start with a begin event, got {other:?}"),
        }
    }

    #[test]
    fn start_angle_places_the_head() {
        let top = head(&CirclePath::new(Point::new(50.0, 50.0), 45.0, -PI / 2.0));
        assert!(approx(top.x, 50.0));
        assert!(approx(top.y, 5.0));

        let left = head(&CirclePath::new(Point::new(50.0, 50.0), 45.0, -PI));
        assert!(approx(left.x, 5.0));
        assert!(approx(left.y, 50.0));
    }

    #[test]
    fn negative_radius_is_clamped() {
        let circle = CirclePath::new(Point::new(0.0, 0.0), -3.0, 0.0);
        assert_eq!(circle.radius(), 0.0);
        assert!(circle.bounding_box().is_empty());
    }

    #[test]
    fn path_is_closed_and_non_empty() {
        let circle = CirclePath::new(Point::new(10.0, 10.0), 8.0, 0.0);
        let path = circle.to_path();
        assert!(path.iter().count() > 2);
        assert!(matches!(path.iter().last(), Some(PathEvent::End { close: true, .. })));
        assert!(approx(circle.sweep_angle(), TAU));
    }
}
