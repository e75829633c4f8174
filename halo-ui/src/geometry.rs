//! Points, sizes and rectangles in layout points.
//!
//! Coordinates grow to the right and downwards, so positive angles sweep
//! clockwise on screen.

use lyon_path::math;

/// A position in layout points.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the point moved by `dx`, `dy`.
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<math::Point> for Point {
    fn from(point: math::Point) -> Self {
        Self::new(point.x, point.y)
    }
}

impl From<Point> for math::Point {
    fn from(point: Point) -> Self {
        math::point(point.x, point.y)
    }
}

/// A width/height pair in layout points.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// A rectangle anchored at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self {
            origin: Point::ZERO,
            size,
        }
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Length of the shorter side.
    pub fn min_side(&self) -> f32 {
        self.size.width.min(self.size.height)
    }

    pub fn is_empty(&self) -> bool {
        self.size.width <= 0.0 || self.size.height <= 0.0
    }
}

impl From<math::Box2D> for Rect {
    fn from(bounds: math::Box2D) -> Self {
        Self::new(bounds.min.x, bounds.min.y, bounds.width(), bounds.height())
    }
}

impl From<Rect> for math::Box2D {
    fn from(rect: Rect) -> Self {
        math::Box2D::new(
            math::point(rect.origin.x, rect.origin.y),
            math::point(rect.max_x(), rect.max_y()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_center_and_extents() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.center(), Point::new(60.0, 45.0));
        assert_eq!(rect.max_x(), 110.0);
        assert_eq!(rect.max_y(), 70.0);
        assert_eq!(rect.min_side(), 50.0);
    }

    #[test]
    fn empty_rects() {
        assert!(Rect::ZERO.is_empty());
        assert!(Rect::new(0.0, 0.0, 10.0, 0.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn box_conversion_keeps_extents() {
        let rect = Rect::new(5.0, 5.0, 90.0, 90.0);
        let bounds: math::Box2D = rect.into();
        assert_eq!(Rect::from(bounds), rect);
    }
}
