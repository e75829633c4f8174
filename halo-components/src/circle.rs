//! Circle path drawing shared by the indicators.
//!
//! ## Usage
//!
//! Build a [`PathConfiguration`] from the widget's current properties on every
//! draw pass and hand it to [`draw_circle`] together with the layer to style.

use halo_ui::{CirclePath, Color, KeyPath, LineCap, Rect, ShapeLayer};

/// How much of the circle a freshly drawn layer shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackType {
    /// Starts empty; a progress animation fills it in.
    Progress,
    /// Always the full circle.
    Track,
    /// A fixed fraction of the circle.
    Custom(f32),
}

impl TrackType {
    /// Initial stroke-end fraction.
    pub fn stroke_end(self) -> f32 {
        match self {
            Self::Progress => 0.0,
            Self::Track => 1.0,
            Self::Custom(fraction) => fraction,
        }
    }
}

/// Which end of a stroked arc an animation moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeEndpoint {
    Start,
    End,
}

impl StrokeEndpoint {
    pub const fn key_path(self) -> KeyPath {
        match self {
            Self::Start => KeyPath::StrokeStart,
            Self::End => KeyPath::StrokeEnd,
        }
    }

    /// Key used when attaching animations for this endpoint.
    pub const fn key(self) -> &'static str {
        self.key_path().as_str()
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Styling for one circular stroke, derived from widget properties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathConfiguration {
    pub color: Color,
    pub line_width: f32,
    /// Where the stroke begins, in radians clockwise from 3 o'clock.
    pub start_angle: f32,
    pub track_type: TrackType,
}

/// Radius that keeps a stroke of `line_width` fully inside `rect`.
pub fn circle_radius(rect: Rect, line_width: f32) -> f32 {
    (rect.min_side() / 2.0 - line_width / 2.0).max(0.0)
}

/// Strokes a circle centered in `rect` onto `layer`.
pub fn draw_circle(layer: &mut ShapeLayer, rect: Rect, configuration: &PathConfiguration) {
    let radius = circle_radius(rect, configuration.line_width);
    layer.path = Some(CirclePath::new(
        rect.center(),
        radius,
        configuration.start_angle,
    ));
    layer.fill_color = Color::TRANSPARENT;
    layer.stroke_color = configuration.color;
    layer.line_width = configuration.line_width;
    layer.line_cap = LineCap::Round;
    layer.stroke_end = configuration.track_type.stroke_end();
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use halo_ui::Point;

    use super::*;

    fn configuration(track_type: TrackType) -> PathConfiguration {
        PathConfiguration {
            color: Color::DARK_GRAY,
            line_width: 10.0,
            start_angle: -PI / 2.0,
            track_type,
        }
    }

    #[test]
    fn stroke_fits_inside_rect() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(circle_radius(rect, 10.0), 45.0);

        let mut layer = ShapeLayer::new();
        draw_circle(&mut layer, rect, &configuration(TrackType::Track));
        let path = layer.path.as_ref().unwrap();
        assert_eq!(path.radius(), 45.0);
        assert_eq!(path.center(), Point::new(50.0, 50.0));
    }

    #[test]
    fn shorter_side_bounds_the_radius() {
        let rect = Rect::new(0.0, 0.0, 200.0, 60.0);
        assert_eq!(circle_radius(rect, 4.0), 28.0);
    }

    #[test]
    fn degenerate_rect_clamps_radius() {
        assert_eq!(circle_radius(Rect::ZERO, 10.0), 0.0);
        let mut layer = ShapeLayer::new();
        draw_circle(&mut layer, Rect::ZERO, &configuration(TrackType::Track));
        assert_eq!(layer.path.as_ref().unwrap().radius(), 0.0);
    }

    #[test]
    fn styling_is_applied() {
        let mut layer = ShapeLayer::new();
        draw_circle(
            &mut layer,
            Rect::new(0.0, 0.0, 50.0, 50.0),
            &configuration(TrackType::Custom(0.2)),
        );
        assert_eq!(layer.fill_color, Color::TRANSPARENT);
        assert_eq!(layer.stroke_color, Color::DARK_GRAY);
        assert_eq!(layer.line_width, 10.0);
        assert_eq!(layer.line_cap, LineCap::Round);
        assert_eq!(layer.stroke_end, 0.2);
    }

    #[test]
    fn completion_policies() {
        assert_eq!(TrackType::Progress.stroke_end(), 0.0);
        assert_eq!(TrackType::Track.stroke_end(), 1.0);
        assert_eq!(TrackType::Custom(0.35).stroke_end(), 0.35);
    }

    #[test]
    fn endpoints_alternate() {
        assert_eq!(StrokeEndpoint::Start.opposite(), StrokeEndpoint::End);
        assert_eq!(StrokeEndpoint::End.opposite(), StrokeEndpoint::Start);
        assert_eq!(StrokeEndpoint::Start.key(), "strokeStart");
        assert_eq!(StrokeEndpoint::End.key(), "strokeEnd");
    }
}
