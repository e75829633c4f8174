//! Circular indeterminate activity indicator.
//!
//! ## Usage
//!
//! Show that work is ongoing when its duration is unknown. The arc spins
//! continuously; in the extendable style its two ends also take turns
//! stretching out and snapping back.

use std::{
    f32::consts::{PI, TAU},
    sync::Arc,
};

use derive_setters::Setters;
use halo_ui::{
    BasicAnimation, Color, FillMode, KeyPath, LayerId, MediaClock, Rect, RepeatCount, ShapeLayer,
    Size, TimingFunction, View, Widget,
};
use tracing::{debug, warn};

use crate::circle::{PathConfiguration, StrokeEndpoint, TrackType, draw_circle};

const ROTATION_KEY: &str = "rotation";

/// Eased curve shared by rotation and oscillation in the extendable style.
const EXTENDABLE_CURVE: TimingFunction = TimingFunction::CubicBezier {
    x1: 0.2,
    y1: 0.2,
    x2: 0.5,
    y2: 0.75,
};

/// Defaults for [`ActivityIndicatorView`].
pub struct ActivityIndicatorDefaults;

impl ActivityIndicatorDefaults {
    pub const TRACK_COLOR: Color = Color::TRANSPARENT;
    pub const INDICATOR_COLOR: Color = Color::DARK_GRAY;
    pub const LINE_WIDTH: f32 = 7.0;
    /// 9 o'clock.
    pub const START_ANGLE: f32 = -PI;
    /// Share of the circle covered by the spinning arc.
    pub const ARC_FRACTION: f32 = 0.2;
    /// Seconds per full turn.
    pub const ROTATION_DURATION: f64 = 1.0;
    /// Seconds for an endpoint to stretch out; snapping back takes as long.
    pub const OSCILLATION_DURATION: f64 = 1.0;
    /// How far an endpoint moves along the circle while stretching.
    pub const OSCILLATION_DISTANCE: f32 = 0.15;
    pub const INTRINSIC_SIZE: Size = Size::new(65.0, 65.0);
}

/// How the indicator moves while animating.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStyle {
    /// Constant-speed rotation.
    Linear,
    /// Eased rotation with alternating endpoint oscillation.
    #[default]
    Extendable,
}

impl AnimationStyle {
    pub fn timing_function(self) -> TimingFunction {
        match self {
            Self::Linear => TimingFunction::Linear,
            Self::Extendable => EXTENDABLE_CURVE,
        }
    }
}

/// Arguments for configuring an [`ActivityIndicatorView`].
#[derive(Debug, Clone, Setters)]
pub struct ActivityIndicatorArgs {
    /// Color of the full-circle track behind the arc.
    pub track_color: Color,
    /// Color of the spinning arc.
    pub indicator_color: Color,
    /// Stroke width shared by track and arc.
    pub line_width: f32,
    pub animation_style: AnimationStyle,
    /// Hide the view while it is not animating.
    pub hides_when_stopped: bool,
    /// Whether the indicator starts out animating.
    pub should_animate: bool,
}

impl Default for ActivityIndicatorArgs {
    fn default() -> Self {
        Self {
            track_color: ActivityIndicatorDefaults::TRACK_COLOR,
            indicator_color: ActivityIndicatorDefaults::INDICATOR_COLOR,
            line_width: ActivityIndicatorDefaults::LINE_WIDTH,
            animation_style: AnimationStyle::default(),
            hides_when_stopped: false,
            should_animate: true,
        }
    }
}

/// A spinning arc over an optional track.
pub struct ActivityIndicatorView {
    view: View,
    track_layer: LayerId,
    activity_layer: LayerId,
    track_color: Color,
    indicator_color: Color,
    line_width: f32,
    animation_style: AnimationStyle,
    hides_when_stopped: bool,
    should_animate: bool,
    is_animating: bool,
}

impl ActivityIndicatorView {
    pub fn new(args: impl Into<ActivityIndicatorArgs>, clock: Arc<dyn MediaClock>) -> Self {
        let args: ActivityIndicatorArgs = args.into();
        let mut view = View::new(clock);
        let track_layer = view.add_sublayer(ShapeLayer::new());
        let activity_layer = view.add_sublayer(ShapeLayer::new());
        let mut indicator = Self {
            view,
            track_layer,
            activity_layer,
            track_color: args.track_color,
            indicator_color: args.indicator_color,
            line_width: args.line_width,
            animation_style: args.animation_style,
            hides_when_stopped: args.hides_when_stopped,
            should_animate: true,
            is_animating: true,
        };
        indicator.set_should_animate(args.should_animate);
        indicator
    }

    pub fn track_color(&self) -> Color {
        self.track_color
    }

    pub fn set_track_color(&mut self, color: Color) {
        self.track_color = color;
        self.view.set_needs_display();
    }

    pub fn indicator_color(&self) -> Color {
        self.indicator_color
    }

    pub fn set_indicator_color(&mut self, color: Color) {
        self.indicator_color = color;
        self.view.set_needs_display();
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn set_line_width(&mut self, line_width: f32) {
        self.line_width = line_width;
        self.view.set_needs_display();
    }

    pub fn animation_style(&self) -> AnimationStyle {
        self.animation_style
    }

    /// Changes the style; the new curves are attached on the next draw.
    pub fn set_animation_style(&mut self, style: AnimationStyle) {
        if self.animation_style != style {
            self.animation_style = style;
            self.view.set_needs_display();
        }
    }

    pub fn hides_when_stopped(&self) -> bool {
        self.hides_when_stopped
    }

    /// Takes effect immediately when the indicator is already stopped.
    pub fn set_hides_when_stopped(&mut self, hides: bool) {
        self.hides_when_stopped = hides;
        if !self.should_animate {
            self.view.set_hidden(hides);
        }
    }

    pub fn should_animate(&self) -> bool {
        self.should_animate
    }

    /// Starts or stops the animation. Stopping freezes the arc where it is;
    /// starting again continues from that exact position.
    pub fn set_should_animate(&mut self, should_animate: bool) {
        if self.should_animate == should_animate {
            return;
        }
        self.should_animate = should_animate;
        if should_animate {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Whether the arc is currently moving.
    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    fn stop(&mut self) {
        if self.hides_when_stopped {
            self.view.set_hidden(true);
        }
        let now = self.view.now();
        if let Some(layer) = self.view.layer_mut(self.activity_layer) {
            pause(layer, now);
        }
        self.is_animating = false;
        debug!(now, "activity indicator stopped");
    }

    fn start(&mut self) {
        if self.hides_when_stopped {
            self.view.set_hidden(false);
        }
        let now = self.view.now();
        if let Some(layer) = self.view.layer_mut(self.activity_layer) {
            resume(layer, now);
        }
        self.is_animating = true;
        debug!(now, "activity indicator started");
    }

    fn track_configuration(&self) -> PathConfiguration {
        PathConfiguration {
            color: self.track_color,
            line_width: self.line_width,
            start_angle: ActivityIndicatorDefaults::START_ANGLE,
            track_type: TrackType::Track,
        }
    }

    fn activity_configuration(&self) -> PathConfiguration {
        PathConfiguration {
            color: self.indicator_color,
            line_width: self.line_width,
            start_angle: ActivityIndicatorDefaults::START_ANGLE,
            track_type: TrackType::Custom(ActivityIndicatorDefaults::ARC_FRACTION),
        }
    }
}

impl Widget for ActivityIndicatorView {
    fn view(&self) -> &View {
        &self.view
    }

    fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    fn intrinsic_size(&self) -> Option<Size> {
        Some(ActivityIndicatorDefaults::INTRINSIC_SIZE)
    }

    fn draw(&mut self, rect: Rect) {
        let now = self.view.now();
        let track = self.track_configuration();
        let activity = self.activity_configuration();
        let style = self.animation_style;

        if let Some(layer) = self.view.layer_mut(self.track_layer) {
            draw_circle(layer, rect, &track);
        }

        let Some(layer) = self.view.layer_mut(self.activity_layer) else {
            warn!("activity layer missing; skipping draw");
            return;
        };
        draw_circle(layer, rect, &activity);
        layer.position = Some(rect.center());
        layer.bounds = Some(match layer.path_bounds() {
            Ok(bounds) => bounds,
            Err(err) => {
                debug_assert!(false, "{err}");
                warn!(error = %err, "falling back to the view rect");
                rect
            }
        });

        let timing = style.timing_function();
        let rotation = layer
            .animation(ROTATION_KEY)
            .map(|rotation| (rotation.timing_function, rotation.begin_time));
        match rotation {
            Some((current, _)) if current == timing => {}
            // Sharing the begin time keeps the turn at the same point in its cycle.
            Some((_, begin)) => add_rotation(layer, timing, begin, now),
            None => add_rotation(layer, timing, None, now),
        }

        match style {
            AnimationStyle::Extendable => {
                let oscillating = [StrokeEndpoint::Start, StrokeEndpoint::End]
                    .iter()
                    .any(|endpoint| layer.animation(endpoint.key()).is_some());
                if !oscillating {
                    oscillate(layer, StrokeEndpoint::Start, timing, None, now);
                }
            }
            AnimationStyle::Linear => {
                for endpoint in [StrokeEndpoint::Start, StrokeEndpoint::End] {
                    layer.remove_animation(endpoint.key(), now);
                }
            }
        }
    }
}

/// Freezes every animation on `layer` at its current local time.
fn pause(layer: &mut ShapeLayer, now: f64) {
    let paused_time = layer.convert_time(now);
    layer.speed = 0.0;
    layer.time_offset = paused_time;
}

/// Restarts a paused layer so its local time continues from the frozen
/// value.
fn resume(layer: &mut ShapeLayer, now: f64) {
    let paused_time = layer.time_offset;
    layer.speed = 1.0;
    layer.time_offset = 0.0;
    layer.begin_time = 0.0;
    let time_since_pause = layer.convert_time(now) - paused_time;
    layer.begin_time = time_since_pause;
}

fn add_rotation(
    layer: &mut ShapeLayer,
    timing: TimingFunction,
    begin: Option<f64>,
    now: f64,
) {
    let mut rotation = BasicAnimation::new(KeyPath::Rotation)
        .by_value(TAU)
        .duration(ActivityIndicatorDefaults::ROTATION_DURATION)
        .repeat_count(RepeatCount::Infinite)
        .fill_mode(FillMode::Forwards)
        .removed_on_completion(false)
        .timing_function(timing);
    if let Some(begin) = begin {
        rotation = rotation.begin_time(begin);
    }
    if let Err(err) = layer.add_animation(ROTATION_KEY, rotation, now) {
        warn!(error = %err, "rotation animation rejected");
    }
}

/// Stretches `endpoint` out and back once, then hands over to the other
/// endpoint. `begin` pins the start time so consecutive oscillations join
/// without gaps.
fn oscillate(
    layer: &mut ShapeLayer,
    endpoint: StrokeEndpoint,
    timing: TimingFunction,
    begin: Option<f64>,
    now: f64,
) {
    let mut animation = BasicAnimation::new(endpoint.key_path())
        .by_value(ActivityIndicatorDefaults::OSCILLATION_DISTANCE)
        .duration(ActivityIndicatorDefaults::OSCILLATION_DURATION)
        .repeat_count(RepeatCount::Count(1.0))
        .autoreverses(true)
        .fill_mode(FillMode::Forwards)
        .removed_on_completion(false)
        .timing_function(timing)
        .on_stop(move |layer, stop| {
            // Replaced or removed oscillations must not spawn a second chain.
            if !stop.finished {
                return;
            }
            let next = match stop.key_path {
                KeyPath::StrokeStart => StrokeEndpoint::End,
                _ => StrokeEndpoint::Start,
            };
            oscillate(layer, next, timing, Some(stop.local_end), stop.time);
        });
    if let Some(begin) = begin {
        animation = animation.begin_time(begin);
    }
    if let Err(err) = layer.add_animation(endpoint.key(), animation, now) {
        warn!(error = %err, ?endpoint, "oscillation rejected");
    }
}
