//! Shape layers: a stroked path plus the animations attached to it.
//!
//! ## Time
//!
//! Each layer has its own local time line derived from the global media time:
//!
//! ```text
//! local = (global - begin_time) * speed + time_offset
//! ```
//!
//! Setting `speed` to zero freezes every attached animation at whatever local
//! time `time_offset` holds, which is how indicators pause without losing
//! their visual position.

use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::{
    animation::{AnimationStop, BasicAnimation, KeyPath, StopHandler},
    color::Color,
    command::ArcCommand,
    error::{AnimationError, LayerError},
    geometry::{Point, Rect},
    path::{CirclePath, LineCap},
};

/// Upper bound on stop/requeue rounds handled by a single [`ShapeLayer::tick`].
///
/// Stop handlers may attach follow-up animations that are already due when the
/// clock jumped far ahead; the rest are caught up on the next tick.
const MAX_STOP_ROUNDS: usize = 64;

struct AttachedAnimation {
    key: String,
    animation: BasicAnimation,
    /// Set once the stop handler has been dispatched.
    stopped: bool,
}

/// Property values as currently shown on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub stroke_start: f32,
    pub stroke_end: f32,
    pub rotation: f32,
}

/// A layer that strokes a circular path.
pub struct ShapeLayer {
    pub path: Option<CirclePath>,
    pub stroke_color: Color,
    /// Circular indicators always set this transparent.
    pub fill_color: Color,
    pub line_width: f32,
    pub line_cap: LineCap,
    /// Model value of the stroke start fraction.
    pub stroke_start: f32,
    /// Model value of the stroke end fraction.
    pub stroke_end: f32,
    /// Model rotation in radians.
    pub rotation: f32,
    /// Where the center of `bounds` sits in the parent's coordinates.
    pub position: Option<Point>,
    /// The layer's own coordinate space.
    pub bounds: Option<Rect>,
    pub speed: f64,
    pub time_offset: f64,
    pub begin_time: f64,
    animations: SmallVec<[AttachedAnimation; 4]>,
}

impl Default for ShapeLayer {
    fn default() -> Self {
        Self {
            path: None,
            stroke_color: Color::TRANSPARENT,
            fill_color: Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            stroke_start: 0.0,
            stroke_end: 1.0,
            rotation: 0.0,
            position: None,
            bounds: None,
            speed: 1.0,
            time_offset: 0.0,
            begin_time: 0.0,
            animations: SmallVec::new(),
        }
    }
}

impl ShapeLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts global media time to this layer's local time.
    pub fn convert_time(&self, global: f64) -> f64 {
        (global - self.begin_time) * self.speed + self.time_offset
    }

    /// Attaches `animation` under `key`, replacing whatever was attached under
    /// the same key. The replaced animation's stop handler fires with
    /// `finished = false` before the new one is attached.
    pub fn add_animation(
        &mut self,
        key: impl Into<String>,
        mut animation: BasicAnimation,
        now: f64,
    ) -> Result<(), AnimationError> {
        let key = key.into();
        if let Err(err) = animation.validate() {
            warn!(key = %key, error = %err, "rejected animation");
            return Err(err);
        }

        self.remove_animation(&key, now);

        if animation.begin_time.is_none() {
            animation.begin_time = Some(self.convert_time(now));
        }
        trace!(
            key = %key,
            key_path = %animation.key_path,
            begin = ?animation.begin_time,
            "attached animation"
        );
        self.animations.push(AttachedAnimation {
            key,
            animation,
            stopped: false,
        });
        Ok(())
    }

    /// Detaches the animation under `key`. Returns whether one was attached.
    pub fn remove_animation(&mut self, key: &str, now: f64) -> bool {
        let Some(index) = self.animations.iter().position(|entry| entry.key == key) else {
            return false;
        };
        let entry = self.animations.remove(index);
        self.dispatch_cancelled(entry, now);
        true
    }

    pub fn remove_all_animations(&mut self, now: f64) {
        let detached = std::mem::take(&mut self.animations);
        for entry in detached {
            self.dispatch_cancelled(entry, now);
        }
    }

    fn dispatch_cancelled(&mut self, mut entry: AttachedAnimation, now: f64) {
        trace!(key = %entry.key, "removed animation");
        if entry.stopped {
            return;
        }
        if let Some(handler) = entry.animation.take_stop_handler() {
            let stop = AnimationStop {
                key: entry.key,
                key_path: entry.animation.key_path,
                finished: false,
                local_end: self.convert_time(now),
                time: now,
            };
            handler(self, &stop);
        }
    }

    pub fn animation(&self, key: &str) -> Option<&BasicAnimation> {
        self.animations
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.animation)
    }

    /// Keys of all attached animations, in attachment order.
    pub fn animation_keys(&self) -> impl Iterator<Item = &str> {
        self.animations.iter().map(|entry| entry.key.as_str())
    }

    /// Whether the animation under `key` has started and not yet finished.
    pub fn is_animation_running(&self, key: &str, now: f64) -> bool {
        let local = self.convert_time(now);
        self.animations.iter().any(|entry| {
            entry.key == key
                && !entry.stopped
                && local >= entry.animation.begin_time.unwrap_or(0.0)
                && !entry.animation.has_finished(local)
        })
    }

    /// Dispatches stop handlers of animations that finished by `now`.
    ///
    /// Every handler fires exactly once. Returns how many fired.
    pub fn tick(&mut self, now: f64) -> usize {
        let mut fired = 0;
        for _ in 0..MAX_STOP_ROUNDS {
            let local = self.convert_time(now);
            let mut due: Vec<(AnimationStop, Option<StopHandler>)> = Vec::new();

            let mut index = 0;
            while index < self.animations.len() {
                let entry = &mut self.animations[index];
                if entry.stopped || !entry.animation.has_finished(local) {
                    index += 1;
                    continue;
                }
                entry.stopped = true;
                let stop = AnimationStop {
                    key: entry.key.clone(),
                    key_path: entry.animation.key_path,
                    finished: true,
                    local_end: entry.animation.end_time().unwrap_or(local),
                    time: now,
                };
                let handler = entry.animation.take_stop_handler();
                if entry.animation.removed_on_completion {
                    self.animations.remove(index);
                } else {
                    index += 1;
                }
                due.push((stop, handler));
            }

            if due.is_empty() {
                break;
            }
            due.sort_by(|a, b| a.0.local_end.total_cmp(&b.0.local_end));
            for (stop, handler) in due {
                trace!(key = %stop.key, local_end = stop.local_end, "animation finished");
                fired += 1;
                if let Some(handler) = handler {
                    handler(self, &stop);
                }
            }
        }
        fired
    }

    /// Model values overridden by the attached animations, later attachments
    /// winning.
    pub fn presentation(&self, now: f64) -> Presentation {
        let local = self.convert_time(now);
        let mut presentation = Presentation {
            stroke_start: self.stroke_start,
            stroke_end: self.stroke_end,
            rotation: self.rotation,
        };
        for entry in &self.animations {
            let animation = &entry.animation;
            let (slot, model) = match animation.key_path {
                KeyPath::StrokeStart => (&mut presentation.stroke_start, self.stroke_start),
                KeyPath::StrokeEnd => (&mut presentation.stroke_end, self.stroke_end),
                KeyPath::Rotation => (&mut presentation.rotation, self.rotation),
            };
            if let Some(value) = animation.sample(local, model) {
                *slot = value;
            }
        }
        presentation
    }

    /// Bounds of the current path.
    pub fn path_bounds(&self) -> Result<Rect, LayerError> {
        self.path
            .as_ref()
            .map(CirclePath::bounding_box)
            .ok_or(LayerError::MissingPath)
    }

    /// Maps a point in layer space into the parent's space, rotating around
    /// the layer center.
    fn to_parent(&self, point: Point, rotation: f32) -> Point {
        match (self.position, self.bounds) {
            (Some(position), Some(bounds)) => {
                let anchor = bounds.center();
                let (dx, dy) = (point.x - anchor.x, point.y - anchor.y);
                let (sin, cos) = rotation.sin_cos();
                Point::new(
                    position.x + dx * cos - dy * sin,
                    position.y + dx * sin + dy * cos,
                )
            }
            (Some(position), None) => point.offset(position.x, position.y),
            (None, _) => point,
        }
    }

    /// The visible stroke at `now`, if any.
    pub fn arc_command(&self, now: f64) -> Option<ArcCommand> {
        let path = self.path.as_ref()?;
        if self.stroke_color.is_transparent() || self.line_width <= 0.0 {
            return None;
        }

        let presentation = self.presentation(now);
        let start = presentation.stroke_start.clamp(0.0, 1.0);
        let end = presentation.stroke_end.clamp(0.0, 1.0);
        if end <= start {
            return None;
        }

        let sweep = path.sweep_angle();
        let start_angle = path.start_angle() + presentation.rotation + start * sweep;
        Some(ArcCommand {
            center: self.to_parent(path.center(), presentation.rotation),
            radius: path.radius(),
            color: self.stroke_color,
            stroke_width: self.line_width,
            start_angle_degrees: start_angle.to_degrees(),
            sweep_angle_degrees: ((end - start) * sweep).to_degrees(),
            cap: self.line_cap,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        f32::consts::{PI, TAU},
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use parking_lot::Mutex;

    use super::*;
    use crate::animation::{FillMode, RepeatCount};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn stroke_end_animation(to: f32) -> BasicAnimation {
        BasicAnimation::new(KeyPath::StrokeEnd)
            .from_value(0.0)
            .to_value(to)
            .duration(1.0)
            .fill_mode(FillMode::Forwards)
            .removed_on_completion(false)
    }

    fn stroked_layer() -> ShapeLayer {
        let mut layer = ShapeLayer::new();
        layer.path = Some(CirclePath::new(Point::new(50.0, 50.0), 45.0, -PI / 2.0));
        layer.stroke_color = Color::BLACK;
        layer.line_width = 10.0;
        layer
    }

    #[test]
    fn begin_time_is_stamped_from_local_time() {
        let mut layer = ShapeLayer::new();
        layer.time_offset = 3.0;
        layer
            .add_animation("strokeEnd", stroke_end_animation(1.0), 10.0)
            .unwrap();
        assert_eq!(
            layer.animation("strokeEnd").unwrap().begin_time,
            Some(13.0)
        );
    }

    #[test]
    fn replacing_fires_cancelled_handler_once() {
        let stops = Arc::new(Mutex::new(Vec::new()));
        let mut layer = ShapeLayer::new();

        let log = stops.clone();
        let first = stroke_end_animation(0.5).on_stop(move |_, stop| log.lock().push(stop.finished));
        layer.add_animation("strokeEnd", first, 0.0).unwrap();
        layer
            .add_animation("strokeEnd", stroke_end_animation(0.8), 0.1)
            .unwrap();

        assert_eq!(*stops.lock(), vec![false]);
        assert_eq!(layer.animation_keys().count(), 1);

        layer.tick(5.0);
        assert_eq!(*stops.lock(), vec![false]);
    }

    #[test]
    fn tick_fires_finished_handler_exactly_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut layer = ShapeLayer::new();
        let counter = count.clone();
        let animation = stroke_end_animation(1.0).on_stop(move |_, stop| {
            assert!(stop.finished);
            assert_eq!(stop.local_end, 1.0);
            counter.fetch_add(1, Ordering::SeqCst);
        });
        layer.add_animation("strokeEnd", animation, 0.0).unwrap();

        assert_eq!(layer.tick(0.5), 0);
        assert!(layer.is_animation_running("strokeEnd", 0.5));
        assert_eq!(layer.tick(1.2), 1);
        assert_eq!(layer.tick(3.0), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Not removed on completion: the final value is still presented.
        assert!(!layer.is_animation_running("strokeEnd", 3.0));
        assert_eq!(layer.presentation(3.0).stroke_end, 1.0);
    }

    #[test]
    fn remove_all_cancels_every_animation() {
        let cancelled = Arc::new(AtomicUsize::new(0));
        let mut layer = ShapeLayer::new();
        for key in ["strokeStart", "strokeEnd"] {
            let counter = cancelled.clone();
            let animation = stroke_end_animation(0.5).on_stop(move |_, stop| {
                if !stop.finished {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            });
            layer.add_animation(key, animation, 0.0).unwrap();
        }

        layer.remove_all_animations(0.5);
        assert_eq!(cancelled.load(Ordering::SeqCst), 2);
        assert_eq!(layer.animation_keys().count(), 0);
        assert!(!layer.remove_animation("strokeEnd", 0.5));
    }

    #[test]
    fn removed_on_completion_detaches() {
        let mut layer = ShapeLayer::new();
        let animation = BasicAnimation::new(KeyPath::StrokeEnd)
            .from_value(0.0)
            .to_value(0.5)
            .duration(1.0);
        layer.add_animation("strokeEnd", animation, 0.0).unwrap();
        layer.tick(2.0);
        assert!(layer.animation("strokeEnd").is_none());
        assert_eq!(layer.presentation(2.0).stroke_end, 1.0);
    }

    #[test]
    fn handlers_can_chain_follow_up_animations() {
        fn chain(layer: &mut ShapeLayer, begin: f64, remaining: usize) {
            if remaining == 0 {
                return;
            }
            let animation = BasicAnimation::new(KeyPath::StrokeStart)
                .by_value(0.1)
                .duration(1.0)
                .begin_time(begin)
                .on_stop(move |layer, stop| {
                    if stop.finished {
                        chain(layer, stop.local_end, remaining - 1);
                    }
                });
            layer.add_animation("chain", animation, 0.0).unwrap();
        }

        let mut layer = ShapeLayer::new();
        chain(&mut layer, 0.0, 5);
        // One big jump catches up on every due link without drifting.
        assert_eq!(layer.tick(3.5), 3);
        let current = layer.animation("chain").unwrap();
        assert_eq!(current.begin_time, Some(3.0));
    }

    #[test]
    fn invalid_animation_is_rejected() {
        let mut layer = ShapeLayer::new();
        let result = layer.add_animation(
            "rotation",
            BasicAnimation::new(KeyPath::Rotation).duration(-1.0),
            0.0,
        );
        assert_eq!(result, Err(AnimationError::InvalidDuration(-1.0)));
        assert_eq!(layer.animation_keys().count(), 0);
    }

    #[test]
    fn zero_speed_freezes_local_time() {
        let mut layer = ShapeLayer::new();
        let rotation = BasicAnimation::new(KeyPath::Rotation)
            .by_value(TAU)
            .duration(1.0)
            .repeat_count(RepeatCount::Infinite);
        layer.add_animation("rotation", rotation, 0.0).unwrap();

        let paused_at = layer.convert_time(0.25);
        layer.speed = 0.0;
        layer.time_offset = paused_at;
        assert!(approx(layer.presentation(0.25).rotation, TAU * 0.25));
        assert!(approx(layer.presentation(9.0).rotation, TAU * 0.25));
    }

    #[test]
    fn path_bounds_require_a_path() {
        assert_eq!(ShapeLayer::new().path_bounds(), Err(LayerError::MissingPath));
        assert!(stroked_layer().path_bounds().is_ok());
    }

    #[test]
    fn arc_command_reflects_stroke_fractions() {
        let mut layer = stroked_layer();
        layer.stroke_end = 0.25;
        let command = layer.arc_command(0.0).unwrap();
        assert!(approx(command.start_angle_degrees, -90.0));
        assert!(approx(command.sweep_angle_degrees, 90.0));
        assert!(approx(command.radius, 45.0));
        assert_eq!(command.center, Point::new(50.0, 50.0));

        layer.stroke_end = 0.0;
        assert!(layer.arc_command(0.0).is_none());
    }

    #[test]
    fn arc_command_maps_through_position_and_rotation() {
        let mut layer = stroked_layer();
        layer.stroke_end = 0.2;
        layer.rotation = PI / 2.0;
        layer.bounds = layer.path_bounds().ok();
        layer.position = Some(Point::new(60.0, 60.0));
        let command = layer.arc_command(0.0).unwrap();
        assert!(approx(command.center.x, 60.0));
        assert!(approx(command.center.y, 60.0));
        assert!(approx(command.start_angle_degrees, 0.0));
        assert!(approx(command.sweep_angle_degrees, 72.0));
    }

    #[test]
    fn transparent_stroke_draws_nothing() {
        let mut layer = stroked_layer();
        layer.stroke_color = Color::TRANSPARENT;
        assert!(layer.arc_command(0.0).is_none());
    }
}
