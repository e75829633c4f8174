//! Declarative, time-based property animations.
//!
//! A [`BasicAnimation`] describes how one animatable property of a
//! [`ShapeLayer`](crate::layer::ShapeLayer) changes over the layer's local
//! time. It does not run by itself; the layer samples it each frame and fires
//! its stop handler once it is done or removed.

use std::fmt;

use derive_setters::Setters;

use crate::{error::AnimationError, layer::ShapeLayer, timing::TimingFunction};

/// Animatable properties of a shape layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPath {
    /// Fraction of the path at which the stroke begins.
    StrokeStart,
    /// Fraction of the path at which the stroke ends.
    StrokeEnd,
    /// Rotation around the layer's center, in radians.
    Rotation,
}

impl KeyPath {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StrokeStart => "strokeStart",
            Self::StrokeEnd => "strokeEnd",
            Self::Rotation => "transform.rotation",
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many times an animation plays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepeatCount {
    /// A finite number of passes; fractional counts stop part way through.
    Count(f32),
    Infinite,
}

impl Default for RepeatCount {
    fn default() -> Self {
        Self::Count(1.0)
    }
}

/// What the layer shows once an animation's active time is over.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Fall back to the model value.
    #[default]
    Removed,
    /// Hold the final animated value.
    Forwards,
}

/// Why and when an attached animation stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationStop {
    /// Key the animation was attached under.
    pub key: String,
    /// Property the animation drove.
    pub key_path: KeyPath,
    /// `true` when the animation ran to the end of its active duration,
    /// `false` when it was removed or replaced first.
    pub finished: bool,
    /// Layer-local time at which the animation ended. For finished
    /// animations this is exactly `begin + active duration`.
    pub local_end: f64,
    /// Global media time at which the stop was observed.
    pub time: f64,
}

/// One-shot callback run when an attached animation stops.
pub type StopHandler = Box<dyn FnOnce(&mut ShapeLayer, &AnimationStop) + Send>;

/// An interpolation of a single property between two values.
#[derive(Setters)]
pub struct BasicAnimation {
    #[setters(skip)]
    pub key_path: KeyPath,
    #[setters(strip_option)]
    pub from_value: Option<f32>,
    #[setters(strip_option)]
    pub to_value: Option<f32>,
    #[setters(strip_option)]
    pub by_value: Option<f32>,
    /// Length of one forward pass in seconds.
    pub duration: f64,
    pub repeat_count: RepeatCount,
    /// Play every pass forwards and then backwards.
    pub autoreverses: bool,
    pub fill_mode: FillMode,
    /// Detach from the layer once finished.
    pub removed_on_completion: bool,
    pub timing_function: TimingFunction,
    /// Layer-local start time. Stamped with the layer's current local time
    /// when attached without one.
    #[setters(strip_option)]
    pub begin_time: Option<f64>,
    #[setters(skip)]
    on_stop: Option<StopHandler>,
}

impl BasicAnimation {
    pub fn new(key_path: KeyPath) -> Self {
        Self {
            key_path,
            from_value: None,
            to_value: None,
            by_value: None,
            duration: 0.25,
            repeat_count: RepeatCount::default(),
            autoreverses: false,
            fill_mode: FillMode::default(),
            removed_on_completion: true,
            timing_function: TimingFunction::default(),
            begin_time: None,
            on_stop: None,
        }
    }

    /// Registers the callback fired once when this animation stops.
    pub fn on_stop<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(&mut ShapeLayer, &AnimationStop) + Send + 'static,
    {
        self.on_stop = Some(Box::new(handler));
        self
    }

    pub(crate) fn take_stop_handler(&mut self) -> Option<StopHandler> {
        self.on_stop.take()
    }

    pub fn validate(&self) -> Result<(), AnimationError> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(AnimationError::InvalidDuration(self.duration));
        }
        if let RepeatCount::Count(count) = self.repeat_count
            && !(count.is_finite() && count > 0.0)
        {
            return Err(AnimationError::InvalidRepeatCount(count));
        }
        Ok(())
    }

    /// Seconds for one forward pass plus its reverse, if any.
    pub fn cycle_duration(&self) -> f64 {
        if self.autoreverses {
            self.duration * 2.0
        } else {
            self.duration
        }
    }

    /// Seconds the animation stays active, `None` when it repeats forever.
    pub fn active_duration(&self) -> Option<f64> {
        match self.repeat_count {
            RepeatCount::Count(count) => Some(self.cycle_duration() * count as f64),
            RepeatCount::Infinite => None,
        }
    }

    /// Layer-local time at which the animation finishes.
    pub fn end_time(&self) -> Option<f64> {
        let begin = self.begin_time.unwrap_or(0.0);
        self.active_duration().map(|active| begin + active)
    }

    pub fn has_finished(&self, local_time: f64) -> bool {
        self.end_time().is_some_and(|end| local_time >= end)
    }

    /// Start and end values, resolving relative values against `model`.
    pub fn endpoints(&self, model: f32) -> (f32, f32) {
        match (self.from_value, self.to_value, self.by_value) {
            (Some(from), Some(to), _) => (from, to),
            (Some(from), None, Some(by)) => (from, from + by),
            (None, Some(to), Some(by)) => (to - by, to),
            (None, None, Some(by)) => (model, model + by),
            (None, Some(to), None) => (model, to),
            (Some(from), None, None) => (from, model),
            (None, None, None) => (model, model),
        }
    }

    /// The animated value at `local_time`, or `None` when the animation does
    /// not affect the property at that moment.
    pub fn sample(&self, local_time: f64, model: f32) -> Option<f32> {
        let elapsed = local_time - self.begin_time.unwrap_or(0.0);
        if elapsed < 0.0 {
            return None;
        }

        let linear = match self.active_duration() {
            Some(active) if elapsed >= active => match self.fill_mode {
                FillMode::Forwards => self.final_progress(),
                FillMode::Removed => return None,
            },
            _ => self.pass_progress(elapsed),
        };

        let (from, to) = self.endpoints(model);
        Some(from + (to - from) * self.timing_function.transform(linear))
    }

    fn pass_progress(&self, elapsed: f64) -> f32 {
        let position = elapsed % self.cycle_duration();
        if self.autoreverses && position >= self.duration {
            (1.0 - (position - self.duration) / self.duration) as f32
        } else {
            (position / self.duration) as f32
        }
    }

    fn final_progress(&self) -> f32 {
        let RepeatCount::Count(count) = self.repeat_count else {
            return 1.0;
        };
        let passes = if self.autoreverses {
            count * 2.0
        } else {
            count
        };
        let partial = passes.fract();
        let is_reverse_pass = |index: f32| self.autoreverses && index as u64 % 2 == 1;
        if partial == 0.0 {
            if is_reverse_pass(passes - 1.0) { 0.0 } else { 1.0 }
        } else if is_reverse_pass(passes.floor()) {
            1.0 - partial
        } else {
            partial
        }
    }
}

impl fmt::Debug for BasicAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAnimation")
            .field("key_path", &self.key_path)
            .field("from_value", &self.from_value)
            .field("to_value", &self.to_value)
            .field("by_value", &self.by_value)
            .field("duration", &self.duration)
            .field("repeat_count", &self.repeat_count)
            .field("autoreverses", &self.autoreverses)
            .field("fill_mode", &self.fill_mode)
            .field("removed_on_completion", &self.removed_on_completion)
            .field("timing_function", &self.timing_function)
            .field("begin_time", &self.begin_time)
            .field("has_stop_handler", &self.on_stop.is_some())
            .finish()
    }
}
