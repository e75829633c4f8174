//! Circular determinate progress indicator.
//!
//! ## Usage
//!
//! Show how far a task has come, as a value between 0 and 100. Each change
//! animates the arc from the previous value to the new one.

use std::{f32::consts::FRAC_PI_2, sync::Arc};

use derive_setters::Setters;
use halo_ui::{
    BasicAnimation, Color, FillMode, KeyPath, LayerId, MediaClock, Rect, ShapeLayer,
    TimingFunction, View, Widget,
};
use tracing::{debug, trace, warn};

use crate::circle::{PathConfiguration, StrokeEndpoint, TrackType, draw_circle};

/// Defaults for [`ProgressView`].
pub struct ProgressViewDefaults;

impl ProgressViewDefaults {
    pub const TRACK_COLOR: Color = Color::LIGHT_GRAY;
    pub const PROGRESS_COLOR: Color = Color::DARK_GRAY;
    pub const LINE_WIDTH: f32 = 10.0;
    /// 12 o'clock.
    pub const START_ANGLE: f32 = -FRAC_PI_2;
    /// Seconds taken to animate between two progress values.
    pub const ANIMATION_DURATION: f64 = 0.2;
    /// Progress value that fills the whole circle.
    pub const MAX_PROGRESS: f64 = 100.0;
}

/// Stand-in duration for updates that should apply at once; the animation
/// holds its target from the first frame.
const INSTANT_DURATION: f64 = 1e-6;

/// Callback run each time a progress animation stops.
pub type AnimationDidFinish = Arc<dyn Fn() + Send + Sync>;

/// Arguments for configuring a [`ProgressView`].
#[derive(Clone, Setters)]
pub struct ProgressViewArgs {
    /// Color of the full-circle track behind the progress arc.
    pub track_color: Color,
    /// Color of the progress arc.
    pub progress_color: Color,
    /// Stroke width shared by track and arc.
    pub line_width: f32,
    /// Called whenever a progress animation stops, including when a newer
    /// value preempts it.
    #[setters(skip)]
    pub animation_did_finish: Option<AnimationDidFinish>,
}

impl ProgressViewArgs {
    /// Sets the animation-finished callback.
    pub fn animation_did_finish<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.animation_did_finish = Some(Arc::new(callback));
        self
    }
}

impl Default for ProgressViewArgs {
    fn default() -> Self {
        Self {
            track_color: ProgressViewDefaults::TRACK_COLOR,
            progress_color: ProgressViewDefaults::PROGRESS_COLOR,
            line_width: ProgressViewDefaults::LINE_WIDTH,
            animation_did_finish: None,
        }
    }
}

/// Maps a progress value onto a stroke fraction, clamping into `[0, 100]`.
pub fn progress_fraction(value: f64) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    (value.clamp(0.0, ProgressViewDefaults::MAX_PROGRESS) / ProgressViewDefaults::MAX_PROGRESS)
        as f32
}

/// A circular track with an arc that animates to the current progress.
pub struct ProgressView {
    view: View,
    track_layer: LayerId,
    progress_layer: LayerId,
    track_color: Color,
    progress_color: Color,
    line_width: f32,
    progress: f64,
    animation_did_finish: Option<AnimationDidFinish>,
}

impl ProgressView {
    pub fn new(args: impl Into<ProgressViewArgs>, clock: Arc<dyn MediaClock>) -> Self {
        let args: ProgressViewArgs = args.into();
        let mut view = View::new(clock);
        let track_layer = view.add_sublayer(ShapeLayer::new());
        let progress_layer = view.add_sublayer(ShapeLayer::new());
        Self {
            view,
            track_layer,
            progress_layer,
            track_color: args.track_color,
            progress_color: args.progress_color,
            line_width: args.line_width,
            progress: 0.0,
            animation_did_finish: args.animation_did_finish,
        }
    }

    pub fn track_color(&self) -> Color {
        self.track_color
    }

    pub fn set_track_color(&mut self, color: Color) {
        self.track_color = color;
        self.view.set_needs_display();
    }

    pub fn progress_color(&self) -> Color {
        self.progress_color
    }

    pub fn set_progress_color(&mut self, color: Color) {
        self.progress_color = color;
        self.view.set_needs_display();
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    pub fn set_line_width(&mut self, line_width: f32) {
        self.line_width = line_width;
        self.view.set_needs_display();
    }

    /// The last assigned progress value, unclamped.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Assigns a new progress value, nominally within `[0, 100]`, and animates
    /// the arc towards it.
    ///
    /// A change that lands while the previous one is still animating restarts
    /// from where that animation started, so rapid updates do not stack up.
    pub fn set_progress(&mut self, progress: f64) {
        let old = std::mem::replace(&mut self.progress, progress);
        let now = self.view.now();
        let key = StrokeEndpoint::End.key();
        let from = self
            .view
            .layer(self.progress_layer)
            .and_then(|layer| {
                let running = layer.animation(key)?;
                layer
                    .is_animation_running(key, now)
                    .then(|| running.endpoints(layer.stroke_end).0)
            })
            .unwrap_or_else(|| progress_fraction(old));
        self.animate_stroke_end(
            from,
            progress_fraction(progress),
            ProgressViewDefaults::ANIMATION_DURATION,
        );
    }

    pub fn set_animation_did_finish<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.animation_did_finish = Some(Arc::new(callback));
    }

    pub fn clear_animation_did_finish(&mut self) {
        self.animation_did_finish = None;
    }

    /// Animates the arc from `old` to `new` over `duration` seconds.
    ///
    /// Any progress animation still in flight is cancelled first. A duration
    /// that is not a positive number jumps straight to `new`.
    pub fn update_progress(&mut self, old: f64, new: f64, duration: f64) {
        self.animate_stroke_end(progress_fraction(old), progress_fraction(new), duration);
    }

    fn animate_stroke_end(&mut self, from: f32, to: f32, duration: f64) {
        let now = self.view.now();
        let callback = self.animation_did_finish.clone();
        let Some(layer) = self.view.layer_mut(self.progress_layer) else {
            warn!("progress layer missing; skipping progress update");
            return;
        };

        let (from, duration) = if duration.is_finite() && duration > 0.0 {
            (from, duration)
        } else {
            (to, INSTANT_DURATION)
        };
        debug!(from, to, duration, "updating progress");

        let animation = BasicAnimation::new(KeyPath::StrokeEnd)
            .from_value(from)
            .to_value(to)
            .duration(duration)
            .timing_function(TimingFunction::EaseInEaseOut)
            .fill_mode(FillMode::Forwards)
            .removed_on_completion(false)
            .on_stop(move |_, stop| {
                trace!(finished = stop.finished, "progress animation stopped");
                if let Some(callback) = callback.as_ref() {
                    callback();
                }
            });

        if let Err(err) = layer.add_animation(StrokeEndpoint::End.key(), animation, now) {
            warn!(error = %err, "progress animation rejected");
        }
    }

    fn track_configuration(&self) -> PathConfiguration {
        PathConfiguration {
            color: self.track_color,
            line_width: self.line_width,
            start_angle: ProgressViewDefaults::START_ANGLE,
            track_type: TrackType::Track,
        }
    }

    fn progress_configuration(&self) -> PathConfiguration {
        PathConfiguration {
            color: self.progress_color,
            line_width: self.line_width,
            start_angle: ProgressViewDefaults::START_ANGLE,
            track_type: TrackType::Progress,
        }
    }
}

impl Widget for ProgressView {
    fn view(&self) -> &View {
        &self.view
    }

    fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// Restyles the layers created in [`ProgressView::new`].
    fn draw(&mut self, rect: Rect) {
        let track = self.track_configuration();
        let progress = self.progress_configuration();
        if let Some(layer) = self.view.layer_mut(self.track_layer) {
            draw_circle(layer, rect, &track);
        }
        if let Some(layer) = self.view.layer_mut(self.progress_layer) {
            draw_circle(layer, rect, &progress);
        }
    }
}
