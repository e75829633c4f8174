//! Circular indicators built on [`halo_ui`].
//!
//! - [`ActivityIndicatorView`] spins an arc while work of unknown length is
//!   running, and can be paused and resumed without visual jumps.
//! - [`ProgressView`] fills a circle clockwise to a percentage and reports
//!   when each fill animation ends.
//!
//! Both are [`halo_ui::Widget`]s: size them with `set_bounds` and pull draw
//! commands with `frame` once per display refresh.

pub mod activity_indicator;
pub mod circle;
pub mod progress_view;

pub use activity_indicator::{
    ActivityIndicatorArgs, ActivityIndicatorDefaults, ActivityIndicatorView, AnimationStyle,
};
pub use circle::{PathConfiguration, StrokeEndpoint, TrackType};
pub use progress_view::{AnimationDidFinish, ProgressView, ProgressViewArgs, ProgressViewDefaults};
