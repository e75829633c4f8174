//! halo-ui provides the retained layer model behind halo's circular
//! indicators.
//!
//! # Layers and animations
//!
//! A [`ShapeLayer`] strokes a [`CirclePath`]. How much of the circle is
//! visible is controlled by its stroke start and end fractions, and those,
//! together with the layer's rotation, can be driven by [`BasicAnimation`]s
//! attached under string keys.
//!
//! ```
//! use halo_ui::{BasicAnimation, FillMode, KeyPath, ShapeLayer, TimingFunction};
//!
//! let mut layer = ShapeLayer::new();
//! let grow = BasicAnimation::new(KeyPath::StrokeEnd)
//!     .from_value(0.0)
//!     .to_value(0.5)
//!     .duration(0.2)
//!     .fill_mode(FillMode::Forwards)
//!     .removed_on_completion(false)
//!     .timing_function(TimingFunction::EaseInEaseOut);
//! layer.add_animation("strokeEnd", grow, 0.0).unwrap();
//! assert_eq!(layer.presentation(1.0).stroke_end, 0.5);
//! ```
//!
//! # Widgets
//!
//! Widgets implement [`Widget`] on top of a [`View`], which owns the layer
//! stack, tracks redraw requests and reads time from a [`MediaClock`].
//! Each call to [`Widget::frame`] yields the [`ArcCommand`]s to stroke.

pub mod animation;
pub mod clock;
pub mod color;
pub mod command;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod path;
pub mod timing;
pub mod view;

pub use animation::{AnimationStop, BasicAnimation, FillMode, KeyPath, RepeatCount, StopHandler};
pub use clock::{ManualClock, MediaClock, SystemClock};
pub use color::Color;
pub use command::ArcCommand;
pub use error::{AnimationError, LayerError};
pub use geometry::{Point, Rect, Size};
pub use layer::{Presentation, ShapeLayer};
pub use path::{CirclePath, LineCap};
pub use timing::TimingFunction;
pub use view::{LayerId, View, Widget};
