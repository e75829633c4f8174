//! View host glue: bounds, visibility, redraw bookkeeping and the layer tree.
//!
//! Widgets own a [`View`] and implement [`Widget`]. Property setters on a
//! widget call [`View::set_needs_display`]; the next [`Widget::frame`] redraws
//! through [`Widget::draw`] before ticking and rendering the layers.

use std::sync::Arc;

use slotmap::{SlotMap, new_key_type};
use tracing::trace;

use crate::{
    clock::MediaClock,
    command::ArcCommand,
    geometry::{Rect, Size},
    layer::ShapeLayer,
};

new_key_type! {
    /// Handle to a sublayer owned by a [`View`].
    pub struct LayerId;
}

/// A rectangular region that owns an ordered stack of shape layers.
pub struct View {
    bounds: Rect,
    hidden: bool,
    needs_display: bool,
    clock: Arc<dyn MediaClock>,
    layers: SlotMap<LayerId, ShapeLayer>,
    order: Vec<LayerId>,
}

impl View {
    pub fn new(clock: Arc<dyn MediaClock>) -> Self {
        Self {
            bounds: Rect::ZERO,
            hidden: false,
            needs_display: true,
            clock,
            layers: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Current media time on this view's clock.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Resizes the view; a changed size schedules a redraw.
    pub fn set_bounds(&mut self, bounds: Rect) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.needs_display = true;
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn needs_display(&self) -> bool {
        self.needs_display
    }

    pub fn set_needs_display(&mut self) {
        self.needs_display = true;
    }

    fn take_needs_display(&mut self) -> bool {
        std::mem::replace(&mut self.needs_display, false)
    }

    /// Appends `layer` on top of the existing sublayers.
    pub fn add_sublayer(&mut self, layer: ShapeLayer) -> LayerId {
        let id = self.layers.insert(layer);
        self.order.push(id);
        id
    }

    pub fn remove_sublayer(&mut self, id: LayerId) -> Option<ShapeLayer> {
        self.order.retain(|other| *other != id);
        self.layers.remove(id)
    }

    pub fn layer(&self, id: LayerId) -> Option<&ShapeLayer> {
        self.layers.get(id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut ShapeLayer> {
        self.layers.get_mut(id)
    }

    /// Sublayers from bottom to top.
    pub fn sublayers(&self) -> impl Iterator<Item = (LayerId, &ShapeLayer)> {
        self.order
            .iter()
            .filter_map(|id| self.layers.get(*id).map(|layer| (*id, layer)))
    }

    pub fn sublayer_count(&self) -> usize {
        self.order.len()
    }

    /// Dispatches animation stops on every sublayer.
    pub fn tick(&mut self) -> usize {
        let now = self.now();
        let mut fired = 0;
        for id in &self.order {
            if let Some(layer) = self.layers.get_mut(*id) {
                fired += layer.tick(now);
            }
        }
        fired
    }

    /// Arc commands for the visible sublayers, bottom first.
    pub fn render(&self) -> Vec<ArcCommand> {
        if self.hidden {
            return Vec::new();
        }
        let now = self.now();
        self.sublayers()
            .filter_map(|(_, layer)| layer.arc_command(now))
            .collect()
    }
}

/// A custom-drawn view.
pub trait Widget {
    fn view(&self) -> &View;

    fn view_mut(&mut self) -> &mut View;

    /// Rebuilds layer geometry for `rect`.
    fn draw(&mut self, rect: Rect);

    /// Preferred size when the host has no other constraint.
    fn intrinsic_size(&self) -> Option<Size> {
        None
    }

    /// Resizes the widget's view.
    fn set_bounds(&mut self, bounds: Rect) {
        self.view_mut().set_bounds(bounds);
    }

    /// Runs [`Widget::draw`] if a redraw was requested. Returns whether it
    /// drew.
    fn display_if_needed(&mut self) -> bool {
        if !self.view_mut().take_needs_display() {
            return false;
        }
        let rect = self.view().bounds();
        trace!(?rect, "redrawing widget");
        self.draw(rect);
        true
    }

    /// Produces one frame: redraw if needed, dispatch animation stops, then
    /// emit draw commands.
    fn frame(&mut self) -> Vec<ArcCommand> {
        self.display_if_needed();
        self.view_mut().tick();
        self.view().render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::ManualClock, color::Color, geometry::Point, path::CirclePath};

    struct Ring {
        view: View,
        layer: LayerId,
        draws: usize,
    }

    impl Ring {
        fn new(clock: ManualClock) -> Self {
            let mut view = View::new(Arc::new(clock));
            let layer = view.add_sublayer(ShapeLayer::new());
            Self {
                view,
                layer,
                draws: 0,
            }
        }
    }

    impl Widget for Ring {
        fn view(&self) -> &View {
            &self.view
        }

        fn view_mut(&mut self) -> &mut View {
            &mut self.view
        }

        fn draw(&mut self, rect: Rect) {
            self.draws += 1;
            if let Some(layer) = self.view.layer_mut(self.layer) {
                layer.path = Some(CirclePath::new(rect.center(), rect.min_side() / 2.0, 0.0));
                layer.stroke_color = Color::WHITE;
            }
        }
    }

    #[test]
    fn redraws_only_when_requested() {
        let mut ring = Ring::new(ManualClock::new(0.0));
        ring.set_bounds(Rect::new(0.0, 0.0, 20.0, 20.0));
        assert!(ring.display_if_needed());
        assert!(!ring.display_if_needed());

        ring.set_bounds(Rect::new(0.0, 0.0, 20.0, 20.0));
        assert!(!ring.display_if_needed());

        ring.view_mut().set_needs_display();
        assert_eq!(ring.frame().len(), 1);
        assert_eq!(ring.draws, 2);
    }

    #[test]
    fn hidden_views_render_nothing() {
        let mut ring = Ring::new(ManualClock::new(0.0));
        ring.set_bounds(Rect::new(0.0, 0.0, 20.0, 20.0));
        ring.view_mut().set_hidden(true);
        assert!(ring.frame().is_empty());
        ring.view_mut().set_hidden(false);
        let commands = ring.frame();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].center, Point::new(10.0, 10.0));
    }

    #[test]
    fn sublayers_keep_insertion_order() {
        let mut view = View::new(Arc::new(ManualClock::new(0.0)));
        let bottom = view.add_sublayer(ShapeLayer::new());
        let top = view.add_sublayer(ShapeLayer::new());
        let ids: Vec<_> = view.sublayers().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![bottom, top]);

        assert!(view.remove_sublayer(bottom).is_some());
        assert_eq!(view.sublayer_count(), 1);
        assert!(view.layer(bottom).is_none());
    }
}
