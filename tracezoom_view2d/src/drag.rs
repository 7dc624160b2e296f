// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-to-pan: turn pointer moves in screen space into world-space pan deltas.
//!
//! ## Usage
//!
//! 1) Call [`DragPan::start`] on pointer down with the screen position.
//! 2) On each pointer move, call [`DragPan::update`] and pass the returned delta
//!    to [`Viewport::pan_by_world`].
//! 3) Call [`DragPan::end`] on pointer up.
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use tracezoom_view2d::{DragPan, Viewport};
//!
//! let mut view = Viewport::new(0.0, 0.0, 2.0);
//! let mut drag = DragPan::default();
//!
//! drag.start(Point::new(10.0, 20.0));
//! let delta = drag.update(Point::new(30.0, 20.0), &view).unwrap();
//! assert_eq!(delta, Vec2::new(10.0, 0.0));
//!
//! view.pan_by_world(delta);
//! assert_eq!(view.left(), -10.0);
//! ```

use kurbo::{Point, Vec2};

use crate::Viewport;

/// Tracks an active drag in screen coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragPan {
    start: Option<Point>,
    last: Option<Point>,
}

impl DragPan {
    /// Starts tracking a drag from `screen_point`, replacing any drag in progress.
    pub fn start(&mut self, screen_point: Point) {
        self.start = Some(screen_point);
        self.last = Some(screen_point);
    }

    /// Records a pointer move and returns the world-space delta since the
    /// previous one, or `None` when no drag is active.
    ///
    /// The delta is measured at the viewport's current zoom.
    pub fn update(&mut self, screen_point: Point, viewport: &Viewport) -> Option<Vec2> {
        let last = self.last?;
        self.last = Some(screen_point);
        Some((screen_point - last) / viewport.zoom())
    }

    /// Screen-space offset from the drag start to `screen_point`.
    #[must_use]
    pub fn total_screen_offset(&self, screen_point: Point) -> Option<Vec2> {
        self.start.map(|start| screen_point - start)
    }

    /// Ends the drag.
    pub fn end(&mut self) {
        self.start = None;
        self.last = None;
    }

    /// Returns `true` while a drag is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Vec2};

    use super::DragPan;
    use crate::Viewport;

    #[test]
    fn idle_drag_reports_nothing() {
        let mut drag = DragPan::default();
        let vp = Viewport::new(0.0, 0.0, 1.0);
        assert!(!drag.is_dragging());
        assert_eq!(drag.update(Point::new(3.0, 4.0), &vp), None);
        assert_eq!(drag.total_screen_offset(Point::ZERO), None);
    }

    #[test]
    fn deltas_are_incremental_and_scaled_by_zoom() {
        let mut drag = DragPan::default();
        let vp = Viewport::new(0.0, 0.0, 4.0);
        drag.start(Point::new(0.0, 0.0));

        assert_eq!(drag.update(Point::new(8.0, 4.0), &vp), Some(Vec2::new(2.0, 1.0)));
        assert_eq!(drag.update(Point::new(4.0, 4.0), &vp), Some(Vec2::new(-1.0, 0.0)));
        assert_eq!(
            drag.total_screen_offset(Point::new(4.0, 4.0)),
            Some(Vec2::new(4.0, 4.0))
        );
    }

    #[test]
    fn dragged_content_follows_the_pointer() {
        let mut vp = Viewport::new(5.0, -7.0, 3.0);
        let mut drag = DragPan::default();
        let grab = Point::new(100.0, 80.0);
        let world_under_pointer = vp.screen_to_world_point(grab);

        drag.start(grab);
        let to = Point::new(160.0, 20.0);
        if let Some(delta) = drag.update(to, &vp) {
            vp.pan_by_world(delta);
        }
        let now = vp.world_to_screen_point(world_under_pointer);
        assert!((now - to).hypot() < 1e-9);
    }

    #[test]
    fn end_resets_state() {
        let mut drag = DragPan::default();
        drag.start(Point::new(1.0, 1.0));
        drag.end();
        assert_eq!(drag, DragPan::default());
    }
}
