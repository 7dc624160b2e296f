// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Zoom change per unit of wheel delta.
pub const WHEEL_SENSITIVITY: f64 = 0.01;

/// Default lower zoom limit.
pub const DEFAULT_MIN_ZOOM: f64 = 0.5;

/// Default upper zoom limit.
///
/// Deeply nested scopes are reached by zooming in by large factors, so the
/// default is only there to keep the transform finite.
pub const DEFAULT_MAX_ZOOM: f64 = 1e12;

/// Pan and uniform zoom mapping world space onto the screen.
///
/// `screen = (world − (left, top)) × zoom`. `left` and `top` are the world
/// coordinates shown at the screen origin.
///
/// Input handlers mutate the viewport between frames; a render pass only reads it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    top: f64,
    left: f64,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Viewport {
    /// Creates a viewport with the world point `(left, top)` at the screen origin.
    ///
    /// `zoom` is clamped into the default limits; a non-positive zoom becomes
    /// the lower limit.
    #[must_use]
    pub fn new(top: f64, left: f64, zoom: f64) -> Self {
        let mut vp = Self {
            top,
            left,
            zoom: DEFAULT_MIN_ZOOM,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        };
        vp.set_zoom(zoom);
        vp
    }

    /// The start state of a session: the world rectangle of size `canvas` at the
    /// origin, shown at half size in the middle of the canvas.
    #[must_use]
    pub fn overview(canvas: Size) -> Self {
        Self::new(-canvas.height / 2.0, -canvas.width / 2.0, 0.5)
    }

    /// World Y shown at the top edge of the screen.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.top
    }

    /// World X shown at the left edge of the screen.
    #[must_use]
    pub fn left(&self) -> f64 {
        self.left
    }

    /// Screen pixels per world unit.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Lower zoom limit.
    #[must_use]
    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    /// Upper zoom limit.
    #[must_use]
    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// Sets the zoom limits and clamps the current zoom into them.
    ///
    /// The range is normalized so that `min_zoom <= max_zoom`. Non-positive
    /// limits are ignored.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        if !(min_zoom > 0.0 && max_zoom > 0.0) {
            return;
        }
        let (min_zoom, max_zoom) = if min_zoom <= max_zoom {
            (min_zoom, max_zoom)
        } else {
            (max_zoom, min_zoom)
        };
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Sets the zoom without moving the world point at the screen origin.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom > 0.0 {
            zoom.clamp(self.min_zoom, self.max_zoom)
        } else {
            self.min_zoom
        };
    }

    /// The world-to-screen transform.
    #[must_use]
    pub fn world_to_screen(&self) -> Affine {
        Affine::scale(self.zoom) * Affine::translate(Vec2::new(-self.left, -self.top))
    }

    /// The screen-to-world transform.
    #[must_use]
    pub fn screen_to_world(&self) -> Affine {
        Affine::translate(Vec2::new(self.left, self.top)) * Affine::scale(1.0 / self.zoom)
    }

    /// Converts a world-space point into screen coordinates.
    #[must_use]
    pub fn world_to_screen_point(&self, world_point: Point) -> Point {
        self.world_to_screen() * world_point
    }

    /// Converts a screen-space point into world coordinates.
    #[must_use]
    pub fn screen_to_world_point(&self, screen_point: Point) -> Point {
        self.screen_to_world() * screen_point
    }

    /// Converts a world-space rectangle into screen coordinates.
    #[must_use]
    pub fn world_to_screen_rect(&self, world_rect: Rect) -> Rect {
        self.world_to_screen().transform_rect_bbox(world_rect)
    }

    /// Converts a screen-space rectangle into world coordinates.
    #[must_use]
    pub fn screen_to_world_rect(&self, screen_rect: Rect) -> Rect {
        self.screen_to_world().transform_rect_bbox(screen_rect)
    }

    /// The world-space rectangle visible on a canvas of size `canvas`.
    #[must_use]
    pub fn visible_world_rect(&self, canvas: Size) -> Rect {
        self.screen_to_world_rect(canvas.to_rect())
    }

    /// Moves the content by `world_delta`.
    ///
    /// Positive X moves the content right, so the world X at the left edge
    /// decreases.
    pub fn pan_by_world(&mut self, world_delta: Vec2) {
        self.left -= world_delta.x;
        self.top -= world_delta.y;
    }

    /// Moves the content by `screen_delta` pixels.
    pub fn pan_by_screen(&mut self, screen_delta: Vec2) {
        self.pan_by_world(screen_delta / self.zoom);
    }

    /// Multiplies the zoom by `factor`, keeping the world point under
    /// `screen_anchor` fixed.
    ///
    /// Non-positive factors are ignored.
    pub fn zoom_about_screen_point(&mut self, screen_anchor: Point, factor: f64) {
        if factor > 0.0 {
            self.zoom_to_about_screen_point(screen_anchor, self.zoom * factor);
        }
    }

    /// Applies a wheel gesture of `delta_y` at `screen_anchor`.
    ///
    /// Positive deltas zoom out. The result never drops below the lower zoom
    /// limit, even for deltas large enough to make the factor negative.
    pub fn wheel(&mut self, screen_anchor: Point, delta_y: f64) {
        let zoom = self.zoom * (1.0 - delta_y * WHEEL_SENSITIVITY);
        self.zoom_to_about_screen_point(screen_anchor, zoom);
    }

    fn zoom_to_about_screen_point(&mut self, screen_anchor: Point, zoom: f64) {
        let world_anchor = self.screen_to_world_point(screen_anchor);
        self.set_zoom(zoom);
        self.left = world_anchor.x - screen_anchor.x / self.zoom;
        self.top = world_anchor.y - screen_anchor.y / self.zoom;
    }
}
