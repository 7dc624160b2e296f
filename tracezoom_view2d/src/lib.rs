// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace Zoom View 2D: the camera over the semantic-zoom plane.
//!
//! The whole trace lives on one infinite world plane. A [`Viewport`] maps it onto
//! the screen with a pan offset and a uniform zoom:
//!
//! `screen = (world − (left, top)) × zoom`
//!
//! It provides:
//! - Conversion of points and rectangles between world and screen space.
//! - Panning by world or screen deltas, and a [`DragPan`] tracker for pointer drags.
//! - Zooming about a screen anchor, which keeps the world point under the pointer fixed.
//! - Wheel handling with the same anchoring.
//!
//! It does not own a scene, and it does not read input events. Hosts forward
//! pointer positions and wheel deltas here between frames, and the renderer
//! reads the result at the start of each frame.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use tracezoom_view2d::Viewport;
//!
//! let canvas = Size::new(800.0, 600.0);
//! let mut view = Viewport::overview(canvas);
//!
//! // The pointer is at the screen center; zoom in by two wheel notches.
//! let pointer = Point::new(400.0, 300.0);
//! let under_pointer = view.screen_to_world_point(pointer);
//! view.wheel(pointer, -20.0);
//!
//! let moved = view.screen_to_world_point(pointer) - under_pointer;
//! assert!(moved.hypot() < 1e-9);
//! assert!(view.zoom() > 0.5);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod drag;
mod viewport;

pub use drag::DragPan;
pub use viewport::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, Viewport, WHEEL_SENSITIVITY};
