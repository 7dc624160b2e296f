// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace Zoom Navigator: semantic zoom over a recorded execution trace.
//!
//! The whole trace lives on one infinite world plane. The root scope shows
//! the first function's code, one row per executed line, annotated with the
//! values it produced. Every call made from that code is itself a scope,
//! drawn inside the box of its call expression. Zooming in on a call site
//! therefore reveals the callee's code, and so on, without bound.
//!
//! Each frame starts at the innermost scope of a [`ScopeChain`]: the scopes
//! whose screen rectangles cover the whole canvas. Scopes outside it are not
//! visited at all, which keeps a frame's cost independent of zoom depth.
//! [`Navigator::render_frame`] returns the chain for the next frame,
//! moved at most one level.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Size;
//! use tracezoom_measure::FixedWidthMeasurer;
//! use tracezoom_navigator::{FrameInput, Navigator, NavigatorConfig, ScopeChain};
//! use tracezoom_trace::{Program, parse_trace};
//! use tracezoom_view2d::Viewport;
//!
//! let program = Program::from_json(
//!     r#"{"source": "def main() {\n    print(1)\n}", "functions": []}"#,
//! )
//! .unwrap();
//! let trace = parse_trace(
//!     r#"[{"line": 2, "stack": [{"funName": "main", "parameters": {}, "variables": {}}]}]"#,
//! )
//! .unwrap();
//!
//! let canvas = Size::new(800.0, 600.0);
//! let chain = ScopeChain::root(trace.len(), canvas);
//! let input = FrameInput {
//!     trace: &trace,
//!     syntax: &program,
//!     viewport: Viewport::new(0.0, 0.0, 1.0),
//!     canvas,
//! };
//! let mut measurer = FixedWidthMeasurer::new(0.6);
//!
//! let outcome = Navigator::new(NavigatorConfig::default())
//!     .render_frame(&chain, &input, &mut measurer)
//!     .unwrap();
//! assert!(outcome.frame.texts().any(|t| t == "    print(1)"));
//! assert!(!outcome.changed);
//! ```

mod code_box;
mod config;
mod display;
mod navigator;

pub use code_box::{CallBox, CodeBox, build_code_box};
pub use config::{CodePalette, LabelStyle, NavigatorConfig};
pub use display::{DrawCommand, Frame, VisitedScope};
pub use navigator::{FrameInput, FrameOutcome, Navigator, NavigatorError, Scope, ScopeChain};
