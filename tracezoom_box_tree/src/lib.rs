// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace Zoom Box Tree: text and stacking containers, laid out to fill a rectangle.
//!
//! A [`BoxTree`] is an arena of two kinds of node:
//!
//! - text boxes, each one line of text with an optional color;
//! - containers, which stack their children vertically or horizontally.
//!
//! There is no wrapping, no flex or grid, and no styling beyond the per-run color.
//! The only layout policy is stacking, and the only free parameter is the font size.
//!
//! ## Layout
//!
//! [`layout`] sizes and positions a subtree at one font. Text boxes are as wide as
//! the measurer says and one line tall; containers sum their children along the
//! stacking axis and take the widest child across it. Results are stored in a
//! [`LayoutMap`] keyed by [`BoxId`], so two boxes with identical content never
//! share an entry.
//!
//! ## Auto-fit
//!
//! [`fit_box`] searches for the largest integer font size at which a subtree fits a
//! target rectangle, then centers the layout inside it. [`fit_text`] does the same
//! for a multi-line string.
//!
//! ```rust
//! use kurbo::Rect;
//! use tracezoom_box_tree::{BoxTree, Direction, FitOptions, fit_box};
//! use tracezoom_measure::FixedWidthMeasurer;
//!
//! let mut tree = BoxTree::new();
//! let number = tree.text("1");
//! let code = tree.text("return n");
//! let row = tree.container_with(Direction::Horizontal, [number, code]).unwrap();
//!
//! let target = Rect::new(0.0, 0.0, 300.0, 40.0);
//! let mut measurer = FixedWidthMeasurer::new(0.6);
//! let fit = fit_box(&tree, row, target, &FitOptions::default(), &mut measurer).unwrap();
//!
//! let bounds = fit.layout.get(row).unwrap();
//! assert!(bounds.width() <= target.width());
//! assert!(bounds.height() <= target.height());
//! ```
//!
//! Layout and fitting are pure functions of the tree, the font and the measurer.
//! The measurer is the only mutable input, and only its cache changes.

mod fit;
mod layout;
mod tree;
mod types;

pub use fit::{Fit, FitError, FitOptions, FittedText, fit_box, fit_text};
pub use layout::{LayoutError, LayoutMap, layout};
pub use tree::{BoxTree, BoxTreeError};
pub use types::{BoxId, BoxKind, ContainerBox, Direction, TextBox};
