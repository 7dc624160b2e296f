// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Auto-fit: the largest integer font size at which a tree fits a rectangle.

use kurbo::{Rect, Size, Vec2};
use tracezoom_measure::{FontSetting, TextMeasurer};

use crate::layout::{LayoutError, LayoutMap, layout};
use crate::tree::BoxTree;
use crate::types::{BoxId, Direction};

/// Parameters of the font-size search.
#[derive(Clone, Debug, PartialEq)]
pub struct FitOptions {
    /// Font family passed to the measurer.
    pub family: String,
    /// Font weight passed to the measurer.
    pub weight: String,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// First candidate size.
    pub initial_font_size: u32,
    /// Doubling never goes past this size.
    pub max_font_size: u32,
    /// Number of layout passes after which the search gives up.
    pub max_iterations: u32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            family: "Monaco".into(),
            weight: "normal".into(),
            line_height: 1.2,
            initial_font_size: 5,
            max_font_size: 4096,
            max_iterations: 64,
        }
    }
}

impl FitOptions {
    /// The font setting for candidate size `size`.
    #[must_use]
    pub fn font(&self, size: u32) -> FontSetting {
        FontSetting::new(size, self.family.clone(), self.weight.clone())
    }
}

/// Error returned by [`fit_box`] and [`fit_text`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FitError {
    /// Not even a 1px font fits the target.
    #[error("content cannot fit in {width}x{height} at any font size")]
    CannotFit {
        /// Target width.
        width: f64,
        /// Target height.
        height: f64,
    },
    /// The search did not settle within the iteration budget.
    #[error("font size search did not converge after {iterations} iterations")]
    NoConvergence {
        /// Layout passes performed.
        iterations: u32,
    },
    /// A layout pass failed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Result of a successful fit.
#[derive(Clone, Debug, PartialEq)]
pub struct Fit {
    /// The chosen font.
    pub font: FontSetting,
    /// Layout at that font, centered in the target.
    pub layout: LayoutMap,
}

/// Finds the largest font size at which `root` fits inside `target`.
///
/// Starting from [`FitOptions::initial_font_size`], the candidate doubles while
/// it fits and no upper bound is known, halves while it does not fit and no
/// lower bound is known, and bisects once both bounds exist. The first
/// repeated candidate is the answer. The returned layout is centered in
/// `target` by translation, without another layout pass.
///
/// ```rust
/// use kurbo::Rect;
/// use tracezoom_box_tree::{BoxTree, FitOptions, fit_box};
/// use tracezoom_measure::FixedWidthMeasurer;
///
/// let mut tree = BoxTree::new();
/// let hi = tree.text("Hi");
/// let options = FitOptions { line_height: 1.0, ..FitOptions::default() };
/// let mut measurer = FixedWidthMeasurer::new(0.6);
///
/// let fit = fit_box(&tree, hi, Rect::new(0.0, 0.0, 100.0, 50.0), &options, &mut measurer).unwrap();
/// assert_eq!(fit.font.size, 50);
/// ```
pub fn fit_box<M>(
    tree: &BoxTree,
    root: BoxId,
    target: Rect,
    options: &FitOptions,
    measurer: &mut M,
) -> Result<Fit, FitError>
where
    M: TextMeasurer + ?Sized,
{
    let target = target.abs();
    let bounds = target.size();
    let max = options.max_font_size.max(1);
    let mut lower: Option<u32> = None;
    let mut upper: Option<u32> = None;
    let mut candidate = options.initial_font_size.min(max);

    for iteration in 1..=options.max_iterations {
        if candidate == 0 {
            return Err(FitError::CannotFit {
                width: bounds.width,
                height: bounds.height,
            });
        }
        let font = options.font(candidate);
        let mut map = layout(
            tree,
            root,
            target.origin(),
            &font,
            options.line_height,
            measurer,
        )?;
        let size = map.size(root).ok_or(LayoutError::UnknownBox(root))?;

        if fits(size, bounds) {
            lower = Some(candidate);
            let next = match upper {
                Some(upper) => midpoint(upper, candidate),
                None => candidate.saturating_mul(2).min(max),
            };
            if next == candidate {
                map.translate(Vec2::new(
                    (bounds.width - size.width) / 2.0,
                    (bounds.height - size.height) / 2.0,
                ));
                tracing::debug!(font_size = candidate, iterations = iteration, "fit converged");
                return Ok(Fit { font, layout: map });
            }
            candidate = next;
        } else {
            upper = Some(candidate);
            candidate = match lower {
                Some(lower) => midpoint(lower, candidate),
                None => candidate / 2,
            };
        }
    }

    Err(FitError::NoConvergence {
        iterations: options.max_iterations,
    })
}

fn fits(size: Size, bounds: Size) -> bool {
    size.width <= bounds.width && size.height <= bounds.height
}

fn midpoint(a: u32, b: u32) -> u32 {
    a / 2 + b / 2 + (a % 2 + b % 2) / 2
}

/// A multi-line string fitted with [`fit_text`].
#[derive(Clone, Debug)]
pub struct FittedText {
    /// Tree holding one text box per line under a vertical container.
    pub tree: BoxTree,
    /// The vertical container.
    pub root: BoxId,
    /// Line boxes in order.
    pub lines: Vec<BoxId>,
    /// Chosen font and centered layout.
    pub fit: Fit,
}

/// Fits `text`, one box per `\n`-separated line, inside `target`.
pub fn fit_text<M>(
    text: &str,
    target: Rect,
    options: &FitOptions,
    measurer: &mut M,
) -> Result<FittedText, FitError>
where
    M: TextMeasurer + ?Sized,
{
    let mut tree = BoxTree::new();
    let (root, lines) = tree.text_stack(Direction::Vertical, text.split('\n'));
    let fit = fit_box(&tree, root, target, options, measurer)?;
    Ok(FittedText {
        tree,
        root,
        lines,
        fit,
    })
}
