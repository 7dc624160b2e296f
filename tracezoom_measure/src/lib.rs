// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace Zoom Measure: text width measurement for auto-fitting layouts.
//!
//! Layout in Trace Zoom only ever asks one question of the text stack: how wide is
//! this run of text at this font? This crate answers it behind the [`TextMeasurer`]
//! trait so the fitting code stays agnostic to where widths come from.
//!
//! Two modes are provided:
//!
//! - [`FixedWidthMeasurer`]: an approximation for monospaced code where every
//!   character advances by `char_width_ratio × font size`. Deterministic and cheap,
//!   which also makes it the measurer of choice for tests.
//! - [`CachedMeasurer`]: an exact per-glyph mode. Advances are pulled from a
//!   [`GlyphAdvance`] source (for example [`SkrifaAdvance`], which reads real font
//!   metrics) and memoized per `(character, font)`.
//!
//! ## Minimal example
//!
//! ```rust
//! use tracezoom_measure::{FixedWidthMeasurer, FontSetting, TextMeasurer};
//!
//! let mut measurer = FixedWidthMeasurer::new(0.6);
//! measurer.set_font(&FontSetting::new(10, "Monaco", "normal"));
//! assert!((measurer.measure("bb") - 12.0).abs() < 1e-9);
//! ```
//!
//! The measurer is owned by the render loop and mutated in place; there is no
//! interior locking.

mod cached;
mod fixed;
mod font;
mod font_advance;

pub use cached::{CachedMeasurer, GlyphAdvance};
pub use fixed::FixedWidthMeasurer;
pub use font::FontSetting;
pub use font_advance::{MeasureError, SkrifaAdvance};

/// Converts text into a width at the currently selected font.
pub trait TextMeasurer {
    /// Selects the font used by subsequent [`TextMeasurer::measure`] calls.
    fn set_font(&mut self, font: &FontSetting);

    /// Returns the advance width of `text` at the current font.
    fn measure(&mut self, text: &str) -> f64;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &mut T {
    fn set_font(&mut self, font: &FontSetting) {
        (**self).set_font(font);
    }

    fn measure(&mut self, text: &str) -> f64 {
        (**self).measure(text)
    }
}
