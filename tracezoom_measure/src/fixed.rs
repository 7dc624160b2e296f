// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{FontSetting, TextMeasurer};

/// Approximate measurer for monospaced text.
///
/// Every character advances by `char_width_ratio × font size`, so a run of `n`
/// characters measures `ratio × n × size`. Characters are counted as Unicode
/// scalar values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedWidthMeasurer {
    char_width_ratio: f64,
    size: f64,
}

impl FixedWidthMeasurer {
    /// Creates a measurer with the given width-to-size ratio.
    ///
    /// The initial font size is 16px until [`TextMeasurer::set_font`] is called.
    #[must_use]
    pub fn new(char_width_ratio: f64) -> Self {
        Self {
            char_width_ratio,
            size: 16.0,
        }
    }

    /// Returns the configured width-to-size ratio.
    #[must_use]
    pub fn char_width_ratio(&self) -> f64 {
        self.char_width_ratio
    }
}

impl Default for FixedWidthMeasurer {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl TextMeasurer for FixedWidthMeasurer {
    fn set_font(&mut self, font: &FontSetting) {
        self.size = font.size_px();
    }

    fn measure(&mut self, text: &str) -> f64 {
        let chars = text.chars().count() as f64;
        self.char_width_ratio * chars * self.size
    }
}
