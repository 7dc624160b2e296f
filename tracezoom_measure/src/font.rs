// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

/// A concrete font selection: pixel size, family, and weight.
///
/// Sizes are whole pixels; the auto-fit search only ever walks integer sizes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontSetting {
    /// Font size in pixels.
    pub size: u32,
    /// Font family name, for example `"Monaco"`.
    pub family: String,
    /// Font weight keyword, for example `"normal"` or `"bold"`.
    pub weight: String,
}

impl FontSetting {
    /// Creates a font setting.
    pub fn new(size: u32, family: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            size,
            family: family.into(),
            weight: weight.into(),
        }
    }

    /// Returns a copy of this setting with a different size.
    #[must_use]
    pub fn with_size(&self, size: u32) -> Self {
        Self {
            size,
            family: self.family.clone(),
            weight: self.weight.clone(),
        }
    }

    /// Size as a float, for geometry.
    #[must_use]
    pub fn size_px(&self) -> f64 {
        f64::from(self.size)
    }
}

impl Default for FontSetting {
    fn default() -> Self {
        Self::new(16, "monospace", "normal")
    }
}

/// Formats as a CSS-style font shorthand: `"{weight} {size}px {family}"`.
impl fmt::Display for FontSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}px {}", self.weight, self.size, self.family)
    }
}
