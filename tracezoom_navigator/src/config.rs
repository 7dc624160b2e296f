// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::Color;
use serde::{Deserialize, Serialize};
use tracezoom_box_tree::FitOptions;

/// Text colors of a code box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CodePalette {
    /// Line-number column.
    pub line_number: Color,
    /// Source text, call sites included.
    pub code: Color,
    /// Values shown next to the code.
    pub annotation: Color,
}

impl Default for CodePalette {
    fn default() -> Self {
        Self {
            line_number: Color::from_rgb8(0x8a, 0x8a, 0x8a),
            code: Color::from_rgb8(0x1e, 0x1e, 0x1e),
            annotation: Color::from_rgb8(0x1f, 0x6f, 0xc5),
        }
    }
}

/// Text of a collapsed scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// The callee with its argument values, e.g. `fib(2)`.
    #[default]
    Invocation,
    /// The call expression as written at the call site, e.g. `fib(n - 1)`.
    ///
    /// The root scope has no call site and falls back to the invocation.
    CallSite,
}

/// Tunables of the navigator.
///
/// Deserializes from JSON with every field optional:
///
/// ```rust
/// use tracezoom_navigator::{LabelStyle, NavigatorConfig};
///
/// let config: NavigatorConfig =
///     serde_json::from_str(r#"{"collapse_ratio": 0.25, "label_style": "call_site"}"#).unwrap();
/// assert_eq!(config.collapse_ratio, 0.25);
/// assert_eq!(config.label_style, LabelStyle::CallSite);
/// assert_eq!(config.font_family, "Monaco");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigatorConfig {
    /// Scopes covering less than this fraction of the canvas are drawn as a label.
    pub collapse_ratio: f64,
    /// Font family of all text.
    pub font_family: String,
    /// Font weight of all text.
    pub font_weight: String,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Text of collapsed scopes.
    pub label_style: LabelStyle,
    /// First font size tried by the fit search.
    pub initial_font_size: u32,
    /// Largest font size the fit search returns.
    pub max_font_size: u32,
    /// Layout passes after which the fit search gives up.
    pub max_fit_iterations: u32,
    /// Text colors.
    #[serde(skip)]
    pub palette: CodePalette,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        let fit = FitOptions::default();
        Self {
            collapse_ratio: 0.4,
            font_family: fit.family,
            font_weight: fit.weight,
            line_height: fit.line_height,
            label_style: LabelStyle::default(),
            initial_font_size: fit.initial_font_size,
            max_font_size: fit.max_font_size,
            max_fit_iterations: fit.max_iterations,
            palette: CodePalette::default(),
        }
    }
}

impl NavigatorConfig {
    /// Options for the fit search.
    #[must_use]
    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            family: self.font_family.clone(),
            weight: self.font_weight.clone(),
            line_height: self.line_height,
            initial_font_size: self.initial_font_size,
            max_font_size: self.max_font_size,
            max_iterations: self.max_fit_iterations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CodePalette, NavigatorConfig};

    #[test]
    fn defaults_match_the_fit_defaults() {
        let config = NavigatorConfig::default();
        assert_eq!(config.fit_options(), tracezoom_box_tree::FitOptions::default());
        assert_eq!(config.collapse_ratio, 0.4);
    }

    #[test]
    fn palette_colors_are_distinct() {
        let p = CodePalette::default();
        assert_ne!(p.line_number, p.code);
        assert_ne!(p.code, p.annotation);
        assert_ne!(p.line_number, p.annotation);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<NavigatorConfig, _> = serde_json::from_str(r#"{"colapse_ratio": 1}"#);
        assert!(result.is_err());
    }
}
