// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;

use crate::{FontSetting, TextMeasurer};

/// Source of per-glyph advance widths.
///
/// Implementations are consulted only on cache misses by [`CachedMeasurer`].
pub trait GlyphAdvance {
    /// Returns the horizontal advance of `ch` at `font`, in pixels.
    fn advance(&mut self, ch: char, font: &FontSetting) -> f64;
}

impl<F> GlyphAdvance for F
where
    F: FnMut(char, &FontSetting) -> f64,
{
    fn advance(&mut self, ch: char, font: &FontSetting) -> f64 {
        self(ch, font)
    }
}

/// Exact per-glyph measurer with a memoized width table.
///
/// The width of a run is the sum of its glyph advances. Each `(character, font)`
/// pair is looked up in the source at most once; fonts are interned so that table
/// keys stay small.
///
/// ```rust
/// use tracezoom_measure::{CachedMeasurer, FontSetting, TextMeasurer};
///
/// let mut measurer = CachedMeasurer::new(|_: char, font: &FontSetting| font.size_px() * 0.5);
/// measurer.set_font(&FontSetting::new(10, "Monaco", "normal"));
/// assert_eq!(measurer.measure("aaa"), 15.0);
/// assert_eq!(measurer.cached_glyphs(), 1);
/// ```
#[derive(Debug)]
pub struct CachedMeasurer<A> {
    source: A,
    fonts: Vec<FontSetting>,
    current: usize,
    widths: HashMap<(char, usize), f64>,
}

impl<A: GlyphAdvance> CachedMeasurer<A> {
    /// Creates a measurer over `source`, starting at [`FontSetting::default`].
    pub fn new(source: A) -> Self {
        Self {
            source,
            fonts: vec![FontSetting::default()],
            current: 0,
            widths: HashMap::new(),
        }
    }

    /// Number of memoized `(character, font)` widths.
    #[must_use]
    pub fn cached_glyphs(&self) -> usize {
        self.widths.len()
    }

    /// Drops every memoized width. Interned fonts are kept.
    pub fn clear(&mut self) {
        self.widths.clear();
    }

    /// Returns the glyph advance source.
    pub fn source(&self) -> &A {
        &self.source
    }

    /// Returns the glyph advance source mutably.
    ///
    /// Changing what the source reports does not invalidate existing entries;
    /// call [`CachedMeasurer::clear`] afterwards.
    pub fn source_mut(&mut self) -> &mut A {
        &mut self.source
    }
}

impl<A: GlyphAdvance> TextMeasurer for CachedMeasurer<A> {
    fn set_font(&mut self, font: &FontSetting) {
        if self.fonts[self.current] == *font {
            return;
        }
        self.current = match self.fonts.iter().position(|f| f == font) {
            Some(idx) => idx,
            None => {
                self.fonts.push(font.clone());
                self.fonts.len() - 1
            }
        };
    }

    fn measure(&mut self, text: &str) -> f64 {
        let current = self.current;
        let font = &self.fonts[current];
        let source = &mut self.source;
        let widths = &mut self.widths;
        text.chars()
            .map(|ch| {
                *widths
                    .entry((ch, current))
                    .or_insert_with(|| source.advance(ch, font))
            })
            .sum()
    }
}
