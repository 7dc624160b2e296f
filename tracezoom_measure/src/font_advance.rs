// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph advances read from real font files via Skrifa.

use hashbrown::HashMap;
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::{FontRef, MetadataProvider};

use crate::{FontSetting, GlyphAdvance};

/// Error returned when registering font data.
#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    /// The bytes could not be parsed as a font (or the face index is out of range).
    #[error("font data for family {family:?} is not readable: {reason}")]
    InvalidFont {
        /// Family the data was registered under.
        family: String,
        /// Parser diagnostic.
        reason: String,
    },
}

#[derive(Clone, Debug)]
struct FaceData {
    bytes: Vec<u8>,
    index: u32,
}

/// [`GlyphAdvance`] source backed by font files, one face per family.
///
/// Weights are not distinguished: register the face you want for each family.
/// Families without registered data, and characters the face does not map,
/// advance by `fallback_ratio × size`.
#[derive(Clone, Debug)]
pub struct SkrifaAdvance {
    faces: HashMap<String, FaceData>,
    fallback_ratio: f64,
}

impl SkrifaAdvance {
    /// Creates an empty source with the given fallback width-to-size ratio.
    #[must_use]
    pub fn new(fallback_ratio: f64) -> Self {
        Self {
            faces: HashMap::new(),
            fallback_ratio,
        }
    }

    /// Registers the first face in `bytes` under `family`.
    pub fn register(
        &mut self,
        family: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<(), MeasureError> {
        self.register_index(family, bytes, 0)
    }

    /// Registers face `index` of a font collection under `family`.
    pub fn register_index(
        &mut self,
        family: impl Into<String>,
        bytes: Vec<u8>,
        index: u32,
    ) -> Result<(), MeasureError> {
        let family = family.into();
        if let Err(err) = FontRef::from_index(&bytes, index) {
            return Err(MeasureError::InvalidFont {
                family,
                reason: err.to_string(),
            });
        }
        self.faces.insert(family, FaceData { bytes, index });
        Ok(())
    }

    /// Returns `true` if data is registered for `family`.
    #[must_use]
    pub fn has_family(&self, family: &str) -> bool {
        self.faces.contains_key(family)
    }

    fn fallback(&self, font: &FontSetting) -> f64 {
        self.fallback_ratio * font.size_px()
    }
}

impl GlyphAdvance for SkrifaAdvance {
    fn advance(&mut self, ch: char, font: &FontSetting) -> f64 {
        let Some(face) = self.faces.get(&font.family) else {
            return self.fallback(font);
        };
        let Ok(font_ref) = FontRef::from_index(&face.bytes, face.index) else {
            return self.fallback(font);
        };
        let Some(gid) = font_ref.charmap().map(ch) else {
            return self.fallback(font);
        };
        let size = Size::new(font.size as f32);
        let metrics = GlyphMetrics::new(&font_ref, size, LocationRef::default());
        metrics
            .advance_width(gid)
            .map_or_else(|| self.fallback(font), f64::from)
    }
}
