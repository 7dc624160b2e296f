// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-pass layout of a box tree at a fixed font.

use kurbo::{Point, Rect, Size, Vec2};
use tracezoom_measure::{FontSetting, TextMeasurer};

use crate::tree::BoxTree;
use crate::types::{BoxId, BoxKind, Direction};

/// Error returned by [`layout`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The id does not belong to the tree being laid out.
    #[error("box {0} does not belong to the tree being laid out")]
    UnknownBox(BoxId),
    /// Accumulating child extents wrapped past the representable range.
    ///
    /// This indicates a degenerate, effectively infinite layout.
    #[error("stacking offset overflowed: {offset} + {extent} is not a valid offset")]
    OffsetOverflow {
        /// Cumulative offset before the child was added.
        offset: f64,
        /// Extent of the child being stacked.
        extent: f64,
    },
}

/// Laid-out rectangles keyed by [`BoxId`].
///
/// Only boxes reached from the laid-out root have entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutMap {
    rects: Vec<Option<Rect>>,
}

impl LayoutMap {
    fn with_len(len: usize) -> Self {
        Self {
            rects: vec![None; len],
        }
    }

    fn insert(&mut self, id: BoxId, rect: Rect) {
        if let Some(slot) = self.rects.get_mut(id.index()) {
            *slot = Some(rect);
        }
    }

    /// Returns the rectangle laid out for `id`.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<Rect> {
        self.rects.get(id.index()).copied().flatten()
    }

    /// Returns the size laid out for `id`.
    #[must_use]
    pub fn size(&self, id: BoxId) -> Option<Size> {
        self.get(id).map(|rect| rect.size())
    }

    /// Number of laid-out boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.iter().flatten().count()
    }

    /// Returns `true` if nothing was laid out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over laid-out boxes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (BoxId, Rect)> + '_ {
        self.rects
            .iter()
            .enumerate()
            .filter_map(|(idx, rect)| rect.map(|r| (BoxId::from_index(idx), r)))
    }

    /// Moves every rectangle by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        for rect in self.rects.iter_mut().flatten() {
            *rect = *rect + offset;
        }
    }
}

/// Lays out the subtree at `root` with its top-left corner at `origin`.
///
/// - A text box is `measurer` wide and `font.size × line_height` tall.
/// - A vertical container stacks its children along Y at its own X; its height is
///   the sum of the child heights and its width the widest child.
/// - A horizontal container is the transpose.
///
/// The measurer is switched to `font` before measuring.
pub fn layout<M>(
    tree: &BoxTree,
    root: BoxId,
    origin: Point,
    font: &FontSetting,
    line_height: f64,
    measurer: &mut M,
) -> Result<LayoutMap, LayoutError>
where
    M: TextMeasurer + ?Sized,
{
    measurer.set_font(font);
    let mut pass = Pass {
        tree,
        measurer,
        line_extent: font.size_px() * line_height,
        map: LayoutMap::with_len(tree.len()),
    };
    pass.place(root, origin)?;
    Ok(pass.map)
}

struct Pass<'a, M: ?Sized> {
    tree: &'a BoxTree,
    measurer: &'a mut M,
    line_extent: f64,
    map: LayoutMap,
}

impl<M: TextMeasurer + ?Sized> Pass<'_, M> {
    fn place(&mut self, id: BoxId, origin: Point) -> Result<Size, LayoutError> {
        let tree = self.tree;
        let size = match tree.get(id).ok_or(LayoutError::UnknownBox(id))? {
            BoxKind::Text(text) => Size::new(self.measurer.measure(&text.text), self.line_extent),
            BoxKind::Container(container) => {
                let mut stacked = 0.0;
                let mut cross = 0.0_f64;
                for &child in container.children() {
                    let child_origin = match container.direction {
                        Direction::Vertical => origin + Vec2::new(0.0, stacked),
                        Direction::Horizontal => origin + Vec2::new(stacked, 0.0),
                    };
                    let child_size = self.place(child, child_origin)?;
                    let (along, across) = match container.direction {
                        Direction::Vertical => (child_size.height, child_size.width),
                        Direction::Horizontal => (child_size.width, child_size.height),
                    };
                    stacked = advance(stacked, along)?;
                    cross = cross.max(across);
                }
                match container.direction {
                    Direction::Vertical => Size::new(cross, stacked),
                    Direction::Horizontal => Size::new(stacked, cross),
                }
            }
        };
        self.map.insert(id, Rect::from_origin_size(origin, size));
        Ok(size)
    }
}

/// Adds a child extent to a running, non-negative stacking offset.
fn advance(offset: f64, extent: f64) -> Result<f64, LayoutError> {
    let next = offset + extent;
    if !next.is_finite() || (offset >= 0.0 && next < 0.0) {
        return Err(LayoutError::OffsetOverflow { offset, extent });
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size, Vec2};
    use tracezoom_measure::{FixedWidthMeasurer, FontSetting, TextMeasurer};

    use super::{LayoutError, advance, layout};
    use crate::{BoxTree, Direction};

    fn font(size: u32) -> FontSetting {
        FontSetting::new(size, "Monaco", "normal")
    }

    #[test]
    fn vertical_sums_heights_and_takes_widest() {
        let mut tree = BoxTree::new();
        let a = tree.text("a");
        let bb = tree.text("bb");
        let column = tree.container_with(Direction::Vertical, [a, bb]).unwrap();

        let mut m = FixedWidthMeasurer::new(0.6);
        let map = layout(&tree, column, Point::ZERO, &font(10), 1.2, &mut m).unwrap();

        let size = map.size(column).unwrap();
        assert!((size.height - 24.0).abs() < 1e-9);
        assert!((size.width - 12.0).abs() < 1e-9);
        assert!((map.get(a).unwrap().width() - 6.0).abs() < 1e-9);
        assert!((map.get(bb).unwrap().y0 - 12.0).abs() < 1e-9);
    }

    #[test]
    fn horizontal_is_the_transpose() {
        let mut tree = BoxTree::new();
        let a = tree.text("a");
        let bb = tree.text("bb");
        let row = tree.container_with(Direction::Horizontal, [a, bb]).unwrap();

        let mut m = FixedWidthMeasurer::new(0.6);
        let origin = Point::new(100.0, 50.0);
        let map = layout(&tree, row, origin, &font(10), 1.0, &mut m).unwrap();

        assert_eq!(map.size(row), Some(Size::new(18.0, 10.0)));
        assert_eq!(map.get(a), Some(Rect::new(100.0, 50.0, 106.0, 60.0)));
        assert_eq!(map.get(bb), Some(Rect::new(106.0, 50.0, 118.0, 60.0)));
    }

    #[test]
    fn empty_container_has_zero_size() {
        let mut tree = BoxTree::new();
        let empty = tree.container(Direction::Vertical);
        let mut m = FixedWidthMeasurer::default();
        let map = layout(&tree, empty, Point::new(3.0, 4.0), &font(12), 1.2, &mut m).unwrap();
        assert_eq!(map.get(empty), Some(Rect::new(3.0, 4.0, 3.0, 4.0)));
    }

    #[test]
    fn unreached_boxes_have_no_entry() {
        let mut tree = BoxTree::new();
        let stray = tree.text("stray");
        let kept = tree.text("kept");
        let root = tree.container_with(Direction::Vertical, [kept]).unwrap();
        let mut m = FixedWidthMeasurer::default();
        let map = layout(&tree, root, Point::ZERO, &font(8), 1.0, &mut m).unwrap();
        assert_eq!(map.get(stray), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn translate_moves_every_entry() {
        let mut tree = BoxTree::new();
        let a = tree.text("ab");
        let root = tree.container_with(Direction::Vertical, [a]).unwrap();
        let mut m = FixedWidthMeasurer::new(0.5);
        let mut map = layout(&tree, root, Point::ZERO, &font(10), 1.0, &mut m).unwrap();
        map.translate(Vec2::new(5.0, -2.0));
        assert_eq!(map.get(a), Some(Rect::new(5.0, -2.0, 15.0, 8.0)));
        assert_eq!(map.get(root), Some(Rect::new(5.0, -2.0, 15.0, 8.0)));
    }

    struct Huge;

    impl TextMeasurer for Huge {
        fn set_font(&mut self, _: &FontSetting) {}

        fn measure(&mut self, _: &str) -> f64 {
            f64::MAX
        }
    }

    #[test]
    fn overflowing_offsets_are_fatal() {
        let mut tree = BoxTree::new();
        let a = tree.text("a");
        let b = tree.text("b");
        let row = tree.container_with(Direction::Horizontal, [a, b]).unwrap();
        let err = layout(&tree, row, Point::ZERO, &font(10), 1.0, &mut Huge).unwrap_err();
        assert_eq!(
            err,
            LayoutError::OffsetOverflow {
                offset: f64::MAX,
                extent: f64::MAX
            }
        );
    }

    #[test]
    fn sign_flip_is_detected() {
        assert!(advance(1.0, -2.0).is_err());
        assert_eq!(advance(1.0, 2.0), Ok(3.0));
    }

    #[test]
    fn foreign_ids_are_rejected() {
        let mut small = BoxTree::new();
        small.text("only");
        let mut big = BoxTree::new();
        big.text("a");
        let foreign = big.text("b");
        let mut m = FixedWidthMeasurer::default();
        assert_eq!(
            layout(&small, foreign, Point::ZERO, &font(8), 1.0, &mut m),
            Err(LayoutError::UnknownBox(foreign))
        );
    }
}
