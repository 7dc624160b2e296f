// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the box tree: node identifiers and node kinds.

use core::fmt;

use peniko::Color;

/// Identifier for a node in a [`BoxTree`](crate::BoxTree).
///
/// This is a small, copyable handle assigned at construction time. Ids are dense
/// indices into the owning arena and are never reused: two boxes with identical
/// content still have distinct ids, and layout results are keyed by id.
///
/// An id is only meaningful for the tree that created it.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct BoxId(pub(crate) u32);

impl BoxId {
    pub(crate) fn from_index(idx: usize) -> Self {
        Self(u32::try_from(idx).unwrap_or(u32::MAX))
    }

    /// Position of this node in its arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stacking axis of a container.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Children are stacked top to bottom.
    Vertical,
    /// Children are stacked left to right.
    Horizontal,
}

/// A leaf holding one line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBox {
    /// The text, measured as a single line.
    pub text: String,
    /// Optional fill color; `None` leaves the choice to the renderer.
    pub color: Option<Color>,
}

/// A node that stacks its children along one axis.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerBox {
    /// Stacking axis.
    pub direction: Direction,
    pub(crate) children: Vec<BoxId>,
}

impl ContainerBox {
    /// Children in stacking order.
    #[must_use]
    pub fn children(&self) -> &[BoxId] {
        &self.children
    }
}

/// The closed set of box kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum BoxKind {
    /// A text leaf.
    Text(TextBox),
    /// A stacking container.
    Container(ContainerBox),
}

impl BoxKind {
    /// Returns the text box, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&TextBox> {
        match self {
            Self::Text(text) => Some(text),
            Self::Container(_) => None,
        }
    }

    /// Returns the container, if this is one.
    #[must_use]
    pub fn as_container(&self) -> Option<&ContainerBox> {
        match self {
            Self::Text(_) => None,
            Self::Container(container) => Some(container),
        }
    }
}
