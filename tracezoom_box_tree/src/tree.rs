// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena storage for boxes.

use peniko::Color;

use crate::types::{BoxId, BoxKind, ContainerBox, Direction, TextBox};

/// Error returned when a tree edit would break the tree shape.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoxTreeError {
    /// The id does not belong to this tree.
    #[error("box {0} does not belong to this tree")]
    UnknownBox(BoxId),
    /// Children can only be appended to containers.
    #[error("box {0} is a text box and cannot hold children")]
    NotAContainer(BoxId),
    /// A box may have at most one parent.
    #[error("box {child} is already attached to {parent}")]
    AlreadyAttached {
        /// The box being appended.
        child: BoxId,
        /// Its existing parent.
        parent: BoxId,
    },
    /// The child is the parent itself or one of its ancestors.
    #[error("appending {child} under {parent} would create a cycle")]
    Cycle {
        /// The intended parent.
        parent: BoxId,
        /// The box being appended.
        child: BoxId,
    },
}

#[derive(Clone, Debug)]
struct Node {
    kind: BoxKind,
    parent: Option<BoxId>,
}

/// An arena of text and container boxes.
///
/// Nodes are created detached and then attached to exactly one container.
/// The arena enforces the tree shape: appending a node that already has a
/// parent, or one that would close a cycle, is rejected.
///
/// ```rust
/// use tracezoom_box_tree::{BoxTree, Direction};
///
/// let mut tree = BoxTree::new();
/// let a = tree.text("a");
/// let b = tree.text("bb");
/// let column = tree.container_with(Direction::Vertical, [a, b]).unwrap();
/// assert_eq!(tree.children(column), &[a, b]);
/// assert_eq!(tree.parent(b), Some(column));
/// ```
#[derive(Clone, Debug, Default)]
pub struct BoxTree {
    nodes: Vec<Node>,
}

impl BoxTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of boxes in the arena, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no box has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, kind: BoxKind) -> BoxId {
        let id = BoxId::from_index(self.nodes.len());
        self.nodes.push(Node { kind, parent: None });
        id
    }

    /// Creates a detached text box without a color.
    pub fn text(&mut self, text: impl Into<String>) -> BoxId {
        self.push(BoxKind::Text(TextBox {
            text: text.into(),
            color: None,
        }))
    }

    /// Creates a detached text box with a color.
    pub fn colored_text(&mut self, text: impl Into<String>, color: Color) -> BoxId {
        self.push(BoxKind::Text(TextBox {
            text: text.into(),
            color: Some(color),
        }))
    }

    /// Creates a detached, empty container.
    pub fn container(&mut self, direction: Direction) -> BoxId {
        self.push(BoxKind::Container(ContainerBox {
            direction,
            children: Vec::new(),
        }))
    }

    /// Creates a container and appends `children` to it in order.
    pub fn container_with(
        &mut self,
        direction: Direction,
        children: impl IntoIterator<Item = BoxId>,
    ) -> Result<BoxId, BoxTreeError> {
        let id = self.container(direction);
        for child in children {
            self.append(id, child)?;
        }
        Ok(id)
    }

    /// Creates a container holding one new text box per item, in order.
    ///
    /// Returns the container and its text boxes. Fresh boxes are always
    /// attachable, so this cannot fail.
    pub fn text_stack<I, S>(&mut self, direction: Direction, texts: I) -> (BoxId, Vec<BoxId>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = self.container(direction);
        let leaves: Vec<BoxId> = texts
            .into_iter()
            .map(|text| {
                let leaf = self.text(text);
                self.nodes[leaf.index()].parent = Some(id);
                leaf
            })
            .collect();
        if let BoxKind::Container(container) = &mut self.nodes[id.index()].kind {
            container.children.extend_from_slice(&leaves);
        }
        (id, leaves)
    }

    /// Appends `child` as the last child of `parent`.
    pub fn append(&mut self, parent: BoxId, child: BoxId) -> Result<(), BoxTreeError> {
        let child_node = self
            .nodes
            .get(child.index())
            .ok_or(BoxTreeError::UnknownBox(child))?;
        if let Some(existing) = child_node.parent {
            return Err(BoxTreeError::AlreadyAttached {
                child,
                parent: existing,
            });
        }
        match self.get(parent) {
            None => return Err(BoxTreeError::UnknownBox(parent)),
            Some(BoxKind::Text(_)) => return Err(BoxTreeError::NotAContainer(parent)),
            Some(BoxKind::Container(_)) => {}
        }
        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return Err(BoxTreeError::Cycle { parent, child });
            }
            cursor = self.parent(ancestor);
        }

        if let BoxKind::Container(container) = &mut self.nodes[parent.index()].kind {
            container.children.push(child);
        }
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Returns the node kind for `id`.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<&BoxKind> {
        self.nodes.get(id.index()).map(|node| &node.kind)
    }

    /// Returns the parent of `id`, if attached.
    #[must_use]
    pub fn parent(&self, id: BoxId) -> Option<BoxId> {
        self.nodes.get(id.index()).and_then(|node| node.parent)
    }

    /// Returns the children of `id`; empty for text boxes and unknown ids.
    #[must_use]
    pub fn children(&self, id: BoxId) -> &[BoxId] {
        match self.get(id) {
            Some(BoxKind::Container(container)) => container.children(),
            _ => &[],
        }
    }

    /// Returns the text of `id` if it is a text box.
    #[must_use]
    pub fn text_of(&self, id: BoxId) -> Option<&str> {
        self.get(id)
            .and_then(BoxKind::as_text)
            .map(|text| text.text.as_str())
    }

    /// Iterates over every box in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (BoxId, &BoxKind)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (BoxId::from_index(idx), &node.kind))
    }

    /// Iterates over the subtree rooted at `root` in pre-order.
    ///
    /// Unknown ids yield nothing.
    pub fn descendants(&self, root: BoxId) -> impl Iterator<Item = BoxId> + '_ {
        let mut stack = if self.get(root).is_some() {
            vec![root]
        } else {
            Vec::new()
        };
        core::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev().copied());
            Some(id)
        })
    }
}
