// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The display list a frame produces.

use kurbo::Rect;
use peniko::Color;
use tracezoom_measure::FontSetting;

use crate::navigator::Scope;

/// One drawing instruction, in screen coordinates.
///
/// Commands are ordered: a renderer replays them front to back.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Clear the rectangle to the background.
    Clear(Rect),
    /// Outline the rectangle.
    Stroke(Rect),
    /// Draw one line of text with its top-left corner at the rectangle's origin.
    Text {
        /// The text.
        text: String,
        /// Box laid out for the text.
        screen_rect: Rect,
        /// Font to draw with.
        font: FontSetting,
        /// Fill color; `None` leaves it to the renderer.
        color: Option<Color>,
    },
}

/// A scope reached during a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct VisitedScope {
    /// The scope.
    pub scope: Scope,
    /// Where it was drawn.
    pub screen_rect: Rect,
    /// `true` if drawn as code, `false` if drawn as a label.
    pub expanded: bool,
}

/// Output of one render pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Display list.
    pub commands: Vec<DrawCommand>,
    /// Scopes drawn, in visit order.
    pub scopes: Vec<VisitedScope>,
}

impl Frame {
    /// Text of every text command, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
