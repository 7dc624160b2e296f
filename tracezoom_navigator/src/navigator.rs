// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame rendering and the scope chain that keeps zooming continuous.

use core::ops::Range;

use hashbrown::HashSet;
use kurbo::{Rect, Size};
use tracezoom_box_tree::{BoxTree, BoxTreeError, FitError, FitOptions, LayoutMap, fit_box, fit_text};
use tracezoom_measure::{FontSetting, TextMeasurer};
use tracezoom_trace::{HistoryEntry, SyntaxSource, group};
use tracezoom_view2d::Viewport;

use crate::code_box::build_code_box;
use crate::config::{LabelStyle, NavigatorConfig};
use crate::display::{DrawCommand, Frame, VisitedScope};

/// Error returned by [`Navigator::render_frame`].
#[derive(Debug, thiserror::Error)]
pub enum NavigatorError {
    /// The anchor scope could not be fitted.
    #[error(transparent)]
    Fit(#[from] FitError),
    /// A code box could not be assembled.
    #[error(transparent)]
    Tree(#[from] BoxTreeError),
    /// The innermost scope points outside the trace.
    #[error("scope entries {start}..{end} are outside a trace of {len} entries")]
    ScopeOutOfRange {
        /// Start of the scope range.
        start: usize,
        /// End of the scope range.
        end: usize,
        /// Trace length.
        len: usize,
    },
    /// The innermost scope has no entries.
    #[error("scope has no entries")]
    EmptyScope,
}

/// A region of the world plane showing one call.
#[derive(Clone, Debug, PartialEq)]
pub struct Scope {
    /// Where the scope lives on the world plane.
    pub world_bounds: Rect,
    /// Contiguous range of trace entries; the first entry sets the current level.
    pub entries: Range<usize>,
    /// The call expression that made this call; `None` for the root.
    pub call_label: Option<String>,
}

impl Scope {
    /// The whole trace at `world_bounds`.
    #[must_use]
    pub fn root(trace_len: usize, world_bounds: Rect) -> Self {
        Self {
            world_bounds,
            entries: 0..trace_len,
            call_label: None,
        }
    }
}

/// The scopes currently containing the whole canvas, innermost first.
///
/// Never empty: the last element is the root scope.
#[derive(Clone, Debug, PartialEq)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
}

impl ScopeChain {
    /// A chain of just the root scope, placed on the world rectangle the size
    /// of `canvas` at the origin.
    #[must_use]
    pub fn root(trace_len: usize, canvas: Size) -> Self {
        Self {
            scopes: vec![Scope::root(trace_len, canvas.to_rect())],
        }
    }

    /// A chain from scopes ordered innermost first; `None` if `scopes` is empty.
    #[must_use]
    pub fn new(scopes: Vec<Scope>) -> Option<Self> {
        (!scopes.is_empty()).then_some(Self { scopes })
    }

    /// Number of scopes.
    #[expect(clippy::len_without_is_empty, reason = "a chain always holds the root")]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// The scope rendering starts from.
    #[must_use]
    pub fn innermost(&self) -> &Scope {
        &self.scopes[0]
    }

    /// The root scope.
    #[must_use]
    pub fn outermost(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    /// Scopes, innermost first.
    #[must_use]
    pub fn as_slice(&self) -> &[Scope] {
        &self.scopes
    }
}

/// Everything a frame reads besides the measurer.
#[derive(Debug)]
pub struct FrameInput<'a, S: ?Sized> {
    /// The full trace.
    pub trace: &'a [HistoryEntry],
    /// Syntax of the traced program.
    pub syntax: &'a S,
    /// Camera for this frame.
    pub viewport: Viewport,
    /// Canvas size in screen pixels.
    pub canvas: Size,
}

/// Result of [`Navigator::render_frame`].
#[derive(Clone, Debug)]
pub struct FrameOutcome {
    /// The chain to pass to the next frame.
    pub chain: ScopeChain,
    /// What to draw.
    pub frame: Frame,
    /// `true` if `chain` differs from the chain passed in.
    ///
    /// A host should schedule another frame when this is set, since the
    /// chain moves by at most one level per frame.
    pub changed: bool,
}

/// Renders nested call scopes of a trace and tracks the anchoring scope.
#[derive(Clone, Debug, Default)]
pub struct Navigator {
    config: NavigatorConfig,
}

impl Navigator {
    /// Creates a navigator.
    #[must_use]
    pub fn new(config: NavigatorConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Renders one frame starting from the innermost scope of `chain`.
    ///
    /// A scope whose screen rectangle misses the canvas is skipped. A scope
    /// covering less than [`NavigatorConfig::collapse_ratio`] of the canvas is
    /// drawn as a label. Any other scope is drawn as code, and every call
    /// made from it is visited in turn, inside the box of its call site.
    ///
    /// A scope anchors when its screen rectangle contains the whole canvas.
    /// The returned chain is the deepest chain of anchoring scopes found,
    /// but at most one level deeper than `chain`. Without any anchor, the
    /// innermost scope is dropped, or, for a single-scope chain, the root is
    /// kept.
    pub fn render_frame<S, M>(
        &self,
        chain: &ScopeChain,
        input: &FrameInput<'_, S>,
        measurer: &mut M,
    ) -> Result<FrameOutcome, NavigatorError>
    where
        S: SyntaxSource + ?Sized,
        M: TextMeasurer + ?Sized,
    {
        let start = chain.innermost();
        if start.entries.is_empty() {
            return Err(NavigatorError::EmptyScope);
        }
        if start.entries.end > input.trace.len() {
            return Err(NavigatorError::ScopeOutOfRange {
                start: start.entries.start,
                end: start.entries.end,
                len: input.trace.len(),
            });
        }

        let mut pass = Pass {
            config: &self.config,
            fit: self.config.fit_options(),
            input,
            user: input.syntax.user_functions(),
            measurer,
            frame: Frame::default(),
        };
        let found = pass.visit(start, &chain.as_slice()[1..], true)?;
        let frame = pass.frame;

        let old_len = chain.len();
        let next = match found {
            Some(mut scopes) => {
                let excess = scopes.len().saturating_sub(old_len + 1);
                scopes.drain(..excess);
                ScopeChain { scopes }
            }
            None if old_len > 1 => ScopeChain {
                scopes: chain.as_slice()[1..].to_vec(),
            },
            None => ScopeChain {
                scopes: vec![chain.outermost().clone()],
            },
        };
        let changed = next != *chain;
        if changed {
            tracing::debug!(from = old_len, to = next.len(), "scope chain moved");
        }
        Ok(FrameOutcome {
            chain: next,
            frame,
            changed,
        })
    }
}

struct Pass<'a, 'i, S: ?Sized, M: ?Sized> {
    config: &'a NavigatorConfig,
    fit: FitOptions,
    input: &'a FrameInput<'i, S>,
    user: HashSet<&'i str>,
    measurer: &'a mut M,
    frame: Frame,
}

impl<S, M> Pass<'_, '_, S, M>
where
    S: SyntaxSource + ?Sized,
    M: TextMeasurer + ?Sized,
{
    /// Draws `scope` and its visible calls; returns the anchoring chain, if any.
    fn visit(
        &mut self,
        scope: &Scope,
        ancestry: &[Scope],
        is_start: bool,
    ) -> Result<Option<Vec<Scope>>, NavigatorError> {
        let viewport = self.input.viewport;
        let canvas = self.input.canvas.to_rect();
        let screen_rect = viewport.world_to_screen_rect(scope.world_bounds);
        if !overlaps(screen_rect, canvas) {
            tracing::trace!(entries = ?scope.entries, "scope off screen");
            return Ok(None);
        }

        let trace = self.input.trace;
        let entries = &trace[scope.entries.clone()];
        let Some(first) = entries.first() else {
            return Err(NavigatorError::EmptyScope);
        };
        let area_ratio = screen_rect.area() / canvas.area();
        tracing::trace!(entries = ?scope.entries, area_ratio, "visiting scope");
        self.frame.commands.push(DrawCommand::Clear(screen_rect));

        if area_ratio < self.config.collapse_ratio {
            let label = match (self.config.label_style, &scope.call_label) {
                (LabelStyle::CallSite, Some(call)) => call.clone(),
                _ => first
                    .frame()
                    .map(|frame| frame.invocation_label(&first.heap))
                    .unwrap_or_default(),
            };
            let fitted = match fit_text(&label, screen_rect, &self.fit, &mut *self.measurer) {
                Ok(fitted) => fitted,
                Err(err) => return self.unfittable(err, scope, is_start),
            };
            self.emit_texts(&fitted.tree, &fitted.fit.layout, &fitted.fit.font);
            self.visited(scope, screen_rect, false);
            return Ok(None);
        }

        let syntax = self.input.syntax;
        let function = first.frame().and_then(|frame| syntax.function(&frame.fun_name));
        let grouping = group(function, entries, &self.user);
        let code = build_code_box(syntax, &grouping, &self.config.palette)?;
        let fit = match fit_box(&code.tree, code.root, screen_rect, &self.fit, &mut *self.measurer) {
            Ok(fit) => fit,
            Err(err) => return self.unfittable(err, scope, is_start),
        };
        self.frame.commands.push(DrawCommand::Stroke(screen_rect));
        self.emit_texts(&code.tree, &fit.layout, &fit.font);
        self.visited(scope, screen_rect, true);

        let mut lineage = Vec::with_capacity(ancestry.len() + 1);
        lineage.push(scope.clone());
        lineage.extend_from_slice(ancestry);

        let mut deepest: Option<Vec<Scope>> = None;
        for call in &code.call_boxes {
            let Some(range) = grouping.child_range(call.key) else {
                continue;
            };
            let Some(call_rect) = fit.layout.get(call.box_id) else {
                continue;
            };
            let child = Scope {
                world_bounds: viewport.screen_to_world_rect(call_rect),
                entries: scope.entries.start + range.start..scope.entries.start + range.end,
                call_label: Some(call.label.clone()),
            };
            if let Some(found) = self.visit(&child, &lineage, false)? {
                if deepest.as_ref().is_none_or(|d| found.len() > d.len()) {
                    deepest = Some(found);
                }
            }
        }

        if deepest.is_some() {
            Ok(deepest)
        } else if contains(screen_rect, canvas) {
            Ok(Some(lineage))
        } else {
            Ok(None)
        }
    }

    /// A scope that cannot be fitted is skipped when nested and fatal at the start.
    fn unfittable(
        &mut self,
        err: FitError,
        scope: &Scope,
        is_start: bool,
    ) -> Result<Option<Vec<Scope>>, NavigatorError> {
        if is_start || !matches!(err, FitError::CannotFit { .. }) {
            return Err(err.into());
        }
        tracing::debug!(entries = ?scope.entries, %err, "skipping scope that cannot fit");
        Ok(None)
    }

    fn emit_texts(&mut self, tree: &BoxTree, layout: &LayoutMap, font: &FontSetting) {
        for (id, kind) in tree.iter() {
            let Some(text) = kind.as_text() else {
                continue;
            };
            if text.text.is_empty() {
                continue;
            }
            let Some(screen_rect) = layout.get(id) else {
                continue;
            };
            self.frame.commands.push(DrawCommand::Text {
                text: text.text.clone(),
                screen_rect,
                font: font.clone(),
                color: text.color,
            });
        }
    }

    fn visited(&mut self, scope: &Scope, screen_rect: Rect, expanded: bool) {
        self.frame.scopes.push(VisitedScope {
            scope: scope.clone(),
            screen_rect,
            expanded,
        });
    }
}

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

fn contains(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && outer.x1 >= inner.x1 && outer.y1 >= inner.y1
}
