// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Splitting a trace slice into the current function's steps and its nested calls.

use core::ops::Range;

use hashbrown::HashSet;
use indexmap::IndexMap;

use crate::history::{HistoryEntry, StackFrame};
use crate::syntax::{CallExpr, FunctionNode};

/// Identifies one nested call within a [`Grouping`].
///
/// `step` is the index of the step whose line made the call and `ordinal` the
/// position of the call among that step's calls, in execution order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallKey {
    /// Index into [`Grouping::steps`].
    pub step: usize,
    /// Which call of the step.
    pub ordinal: usize,
}

/// A run of current-level entries on one line.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<'a> {
    /// 1-based source line.
    pub line: u32,
    /// Range into [`Grouping::current`].
    pub current: Range<usize>,
    /// User-defined calls starting on `line`, outermost only, in source order.
    ///
    /// The `n`th nested call of the step is matched with `calls[n]`.
    pub calls: Vec<&'a CallExpr>,
}

/// The result of [`group`].
#[derive(Clone, Debug, Default)]
pub struct Grouping<'a> {
    entries: &'a [HistoryEntry],
    depth: usize,
    current: Vec<usize>,
    steps: Vec<Step<'a>>,
    children: IndexMap<CallKey, Range<usize>>,
}

impl<'a> Grouping<'a> {
    /// The grouped slice.
    #[must_use]
    pub fn entries(&self) -> &'a [HistoryEntry] {
        self.entries
    }

    /// Stack depth of the current level; 0 for an empty slice.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns `true` if the slice was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices of current-level entries, in order.
    #[must_use]
    pub fn current(&self) -> &[usize] {
        &self.current
    }

    /// Current-level entries, in order.
    pub fn current_entries(&self) -> impl Iterator<Item = &'a HistoryEntry> + '_ {
        let entries = self.entries;
        self.current.iter().map(move |&i| &entries[i])
    }

    /// Steps, in order.
    #[must_use]
    pub fn steps(&self) -> &[Step<'a>] {
        &self.steps
    }

    /// Current-level entries of step `step`.
    pub fn step_entries(&self, step: usize) -> impl Iterator<Item = &'a HistoryEntry> + '_ {
        let entries = self.entries;
        let indices = self
            .steps
            .get(step)
            .and_then(|s| self.current.get(s.current.clone()))
            .unwrap_or(&[]);
        indices.iter().map(move |&i| &entries[i])
    }

    /// First entry of the step after `step`.
    #[must_use]
    pub fn entry_after_step(&self, step: usize) -> Option<&'a HistoryEntry> {
        let next = self.steps.get(step + 1)?;
        let &index = self.current.get(next.current.start)?;
        self.entries.get(index)
    }

    /// Nested calls and their ranges into [`Grouping::entries`], in trace order.
    pub fn children(&self) -> impl Iterator<Item = (CallKey, Range<usize>)> + '_ {
        self.children.iter().map(|(k, r)| (*k, r.clone()))
    }

    /// Number of nested calls.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Range of the nested call `key` within [`Grouping::entries`].
    #[must_use]
    pub fn child_range(&self, key: CallKey) -> Option<Range<usize>> {
        self.children.get(&key).cloned()
    }

    /// Entries of the nested call `key`.
    #[must_use]
    pub fn child(&self, key: CallKey) -> Option<&'a [HistoryEntry]> {
        let range = self.children.get(&key)?;
        self.entries.get(range.clone())
    }

    /// The call expression matched with `key`, if the step has that many calls.
    #[must_use]
    pub fn call_expr(&self, key: CallKey) -> Option<&'a CallExpr> {
        self.steps.get(key.step)?.calls.get(key.ordinal).copied()
    }

    /// The callee's last frame within the nested call `key`.
    ///
    /// This is the frame one level below the current one in the last entry
    /// that is exactly one level deeper, which is where a returning callee
    /// records its return value.
    #[must_use]
    pub fn callee_exit(&self, key: CallKey) -> Option<(&'a HistoryEntry, &'a StackFrame)> {
        let entry = self
            .child(key)?
            .iter()
            .rev()
            .find(|e| e.depth() == self.depth + 1)?;
        Some((entry, entry.frame_at(self.depth)?))
    }
}

/// Partitions `entries` into the current level and nested calls.
///
/// The current level is the stack depth of `entries[0]`. Current-level entries
/// form steps: consecutive entries on the same line are one step. Every deeper
/// entry belongs to the call made by the latest step, keyed by [`CallKey`]. A
/// step's call ordinal moves on when
///
/// - a current-level entry of the same step follows nested entries,
/// - a nested entry follows one where the callee recorded its return value
///   in [`RETURN_VALUE_SLOT`](crate::RETURN_VALUE_SLOT), unless it repeats that same frame, or
/// - the callee's function name changes between two consecutive nested
///   entries, for callees that record no return value.
///
/// Argument values never split a call: a callee may reassign its own
/// parameters.
///
/// `function` supplies the call expressions of each step line; with `None`,
/// steps have no calls but entries are partitioned all the same.
///
/// Entries shallower than the current level are kept at the current level
/// and logged. Nothing is dropped.
pub fn group<'a>(
    function: Option<&'a FunctionNode>,
    entries: &'a [HistoryEntry],
    user: &HashSet<&str>,
) -> Grouping<'a> {
    let Some(first) = entries.first() else {
        return Grouping::default();
    };
    let depth = first.depth();
    let mut grouping = Grouping {
        entries,
        depth,
        ..Grouping::default()
    };

    let mut ordinal = 0;
    let mut open: Option<(CallKey, usize)> = None;
    let mut last_callee: Option<&StackFrame> = None;
    let mut returned = false;

    for (index, entry) in entries.iter().enumerate() {
        let entry_depth = entry.depth();
        if entry_depth <= depth {
            if entry_depth < depth {
                tracing::warn!(
                    index,
                    depth = entry_depth,
                    expected = depth,
                    "trace entry is shallower than its scope; keeping it at the current level"
                );
            }
            close(&mut grouping.children, &mut open, index);
            let nested_before = last_callee.take().is_some();
            returned = false;
            let position = grouping.current.len();
            match grouping.steps.last_mut() {
                Some(step) if step.line == entry.line => {
                    if nested_before {
                        ordinal += 1;
                    }
                    step.current.end = position + 1;
                }
                _ => {
                    let calls = function
                        .map(|f| f.calls_on_line(entry.line, user))
                        .unwrap_or_default();
                    grouping.steps.push(Step {
                        line: entry.line,
                        current: position..position + 1,
                        calls,
                    });
                    ordinal = 0;
                }
            }
            grouping.current.push(index);
        } else {
            let callee = &entry.stack[depth];
            if last_callee.is_some_and(|prev| starts_new_call(prev, returned, callee)) {
                close(&mut grouping.children, &mut open, index);
                ordinal += 1;
            }
            returned = entry_depth == depth + 1 && callee.return_value().is_some();
            if open.is_none() {
                let step = grouping.steps.len().saturating_sub(1);
                open = Some((CallKey { step, ordinal }, index));
            }
            last_callee = Some(callee);
        }
    }
    close(&mut grouping.children, &mut open, entries.len());

    tracing::trace!(
        depth,
        steps = grouping.steps.len(),
        calls = grouping.children.len(),
        "grouped trace slice"
    );
    grouping
}

/// Whether `callee` belongs to a different call than the previous nested entry.
fn starts_new_call(prev: &StackFrame, prev_returned: bool, callee: &StackFrame) -> bool {
    prev.fun_name != callee.fun_name || (prev_returned && prev != callee)
}

fn close(
    children: &mut IndexMap<CallKey, Range<usize>>,
    open: &mut Option<(CallKey, usize)>,
    end: usize,
) {
    if let Some((key, start)) = open.take() {
        children.insert(key, start..end);
    }
}
