// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning one call scope into a box tree of annotated source lines.

use tracezoom_box_tree::{BoxId, BoxTree, BoxTreeError, Direction};
use tracezoom_trace::{
    CallExpr, CallKey, FunctionNode, Grouping, Heap, HistoryEntry, StackFrame, StatementKind,
    SyntaxSource, Value,
};

use crate::config::CodePalette;

/// A call-site box that a nested scope can be drawn into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallBox {
    /// The nested call this box stands for.
    pub key: CallKey,
    /// Text box holding the call expression.
    pub box_id: BoxId,
    /// The call expression as written.
    pub label: String,
}

/// The box tree of one scope.
///
/// The root is a horizontal pair of columns: line numbers and code. Row `i`
/// of one column lines up with row `i` of the other.
#[derive(Clone, Debug)]
pub struct CodeBox {
    /// The tree.
    pub tree: BoxTree,
    /// Horizontal root container.
    pub root: BoxId,
    /// Vertical column of line numbers.
    pub line_numbers: BoxId,
    /// Vertical column of code rows.
    pub code: BoxId,
    /// Call sites, in row order then source order.
    pub call_boxes: Vec<CallBox>,
}

impl CodeBox {
    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tree.children(self.code).len()
    }

    /// Line number shown on `row`.
    #[must_use]
    pub fn line_number(&self, row: usize) -> Option<&str> {
        let id = *self.tree.children(self.line_numbers).get(row)?;
        self.tree.text_of(id)
    }

    /// Text runs of `row`, left to right.
    #[must_use]
    pub fn row_texts(&self, row: usize) -> Vec<&str> {
        let Some(&id) = self.tree.children(self.code).get(row) else {
            return Vec::new();
        };
        self.tree
            .descendants(id)
            .filter_map(|id| self.tree.text_of(id))
            .collect()
    }
}

/// Builds the code box for the scope grouped in `grouping`.
///
/// The function is the one executing in the first entry of the scope. Its
/// signature row comes first when `syntax` knows it, followed by one row per
/// step. Each step row shows the source line, with every user call expression
/// split out into its own box, then annotations:
///
/// 1. the return value of each completed nested call, as `call → value`;
/// 2. for an assignment or declaration, `name = value` as seen by the next step;
/// 3. for a `return`, `return value`.
pub fn build_code_box<S>(
    syntax: &S,
    grouping: &Grouping<'_>,
    palette: &CodePalette,
) -> Result<CodeBox, BoxTreeError>
where
    S: SyntaxSource + ?Sized,
{
    let mut builder = Builder {
        syntax,
        grouping,
        palette,
        tree: BoxTree::new(),
        numbers: Vec::new(),
        rows: Vec::new(),
        call_boxes: Vec::new(),
    };

    let first = grouping.entries().first();
    let current_frame = first.and_then(|e| e.frame_at(grouping.depth().saturating_sub(1)));
    let function = current_frame.and_then(|frame| syntax.function(&frame.fun_name));

    if let (Some(function), Some(first), Some(frame)) = (function, first, current_frame) {
        builder.signature_row(function, frame, &first.heap)?;
    }
    for step in 0..grouping.steps().len() {
        builder.step_row(function, step)?;
    }
    builder.finish()
}

struct Builder<'s, 'g, S: ?Sized> {
    syntax: &'s S,
    grouping: &'s Grouping<'g>,
    palette: &'s CodePalette,
    tree: BoxTree,
    numbers: Vec<BoxId>,
    rows: Vec<BoxId>,
    call_boxes: Vec<CallBox>,
}

impl<S: SyntaxSource + ?Sized> Builder<'_, '_, S> {
    fn source_line(&self, line: u32) -> String {
        self.syntax.source_line(line).unwrap_or_default().to_string()
    }

    fn annotation(&mut self, text: String) -> BoxId {
        self.tree.colored_text(text, self.palette.annotation)
    }

    fn push_row(&mut self, line: u32, runs: Vec<BoxId>) -> Result<(), BoxTreeError> {
        let number = self
            .tree
            .colored_text(line.to_string(), self.palette.line_number);
        let row = if runs.len() == 1 {
            runs[0]
        } else {
            self.tree.container_with(Direction::Horizontal, runs)?
        };
        self.numbers.push(number);
        self.rows.push(row);
        Ok(())
    }

    fn signature_row(
        &mut self,
        function: &FunctionNode,
        frame: &StackFrame,
        heap: &Heap,
    ) -> Result<(), BoxTreeError> {
        let line = function.definition_line();
        let mut runs = vec![
            self.tree
                .colored_text(self.source_line(line), self.palette.code),
        ];
        for (name, value) in &frame.parameters {
            runs.push(self.annotation(format!("  {name} = {}", value.display(heap))));
        }
        self.push_row(line, runs)
    }

    fn step_row(&mut self, function: Option<&FunctionNode>, step: usize) -> Result<(), BoxTreeError> {
        let grouping = self.grouping;
        let Some(info) = grouping.steps().get(step) else {
            return Ok(());
        };
        let text = self.source_line(info.line);
        let mut runs = self.split_calls(&text, info.line, step, &info.calls);

        for (key, _) in grouping.children().filter(|(key, _)| key.step == step) {
            if let Some(note) = self.call_result(key) {
                runs.push(self.annotation(note));
            }
        }
        let kind = function
            .and_then(|f| f.statement_at(info.line))
            .map(|s| &s.kind);
        match kind {
            Some(StatementKind::Assign { name } | StatementKind::Declare { name }) => {
                if let Some(note) = self.assigned_value(step, name) {
                    runs.push(self.annotation(note));
                }
            }
            Some(StatementKind::Return) => {
                if let Some(note) = self.returned_value(step) {
                    runs.push(self.annotation(note));
                }
            }
            Some(StatementKind::Other) | None => {}
        }
        self.push_row(info.line, runs)
    }

    /// Splits `text` into literal runs and one box per call expression.
    fn split_calls(
        &mut self,
        text: &str,
        line: u32,
        step: usize,
        calls: &[&CallExpr],
    ) -> Vec<BoxId> {
        let color = self.palette.code;
        if calls.is_empty() {
            return vec![self.tree.colored_text(text, color)];
        }
        let mut runs = Vec::new();
        let mut cursor = 0;
        for (ordinal, call) in calls.iter().enumerate() {
            let start = byte_index(text, call.span.start.column).max(cursor);
            let end = if call.span.end.line == line {
                byte_index(text, call.span.end.column).max(start)
            } else {
                text.len()
            };
            if start > cursor {
                runs.push(self.tree.colored_text(&text[cursor..start], color));
            }
            let label = text[start..end].to_string();
            let box_id = self.tree.colored_text(label.clone(), color);
            runs.push(box_id);
            self.call_boxes.push(CallBox {
                key: CallKey { step, ordinal },
                box_id,
                label,
            });
            cursor = end;
        }
        if cursor < text.len() {
            runs.push(self.tree.colored_text(&text[cursor..], color));
        }
        runs
    }

    fn call_result(&self, key: CallKey) -> Option<String> {
        let (entry, callee) = self.grouping.callee_exit(key)?;
        let value = callee.return_value()?;
        let label = match self.grouping.call_expr(key) {
            Some(call) => self
                .syntax
                .source_line(call.span.start.line)
                .and_then(|text| slice_columns(text, call))
                .map_or_else(|| callee.invocation_label(&entry.heap), str::to_string),
            None => callee.invocation_label(&entry.heap),
        };
        Some(format!("  {label} → {}", value.display(&entry.heap)))
    }

    fn assigned_value(&self, step: usize, name: &str) -> Option<String> {
        let next = self.grouping.entry_after_step(step)?;
        let value = self.current_frame(next)?.lookup(name)?;
        Some(format!("  {name} = {}", value.display(&next.heap)))
    }

    fn returned_value(&self, step: usize) -> Option<String> {
        let own = self.grouping.step_entries(step).filter_map(|entry| {
            let value = self.current_frame(entry)?.return_value()?;
            Some((value, &entry.heap))
        });
        let (value, heap): (&Value, &Heap) = own.last().or_else(|| {
            let next = self.grouping.entry_after_step(step)?;
            Some((self.current_frame(next)?.return_value()?, &next.heap))
        })?;
        Some(format!("  return {}", value.display(heap)))
    }

    fn current_frame<'e>(&self, entry: &'e HistoryEntry) -> Option<&'e StackFrame> {
        entry.frame_at(self.grouping.depth().checked_sub(1)?)
    }

    fn finish(mut self) -> Result<CodeBox, BoxTreeError> {
        let line_numbers = self
            .tree
            .container_with(Direction::Vertical, self.numbers)?;
        let code = self.tree.container_with(Direction::Vertical, self.rows)?;
        let root = self
            .tree
            .container_with(Direction::Horizontal, [line_numbers, code])?;
        Ok(CodeBox {
            tree: self.tree,
            root,
            line_numbers,
            code,
            call_boxes: self.call_boxes,
        })
    }
}

/// Byte index of character `column` in `text`, clamped to the end.
fn byte_index(text: &str, column: u32) -> usize {
    usize::try_from(column)
        .ok()
        .and_then(|column| text.char_indices().nth(column))
        .map_or(text.len(), |(index, _)| index)
}

fn slice_columns<'t>(text: &'t str, call: &CallExpr) -> Option<&'t str> {
    if call.span.end.line != call.span.start.line {
        return None;
    }
    let start = byte_index(text, call.span.start.column);
    let end = byte_index(text, call.span.end.column);
    text.get(start..end).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::byte_index;

    #[test]
    fn columns_count_characters_not_bytes() {
        let text = "x = «a» + f(1)";
        assert_eq!(byte_index(text, 0), 0);
        assert_eq!(&text[byte_index(text, 10)..], "f(1)");
        assert_eq!(byte_index(text, 99), text.len());
    }
}
