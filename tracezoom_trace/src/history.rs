// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace entries and their JSON loading.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::{Heap, Value};

/// Frame variable under which the tracer records a function's return value.
pub const RETURN_VALUE_SLOT: &str = "<ret val>";

/// Error returned when loading a trace or a program.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The JSON did not match the expected shape.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The trace contains no entries.
    #[error("trace has no entries")]
    Empty,
    /// An entry has no stack frame.
    #[error("trace entry {index} has an empty stack")]
    EmptyStack {
        /// Position of the entry in the trace.
        index: usize,
    },
}

/// One activation record on the call stack.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    /// Name of the executing function.
    pub fun_name: String,
    /// Arguments in declaration order.
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,
    /// Locals in the order the tracer recorded them.
    #[serde(default)]
    pub variables: IndexMap<String, Value>,
}

impl StackFrame {
    /// Looks a name up among the locals, then the parameters.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.variables
            .get(name)
            .or_else(|| self.parameters.get(name))
    }

    /// The recorded return value, if the frame is returning.
    #[must_use]
    pub fn return_value(&self) -> Option<&Value> {
        self.variables.get(RETURN_VALUE_SLOT)
    }

    /// `name(arg, …)` with arguments rendered through `heap`; string arguments
    /// are shown bare.
    #[must_use]
    pub fn invocation_label(&self, heap: &Heap) -> String {
        let mut label = format!("{}(", self.fun_name);
        for (i, value) in self.parameters.values().enumerate() {
            if i > 0 {
                label.push_str(", ");
            }
            match value {
                Value::Str(text) => label.push_str(text),
                other => {
                    let _ = write!(label, "{}", other.display(heap));
                }
            }
        }
        label.push(')');
        label
    }
}

/// The state of the traced program before executing one line.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 1-based source line about to execute.
    pub line: u32,
    /// Call stack, outermost first.
    pub stack: Vec<StackFrame>,
    /// Heap snapshot that references in this entry resolve against.
    #[serde(default)]
    pub heap: Heap,
}

impl HistoryEntry {
    /// Stack depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The innermost frame.
    #[must_use]
    pub fn frame(&self) -> Option<&StackFrame> {
        self.stack.last()
    }

    /// The frame at `index`, counted from the outermost.
    #[must_use]
    pub fn frame_at(&self, index: usize) -> Option<&StackFrame> {
        self.stack.get(index)
    }
}

/// Parses a trace from a JSON array of entries.
///
/// A trace must have at least one entry and every entry at least one frame.
///
/// ```rust
/// let trace = tracezoom_trace::parse_trace(
///     r#"[{"line": 1, "stack": [{"funName": "main"}]}]"#,
/// )
/// .unwrap();
/// assert_eq!(trace[0].frame().unwrap().fun_name, "main");
/// ```
pub fn parse_trace(json: &str) -> Result<Vec<HistoryEntry>, TraceError> {
    let entries: Vec<HistoryEntry> = serde_json::from_str(json)?;
    if entries.is_empty() {
        return Err(TraceError::Empty);
    }
    if let Some(index) = entries.iter().position(|e| e.stack.is_empty()) {
        return Err(TraceError::EmptyStack { index });
    }
    tracing::debug!(entries = entries.len(), "parsed trace");
    Ok(entries)
}

/// Reads and parses a trace file.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<HistoryEntry>, TraceError> {
    parse_trace(&read(path.as_ref())?)
}

pub(crate) fn read(path: &Path) -> Result<String, TraceError> {
    std::fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
