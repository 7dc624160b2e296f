// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace Zoom Trace: recorded executions and the call structure inside them.
//!
//! A trace is a flat, ordered list of [`HistoryEntry`] records, one per executed
//! line, each carrying the full call stack and a heap snapshot. This crate:
//!
//! - deserializes traces from JSON ([`parse_trace`], [`load_trace`]);
//! - models the slice of a syntax tree the viewer needs ([`SyntaxSource`],
//!   implemented by the JSON-loadable [`Program`]);
//! - groups a contiguous slice of a trace into the steps of one function and
//!   the nested calls it makes ([`group`]).
//!
//! ## Trace format
//!
//! ```json
//! [
//!   { "line": 11, "stack": [{ "funName": "main", "parameters": {}, "variables": {} }] },
//!   { "line": 2,  "stack": [{ "funName": "main" }, { "funName": "fib", "parameters": { "n": 2 } }] }
//! ]
//! ```
//!
//! Values are JSON scalars, arrays and objects; `{"$ref": id}` points into the
//! entry's `heap`. A returning frame records its result under
//! [`RETURN_VALUE_SLOT`].
//!
//! ## Grouping
//!
//! ```rust
//! use tracezoom_trace::{CallKey, group, parse_trace};
//!
//! let trace = parse_trace(
//!     r#"[
//!         {"line": 1, "stack": [{"funName": "A"}]},
//!         {"line": 2, "stack": [{"funName": "A"}, {"funName": "B"}]},
//!         {"line": 3, "stack": [{"funName": "A"}]}
//!     ]"#,
//! )
//! .unwrap();
//!
//! let grouping = group(None, &trace, &Default::default());
//! assert_eq!(grouping.current(), &[0, 2]);
//! let nested = grouping.child(CallKey { step: 0, ordinal: 0 }).unwrap();
//! assert_eq!(nested[0].line, 2);
//! ```
//!
//! Every entry ends up either at the current level or in exactly one nested call,
//! and each nested call is a contiguous sub-slice of the input.

mod group;
mod history;
mod syntax;
mod value;

pub use group::{CallKey, Grouping, Step, group};
pub use history::{
    HistoryEntry, RETURN_VALUE_SLOT, StackFrame, TraceError, load_trace, parse_trace,
};
pub use syntax::{
    CallExpr, FunctionNode, Position, Program, Span, Statement, StatementKind, SyntaxSource,
};
pub use value::{Heap, HeapRef, Value, ValueDisplay};
