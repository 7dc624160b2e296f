// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recorded runtime values and their rendering.

use core::fmt;

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Heap snapshot of one trace entry: heap id → value.
pub type Heap = HashMap<u64, Value>;

/// A pointer into the entry's [`Heap`], written as `{"$ref": id}`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeapRef {
    /// Heap id.
    #[serde(rename = "$ref")]
    pub id: u64,
}

/// A value recorded by the tracer.
///
/// Aggregates either appear inline or behind a [`HeapRef`]; rendering resolves
/// references through the heap of the entry the value came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    Str(String),
    /// A reference into the heap.
    Ref(HeapRef),
    /// An ordered list.
    List(Vec<Value>),
    /// A record with ordered fields.
    Record(IndexMap<String, Value>),
}

impl Value {
    /// Renders this value, resolving references through `heap`.
    ///
    /// ```rust
    /// use tracezoom_trace::{Heap, HeapRef, Value};
    ///
    /// let mut heap = Heap::new();
    /// heap.insert(7, Value::List(vec![Value::Number(1.0), Value::Str("x".into())]));
    /// let v = Value::Ref(HeapRef { id: 7 });
    /// assert_eq!(v.display(&heap).to_string(), r#"[1, "x"]"#);
    /// ```
    #[must_use]
    pub fn display<'a>(&'a self, heap: &'a Heap) -> ValueDisplay<'a> {
        ValueDisplay { value: self, heap }
    }
}

/// [`fmt::Display`] adapter returned by [`Value::display`].
#[derive(Clone, Copy, Debug)]
pub struct ValueDisplay<'a> {
    value: &'a Value,
    heap: &'a Heap,
}

impl fmt::Display for ValueDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut path = Vec::new();
        write_value(f, self.value, self.heap, &mut path)
    }
}

fn write_value(
    f: &mut fmt::Formatter<'_>,
    value: &Value,
    heap: &Heap,
    path: &mut Vec<u64>,
) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Number(n) => write!(f, "{n}"),
        Value::Str(s) => write!(f, "{s:?}"),
        Value::Ref(HeapRef { id }) => {
            if path.contains(id) {
                return f.write_str("<cycle>");
            }
            let Some(target) = heap.get(id) else {
                return write!(f, "<dangling #{id}>");
            };
            path.push(*id);
            let result = write_value(f, target, heap, path);
            path.pop();
            result
        }
        Value::List(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item, heap, path)?;
            }
            f.write_str("]")
        }
        Value::Record(fields) => {
            f.write_str("{")?;
            for (i, (name, item)) in fields.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{name}: ")?;
                write_value(f, item, heap, path)?;
            }
            f.write_str("}")
        }
    }
}
