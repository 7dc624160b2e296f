// Copyright 2025 the Trace Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The slice of a syntax tree the viewer consumes.
//!
//! Parsing is out of scope: a front end produces these nodes (for example as
//! JSON next to the trace) and the viewer only queries them.

use std::path::Path;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::history::{TraceError, read};

/// A source position. Lines are 1-based, columns are 0-based character offsets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 1-based line.
    pub line: u32,
    /// 0-based column, in characters.
    pub column: u32,
    /// Byte offset into the whole source, when the front end provides one.
    #[serde(default)]
    pub offset: usize,
}

impl Position {
    /// Creates a position without a byte offset.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            offset: 0,
        }
    }

    fn line_column(self) -> (u32, u32) {
        (self.line, self.column)
    }
}

/// A half-open source range.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// First position covered.
    pub start: Position,
    /// First position past the end.
    pub end: Position,
}

impl Span {
    /// Creates a span from `(line, column)` pairs.
    #[must_use]
    pub const fn new(start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            start: Position::new(start.0, start.1),
            end: Position::new(end.0, end.1),
        }
    }
}

/// A call expression inside a function body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallExpr {
    /// Name of the called function.
    pub callee: String,
    /// Source range of the whole call, arguments included.
    pub span: Span,
}

/// What a statement does, as far as annotations are concerned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatementKind {
    /// Assignment to an existing variable.
    Assign {
        /// Assigned variable.
        name: String,
    },
    /// Declaration of a new variable with an initializer.
    Declare {
        /// Declared variable.
        name: String,
    },
    /// A `return` statement.
    Return,
    /// Anything else.
    Other,
}

/// A statement and where it is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Statement kind.
    pub kind: StatementKind,
    /// Source range.
    pub span: Span,
}

/// A function definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionNode {
    /// Function name.
    pub name: String,
    /// Parameter names in declaration order.
    #[serde(default)]
    pub params: Vec<String>,
    /// Source range of the definition; it starts on the signature line.
    pub span: Span,
    /// Every call expression in the body, in source order.
    #[serde(default)]
    pub calls: Vec<CallExpr>,
    /// Statements of the body.
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl FunctionNode {
    /// Line of the signature.
    #[must_use]
    pub fn definition_line(&self) -> u32 {
        self.span.start.line
    }

    /// The first statement starting on `line`.
    #[must_use]
    pub fn statement_at(&self, line: u32) -> Option<&Statement> {
        self.statements.iter().find(|s| s.span.start.line == line)
    }

    /// Calls to functions in `user` that start on `line`.
    ///
    /// Only outermost calls are kept: a call nested in the arguments of an
    /// earlier one is dropped. The result is sorted by column.
    #[must_use]
    pub fn calls_on_line(&self, line: u32, user: &HashSet<&str>) -> Vec<&CallExpr> {
        let mut on_line: Vec<&CallExpr> = self
            .calls
            .iter()
            .filter(|c| c.span.start.line == line && user.contains(c.callee.as_str()))
            .collect();
        on_line.sort_by_key(|c| (c.span.start.column, core::cmp::Reverse(c.span.end.line_column())));

        let mut outermost: Vec<&CallExpr> = Vec::with_capacity(on_line.len());
        for call in on_line {
            let nested = outermost
                .last()
                .is_some_and(|prev| call.span.start.line_column() < prev.span.end.line_column());
            if !nested {
                outermost.push(call);
            }
        }
        outermost
    }
}

/// Read access to the syntax tree of the traced program.
pub trait SyntaxSource {
    /// All function definitions.
    fn functions(&self) -> &[FunctionNode];

    /// Text of 1-based `line`, without its terminator.
    fn source_line(&self, line: u32) -> Option<&str>;

    /// Looks a function up by name.
    fn function(&self, name: &str) -> Option<&FunctionNode> {
        self.functions().iter().find(|f| f.name == name)
    }

    /// Names of the functions defined in the program.
    fn user_functions(&self) -> HashSet<&str> {
        self.functions().iter().map(|f| f.name.as_str()).collect()
    }
}

#[derive(Deserialize)]
struct ProgramRepr {
    source: String,
    #[serde(default)]
    functions: Vec<FunctionNode>,
}

/// Source text plus the function definitions found in it.
///
/// Deserializes from `{"source": "...", "functions": [...]}`.
///
/// ```rust
/// use tracezoom_trace::{FunctionNode, Program, Span, SyntaxSource};
///
/// let program = Program::new(
///     "def main() {\n  print(1)\n}",
///     vec![FunctionNode {
///         name: "main".into(),
///         params: vec![],
///         span: Span::new((1, 0), (3, 1)),
///         calls: vec![],
///         statements: vec![],
///     }],
/// );
/// assert_eq!(program.source_line(2), Some("  print(1)"));
/// assert!(program.function("main").is_some());
/// ```
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "ProgramRepr")]
pub struct Program {
    source: String,
    lines: Vec<(usize, usize)>,
    functions: Vec<FunctionNode>,
}

impl From<ProgramRepr> for Program {
    fn from(repr: ProgramRepr) -> Self {
        Self::new(repr.source, repr.functions)
    }
}

impl Program {
    /// Indexes `source` by line.
    pub fn new(source: impl Into<String>, functions: Vec<FunctionNode>) -> Self {
        let source = source.into();
        let mut lines = Vec::new();
        let mut start = 0;
        for line in source.split('\n') {
            let end = start + line.len();
            let trimmed = if line.ends_with('\r') { end - 1 } else { end };
            lines.push((start, trimmed));
            start = end + 1;
        }
        Self {
            source,
            lines,
            functions,
        }
    }

    /// Parses a program from JSON.
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a program file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        Self::from_json(&read(path.as_ref())?)
    }

    /// The whole source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of source lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl SyntaxSource for Program {
    fn functions(&self) -> &[FunctionNode] {
        &self.functions
    }

    fn source_line(&self, line: u32) -> Option<&str> {
        let index = usize::try_from(line).ok()?.checked_sub(1)?;
        let &(start, end) = self.lines.get(index)?;
        self.source.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use hashbrown::HashSet;

    use super::{CallExpr, FunctionNode, Program, Span, StatementKind, SyntaxSource};

    fn call(callee: &str, start: (u32, u32), end: (u32, u32)) -> CallExpr {
        CallExpr {
            callee: callee.into(),
            span: Span::new(start, end),
        }
    }

    fn function(calls: Vec<CallExpr>) -> FunctionNode {
        FunctionNode {
            name: "f".into(),
            params: vec![],
            span: Span::new((1, 0), (9, 1)),
            calls,
            statements: vec![],
        }
    }

    #[test]
    fn calls_on_line_are_user_outermost_and_sorted() {
        // `    return g(h(1)) + g(2) + len(x)` on line 4
        let f = function(vec![
            call("g", (4, 25), (4, 29)),
            call("len", (4, 32), (4, 38)),
            call("g", (4, 11), (4, 18)),
            call("h", (4, 13), (4, 17)),
            call("g", (5, 4), (5, 8)),
        ]);
        let user: HashSet<&str> = ["f", "g", "h"].into_iter().collect();
        let found: Vec<_> = f
            .calls_on_line(4, &user)
            .into_iter()
            .map(|c| c.span.start.column)
            .collect();
        assert_eq!(found, vec![11, 25]);
    }

    #[test]
    fn multi_line_call_swallows_later_calls() {
        let f = function(vec![call("g", (2, 4), (3, 6)), call("g", (2, 10), (2, 14))]);
        let user: HashSet<&str> = ["g"].into_iter().collect();
        assert_eq!(f.calls_on_line(2, &user).len(), 1);
    }

    #[test]
    fn program_json_and_lines() {
        let program = Program::from_json(
            r#"{
                "source": "def id(x) {\r\n    return x\r\n}",
                "functions": [{
                    "name": "id",
                    "params": ["x"],
                    "span": {"start": {"line": 1, "column": 0}, "end": {"line": 3, "column": 1}},
                    "statements": [{
                        "kind": {"type": "return"},
                        "span": {"start": {"line": 2, "column": 4}, "end": {"line": 2, "column": 12}}
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(program.line_count(), 3);
        assert_eq!(program.source_line(2), Some("    return x"));
        assert_eq!(program.source_line(0), None);
        assert_eq!(program.source_line(4), None);
        let id = program.function("id").unwrap();
        assert_eq!(id.definition_line(), 1);
        assert_eq!(id.statement_at(2).map(|s| &s.kind), Some(&StatementKind::Return));
        assert!(program.user_functions().contains("id"));
    }
}
