//! The template syntax tree.
//!
//! [`Template`] is the immutable result of [`parse`](crate::parse): a flat
//! sequence of [`Node`]s, where block directives own their bodies as nested
//! sequences. Once built, a tree is never mutated; it can be cached and
//! shared freely across threads and renders.

/// One parsed construct in a template.
///
/// Block variants (`IfTrue`, `Each`, ...) carry a fully closed body; the
/// parser rejects templates whose blocks are not terminated with `$end`.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A literal run of text, emitted verbatim.
    Text(String),
    /// `${name}` or `${name|format}`.
    Variable {
        name: String,
        format: Option<String>,
    },
    /// `$-- ... --$`, emits nothing.
    Comment,
    /// `$if(condition) body $end`: body iff lookup is non-null and not `""`.
    IfTrue { condition: String, body: Vec<Node> },
    /// `$unless(condition) body $end`: body iff lookup is null or `""`.
    IfFalse { condition: String, body: Vec<Node> },
    /// `$if_eq(variable, "literal") body $end`.
    IfEq {
        variable: String,
        literal: String,
        body: Vec<Node>,
    },
    /// `$unless_eq(variable, "literal") body $end`.
    UnlessEq {
        variable: String,
        literal: String,
        body: Vec<Node>,
    },
    /// `$greater_than(variable, N) body $end`.
    GreaterThan {
        variable: String,
        literal: i64,
        body: Vec<Node>,
    },
    /// `$less_than(variable, N) body $end`.
    LessThan {
        variable: String,
        literal: i64,
        body: Vec<Node>,
    },
    /// `$greater_than_or_eq(variable, N) body $end`.
    GreaterThanOrEq {
        variable: String,
        literal: i64,
        body: Vec<Node>,
    },
    /// `$less_than_or_eq(variable, N) body $end`.
    LessThanOrEq {
        variable: String,
        literal: i64,
        body: Vec<Node>,
    },
    /// `$if_has_many(iterable) body $end`: body iff the sequence yields two
    /// or more elements.
    IfHasMany { iterable: String, body: Vec<Node> },
    /// `$unless_has_many(iterable) body $end`.
    UnlessHasMany { iterable: String, body: Vec<Node> },
    /// `$each(iterable) body $end`.
    Each { iterable: String, body: Vec<Node> },
    /// `$first(iterable) body $end`: body once, with the first element bound
    /// to `it`.
    First { iterable: String, body: Vec<Node> },
    /// `$last(iterable) body $end`: body once, with the last element bound
    /// to `it`.
    Last { iterable: String, body: Vec<Node> },
    /// `$length(iterable)`: emits the element count as a decimal integer.
    Length { iterable: String },
    /// `$index(variable, idx)`: emits `collection[idx]` or `map[idx]`.
    ///
    /// The index is `None` when the argument was blank. Otherwise it is
    /// either a literal or a `${NAME}` reference resolved at render time.
    Index {
        variable: String,
        index: Option<String>,
    },
    /// `$include(path)`: loads, parses, and renders another template inline.
    Include { path: String },
    /// `$call(name) $arg(a) ... $end ... $end`: invokes a registered macro.
    Call { name: String, args: Vec<MacroArg> },
}

/// One `$arg(name) body $end` block inside a `$call`.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroArg {
    pub name: String,
    pub body: Vec<Node>,
}

/// An immutable parsed template.
///
/// Safe to share across threads and cache indefinitely; concurrent renders
/// against the same template with distinct contexts are supported.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub(crate) children: Vec<Node>,
}

impl Template {
    /// The top-level nodes of the template, in source order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }
}
