//! # textplate
//!
//! `textplate` compiles a template string into an immutable syntax tree and
//! renders that tree against a caller-supplied context, producing a string.
//! It is built for document workloads (Markdown tables, emails, reports)
//! where the author needs variable interpolation, conditionals, loops over
//! sequences and maps, sub-template composition, and typed formatting of
//! dates and numbers.
//!
//! ## Quick start
//!
//! ```
//! use std::collections::HashMap;
//! use textplate::Value;
//!
//! let mut ctx = HashMap::new();
//! ctx.insert("name".to_string(), Value::from("Alice"));
//! ctx.insert("items".to_string(), Value::from(vec!["one", "two"]));
//!
//! let template = textplate::parse("Hello ${name}!\n$each(items)\n- ${it}\n$end").unwrap();
//! let out = textplate::render(&template, &ctx).unwrap();
//! assert_eq!(out, "Hello Alice!\n- one\n- two\n");
//! ```
//!
//! A parsed [`Template`] is immutable: parse once, cache it, and render it
//! concurrently against as many contexts as you like.
//!
//! ## Template language
//!
//! | Construct | Meaning |
//! |-----------|---------|
//! | `${name}` | insert the value of `name` |
//! | `${name\|format}` | insert `name` formatted by the first matching formatter |
//! | `$$` | a literal `$` |
//! | `$-- ... --$` | comment, emits nothing |
//! | `$if(x) ... $end` | body when `x` is non-null and not `""` |
//! | `$unless(x) ... $end` | body when `x` is null or `""` |
//! | `$if_eq(x, "lit") ... $end` / `$unless_eq` | string-compare against a literal |
//! | `$greater_than(x, N)` / `$less_than` / `_or_eq` variants | integer comparisons |
//! | `$if_has_many(xs)` / `$unless_has_many` | element-count checks |
//! | `$each(xs) ... $end` | loop over a sequence or map |
//! | `$first(xs)` / `$last(xs)` | body once for the first / last element |
//! | `$length(xs)` | element count as a decimal |
//! | `$index(xs, i)` | element `i` of a sequence or key `i` of a map |
//! | `$include(path)` | load, parse, and render another template inline |
//! | `$call(name) $arg(a)...$end $end` | invoke a registered macro |
//!
//! Inside `$each`, the scope binds `it` (the element), `key` (map entries),
//! and the loop metadata `_index`, `_first`, `_last`; `../` escapes to the
//! enclosing scope, and when the element is a map its keys are addressable
//! directly:
//!
//! ```
//! use std::collections::HashMap;
//! use textplate::Value;
//!
//! let mut person = indexmap::IndexMap::new();
//! person.insert("name".to_string(), Value::from("John"));
//! let mut ctx = HashMap::new();
//! ctx.insert("persons".to_string(), Value::Seq(vec![Value::Map(person)]));
//! ctx.insert("title".to_string(), Value::from("Team"));
//!
//! let out = textplate::render_str(
//!     "$each(persons)\n${../title}: ${name}\n$end",
//!     &ctx,
//! )
//! .unwrap();
//! assert_eq!(out, "Team: John\n");
//! ```
//!
//! ## Truthiness
//!
//! `$if` tests "non-null and not the empty string", nothing else. `false`,
//! `0`, and empty sequences are all truthy; use `$if_eq(flag, "true")` for
//! boolean semantics and `$if_has_many` / `$length` for collection checks.
//!
//! ## Layout-friendly whitespace
//!
//! The parser eats trailing whitespace up to and including one newline after
//! each block header, `$end`, and closed comment, so directives can sit on
//! their own lines without injecting blank lines into rendered Markdown.
//!
//! ## Configuration
//!
//! [`Options`] carries the replaceable collaborators: the not-found
//! fallback, the ordered formatter list (dates first, then numbers, then
//! anything registered via [`OptionsBuilder::formatter`]), the include
//! loader, and the macro registry. See [`Options::builder`].

mod ast;
mod context;
mod error;
pub mod format;
mod loader;
mod macros;
mod options;
mod parser;
mod renderer;
mod value;

pub use ast::{MacroArg, Node, Template};
pub use context::Lookup;
pub use error::{ParseError, RenderError};
pub use format::{DateFormatter, NumberFormatter, ValueFormatter};
pub use loader::{DirLoader, IncludeLoader};
pub use macros::{FnMacro, StringTemplateMacro, TemplateMacro};
pub use options::{Options, OptionsBuilder, RenderOptions};
pub use value::{ObjectValue, Value};

/// Parses a template string into an immutable [`Template`].
///
/// Parsing is pure and deterministic; no I/O happens here, even for
/// `$include` directives (those load at render time).
///
/// # Errors
///
/// Returns a [`ParseError`] with a message and zero-based character offset
/// for any structural problem: unknown directives, unterminated blocks,
/// malformed literals, unclosed comments.
pub fn parse(template: &str) -> Result<Template, ParseError> {
    parser::parse_source(template)
}

/// Renders a parsed template against a context with default [`Options`].
pub fn render(template: &Template, context: &dyn Lookup) -> Result<String, RenderError> {
    renderer::render_template(template, context, &Options::default())
}

/// Renders a parsed template with explicit options.
pub fn render_with(
    template: &Template,
    context: &dyn Lookup,
    opts: &dyn RenderOptions,
) -> Result<String, RenderError> {
    renderer::render_template(template, context, opts)
}

/// Parses and renders in one step, with default [`Options`].
pub fn render_str(template: &str, context: &dyn Lookup) -> Result<String, RenderError> {
    render(&parse(template)?, context)
}

/// Parses and renders in one step, with explicit options.
pub fn render_str_with(
    template: &str,
    context: &dyn Lookup,
    opts: &dyn RenderOptions,
) -> Result<String, RenderError> {
    render_with(&parse(template)?, context, opts)
}
