//! Caller-registered macros, invoked via `$call(name)`.
//!
//! The renderer pre-renders each `$arg` body to a string in the calling
//! scope and hands the macro a name-to-string argument map; whatever the
//! macro returns is spliced into the output verbatim.

use std::collections::HashMap;

use crate::ast::Template;
use crate::error::{ParseError, RenderError};

/// A named macro callable from templates.
pub trait TemplateMacro: Send + Sync {
    /// The name used in `$call(name)`.
    fn name(&self) -> &str;

    /// Produces the replacement text for one invocation.
    fn apply(&self, args: &HashMap<String, String>) -> Result<String, RenderError>;
}

/// A macro backed by a template string.
///
/// The body is parsed once at registration; each invocation renders it with
/// the argument map as the root context.
///
/// ```
/// use std::collections::HashMap;
/// use textplate::{render_str_with, Options, StringTemplateMacro};
///
/// let opts = Options::builder()
///     .add_macro(Box::new(
///         StringTemplateMacro::from_text("greeting", "Hello ${name}!").unwrap(),
///     ))
///     .build();
///
/// let ctx: HashMap<String, textplate::Value> = HashMap::new();
/// let out = render_str_with(
///     "$call(greeting)$arg(name)World$end$end",
///     &ctx,
///     &opts,
/// )
/// .unwrap();
/// assert_eq!(out, "Hello World!");
/// ```
pub struct StringTemplateMacro {
    name: String,
    template: Template,
}

impl StringTemplateMacro {
    pub fn new(name: impl Into<String>, template: Template) -> Self {
        Self {
            name: name.into(),
            template,
        }
    }

    /// Parses `source` and wraps it as a macro named `name`.
    pub fn from_text(name: impl Into<String>, source: &str) -> Result<Self, ParseError> {
        Ok(Self::new(name, crate::parse(source)?))
    }
}

impl TemplateMacro for StringTemplateMacro {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, args: &HashMap<String, String>) -> Result<String, RenderError> {
        crate::render(&self.template, args)
    }
}

/// Convenience for macros written as plain functions.
pub struct FnMacro<F> {
    name: String,
    func: F,
}

impl<F> FnMacro<F>
where
    F: Fn(&HashMap<String, String>) -> String + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> TemplateMacro for FnMacro<F>
where
    F: Fn(&HashMap<String, String>) -> String + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, args: &HashMap<String, String>) -> Result<String, RenderError> {
        Ok((self.func)(args))
    }
}
