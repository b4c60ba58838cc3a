//! Render configuration.
//!
//! [`RenderOptions`] is the seam between the engine core and its
//! collaborators: the not-found fallback, the formatter dispatch, the
//! include loader, and the macro registry. [`Options`] is the stock
//! implementation, assembled with a builder:
//!
//! ```
//! use std::collections::HashMap;
//! use textplate::{render_str_with, Options};
//!
//! let opts = Options::builder()
//!     .on_variable_not_found(|name| format!("<missing {name}>"))
//!     .build();
//!
//! let ctx: HashMap<String, textplate::Value> = HashMap::new();
//! let out = render_str_with("Hello ${who}!", &ctx, &opts).unwrap();
//! assert_eq!(out, "Hello <missing who>!");
//! ```

use std::collections::HashMap;

use chrono::FixedOffset;

use crate::context::Lookup;
use crate::error::RenderError;
use crate::format::{DateFormatter, NumberFormatter, ValueFormatter};
use crate::loader::IncludeLoader;
use crate::macros::TemplateMacro;
use crate::value::Value;

/// The capabilities a render call delegates to.
///
/// Implement this directly for full control, or use [`Options`] and replace
/// individual pieces through its builder.
pub trait RenderOptions: Send + Sync {
    /// Fallback text for a variable whose lookup produced nothing. The
    /// current scope is provided for handlers that want to consult other
    /// bindings.
    fn on_variable_not_found(&self, name: &str, lookup: &dyn Lookup) -> String;

    /// Formats a value for a `${name|pattern}` placeholder.
    fn format(&self, value: &Value, pattern: &str) -> Result<String, RenderError>;

    /// Produces the template source for an `$include(path)`.
    fn load_include(&self, path: &str) -> Result<String, RenderError>;

    /// Invokes a macro with its pre-rendered arguments.
    fn call_macro(
        &self,
        name: &str,
        args: &HashMap<String, String>,
    ) -> Result<String, RenderError>;
}

/// Central European Time, the default zone for the stock date formatter.
fn default_zone() -> FixedOffset {
    FixedOffset::east_opt(3600).expect("one hour east of UTC is a valid offset")
}

/// The stock [`RenderOptions`] implementation.
///
/// Defaults: formatter list of [date formatter, number formatter] with the
/// date formatter in CET, no macros, no include loader, and a not-found
/// fallback that renders nothing.
pub struct Options {
    formatters: Vec<Box<dyn ValueFormatter>>,
    macros: HashMap<String, Box<dyn TemplateMacro>>,
    include_loader: Option<Box<dyn IncludeLoader>>,
    not_found: Box<dyn Fn(&str) -> String + Send + Sync>,
}

impl Options {
    /// Starts a builder with the stock defaults.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }

    /// Shorthand for options that differ from the defaults only in the
    /// include loader.
    pub fn with_include_loader(loader: Box<dyn IncludeLoader>) -> Self {
        Self::builder().include_loader(loader).build()
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RenderOptions for Options {
    fn on_variable_not_found(&self, name: &str, _lookup: &dyn Lookup) -> String {
        (self.not_found)(name)
    }

    fn format(&self, value: &Value, pattern: &str) -> Result<String, RenderError> {
        // First registered formatter that recognizes the pattern wins.
        self.formatters
            .iter()
            .find(|f| f.supports(pattern))
            .ok_or_else(|| RenderError::UnsupportedFormat(pattern.to_string()))?
            .format(value, pattern)
    }

    fn load_include(&self, path: &str) -> Result<String, RenderError> {
        match &self.include_loader {
            Some(loader) => loader.load(path),
            None => Err(RenderError::IncludeNotConfigured),
        }
    }

    fn call_macro(
        &self,
        name: &str,
        args: &HashMap<String, String>,
    ) -> Result<String, RenderError> {
        match self.macros.get(name) {
            Some(m) => m.apply(args),
            None => Err(RenderError::NoSuchMacro(name.to_string())),
        }
    }
}

/// Builder for [`Options`].
pub struct OptionsBuilder {
    zone: FixedOffset,
    extra_formatters: Vec<Box<dyn ValueFormatter>>,
    macros: HashMap<String, Box<dyn TemplateMacro>>,
    include_loader: Option<Box<dyn IncludeLoader>>,
    not_found: Box<dyn Fn(&str) -> String + Send + Sync>,
}

impl OptionsBuilder {
    fn new() -> Self {
        Self {
            zone: default_zone(),
            extra_formatters: Vec::new(),
            macros: HashMap::new(),
            include_loader: None,
            not_found: Box::new(|_| String::new()),
        }
    }

    /// Time zone for the stock date formatter; affects how timestamp values
    /// are rendered.
    pub fn time_zone(mut self, zone: FixedOffset) -> Self {
        self.zone = zone;
        self
    }

    /// Appends a formatter after the stock date and number formatters.
    pub fn formatter(mut self, formatter: Box<dyn ValueFormatter>) -> Self {
        self.extra_formatters.push(formatter);
        self
    }

    /// Registers a macro under its own name.
    pub fn add_macro(mut self, m: Box<dyn TemplateMacro>) -> Self {
        self.macros.insert(m.name().to_string(), m);
        self
    }

    /// Registers several macros at once.
    pub fn macros(mut self, macros: Vec<Box<dyn TemplateMacro>>) -> Self {
        for m in macros {
            self.macros.insert(m.name().to_string(), m);
        }
        self
    }

    /// Loader consulted by `$include`.
    pub fn include_loader(mut self, loader: Box<dyn IncludeLoader>) -> Self {
        self.include_loader = Some(loader);
        self
    }

    /// Replaces the not-found fallback.
    pub fn on_variable_not_found(
        mut self,
        handler: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.not_found = Box::new(handler);
        self
    }

    pub fn build(self) -> Options {
        let mut formatters: Vec<Box<dyn ValueFormatter>> = vec![
            Box::new(DateFormatter::new(self.zone)),
            Box::new(NumberFormatter::new()),
        ];
        formatters.extend(self.extra_formatters);
        Options {
            formatters,
            macros: self.macros,
            include_loader: self.include_loader,
            not_found: self.not_found,
        }
    }
}
