//! Variable lookup and the lexical scope chain.
//!
//! A context is anything that can answer `name -> Option<Value>`: the
//! [`Lookup`] trait. Callers supply the root context; iteration constructs
//! (`$each`, `$first`, `$last`) layer derived scopes on top of it at render
//! time.
//!
//! # Resolution rules in a derived scope
//!
//! 1. Names starting with `../` strip the prefix and re-resolve on the
//!    parent scope; multiple `../` stack.
//! 2. The reserved names `it`, `key`, `_index`, `_first`, `_last` resolve to
//!    the bindings of the current frame, where applicable.
//! 3. If the current focus value is a map, any other name falls through to a
//!    key lookup on that map (absent keys resolve to nothing).
//! 4. Otherwise resolution fails with
//!    [`RenderError::UnknownVariable`](crate::RenderError::UnknownVariable).
//!
//! The root context is exempt from rule 4: missing names resolve to nothing,
//! which routes variable rendering to the not-found fallback.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use crate::error::RenderError;
use crate::value::Value;

/// A name-to-value lookup capability.
///
/// Implementations exist for the common map types, for closures, and for
/// `serde_json` objects, so most callers never implement this by hand:
///
/// ```
/// use std::collections::HashMap;
/// use textplate::{render_str, Value};
///
/// let mut ctx = HashMap::new();
/// ctx.insert("name".to_string(), Value::from("Alice"));
/// assert_eq!(render_str("Hello ${name}!", &ctx).unwrap(), "Hello Alice!");
/// ```
///
/// Lookups are expected to be pure; the engine may invoke them any number of
/// times per render and does not synchronize them.
pub trait Lookup {
    /// Resolves a variable name, or `None` if the name is not bound.
    fn lookup(&self, name: &str) -> Option<Value>;
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<Value>,
{
    fn lookup(&self, name: &str) -> Option<Value> {
        (self)(name)
    }
}

impl Lookup for HashMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl Lookup for BTreeMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl Lookup for IndexMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// String-to-string maps are usable directly, which is how macro argument
/// maps are fed back into string-template macros.
impl Lookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).map(|s| Value::Str(s.clone()))
    }
}

/// JSON objects act as contexts; values convert lazily per lookup.
impl Lookup for serde_json::Map<String, serde_json::Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned().map(Value::from)
    }
}

/// Loop-position bindings for a derived scope: `_index`, `_first`, `_last`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoopMeta {
    pub index: usize,
    pub total: usize,
}

/// One link in the scope chain. Frames borrow the focus value from the
/// renderer's locals; a frame lives exactly as long as the body render it
/// was created for.
pub(crate) enum Scope<'a> {
    /// The caller-supplied context. Never fails; absent names are `None`.
    Root(&'a dyn Lookup),
    /// A sequence-element frame (`$each` over a sequence, `$first`, `$last`).
    Item {
        item: &'a Value,
        meta: Option<LoopMeta>,
        parent: &'a Scope<'a>,
    },
    /// A map-entry frame (`$each` over a map): binds `key` as well.
    Entry {
        key: &'a str,
        value: &'a Value,
        meta: Option<LoopMeta>,
        parent: &'a Scope<'a>,
    },
}

/// Null values and absent names are indistinguishable to the renderer.
fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

impl Scope<'_> {
    /// Resolves a name against this scope, walking parents for `../`.
    pub fn resolve(&self, name: &str) -> Result<Option<Value>, RenderError> {
        match self {
            Scope::Root(root) => Ok(present(root.lookup(name))),
            Scope::Item { item, meta, parent } => {
                if let Some(rest) = name.strip_prefix("../") {
                    return parent.resolve(rest);
                }
                if name == "it" {
                    return Ok(present(Some(Value::clone(item))));
                }
                if let Some(found) = resolve_meta(meta, name) {
                    return Ok(Some(found));
                }
                if let Value::Map(entries) = item {
                    return Ok(present(entries.get(name).cloned()));
                }
                Err(RenderError::UnknownVariable(name.to_string()))
            }
            Scope::Entry {
                key,
                value,
                meta,
                parent,
            } => {
                if let Some(rest) = name.strip_prefix("../") {
                    return parent.resolve(rest);
                }
                if name == "it" {
                    return Ok(present(Some(Value::clone(value))));
                }
                if name == "key" {
                    return Ok(Some(Value::Str(key.to_string())));
                }
                if let Some(found) = resolve_meta(meta, name) {
                    return Ok(Some(found));
                }
                if let Value::Map(entries) = value {
                    return Ok(present(entries.get(name).cloned()));
                }
                Err(RenderError::UnknownVariable(name.to_string()))
            }
        }
    }
}

fn resolve_meta(meta: &Option<LoopMeta>, name: &str) -> Option<Value> {
    let meta = meta.as_ref()?;
    match name {
        "_index" => Some(Value::Int(meta.index as i64)),
        "_first" => Some(Value::Bool(meta.index == 0)),
        "_last" => Some(Value::Bool(meta.index + 1 == meta.total)),
        _ => None,
    }
}

/// Exposes a scope as a plain [`Lookup`], with resolution failures mapped to
/// `None`. This is what the not-found handler receives.
pub(crate) struct ScopeLookup<'a, 'b>(pub &'a Scope<'b>);

impl Lookup for ScopeLookup<'_, '_> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.0.resolve(name).ok().flatten()
    }
}
