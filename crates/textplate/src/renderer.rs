//! Tree-walking renderer.
//!
//! Walks a parsed [`Template`] against a root [`Lookup`], appending to a
//! single output buffer. Formatting, includes, and macro invocation are
//! delegated to the configured [`RenderOptions`]; the truthiness,
//! comparison, iteration, and indexing rules live here.
//!
//! Rendering is synchronous and runs to completion; on error no partial
//! output is returned and the template remains reusable.

use std::collections::HashMap;

use crate::ast::{MacroArg, Node, Template};
use crate::context::{Lookup, LoopMeta, Scope, ScopeLookup};
use crate::error::RenderError;
use crate::options::RenderOptions;
use crate::parser::parse_source;
use crate::value::Value;

pub(crate) fn render_template(
    template: &Template,
    context: &dyn Lookup,
    opts: &dyn RenderOptions,
) -> Result<String, RenderError> {
    let mut out = String::new();
    let scope = Scope::Root(context);
    render_nodes(&mut out, &template.children, &scope, opts)?;
    Ok(out)
}

fn render_nodes(
    out: &mut String,
    nodes: &[Node],
    scope: &Scope,
    opts: &dyn RenderOptions,
) -> Result<(), RenderError> {
    for node in nodes {
        render_node(out, node, scope, opts)?;
    }
    Ok(())
}

fn render_node(
    out: &mut String,
    node: &Node,
    scope: &Scope,
    opts: &dyn RenderOptions,
) -> Result<(), RenderError> {
    match node {
        Node::Text(text) => {
            out.push_str(text);
            Ok(())
        }
        Node::Comment => Ok(()),
        Node::Variable { name, format } => render_variable(out, name, format.as_deref(), scope, opts),
        Node::IfTrue { condition, body } => {
            let value = scope.resolve(condition)?;
            if value.is_some_and(|v| v.is_truthy()) {
                render_nodes(out, body, scope, opts)?;
            }
            Ok(())
        }
        Node::IfFalse { condition, body } => {
            let value = scope.resolve(condition)?;
            if !value.is_some_and(|v| v.is_truthy()) {
                render_nodes(out, body, scope, opts)?;
            }
            Ok(())
        }
        Node::IfEq {
            variable,
            literal,
            body,
        } => {
            if projection(&scope.resolve(variable)?) == *literal {
                render_nodes(out, body, scope, opts)?;
            }
            Ok(())
        }
        Node::UnlessEq {
            variable,
            literal,
            body,
        } => {
            if projection(&scope.resolve(variable)?) != *literal {
                render_nodes(out, body, scope, opts)?;
            }
            Ok(())
        }
        Node::GreaterThan {
            variable,
            literal,
            body,
        } => render_comparison(out, variable, body, scope, opts, |k| k > *literal),
        Node::LessThan {
            variable,
            literal,
            body,
        } => render_comparison(out, variable, body, scope, opts, |k| k < *literal),
        Node::GreaterThanOrEq {
            variable,
            literal,
            body,
        } => render_comparison(out, variable, body, scope, opts, |k| k >= *literal),
        Node::LessThanOrEq {
            variable,
            literal,
            body,
        } => render_comparison(out, variable, body, scope, opts, |k| k <= *literal),
        Node::IfHasMany { iterable, body } => {
            if has_many(&scope.resolve(iterable)?) {
                render_nodes(out, body, scope, opts)?;
            }
            Ok(())
        }
        Node::UnlessHasMany { iterable, body } => {
            if has_at_most_one(&scope.resolve(iterable)?) {
                render_nodes(out, body, scope, opts)?;
            }
            Ok(())
        }
        Node::Each { iterable, body } => render_each(out, iterable, body, scope, opts),
        Node::First { iterable, body } => render_first(out, iterable, body, scope, opts),
        Node::Last { iterable, body } => render_last(out, iterable, body, scope, opts),
        Node::Length { iterable } => {
            let length = match scope.resolve(iterable)? {
                Some(value) => value.length(),
                None => 0,
            };
            out.push_str(&length.to_string());
            Ok(())
        }
        Node::Index { variable, index } => render_index(out, variable, index.as_deref(), scope, opts),
        Node::Include { path } => {
            let content = opts.load_include(path)?;
            let included = parse_source(&content)?;
            // Included templates resolve names against the caller's scope.
            render_nodes(out, &included.children, scope, opts)
        }
        Node::Call { name, args } => render_call(out, name, args, scope, opts),
    }
}

fn render_variable(
    out: &mut String,
    name: &str,
    format: Option<&str>,
    scope: &Scope,
    opts: &dyn RenderOptions,
) -> Result<(), RenderError> {
    match scope.resolve(name)? {
        Some(value) => {
            match format {
                Some(pattern) => out.push_str(&opts.format(&value, pattern)?),
                None => out.push_str(&value.to_string()),
            }
            Ok(())
        }
        None => {
            out.push_str(&opts.on_variable_not_found(name, &ScopeLookup(scope)));
            Ok(())
        }
    }
}

fn render_comparison(
    out: &mut String,
    variable: &str,
    body: &[Node],
    scope: &Scope,
    opts: &dyn RenderOptions,
    holds: impl Fn(i64) -> bool,
) -> Result<(), RenderError> {
    let parsed = scope.resolve(variable)?.and_then(|v| v.as_int());
    if parsed.is_some_and(holds) {
        render_nodes(out, body, scope, opts)?;
    }
    Ok(())
}

/// Two or more elements. Only sequences iterate; maps and scalars are never
/// "many" regardless of their size.
fn has_many(value: &Option<Value>) -> bool {
    match value {
        Some(Value::Seq(items)) => items.len() >= 2,
        _ => false,
    }
}

/// The complement predicate is not a negation: a non-iterable value is
/// neither "many" nor "at most one".
fn has_at_most_one(value: &Option<Value>) -> bool {
    match value {
        None => true,
        Some(Value::Seq(items)) => items.len() <= 1,
        Some(_) => false,
    }
}

fn render_each(
    out: &mut String,
    iterable: &str,
    body: &[Node],
    scope: &Scope,
    opts: &dyn RenderOptions,
) -> Result<(), RenderError> {
    let Some(value) = scope.resolve(iterable)? else {
        return Ok(());
    };
    match &value {
        Value::Seq(items) => {
            let total = items.len();
            for (index, item) in items.iter().enumerate() {
                let frame = Scope::Item {
                    item,
                    meta: Some(LoopMeta { index, total }),
                    parent: scope,
                };
                render_nodes(out, body, &frame, opts)?;
            }
            Ok(())
        }
        Value::Map(entries) => {
            let total = entries.len();
            for (index, (key, entry)) in entries.iter().enumerate() {
                let frame = Scope::Entry {
                    key,
                    value: entry,
                    meta: Some(LoopMeta { index, total }),
                    parent: scope,
                };
                render_nodes(out, body, &frame, opts)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn render_first(
    out: &mut String,
    iterable: &str,
    body: &[Node],
    scope: &Scope,
    opts: &dyn RenderOptions,
) -> Result<(), RenderError> {
    let Some(value) = scope.resolve(iterable)? else {
        return Ok(());
    };
    if let Value::Seq(items) = &value {
        if let Some(item) = items.first() {
            let frame = Scope::Item {
                item,
                meta: None,
                parent: scope,
            };
            render_nodes(out, body, &frame, opts)?;
        }
    }
    Ok(())
}

fn render_last(
    out: &mut String,
    iterable: &str,
    body: &[Node],
    scope: &Scope,
    opts: &dyn RenderOptions,
) -> Result<(), RenderError> {
    let Some(value) = scope.resolve(iterable)? else {
        return Ok(());
    };
    if let Value::Seq(items) = &value {
        if let Some(item) = items.last() {
            if !item.is_null() {
                let frame = Scope::Item {
                    item,
                    meta: None,
                    parent: scope,
                };
                render_nodes(out, body, &frame, opts)?;
            }
        }
    }
    Ok(())
}

fn render_index(
    out: &mut String,
    variable: &str,
    index: Option<&str>,
    scope: &Scope,
    _opts: &dyn RenderOptions,
) -> Result<(), RenderError> {
    let Some(raw) = index else {
        return Ok(());
    };
    let target = scope.resolve(variable)?;

    // `${NAME}` indexes resolve against the current scope at render time.
    let key = if raw.starts_with("${") && raw.ends_with('}') {
        projection(&scope.resolve(&raw[2..raw.len() - 1])?)
    } else {
        raw.to_string()
    };

    match target {
        Some(Value::Seq(items)) => {
            if let Some(item) = key
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
            {
                out.push_str(&item.to_string());
            }
            Ok(())
        }
        Some(Value::Map(entries)) => {
            // Entries mapped to null emit nothing, unlike sequence elements.
            if let Some(entry) = entries.get(key.as_str()) {
                if !entry.is_null() {
                    out.push_str(&entry.to_string());
                }
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn render_call(
    out: &mut String,
    name: &str,
    args: &[MacroArg],
    scope: &Scope,
    opts: &dyn RenderOptions,
) -> Result<(), RenderError> {
    let mut arguments = HashMap::new();
    for arg in args {
        let mut rendered = String::new();
        render_nodes(&mut rendered, &arg.body, scope, opts)?;
        arguments.insert(arg.name.clone(), rendered);
    }
    out.push_str(&opts.call_macro(name, &arguments)?);
    Ok(())
}

/// The projection used for equality and dynamic index keys: absent values
/// project to the string `"null"`.
fn projection(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}
