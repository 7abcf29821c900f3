//! Placeholder substitution and repeated-block expansion.
//!
//! Templates use `{{name}}` scalar tokens and `{{#name}}...{{/name}}`
//! blocks bound to list variables. Inside a block, `{{.}}` stands for the
//! current scalar element; record elements substitute their own fields.

use super::{Context, Element};

/// Token for the current element of a scalar list.
pub const ELEMENT_TOKEN: &str = "{{.}}";

/// `{{name}}`
pub fn token(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

fn block_open(name: &str) -> String {
    format!("{{{{#{}}}}}", name)
}

fn block_close(name: &str) -> String {
    format!("{{{{/{}}}}}", name)
}

/// Replace every scalar token of `ctx` in `template`.
pub fn substitute_scalars(template: &str, ctx: &Context) -> String {
    let mut out = template.to_string();
    for (name, value) in ctx.scalars() {
        let placeholder = token(name);
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, &value.to_string());
        }
    }
    out
}

/// Expand every `{{#name}}...{{/name}}` block whose name is a list in `ctx`.
///
/// Each block occurrence is expanded with its own inner template, once
/// per element in list order.
pub fn expand_blocks(template: &str, ctx: &Context) -> String {
    let mut out = template.to_string();
    for (name, items) in ctx.lists() {
        out = expand_block(&out, name, items);
    }
    out
}

fn expand_block(template: &str, name: &str, items: &[Element]) -> String {
    let open = block_open(name);
    let close = block_close(name);

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(&open) {
        let inner_start = start + open.len();
        let Some(inner_len) = rest[inner_start..].find(&close) else {
            break;
        };
        let inner = &rest[inner_start..inner_start + inner_len];

        out.push_str(&rest[..start]);
        for item in items {
            out.push_str(&render_element(inner, item));
        }
        rest = &rest[inner_start + inner_len + close.len()..];
    }
    out.push_str(rest);
    out
}

fn render_element(inner: &str, element: &Element) -> String {
    match element {
        Element::Scalar(value) => inner.replace(ELEMENT_TOKEN, &value.to_string()),
        Element::Record(fields) => render_unit(inner, fields),
    }
}

/// Unit pass: scalars first, then list blocks.
pub fn render_unit(template: &str, ctx: &Context) -> String {
    expand_blocks(&substitute_scalars(template, ctx), ctx)
}

/// Names of `{{...}}` tokens still present in `text`, first occurrence
/// order, without duplicates. Block markers are reported as `#name` /
/// `/name`.
pub fn unresolved_tokens(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let name = after[..end].trim();
        if !name.is_empty() && !name.contains('{') && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &after[end + 2..];
    }
    names
}
