//! Two-level (unit + frame) template rendering.

use super::template::{render_unit, substitute_scalars, token, unresolved_tokens};
use super::{Context, Palette, TemplateSet};
use crate::error::{Error, Result};
use crate::model::Layer;
use std::collections::BTreeMap;

/// Output of one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendition {
    /// Final text; unresolved tokens are kept verbatim
    pub text: String,
    /// Set when the unit type had no template and the default was used
    pub unit_fallback: Option<String>,
    /// Set when the category tag had no frame and the default was used
    pub frame_fallback: Option<String>,
    /// Token names left in `text`
    pub unresolved: Vec<String>,
}

/// Template rendering engine.
///
/// Rendering is a pure function of `(unit_type, category_tag, context)`
/// and the engine's immutable template set and palettes.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    templates: TemplateSet,
    palettes: BTreeMap<String, Palette>,
}

impl TemplateEngine {
    /// Create an engine with the built-in layer palettes.
    pub fn new(templates: TemplateSet) -> Self {
        let palettes = Layer::ALL
            .into_iter()
            .map(|layer| (layer.code().to_string(), Palette::for_layer(layer)))
            .collect();
        Self {
            templates,
            palettes,
        }
    }

    /// Set or replace the palette for a category tag.
    pub fn with_palette(mut self, tag: impl Into<String>, palette: Palette) -> Self {
        self.palettes.insert(tag.into(), palette);
        self
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Palette for a tag, falling back to the default frame's palette.
    pub fn palette(&self, tag: &str) -> Option<&Palette> {
        self.palettes
            .get(tag)
            .or_else(|| self.palettes.get(self.templates.default_frame()))
    }

    /// Render one unit.
    ///
    /// Fails with [`Error::MissingTemplate`] only when neither the
    /// requested nor the default template exists.
    pub fn render(&self, unit_type: &str, category_tag: &str, ctx: &Context) -> Result<Rendition> {
        let (unit_template, unit_fallback) = self.resolve_unit(unit_type)?;
        let (frame_template, frame_fallback) = self.resolve_frame(category_tag)?;

        let body = render_unit(unit_template, ctx);

        let framed = frame_template.replace(&token(self.templates.content_token()), &body);
        let frame_ctx = match self.palette(category_tag) {
            Some(palette) => ctx.merged(&palette.context()),
            None => ctx.clone(),
        };
        let text = substitute_scalars(&framed, &frame_ctx);
        let unresolved = unresolved_tokens(&text);

        Ok(Rendition {
            text,
            unit_fallback,
            frame_fallback,
            unresolved,
        })
    }

    fn resolve_unit(&self, unit_type: &str) -> Result<(&str, Option<String>)> {
        if let Some(template) = self.templates.unit(unit_type) {
            return Ok((template, None));
        }
        let default = self.templates.default_unit();
        let template = self.templates.unit(default).ok_or_else(|| Error::MissingTemplate {
            kind: "unit",
            name: unit_type.to_string(),
        })?;
        let note = format!("no unit template '{}', used '{}'", unit_type, default);
        log::warn!("{}", note);
        Ok((template, Some(note)))
    }

    fn resolve_frame(&self, tag: &str) -> Result<(&str, Option<String>)> {
        if let Some(template) = self.templates.frame(tag) {
            return Ok((template, None));
        }
        let default = self.templates.default_frame();
        let template = self.templates.frame(default).ok_or_else(|| Error::MissingTemplate {
            kind: "frame",
            name: tag.to_string(),
        })?;
        let note = format!("no frame for '{}', used '{}'", tag, default);
        log::warn!("{}", note);
        Ok((template, Some(note)))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(TemplateSet::builtin())
    }
}
