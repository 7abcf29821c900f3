//! Template rendering.
//!
//! A unit is rendered in two passes: the unit template for its type is
//! resolved against the context, then embedded into the frame template
//! for its category tag, which is resolved against the context plus the
//! tag's palette.

mod context;
mod engine;
pub mod template;
mod templates;
mod theme;

pub use context::{Context, Element, Scalar, Value};
pub use engine::{Rendition, TemplateEngine};
pub use templates::{TemplateSet, CONTENT_TOKEN};
pub use theme::Palette;
