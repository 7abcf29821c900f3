//! Document and output model types.
//!
//! This module defines the intermediate representation shared by the
//! parser, classifier, renderer and pipeline: parsed lessons on the input
//! side, rendered units on the output side.

mod category;
mod document;
mod layer;
mod section;
mod unit;

pub use category::{Category, Scores};
pub use document::{Document, MetaValue, Metadata};
pub use layer::Layer;
pub use section::{ContentKind, Section};
pub use unit::{Provenance, RenderedUnit, UnitKind};
