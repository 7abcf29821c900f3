//! Lesson parsing module.

mod frontmatter;
mod lesson;
mod options;
mod source;

pub use frontmatter::{parse_value, split_frontmatter};
pub use lesson::{unit_hint, LessonParser};
pub use options::ParseOptions;
pub use source::{load_dir, RawDocument, Source};
