//! Line templates: rendering tree nodes through `{property}` patterns and
//! recovering the properties from rendered lines.

mod date_pattern;
mod props;
mod registry;
mod template;

pub use date_pattern::date_to_pattern;
pub use props::Props;
pub use registry::{Extractor, PatternFn, Property, PropertyRegistry};
pub use template::{Template, TemplateError};
