//! The options bundle shared by the lister and the comparer, the default
//! line patterns derived from it and the YAML options file.

mod formats;
mod options;
mod options_file;

pub use formats::Formats;
pub use options::{DateType, FormatType, GroupType, NameType, Options, parse_choice};
pub use options_file::{ConfigError, apply_yaml, read_options_file, validate_date_format};
