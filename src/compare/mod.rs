//! Merge-diff of two listings, each a live folder or a saved listing file.

mod comparer;
mod diff_item;
mod source;

pub use comparer::{CompareSettings, Comparer, files_match};
pub use diff_item::{DiffItem, DiffKind};
pub use source::{CompareError, RecordSource, compare, open_source};
