//! Tree nodes for a walked folder and the sibling ordering shared by the
//! lister and the comparer.

mod ordering;
mod path_item;

pub use ordering::{ItemFilter, ItemOrdering, NameKey};
pub use path_item::{PathItem, PathItemError};
