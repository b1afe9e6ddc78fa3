//! Rendering folders into listings and replaying listings into records.
//!
//! Both directions produce the same [`Record`] stream, which is what the
//! comparer consumes.

mod lister;
mod parser;
mod record;
mod walker;
mod writer;

pub use lister::{ListError, Lister};
pub use parser::ListParser;
pub use record::{ItemKind, Record};
pub use walker::TreeWalker;
