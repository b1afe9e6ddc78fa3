use std::path::PathBuf;

use derive_more::Display;

use crate::format::Props;
use crate::lister::ItemKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DiffKind {
    #[display("match")]
    Match,
    #[display("change")]
    Change,
    #[display("addition")]
    Addition,
    #[display("deletion")]
    Deletion,
}

impl DiffKind {
    pub fn symbol(self) -> char {
        match self {
            DiffKind::Match => '=',
            DiffKind::Change => '~',
            DiffKind::Addition => '+',
            DiffKind::Deletion => '-',
        }
    }
}

/// One event of a comparison.
///
/// `old_props` is set for matches, changes and deletions; `new_props` for
/// matches, changes and additions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffItem {
    pub diff: DiffKind,
    pub kind: ItemKind,
    pub path: PathBuf,
    pub old_props: Option<Props>,
    pub new_props: Option<Props>,
}
