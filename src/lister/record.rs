use std::path::{Path, PathBuf};

use derive_more::Display;

use crate::format::Props;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ItemKind {
    #[display("file")]
    File,
    #[display("dir")]
    Dir,
    #[display("dir_close")]
    DirClose,
    #[display("root")]
    Root,
    #[display("ellipsis")]
    Ellipsis,
}

impl ItemKind {
    /// Order in which non-root templates are tried against a line.
    pub const PARSE_PRIORITY: [ItemKind; 4] =
        [ItemKind::Dir, ItemKind::File, ItemKind::DirClose, ItemKind::Ellipsis];

    pub fn is_dir_like(self) -> bool {
        matches!(self, ItemKind::Dir | ItemKind::DirClose | ItemKind::Root)
    }

    /// Kinds after which the replay continues in the enclosing folder.
    pub fn leaves_folder(self) -> bool {
        matches!(self, ItemKind::File | ItemKind::DirClose)
    }

    /// Kinds that refer to a folder without necessarily naming it.
    pub fn is_folder_marker(self) -> bool {
        matches!(self, ItemKind::DirClose | ItemKind::Ellipsis | ItemKind::Root)
    }
}

/// One line of a listing, produced either by walking a folder or by
/// parsing rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub kind: ItemKind,
    /// Path relative to the listing root.
    pub path: PathBuf,
    pub depth: Option<usize>,
    pub props: Props,
}

impl Record {
    pub fn name(&self) -> Option<String> {
        self.props.get_name().or_else(|| {
            self.path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
