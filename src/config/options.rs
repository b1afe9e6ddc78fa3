use clap::ValueEnum;

use crate::filesystem::{ItemFilter, ItemOrdering, NameKey, PathItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatType {
    #[default]
    Plain,
    Xml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DateType {
    /// Latest of change and modification time.
    #[default]
    Newest,
    Creation,
    Modification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NameType {
    Dot,
    #[default]
    Name,
    Relpath,
    Abspath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GroupType {
    #[default]
    #[value(aliases = ["filesfirst", "files"])]
    FilesFirst,
    #[value(aliases = ["foldersfirst", "folders", "directories-first", "dirs-first"])]
    FoldersFirst,
    Mixed,
}

/// Resolves a user supplied string to one of the option enums,
/// ignoring case and accepting the declared aliases.
pub fn parse_choice<E: ValueEnum>(value: &str) -> Option<E> {
    E::from_str(value.trim(), true).ok()
}

/// Every knob consumed by the lister and the comparer.
///
/// The per-kind `*_format` fields override the template that would
/// otherwise be derived from the display toggles; `Some("")` drops the kind.
#[derive(Debug, Clone)]
pub struct Options {
    pub rel_to_cwd: bool,
    pub append: bool,
    pub header: String,
    pub footer: String,

    pub file_format: Option<String>,
    pub dir_format: Option<String>,
    pub dir_close_format: Option<String>,
    pub root_format: Option<String>,
    pub ellipsis_format: Option<String>,

    pub format_type: FormatType,
    pub start_level: usize,
    /// `0` walks without a depth limit.
    pub max_depth: usize,
    pub show_indent: bool,
    pub indent: String,
    pub newline: String,
    /// Properties attached to every record on top of the template's own.
    pub properties: Vec<String>,

    pub show_folders: bool,
    pub show_files: bool,
    pub filter: Option<ItemFilter>,
    pub filter_hidden: bool,
    pub item_grouping: GroupType,
    pub sort_key: Option<NameKey>,

    pub name_type: NameType,
    pub root_name_type: NameType,
    pub show_size: bool,
    pub show_date: bool,
    pub date_type: DateType,
    pub date_format: String,
    pub show_hash: bool,
    pub show_ellipsis: bool,
    pub ellipsis: String,
    pub show_hidden: bool,
    pub hidden: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rel_to_cwd: false,
            append: false,
            header: String::new(),
            footer: String::new(),

            file_format: None,
            dir_format: None,
            dir_close_format: None,
            root_format: None,
            ellipsis_format: None,

            format_type: FormatType::Plain,
            start_level: 0,
            max_depth: 20,
            show_indent: true,
            indent: " ".to_string(),
            newline: "\n".to_string(),
            properties: Vec::new(),

            show_folders: true,
            show_files: true,
            filter: None,
            filter_hidden: false,
            item_grouping: GroupType::FilesFirst,
            sort_key: None,

            name_type: NameType::Name,
            root_name_type: NameType::Dot,
            show_size: false,
            show_date: false,
            date_type: DateType::Newest,
            date_format: "%Y%m%d%H%M%S".to_string(),
            show_hash: false,
            show_ellipsis: false,
            ellipsis: "...".to_string(),
            show_hidden: false,
            hidden: "*".to_string(),
        }
    }
}

impl Options {
    pub fn ordering(&self) -> ItemOrdering {
        ItemOrdering::new(self.item_grouping, self.sort_key.clone())
    }

    pub fn is_filtered(&self, item: &PathItem) -> bool {
        if self.filter_hidden && item.hidden().unwrap_or(false) {
            return true;
        }
        self.filter
            .as_ref()
            .is_some_and(|filter| filter.excludes(item))
    }

    pub fn depth_limit_reached(&self, depth: usize) -> bool {
        self.max_depth > 0 && depth >= self.max_depth
    }

    pub fn default_extension(&self) -> &'static str {
        match self.format_type {
            FormatType::Plain => ".txt",
            FormatType::Xml => ".xml",
        }
    }
}
