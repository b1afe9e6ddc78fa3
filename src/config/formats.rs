use crate::config::{DateType, FormatType, NameType, Options};
use crate::lister::ItemKind;

/// The line patterns for every item kind; `None` means the kind is neither
/// written nor recognised when parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formats {
    pub file: Option<String>,
    pub dir: Option<String>,
    pub dir_close: Option<String>,
    pub root: Option<String>,
    pub ellipsis: Option<String>,
}

impl Formats {
    pub fn from_options(options: &Options) -> Self {
        let layout = options.format_type;
        Self {
            file: toggle_format(&options.file_format, options.show_files, || {
                file_pattern(layout, options)
            }),
            dir: toggle_format(&options.dir_format, options.show_folders, || {
                folder_pattern(layout, options, options.name_type)
            }),
            dir_close: toggle_format(
                &options.dir_close_format,
                layout == FormatType::Xml && options.show_folders,
                || concat(&[(options.show_indent, "{indent}"), (true, "</Folder>"), (true, options.newline.as_str())]),
            ),
            root: toggle_format(&options.root_format, options.show_folders, || {
                folder_pattern(layout, options, options.root_name_type)
            }),
            ellipsis: toggle_format(&options.ellipsis_format, options.show_ellipsis, || {
                let marker = match layout {
                    FormatType::Plain => options.ellipsis.as_str(),
                    FormatType::Xml => "<Ellipsis/>",
                };
                concat(&[(options.show_indent, "{indent}"), (true, marker), (true, options.newline.as_str())])
            }),
        }
    }

    pub fn get(&self, kind: ItemKind) -> Option<&str> {
        match kind {
            ItemKind::File => self.file.as_deref(),
            ItemKind::Dir => self.dir.as_deref(),
            ItemKind::DirClose => self.dir_close.as_deref(),
            ItemKind::Root => self.root.as_deref(),
            ItemKind::Ellipsis => self.ellipsis.as_deref(),
        }
    }
}

fn toggle_format(
    explicit: &Option<String>,
    toggle: bool,
    default: impl FnOnce() -> String,
) -> Option<String> {
    match explicit {
        Some(pattern) if !pattern.is_empty() => Some(pattern.clone()),
        None if toggle => Some(default()),
        _ => None,
    }
}

fn concat(parts: &[(bool, &str)]) -> String {
    parts
        .iter()
        .filter(|(toggle, _)| *toggle)
        .map(|(_, part)| *part)
        .collect()
}

fn name_property(layout: FormatType, name_type: NameType) -> &'static str {
    match (layout, name_type) {
        (FormatType::Plain, NameType::Dot) => ".",
        (FormatType::Plain, NameType::Name) => "{name}",
        (FormatType::Plain, NameType::Relpath) => "{relpath}",
        (FormatType::Plain, NameType::Abspath) => "{abspath}",
        (FormatType::Xml, NameType::Dot) => "",
        (FormatType::Xml, NameType::Name) => " name=\"{name}\"",
        (FormatType::Xml, NameType::Relpath) => " relpath=\"{relpath}\"",
        (FormatType::Xml, NameType::Abspath) => " abspath=\"{abspath}\"",
    }
}

fn date_property(layout: FormatType, date_type: DateType) -> &'static str {
    match (layout, date_type) {
        (FormatType::Plain, DateType::Newest) => "{ndate}",
        (FormatType::Plain, DateType::Creation) => "{cdate}",
        (FormatType::Plain, DateType::Modification) => "{mdate}",
        (FormatType::Xml, DateType::Newest) => " ndate=\"{ndate}\"",
        (FormatType::Xml, DateType::Creation) => " cdate=\"{cdate}\"",
        (FormatType::Xml, DateType::Modification) => " mdate=\"{mdate}\"",
    }
}

fn file_pattern(layout: FormatType, options: &Options) -> String {
    let name = name_property(layout, options.name_type);
    let date = date_property(layout, options.date_type);
    match layout {
        FormatType::Plain => {
            let details = [
                (options.show_size, "{size}"),
                (options.show_date, date),
                (options.show_hash, "{hash}"),
            ]
            .iter()
            .filter(|(toggle, _)| *toggle)
            .map(|(_, part)| *part)
            .collect::<Vec<_>>()
            .join(",");
            let bracket = format!(" [{details}]");
            concat(&[
                (options.show_indent, "{indent}"),
                (true, name),
                (options.show_hidden, "{hidden}"),
                (!details.is_empty(), bracket.as_str()),
                (true, options.newline.as_str()),
            ])
        }
        FormatType::Xml => {
            let open = format!("<File{name}");
            concat(&[
                (options.show_indent, "{indent}"),
                (true, open.as_str()),
                (options.show_hidden, " hidden=\"{hidden}\""),
                (options.show_size, " size=\"{size}\""),
                (options.show_date, date),
                (options.show_hash, " hash=\"{hash}\""),
                (true, "/>"),
                (true, options.newline.as_str()),
            ])
        }
    }
}

fn folder_pattern(layout: FormatType, options: &Options, name_type: NameType) -> String {
    let name = name_property(layout, name_type);
    match layout {
        FormatType::Plain => {
            let open = format!("<{name}");
            concat(&[
                (options.show_indent, "{indent}"),
                (true, open.as_str()),
                (options.show_hidden, "{hidden}"),
                (true, ">"),
                (true, options.newline.as_str()),
            ])
        }
        FormatType::Xml => {
            let open = format!("<Folder{name}");
            concat(&[
                (options.show_indent, "{indent}"),
                (true, open.as_str()),
                (options.show_hidden, " hidden=\"{hidden}\""),
                (true, ">"),
                (true, options.newline.as_str()),
            ])
        }
    }
}
