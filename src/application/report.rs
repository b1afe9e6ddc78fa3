use colored::{ColoredString, Colorize};
use supports_color::Stream;

use crate::compare::{DiffItem, DiffKind};

/// Enables colors when requested and stdout supports them.
pub fn configure_colors(requested: bool) {
    let enabled = requested && supports_color::on(Stream::Stdout).is_some();
    colored::control::set_override(enabled);
}

/// One report line: the diff symbol, the item kind and the path.
pub fn format_diff(item: &DiffItem) -> String {
    let path = if item.path.as_os_str().is_empty() {
        ".".to_string()
    } else {
        item.path.to_string_lossy().into_owned()
    };
    let line = format!("{} {:<9} {}", item.diff.symbol(), item.kind.to_string(), path);
    paint(item.diff, line).to_string()
}

fn paint(diff: DiffKind, line: String) -> ColoredString {
    match diff {
        DiffKind::Match => line.dimmed(),
        DiffKind::Change => line.yellow(),
        DiffKind::Addition => line.green(),
        DiffKind::Deletion => line.red(),
    }
}
