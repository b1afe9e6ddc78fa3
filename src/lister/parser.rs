use std::io::BufRead;

use snafu::prelude::*;
use tracing::{debug, warn};

use super::lister::ReadSnafu;
use crate::format::Props;
use crate::lister::{ItemKind, ListError, Lister, Record};

/// Lazy replay of a rendered listing.
///
/// Every line is classified by the first template that matches it, and the
/// full path is rebuilt from the props plus a running stack of parent
/// folder names. Lines that match no template are skipped with a warning.
pub struct ListParser<'a, R> {
    lister: &'a Lister,
    reader: R,
    line: String,
    line_number: usize,
    parents: Vec<String>,
    /// Folders currently open, for layouts that close their folders.
    open: Option<usize>,
    root_seen: bool,
    /// Depth of the previous record when it opened a folder.
    opened_folder: Option<Option<usize>>,
    done: bool,
}

impl<'a, R: BufRead> ListParser<'a, R> {
    pub(crate) fn new(lister: &'a Lister, reader: R) -> Self {
        Self {
            open: lister.tracks_depth_positionally().then_some(1),
            lister,
            reader,
            line: String::new(),
            line_number: 0,
            parents: Vec::new(),
            root_seen: false,
            opened_folder: None,
            done: false,
        }
    }

    /// Reads the next line, restoring the line terminator the templates
    /// expect on a final unterminated line.
    fn read_line(&mut self) -> Result<bool, ListError> {
        self.line.clear();
        self.line_number += 1;
        let read = self
            .reader
            .read_line(&mut self.line)
            .context(ReadSnafu { line: self.line_number })?;
        if read == 0 {
            return Ok(false);
        }
        let newline = &self.lister.options().newline;
        if !newline.is_empty() && !self.line.ends_with(newline.as_str()) {
            self.line.push_str(newline);
        }
        Ok(true)
    }

    fn classify(&self) -> Option<(ItemKind, Props)> {
        let options = self.lister.options();
        if let Some(props) = self
            .lister
            .template(ItemKind::Root)
            .and_then(|template| template.match_line(&self.line))
        {
            let depth = props.get_depth(options.start_level, &options.indent);
            if !self.root_seen || depth == Some(0) || self.open == Some(0) {
                return Some((ItemKind::Root, props));
            }
        }

        // an ellipsis only ever follows the folder it stands in for
        if let Some(folder_depth) = self.opened_folder {
            if let Some(props) = self
                .lister
                .template(ItemKind::Ellipsis)
                .and_then(|template| template.match_line(&self.line))
            {
                let depth = props.get_depth(options.start_level, &options.indent);
                if depth.is_none() || folder_depth.is_none() || depth == folder_depth {
                    return Some((ItemKind::Ellipsis, props));
                }
            }
        }

        let mut matches = ItemKind::PARSE_PRIORITY.iter().filter_map(|kind| {
            let template = self.lister.template(*kind)?;
            template.match_line(&self.line).map(|props| (*kind, props))
        });
        let first = matches.next();
        let others = matches.map(|(kind, _)| kind.to_string()).collect::<Vec<_>>();

        match &first {
            None => warn!(
                "Failed to parse line {}: {}",
                self.line_number,
                self.line.trim_end()
            ),
            Some((kind, _)) if !others.is_empty() => warn!(
                "Ambiguous line {}: {} ({}/{})",
                self.line_number,
                self.line.trim_end(),
                kind,
                others.join("/")
            ),
            Some(_) => {}
        }
        first
    }

    /// Depth implied by the position of the line among open folders.
    fn positional_depth(&mut self, kind: ItemKind) -> Option<usize> {
        let open = self.open.as_mut()?;
        let depth = match kind {
            ItemKind::Root => {
                *open = 1;
                0
            }
            ItemKind::Dir => {
                *open += 1;
                *open - 1
            }
            ItemKind::File => *open,
            ItemKind::Ellipsis => open.saturating_sub(1),
            ItemKind::DirClose => {
                *open = open.saturating_sub(1);
                *open
            }
        };
        Some(depth)
    }

    fn parse_line(&mut self) -> Option<Record> {
        let (kind, props) = self.classify()?;
        let positional = self.positional_depth(kind);
        if kind == ItemKind::Root {
            self.root_seen = true;
        }

        let options = self.lister.options();
        let depth = match kind {
            ItemKind::Root => Some(0),
            _ => props.get_depth(options.start_level, &options.indent).or(positional),
        };
        let Some(path) = props.get_path(
            kind,
            &mut self.parents,
            depth,
            options.start_level,
            &options.indent,
        ) else {
            warn!(
                "Cannot recover the path of line {}: {}",
                self.line_number,
                self.line.trim_end()
            );
            return None;
        };

        debug!("Parsed {} {}", kind, path.display());
        self.opened_folder = matches!(kind, ItemKind::Root | ItemKind::Dir).then_some(depth);
        Some(Record {
            kind,
            path,
            depth,
            props,
        })
    }
}

impl<R: BufRead> Iterator for ListParser<'_, R> {
    type Item = Result<Record, ListError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.read_line() {
                Ok(true) => {
                    if let Some(record) = self.parse_line() {
                        return Some(Ok(record));
                    }
                }
                Ok(false) => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormatType, NameType, Options};
    use rstest::*;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn parse(options: Options, text: &str) -> Vec<Record> {
        let lister = Lister::new(options).unwrap();
        lister
            .parse(Cursor::new(text.to_string()))
            .map(|record| record.unwrap())
            .collect()
    }

    fn summary(records: &[Record]) -> Vec<(String, PathBuf, Option<usize>)> {
        records
            .iter()
            .map(|record| (record.kind.to_string(), record.path.clone(), record.depth))
            .collect()
    }

    #[test]
    fn plain_listing_rebuilds_paths_from_indentation() {
        let text = "<.>\n top.txt\n <a>\n  a1.txt\n  <deep>\n   d1.txt\n <b>\n  b1.txt";
        let records = parse(Options::default(), text);
        assert_eq!(
            summary(&records),
            vec![
                ("root".to_string(), PathBuf::new(), Some(0)),
                ("file".to_string(), PathBuf::from("top.txt"), Some(1)),
                ("dir".to_string(), PathBuf::from("a"), Some(1)),
                ("file".to_string(), PathBuf::from("a/a1.txt"), Some(2)),
                ("dir".to_string(), PathBuf::from("a/deep"), Some(2)),
                ("file".to_string(), PathBuf::from("a/deep/d1.txt"), Some(3)),
                ("dir".to_string(), PathBuf::from("b"), Some(1)),
                ("file".to_string(), PathBuf::from("b/b1.txt"), Some(2)),
            ]
        );
    }

    #[test]
    fn unmatched_lines_are_skipped() {
        let options = Options {
            header: "Listing\n".to_string(),
            ..Options::default()
        };
        let records = parse(options, "<.>\n top.txt\n\t<broken\n other.txt\n");
        let names = records.iter().filter_map(Record::name).collect::<Vec<_>>();
        assert_eq!(names, vec!["top.txt", "other.txt"]);
    }

    #[test]
    fn xml_listing_tracks_depth_without_indentation() {
        let options = Options {
            format_type: FormatType::Xml,
            show_indent: false,
            ..Options::default()
        };
        let text = concat!(
            "<Folder>\n",
            "<File name=\"top.txt\"/>\n",
            "<Folder name=\"a\">\n",
            "<File name=\"a1.txt\"/>\n",
            "</Folder>\n",
            "<File name=\"z.txt\"/>\n",
            "</Folder>\n",
        );
        let records = parse(options, text);
        assert_eq!(
            summary(&records),
            vec![
                ("root".to_string(), PathBuf::new(), Some(0)),
                ("file".to_string(), PathBuf::from("top.txt"), Some(1)),
                ("dir".to_string(), PathBuf::from("a"), Some(1)),
                ("file".to_string(), PathBuf::from("a/a1.txt"), Some(2)),
                ("dir_close".to_string(), PathBuf::from("a"), Some(1)),
                ("file".to_string(), PathBuf::from("z.txt"), Some(1)),
                ("dir_close".to_string(), PathBuf::new(), Some(0)),
            ]
        );
    }

    #[rstest]
    #[case::dir_pattern_also_matches_files(
        Options { dir_format: Some("{indent}[{name}]\n".to_string()), ..Options::default() },
        "<.>\n [src]\n",
        ItemKind::Dir
    )]
    #[case::ellipsis_text_after_a_file(
        Options { show_ellipsis: true, ..Options::default() },
        "<.>\n a.txt\n ...\n",
        ItemKind::File
    )]
    #[case::ellipsis_right_after_its_folder(
        Options { show_ellipsis: true, ..Options::default() },
        "<.>\n <a>\n ...\n",
        ItemKind::Ellipsis
    )]
    #[case::ellipsis_text_one_level_deeper(
        Options { show_ellipsis: true, ..Options::default() },
        "<.>\n <a>\n  ...\n",
        ItemKind::File
    )]
    fn ambiguous_line_takes_the_expected_kind(
        #[case] options: Options,
        #[case] text: &str,
        #[case] expected: ItemKind,
    ) {
        let records = parse(options, text);
        assert_eq!(records.last().map(|record| record.kind), Some(expected));
    }

    #[test]
    fn ellipsis_keeps_the_path_of_its_folder() {
        let options = Options {
            show_ellipsis: true,
            ..Options::default()
        };
        let records = parse(options, "<.>\n <a>\n ...\n <b>\n");
        assert_eq!(
            summary(&records),
            vec![
                ("root".to_string(), PathBuf::new(), Some(0)),
                ("dir".to_string(), PathBuf::from("a"), Some(1)),
                ("ellipsis".to_string(), PathBuf::from("a"), Some(1)),
                ("dir".to_string(), PathBuf::from("b"), Some(1)),
            ]
        );
    }

    #[test]
    fn every_root_of_an_unindented_xml_listing_is_recognised() {
        let first = TempDir::new().expect("Failed to create temp directory");
        let second = TempDir::new().expect("Failed to create temp directory");
        fs::write(first.path().join("top.txt"), "top").unwrap();
        fs::create_dir(first.path().join("a")).unwrap();
        fs::write(first.path().join("a").join("a1.txt"), "a1").unwrap();
        fs::create_dir(second.path().join("b")).unwrap();
        fs::write(second.path().join("b").join("x.txt"), "x").unwrap();

        let options = Options {
            format_type: FormatType::Xml,
            show_indent: false,
            show_size: true,
            ..Options::default()
        };
        let lister = Lister::new(options).unwrap();
        let folders = [first.path().to_path_buf(), second.path().to_path_buf()];
        let mut listing = Vec::new();
        lister.write_list(&folders, &mut listing).unwrap();

        let mut walked = Vec::new();
        for folder in &folders {
            walked.extend(lister.walk(folder).unwrap().map(|record| record.unwrap()));
        }
        let parsed = lister
            .parse(Cursor::new(listing))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(parsed, walked);
    }

    #[test]
    fn root_with_folder_name_is_matched_positionally() {
        let options = Options {
            root_name_type: NameType::Name,
            ..Options::default()
        };
        let records = parse(options, "<project>\n <src>\n  main.rs\n");
        let kinds = records.iter().map(|record| record.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![ItemKind::Root, ItemKind::Dir, ItemKind::File]);
        assert_eq!(records[2].path, PathBuf::from("src/main.rs"));
    }

    #[rstest]
    #[case(FormatType::Plain)]
    #[case(FormatType::Xml)]
    fn written_listing_parses_back_to_walked_records(#[case] format_type: FormatType) {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(dir.path().join("top.txt"), "top").unwrap();
        fs::create_dir_all(dir.path().join("a").join("deep")).unwrap();
        fs::write(dir.path().join("a").join("a 1.txt"), "a1").unwrap();
        fs::write(dir.path().join("a").join("deep").join("d1.txt"), "d1").unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();

        let options = Options {
            format_type,
            show_size: true,
            show_hash: true,
            show_date: true,
            max_depth: 2,
            show_ellipsis: true,
            ..Options::default()
        };
        let lister = Lister::new(options).unwrap();
        let mut listing = Vec::new();
        lister.write_list(&[dir.path().to_path_buf()], &mut listing).unwrap();

        let walked = lister
            .walk(dir.path())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        let parsed = lister
            .parse(Cursor::new(listing))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(parsed, walked);
    }
}
