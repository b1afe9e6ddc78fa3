use std::cmp::Ordering;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::compare::{CompareError, DiffItem, DiffKind};
use crate::config::GroupType;
use crate::filesystem::{ItemOrdering, PathItem};
use crate::format::Props;
use crate::lister::{ItemKind, ListError, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompareSettings {
    /// Report an added or deleted folder once instead of once per entry.
    pub skip_children: bool,
    /// Treat aligned files as matching without looking at their properties.
    pub names_only: bool,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            skip_children: false,
            names_only: true,
        }
    }
}

/// A folder whose subtree is dropped from one side.
struct SkippedFolder {
    depth: Option<usize>,
    path: PathBuf,
}

impl SkippedFolder {
    /// Descendants, plus the ellipsis and closing records that carry the
    /// folder's own path.
    fn covers(&self, record: &Record) -> bool {
        let deeper = matches!((self.depth, record.depth), (Some(limit), Some(depth)) if depth > limit);
        let own_marker = matches!(record.kind, ItemKind::DirClose | ItemKind::Ellipsis)
            && record.path == self.path;
        deeper || own_marker
    }
}

struct Side<I> {
    records: I,
    head: Option<Record>,
    exhausted: bool,
    skipping: Option<SkippedFolder>,
}

impl<I: Iterator<Item = Result<Record, ListError>>> Side<I> {
    fn new(records: I) -> Self {
        Self {
            records,
            head: None,
            exhausted: false,
            skipping: None,
        }
    }

    /// Pulls records until there is a head or the side runs out, dropping
    /// the descendants of a skipped folder on the way.
    fn fill(&mut self) -> Result<(), ListError> {
        while self.head.is_none() && !self.exhausted {
            match self.records.next() {
                None => self.exhausted = true,
                Some(Err(e)) => return Err(e),
                Some(Ok(record)) => {
                    if let Some(skipped) = &self.skipping {
                        if skipped.covers(&record) {
                            continue;
                        }
                        self.skipping = None;
                    }
                    self.head = Some(record);
                }
            }
        }
        Ok(())
    }

    /// Consumes the head; with `skip_children` a folder head also drops its
    /// whole subtree.
    fn advance(&mut self, skip_children: bool) -> Option<Record> {
        let record = self.head.take()?;
        if skip_children && record.kind == ItemKind::Dir {
            self.skipping = Some(SkippedFolder {
                depth: record.depth,
                path: record.path.clone(),
            });
        }
        Some(record)
    }
}

/// Streaming merge of two listings sorted under the same ordering.
///
/// Each step looks only at the current head of both sides: aligned heads are
/// a match (or a change), otherwise the side that is behind is missing the
/// entry the other one reports. Both inputs must have been produced with the
/// same grouping and sort key, which is not checked.
pub struct Comparer<O, N> {
    old: Side<O>,
    new: Side<N>,
    ordering: ItemOrdering,
    settings: CompareSettings,
}

impl<O, N> Comparer<O, N>
where
    O: Iterator<Item = Result<Record, ListError>>,
    N: Iterator<Item = Result<Record, ListError>>,
{
    pub fn new(old: O, new: N, ordering: ItemOrdering, settings: CompareSettings) -> Self {
        Self {
            old: Side::new(old),
            new: Side::new(new),
            ordering,
            settings,
        }
    }

    /// `Less` when the old head is missing from the new side (a deletion),
    /// `Greater` when the new head is missing from the old side (an addition).
    fn compare_heads(&self) -> Ordering {
        let (old, new) = match (&self.old.head, &self.new.head) {
            (Some(old), Some(new)) => (old, new),
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        };

        if let (Some(old_depth), Some(new_depth)) = (old.depth, new.depth) {
            if old_depth != new_depth {
                return new_depth.cmp(&old_depth);
            }
            // roots align whatever their display name
            if old_depth == 0 && old.kind.is_dir_like() && new.kind.is_dir_like() {
                return Ordering::Equal;
            }
        }

        let (old_is_dir, new_is_dir) = (old.kind.is_dir_like(), new.kind.is_dir_like());
        let grouped = match self.ordering.grouping() {
            GroupType::FilesFirst => old_is_dir.cmp(&new_is_dir),
            GroupType::FoldersFirst => new_is_dir.cmp(&old_is_dir),
            GroupType::Mixed => Ordering::Equal,
        };
        if grouped != Ordering::Equal {
            return grouped;
        }

        match (old.name(), new.name()) {
            (Some(_), Some(_)) if self.ordering.has_custom_key() => {
                self.sort_key(old).cmp(&self.sort_key(new))
            }
            (Some(old_name), Some(new_name)) => old_name.cmp(&new_name),
            _ => Ordering::Equal,
        }
    }

    fn sort_key(&self, record: &Record) -> String {
        let item = PathItem::detached(
            record.path.clone(),
            record.depth.unwrap_or(0),
            record.kind.is_dir_like(),
        );
        self.ordering.name_key(&item)
    }

    fn aligned(&self, old: Record, new: Record) -> DiffItem {
        if old.path != new.path {
            warn!(
                "Aligned entries differ in path: {} and {}",
                old.path.display(),
                new.path.display()
            );
        }
        let changed = old.kind == ItemKind::File
            && !self.settings.names_only
            && !files_match(&old.props, &new.props);
        DiffItem {
            diff: if changed {
                DiffKind::Change
            } else {
                DiffKind::Match
            },
            kind: new.kind,
            path: new.path,
            old_props: Some(old.props),
            new_props: Some(new.props),
        }
    }

    fn step(&mut self) -> Result<Option<DiffItem>, CompareError> {
        self.old.fill()?;
        self.new.fill()?;

        let skip_children = self.settings.skip_children;
        let item = match self.compare_heads() {
            Ordering::Equal => match (self.old.advance(false), self.new.advance(false)) {
                (Some(old), Some(new)) => Some(self.aligned(old, new)),
                _ => None,
            },
            Ordering::Less => self.old.advance(skip_children).map(|old| DiffItem {
                diff: DiffKind::Deletion,
                kind: old.kind,
                path: old.path,
                old_props: Some(old.props),
                new_props: None,
            }),
            Ordering::Greater => self.new.advance(skip_children).map(|new| DiffItem {
                diff: DiffKind::Addition,
                kind: new.kind,
                path: new.path,
                old_props: None,
                new_props: Some(new.props),
            }),
        };

        if let Some(item) = &item {
            debug!("{} {} {}", item.diff, item.kind, item.path.display());
        }
        Ok(item)
    }
}

impl<O, N> Iterator for Comparer<O, N>
where
    O: Iterator<Item = Result<Record, ListError>>,
    N: Iterator<Item = Result<Record, ListError>>,
{
    type Item = Result<DiffItem, CompareError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step().transpose()
    }
}

/// Decides whether two aligned files hold the same content, from the
/// strongest property both sides carry. Files without any shared
/// discriminating property are considered equal.
pub fn files_match(old: &Props, new: &Props) -> bool {
    let shared = |name: &str| old.get(name).zip(new.get(name));

    if let Some((old_hash, new_hash)) = shared("hash") {
        return old_hash == new_hash;
    }
    if let Some((old_size, new_size)) = shared("size") {
        if old_size != new_size {
            return false;
        }
    }
    if let Some((old_date, new_date)) = shared("mdate").or_else(|| shared("ndate")) {
        return old_date == new_date;
    }
    true
}
