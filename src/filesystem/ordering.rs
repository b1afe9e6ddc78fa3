use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::config::GroupType;
use crate::filesystem::PathItem;

type NameKeyFn = dyn Fn(&PathItem) -> String + Send + Sync;
type FilterFn = dyn Fn(&PathItem) -> bool + Send + Sync;

/// Secondary sort key applied to siblings after grouping.
#[derive(Clone)]
pub struct NameKey(Arc<NameKeyFn>);

impl NameKey {
    pub fn new(key: impl Fn(&PathItem) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(key))
    }

    pub fn case_insensitive() -> Self {
        Self::new(|item| item.name().to_lowercase())
    }

    pub fn key(&self, item: &PathItem) -> String {
        (self.0)(item)
    }
}

impl fmt::Debug for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NameKey(..)")
    }
}

/// Predicate excluding entries from a walk; returns `true` for entries to drop.
#[derive(Clone)]
pub struct ItemFilter(Arc<FilterFn>);

impl ItemFilter {
    pub fn new(exclude: impl Fn(&PathItem) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(exclude))
    }

    /// Drops entries whose name is one of `names`.
    pub fn names(names: Vec<String>) -> Self {
        Self::new(move |item| names.iter().any(|name| *name == item.name()))
    }

    pub fn excludes(&self, item: &PathItem) -> bool {
        (self.0)(item)
    }
}

impl fmt::Debug for ItemFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ItemFilter(..)")
    }
}

/// Sibling order shared by listing and comparison: grouping first, then the
/// name key.
#[derive(Debug, Clone, Default)]
pub struct ItemOrdering {
    grouping: GroupType,
    name_key: Option<NameKey>,
}

impl ItemOrdering {
    pub fn new(grouping: GroupType, name_key: Option<NameKey>) -> Self {
        Self { grouping, name_key }
    }

    pub fn grouping(&self) -> GroupType {
        self.grouping
    }

    pub fn has_custom_key(&self) -> bool {
        self.name_key.is_some()
    }

    fn group_rank(&self, is_dir: bool) -> u8 {
        match self.grouping {
            GroupType::FilesFirst => u8::from(is_dir),
            GroupType::FoldersFirst => u8::from(!is_dir),
            GroupType::Mixed => 0,
        }
    }

    /// Compares directory-ness under the grouping; `Equal` for mixed grouping.
    pub fn compare_groups(&self, a_is_dir: bool, b_is_dir: bool) -> Ordering {
        self.group_rank(a_is_dir).cmp(&self.group_rank(b_is_dir))
    }

    pub fn name_key(&self, item: &PathItem) -> String {
        match &self.name_key {
            Some(key) => key.key(item),
            None => item.name(),
        }
    }

    pub fn compare(&self, a: &PathItem, b: &PathItem) -> Ordering {
        self.compare_groups(a.is_dir(), b.is_dir())
            .then_with(|| self.name_key(a).cmp(&self.name_key(b)))
    }

    pub fn sort(&self, items: &mut [PathItem]) {
        items.sort_by_cached_key(|item| (self.group_rank(item.is_dir()), self.name_key(item)));
    }
}
