use std::path::{Component, Path, PathBuf};

use hashlink::LinkedHashMap;

use crate::lister::ItemKind;

/// Property values of one record, keyed by property name in declaration
/// order. Values are kept in their rendered text form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Props(LinkedHashMap<String, String>);

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn number(&self, name: &str) -> Option<usize> {
        self.get(name)?.trim().parse().ok()
    }

    /// Depth below the listing root: an explicit `depth`, else `level`
    /// shifted by `start_level`, else the number of `indent` units.
    pub fn get_depth(&self, start_level: usize, indent: &str) -> Option<usize> {
        if let Some(depth) = self.number("depth") {
            return Some(depth);
        }
        if let Some(level) = self.number("level") {
            return level.checked_sub(start_level);
        }
        match self.get("indent") {
            Some(text) if !indent.is_empty() => {
                (text.chars().count() / indent.chars().count()).checked_sub(start_level)
            }
            _ => None,
        }
    }

    /// `name`, else the last segment of `relpath` or `abspath`.
    pub fn get_name(&self) -> Option<String> {
        if let Some(name) = self.get("name") {
            return Some(name.to_string());
        }
        ["relpath", "abspath"].iter().find_map(|key| {
            Path::new(self.get(key)?)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
    }

    /// Rebuilds the path of a record relative to the listing root.
    ///
    /// `parents` holds the segments of the folder currently being replayed
    /// and is updated for the next line. `depth` is the positional depth
    /// used when the props do not carry one.
    pub fn get_path(
        &self,
        kind: ItemKind,
        parents: &mut Vec<String>,
        depth: Option<usize>,
        start_level: usize,
        indent: &str,
    ) -> Option<PathBuf> {
        let depth = self.get_depth(start_level, indent).or(depth);

        if let Some(relpath) = self.get("relpath") {
            let mut segments = match depth {
                Some(0) => Vec::new(),
                _ => split_segments(relpath),
            };
            if kind.leaves_folder() {
                if let Some(depth) = depth.filter(|depth| *depth > 0) {
                    segments.truncate(depth - 1);
                }
            }
            *parents = segments;
            return Some(PathBuf::from(relpath));
        }

        let depth = depth?;
        match self.get_name() {
            Some(name) => {
                let path = if depth > 0 {
                    parents
                        .iter()
                        .take(depth - 1)
                        .cloned()
                        .chain(std::iter::once(name))
                        .collect::<Vec<_>>()
                } else {
                    Vec::new()
                };
                *parents = if kind.leaves_folder() {
                    path[..path.len().saturating_sub(1)].to_vec()
                } else {
                    path.clone()
                };
                Some(path.iter().collect())
            }
            // unnamed lines refer to the folder currently open at `depth`
            None if kind.is_folder_marker() => {
                let path = parents.iter().take(depth).cloned().collect::<Vec<_>>();
                match kind {
                    ItemKind::DirClose => parents.truncate(depth.saturating_sub(1)),
                    ItemKind::Root => parents.clear(),
                    _ => parents.truncate(depth),
                }
                Some(path.iter().collect())
            }
            None => None,
        }
    }
}

fn split_segments(path: &str) -> Vec<String> {
    Path::new(path)
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}
