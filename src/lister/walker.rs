use std::vec;

use tracing::debug;

use crate::filesystem::{ItemOrdering, PathItem};
use crate::lister::{ItemKind, ListError, Lister, Record};

struct Frame {
    item: PathItem,
    children: vec::IntoIter<PathItem>,
    ellipsis_due: bool,
}

/// Lazy depth-first walk of a folder.
///
/// Each folder yields its own record, then its filtered children in sibling
/// order (or an ellipsis once the depth limit is reached), then its closing
/// record. Kinds without a template are skipped. Children are listed when
/// their folder is entered, so at most one sibling list per open folder is
/// held in memory.
pub struct TreeWalker<'a> {
    lister: &'a Lister,
    ordering: ItemOrdering,
    pending: Option<PathItem>,
    stack: Vec<Frame>,
}

impl<'a> TreeWalker<'a> {
    pub(crate) fn new(lister: &'a Lister, root: PathItem) -> Self {
        Self {
            ordering: lister.options().ordering(),
            lister,
            pending: Some(root),
            stack: Vec::new(),
        }
    }

    fn enter(&mut self, item: PathItem) -> Result<Option<Record>, ListError> {
        let kind = if item.depth() == 0 {
            ItemKind::Root
        } else {
            ItemKind::Dir
        };
        let record = self.lister.record(kind, &item)?;

        let limited = self.lister.options().depth_limit_reached(item.depth());
        let children = if limited {
            debug!("Depth limit reached at {}", item.path().display());
            Vec::new()
        } else {
            item.children(&self.ordering)
        };
        self.stack.push(Frame {
            item,
            children: children.into_iter(),
            ellipsis_due: limited,
        });
        Ok(record)
    }

    fn step(&mut self) -> Option<Result<Option<Record>, ListError>> {
        if let Some(root) = self.pending.take() {
            return Some(self.enter(root));
        }

        let frame = self.stack.last_mut()?;
        if frame.ellipsis_due {
            frame.ellipsis_due = false;
            let item = frame.item.clone();
            return Some(self.lister.record(ItemKind::Ellipsis, &item));
        }

        match frame.children.next() {
            Some(child) if self.lister.options().is_filtered(&child) => Some(Ok(None)),
            Some(child) if child.is_dir() => Some(self.enter(child)),
            Some(child) => Some(self.lister.record(ItemKind::File, &child)),
            None => {
                let frame = self.stack.pop()?;
                Some(self.lister.record(ItemKind::DirClose, &frame.item))
            }
        }
    }
}

impl Iterator for TreeWalker<'_> {
    type Item = Result<Record, ListError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.step()? {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
