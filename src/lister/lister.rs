use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use snafu::prelude::*;
use tracing::debug;

use crate::config::{Formats, Options};
use crate::ext::BestEffortPathExt;
use crate::filesystem::{PathItem, PathItemError};
use crate::format::{PropertyRegistry, Template, TemplateError};
use crate::lister::{ItemKind, ListParser, Record, TreeWalker};

/// The compiled template of every item kind for one set of options.
#[derive(Debug, Clone)]
pub struct Lister {
    options: Arc<Options>,
    file: Option<Template>,
    dir: Option<Template>,
    dir_close: Option<Template>,
    root: Option<Template>,
    ellipsis: Option<Template>,
}

impl Lister {
    pub fn new(options: Options) -> Result<Self, ListError> {
        Self::with_registry(options, &PropertyRegistry::default())
    }

    /// Compiles the templates against `registry`, so that properties
    /// registered there may appear in the patterns.
    pub fn with_registry(options: Options, registry: &PropertyRegistry) -> Result<Self, ListError> {
        let formats = Formats::from_options(&options);
        let options = Arc::new(options);
        let compile = |kind: ItemKind| -> Result<Option<Template>, ListError> {
            let Some(pattern) = formats.get(kind) else {
                return Ok(None);
            };
            debug!("Compiling {} template {:?}", kind, pattern);
            let template =
                Template::compile(pattern, options.clone(), registry).context(TemplateSnafu { kind })?;
            Ok(Some(template))
        };

        let file = compile(ItemKind::File)?;
        let dir = compile(ItemKind::Dir)?;
        let dir_close = compile(ItemKind::DirClose)?;
        let root = compile(ItemKind::Root)?;
        let ellipsis = compile(ItemKind::Ellipsis)?;

        Ok(Self {
            options,
            file,
            dir,
            dir_close,
            root,
            ellipsis,
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn template(&self, kind: ItemKind) -> Option<&Template> {
        match kind {
            ItemKind::File => self.file.as_ref(),
            ItemKind::Dir => self.dir.as_ref(),
            ItemKind::DirClose => self.dir_close.as_ref(),
            ItemKind::Root => self.root.as_ref(),
            ItemKind::Ellipsis => self.ellipsis.as_ref(),
        }
    }

    /// Hierarchical layouts open and close every folder, which lets the
    /// parser count depth from the lines themselves.
    pub fn tracks_depth_positionally(&self) -> bool {
        self.dir.is_some() && self.dir_close.is_some()
    }

    /// Lazily walks `folder`, yielding one record per templated line.
    pub fn walk(&self, folder: &Path) -> Result<TreeWalker<'_>, ListError> {
        ensure!(
            folder.is_dir(),
            NotADirectorySnafu {
                path: folder.to_path_buf()
            }
        );
        let base = std::path::absolute(folder).context(OpenSnafu {
            path: folder.to_path_buf(),
        })?;
        debug!("Walking {}", base.best_effort_path_display());
        Ok(TreeWalker::new(self, PathItem::root(base)))
    }

    /// Lazily replays rendered lines back into records.
    pub fn parse<R: BufRead>(&self, reader: R) -> ListParser<'_, R> {
        ListParser::new(self, reader)
    }

    pub fn parse_file(&self, path: &Path) -> Result<ListParser<'_, BufReader<File>>, ListError> {
        debug!("Parsing listing {}", path.best_effort_path_display());
        let file = File::open(path).context(OpenSnafu {
            path: path.to_path_buf(),
        })?;
        Ok(self.parse(BufReader::new(file)))
    }

    /// Extracts the record of `item` as `kind`; `None` when that kind has no
    /// template.
    pub fn record(&self, kind: ItemKind, item: &PathItem) -> Result<Option<Record>, ListError> {
        let Some(template) = self.template(kind) else {
            return Ok(None);
        };
        let props = template.props(item).context(PropertySnafu)?;
        Ok(Some(Record {
            kind,
            path: item.path().to_path_buf(),
            depth: Some(item.depth()),
            props,
        }))
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ListError {
    #[snafu(display("{} is not a directory", path.best_effort_path_display()))]
    NotADirectoryError { path: PathBuf },
    #[snafu(display("Failed to open {}", path.best_effort_path_display()))]
    OpenError { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to read line {} of the listing", line))]
    ReadError { line: usize, source: io::Error },
    #[snafu(display("Failed to write the listing"))]
    WriteError { source: io::Error },
    #[snafu(display("Failed to extract the properties of an entry"))]
    PropertyError { source: PathItemError },
    #[snafu(display("Invalid {} template", kind))]
    TemplateError { kind: ItemKind, source: TemplateError },
}
