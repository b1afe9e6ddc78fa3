use std::path::{Path, PathBuf};

use snafu::prelude::*;
use tracing::debug;

use crate::compare::{CompareSettings, Comparer};
use crate::ext::BestEffortPathExt;
use crate::lister::{ListError, Lister, Record};

/// Records of one side of a comparison.
pub type RecordSource<'a> = Box<dyn Iterator<Item = Result<Record, ListError>> + 'a>;

/// Opens a live walk for a folder and a replay for a listing file.
pub fn open_source<'a>(lister: &'a Lister, path: &Path) -> Result<RecordSource<'a>, CompareError> {
    if path.is_dir() {
        debug!("Comparing against folder {}", path.best_effort_path_display());
        let walker: RecordSource<'a> = Box::new(lister.walk(path)?);
        Ok(walker)
    } else if path.is_file() {
        debug!("Comparing against listing {}", path.best_effort_path_display());
        let parser: RecordSource<'a> = Box::new(lister.parse_file(path)?);
        Ok(parser)
    } else {
        NotFoundSnafu {
            path: path.to_path_buf(),
        }
        .fail()
    }
}

/// Compares `old` with `new`, each a folder or a listing file rendered with
/// the options of `lister`.
pub fn compare<'a>(
    lister: &'a Lister,
    old: &Path,
    new: &Path,
    settings: CompareSettings,
) -> Result<Comparer<RecordSource<'a>, RecordSource<'a>>, CompareError> {
    let old = open_source(lister, old)?;
    let new = open_source(lister, new)?;
    Ok(Comparer::new(old, new, lister.options().ordering(), settings))
}

#[derive(Debug, Snafu)]
pub enum CompareError {
    #[snafu(display("{} is neither a folder nor a listing file", path.best_effort_path_display()))]
    NotFoundError { path: PathBuf },
    #[snafu(context(false), display("Failed to read a side of the comparison"))]
    ListError { source: ListError },
}
