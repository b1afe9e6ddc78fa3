use std::cell::OnceCell;
use std::fs::{self, File, Metadata};
use std::hash::Hasher;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use metrohash::MetroHash128;
use snafu::{ResultExt, Snafu};
use tracing::warn;

use crate::config::NameType;
use crate::ext::BestEffortPathExt;
use crate::filesystem::ItemOrdering;

/// Chunk size used when streaming file content through the hasher.
const HASH_BUFFER_SIZE: usize = 1024 * 1024;

/// A node of the walked tree.
///
/// The identity (`base` + relative `path` + `depth`) is fixed at construction.
/// Stat metadata and the content hash are computed on first use and cached
/// for the lifetime of the node.
#[derive(Debug, Clone)]
pub struct PathItem {
    base: PathBuf,
    path: PathBuf,
    depth: usize,
    is_dir: bool,
    metadata: OnceCell<Metadata>,
    hash: OnceCell<String>,
}

impl PathItem {
    /// The root of a walk: an existing folder at depth 0.
    pub fn root(base: impl Into<PathBuf>) -> Self {
        Self::new(base.into(), PathBuf::new(), 0, true)
    }

    /// A node that is not anchored to a folder on disk, used to evaluate
    /// sort keys against paths recovered from a listing.
    pub fn detached(path: impl Into<PathBuf>, depth: usize, is_dir: bool) -> Self {
        Self::new(PathBuf::new(), path.into(), depth, is_dir)
    }

    fn new(base: PathBuf, path: PathBuf, depth: usize, is_dir: bool) -> Self {
        Self {
            base,
            path,
            depth,
            is_dir,
            metadata: OnceCell::new(),
            hash: OnceCell::new(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path relative to the walk root; empty for the root itself.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn abspath(&self) -> PathBuf {
        if self.path.as_os_str().is_empty() {
            self.base.clone()
        } else {
            self.base.join(&self.path)
        }
    }

    /// Last segment of the relative path, or of the base folder for the root.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .or_else(|| self.base.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn display_name(&self, name_type: NameType) -> String {
        match name_type {
            NameType::Dot => ".".to_string(),
            NameType::Name => self.name(),
            NameType::Relpath => self.path.to_string_lossy().into_owned(),
            NameType::Abspath => self.abspath().to_string_lossy().into_owned(),
        }
    }

    pub fn metadata(&self) -> Result<&Metadata, PathItemError> {
        if let Some(metadata) = self.metadata.get() {
            return Ok(metadata);
        }
        let path = self.abspath();
        let metadata = fs::metadata(&path).context(StatSnafu { path })?;
        Ok(self.metadata.get_or_init(|| metadata))
    }

    #[cfg(windows)]
    pub fn hidden(&self) -> Result<bool, PathItemError> {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
        Ok(self.metadata()?.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
    }

    #[cfg(not(windows))]
    pub fn hidden(&self) -> Result<bool, PathItemError> {
        Ok(self.name().starts_with('.'))
    }

    pub fn size(&self) -> Result<u64, PathItemError> {
        Ok(self.metadata()?.len())
    }

    pub fn modified(&self) -> Result<SystemTime, PathItemError> {
        let path = self.abspath();
        self.metadata()?.modified().context(StatSnafu { path })
    }

    /// Inode change time on unix, creation time elsewhere.
    #[cfg(unix)]
    pub fn changed(&self) -> Result<SystemTime, PathItemError> {
        use std::os::unix::fs::MetadataExt;
        use std::time::Duration;

        let metadata = self.metadata()?;
        let (secs, nanos) = (metadata.ctime(), metadata.ctime_nsec());
        let offset = Duration::new(secs.unsigned_abs(), nanos.clamp(0, 999_999_999) as u32);
        Ok(if secs >= 0 {
            SystemTime::UNIX_EPOCH + offset
        } else {
            SystemTime::UNIX_EPOCH - offset
        })
    }

    #[cfg(not(unix))]
    pub fn changed(&self) -> Result<SystemTime, PathItemError> {
        let path = self.abspath();
        self.metadata()?.created().context(StatSnafu { path })
    }

    /// Hex digest of the file content, empty for anything but a regular file.
    pub fn content_hash(&self) -> Result<&str, PathItemError> {
        if let Some(hash) = self.hash.get() {
            return Ok(hash);
        }
        let hash = if self.metadata()?.is_file() {
            let path = self.abspath();
            hash_file(&path).context(HashSnafu { path })?
        } else {
            String::new()
        };
        Ok(self.hash.get_or_init(|| hash))
    }

    fn child(&self, name: &std::ffi::OsStr, is_dir: bool) -> Self {
        Self::new(self.base.clone(), self.path.join(name), self.depth + 1, is_dir)
    }

    /// Immediate entries of this folder, sorted with `ordering`.
    ///
    /// Folders that cannot be read yield no children so that one unreadable
    /// system folder does not abort a whole walk.
    pub fn children(&self, ordering: &ItemOrdering) -> Vec<PathItem> {
        let abspath = self.abspath();
        if !abspath.is_dir() {
            return Vec::new();
        }

        let entries = match fs::read_dir(&abspath) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
                warn!("Skipping unreadable folder {}", abspath.best_effort_path_display());
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "Failed to list {}: {}",
                    abspath.best_effort_path_display(),
                    err
                );
                return Vec::new();
            }
        };

        let mut children = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(self.child(&entry.file_name(), entry.path().is_dir())),
                Err(err) => {
                    warn!("Skipping entry in {}: {}", abspath.display(), err);
                    None
                }
            })
            .collect::<Vec<_>>();
        ordering.sort(&mut children);
        children
    }
}

fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = MetroHash128::default();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.write(&buffer[..read]);
    }
    let (high, low) = hasher.finish128();
    Ok(format!("{high:016x}{low:016x}"))
}

#[derive(Debug, Snafu)]
pub enum PathItemError {
    #[snafu(display("Failed to read metadata of {}", path.best_effort_path_display()))]
    StatError { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to hash the content of {}", path.best_effort_path_display()))]
    HashError { path: PathBuf, source: io::Error },
    #[snafu(display("Date format '{}' cannot be rendered", date_format))]
    DateFormatError {
        date_format: String,
        source: std::fmt::Error,
    },
}
