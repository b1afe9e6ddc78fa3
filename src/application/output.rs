use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Options;

fn default_file_name(options: &Options) -> String {
    format!("filelist{}", options.default_extension())
}

/// Resolves the file a listing is written to.
///
/// Without a requested path the default `filelist` name is used. Relative
/// paths are taken from the first listed folder, or from the working
/// directory with `rel_to_cwd`. An existing folder receives the default
/// name inside it.
pub fn resolve_output_path(
    requested: Option<&Path>,
    first_folder: &Path,
    options: &Options,
) -> io::Result<PathBuf> {
    let path = requested
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(default_file_name(options)));
    let path = if path.is_absolute() {
        path
    } else if options.rel_to_cwd {
        std::path::absolute(path)?
    } else {
        std::path::absolute(first_folder.join(path))?
    };

    if path.is_dir() {
        Ok(path.join(default_file_name(options)))
    } else {
        Ok(path)
    }
}

pub fn open_output(path: &Path, options: &Options) -> io::Result<File> {
    debug!(
        "Opening {} ({})",
        path.display(),
        if options.append { "append" } else { "truncate" }
    );
    OpenOptions::new()
        .create(true)
        .write(true)
        .append(options.append)
        .truncate(!options.append)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatType;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn default_name_lands_in_first_folder() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = resolve_output_path(None, dir.path(), &Options::default()).unwrap();
        assert_eq!(path, std::path::absolute(dir.path().join("filelist.txt")).unwrap());
    }

    #[test]
    fn folder_target_gets_default_name_for_layout() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(dir.path().join("lists")).unwrap();
        let options = Options {
            format_type: FormatType::Xml,
            ..Options::default()
        };
        let path = resolve_output_path(Some(Path::new("lists")), dir.path(), &options).unwrap();
        assert!(path.ends_with("lists/filelist.xml"));
    }

    #[test]
    fn absolute_target_is_kept() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let target = dir.path().join("out.txt");
        let target = std::path::absolute(target).unwrap();
        let path = resolve_output_path(Some(&target), Path::new("elsewhere"), &Options::default()).unwrap();
        assert_eq!(path, target);
    }

    #[test]
    fn relative_to_working_directory() {
        let options = Options {
            rel_to_cwd: true,
            ..Options::default()
        };
        let path = resolve_output_path(Some(Path::new("out.txt")), Path::new("/some/folder"), &options).unwrap();
        assert_eq!(path, std::env::current_dir().unwrap().join("out.txt"));
    }

    #[test]
    fn append_mode_keeps_previous_content() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = dir.path().join("out.txt");
        let options = Options {
            append: true,
            ..Options::default()
        };
        writeln!(open_output(&path, &options).unwrap(), "first").unwrap();
        writeln!(open_output(&path, &options).unwrap(), "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");

        writeln!(open_output(&path, &Options::default()).unwrap(), "third").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "third\n");
    }
}
