use std::path::{Path, PathBuf};

/// Renders a path for messages, preferring its canonical form and falling
/// back to an absolute (but unresolved) path when it does not exist.
pub fn best_effort_path_display(path: &Path) -> String {
    match path.canonicalize() {
        Ok(canonical_path) => canonical_path.display().to_string(),
        Err(_) => std::path::absolute(path)
            .unwrap_or_else(|_| path.to_path_buf())
            .display()
            .to_string(),
    }
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn existing_path_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join(".");
        assert_eq!(
            nested.best_effort_path_display(),
            dir.path().canonicalize().unwrap().display().to_string()
        );
    }

    #[test]
    fn missing_path_is_made_absolute() {
        let shown = Path::new("does/not/exist.txt").best_effort_path_display();
        assert!(Path::new(&shown).is_absolute());
        assert!(shown.ends_with("exist.txt"));
    }
}
