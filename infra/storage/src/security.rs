use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

fn traversal(path: &Path, reason: &'static str) -> StorageError {
    StorageError::PathTraversalAttempt {
        message: path.display().to_string().into(),
        context: Some(reason.into()),
    }
}

/// Folds `.` and `..` lexically. A `..` that would climb above the root is rejected.
fn normalize_relative(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::Normal(segment) => out.push(segment),
            Component::ParentDir if out.pop() => {},
            Component::ParentDir => return Err(traversal(path, "'..' climbs above the root")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(traversal(path, "Absolute paths are not allowed"));
            },
        }
    }

    if out.as_os_str().is_empty() {
        return Err(traversal(path, "Path resolves to the root itself"));
    }

    Ok(out)
}

/// Joins `path` onto the canonical `root`, refusing anything that lands outside it.
pub(crate) fn resolve_path(root: &Path, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
    let path = path.as_ref();
    let joined = root.join(normalize_relative(path)?);

    match joined.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(canonical),
        Ok(canonical) => Err(traversal(&canonical, "Symlink points outside the root")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => check_ancestors(root, joined),
        Err(e) => Err(StorageError::Io { source: e, context: None }),
    }
}

/// For a path that does not exist yet, the nearest existing ancestor must still be inside
/// the root once symlinks are followed.
fn check_ancestors(root: &Path, joined: PathBuf) -> Result<PathBuf, StorageError> {
    let mut current = joined.parent();

    while let Some(ancestor) = current {
        if ancestor == root {
            return Ok(joined);
        }
        if ancestor.exists() {
            return match ancestor.canonicalize() {
                Ok(canonical) if canonical.starts_with(root) => Ok(joined),
                Ok(canonical) => Err(traversal(&canonical, "Parent directory escapes the root")),
                Err(e) => Err(StorageError::Io {
                    source: e,
                    context: Some("Failed to verify parent directory".into()),
                }),
            };
        }
        current = ancestor.parent();
    }

    Err(traversal(&joined, "No ancestor inside the root"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_inner_parent_segments() {
        let out = normalize_relative(Path::new("uploads/../photos.json")).unwrap();
        assert_eq!(out, PathBuf::from("photos.json"));
    }

    #[test]
    fn rejects_escape_and_absolute() {
        assert!(matches!(
            normalize_relative(Path::new("../etc/passwd")),
            Err(StorageError::PathTraversalAttempt { .. })
        ));
        assert!(matches!(
            normalize_relative(Path::new("/etc/passwd")),
            Err(StorageError::PathTraversalAttempt { .. })
        ));
        assert!(matches!(
            normalize_relative(Path::new("uploads/..")),
            Err(StorageError::PathTraversalAttempt { .. })
        ));
    }

    #[test]
    fn resolves_missing_nested_file_under_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        let resolved = resolve_path(&root, "uploads/a/b.jpg").unwrap();
        assert!(resolved.starts_with(&root));
        assert!(resolved.ends_with("uploads/a/b.jpg"));
    }
}
