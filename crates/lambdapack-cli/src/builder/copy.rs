//! Filesystem helpers for assembling build directories

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Remove `path` if it exists and create it again, empty
pub fn recreate_dir(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(path)
}

/// Copy the contents of `src` into `dst` recursively. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<usize> {
    copy_tree_excluding(src, dst, &[])
}

/// Like [`copy_tree`], but never descends into `dst` or any of `excluded`.
///
/// `src` may contain the destination, e.g. a code location of `.` with the
/// build directory below the project root.
pub fn copy_tree_excluding(src: &Path, dst: &Path, excluded: &[&Path]) -> io::Result<usize> {
    fs::create_dir_all(dst)?;
    let src = fs::canonicalize(src)?;
    let skipped: Vec<PathBuf> = std::iter::once(dst)
        .chain(excluded.iter().copied())
        .map(|path| fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
        .collect();

    let mut copied = 0;
    let walker = WalkDir::new(&src)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !skipped.iter().any(|skip| entry.path().starts_with(skip)));

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        let Ok(relative) = entry.path().strip_prefix(&src) else {
            continue;
        };
        let dest = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Copy a single file or a whole directory to `dst`, creating parents as needed
pub fn copy_path(src: &Path, dst: &Path) -> io::Result<usize> {
    if src.is_dir() {
        return copy_tree(src, dst);
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;
    Ok(1)
}

/// Join a relative path onto `base`, ignoring `.` components
pub fn join_relative(base: &Path, relative: &Path) -> PathBuf {
    let mut joined = base.to_path_buf();
    for component in relative.components() {
        match component {
            Component::CurDir => {}
            other => joined.push(other.as_os_str()),
        }
    }
    joined
}

/// Every file below `root`, relative to it, sorted
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, path.to_string_lossy().as_bytes())
    }

    #[test]
    fn test_copy_tree_preserves_structure() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let src = dir.path().join("src");
        for file in ["a/main.py", "a/db.py", "a/sub/util.py"] {
            if touch(&src.join(file)).is_err() {
                return;
            }
        }
        let dst = dir.path().join("dst");
        let copied = copy_tree(&src, &dst);
        assert!(copied.is_ok_and(|n| n == 3));
        assert_eq!(
            list_files(&dst),
            vec![
                PathBuf::from("a/db.py"),
                PathBuf::from("a/main.py"),
                PathBuf::from("a/sub/util.py"),
            ]
        );
    }

    #[test]
    fn test_copy_tree_skips_nested_destination() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let src = dir.path().join("project");
        for file in ["app.py", "lib/util.py", ".aws-sam/build/Other/other.py"] {
            if touch(&src.join(file)).is_err() {
                return;
            }
        }
        let build_root = src.join(".aws-sam/build");
        let dst = build_root.join("Func");

        let copied = copy_tree_excluding(&src, &dst, &[&build_root]);
        assert!(copied.is_ok_and(|n| n == 2));
        assert_eq!(
            list_files(&dst),
            vec![PathBuf::from("app.py"), PathBuf::from("lib/util.py")]
        );
        // Without the build root excluded, siblings are copied but the
        // destination itself is still never re-entered.
        let copied = copy_tree(&src, &dst);
        assert!(copied.is_ok_and(|n| n == 3));
        assert!(!dst.join(".aws-sam/build/Func").exists());
    }

    #[test]
    fn test_recreate_dir_removes_stale_files() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let target = dir.path().join("target");
        if touch(&target.join("stale.py")).is_err() {
            return;
        }
        assert!(recreate_dir(&target).is_ok());
        assert!(target.is_dir());
        assert!(list_files(&target).is_empty());
    }

    #[test]
    fn test_copy_path_single_file_creates_parents() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let src = dir.path().join("logger.py");
        if touch(&src).is_err() {
            return;
        }
        let dst = dir.path().join("out/my_app/utils/logger.py");
        assert!(copy_path(&src, &dst).is_ok_and(|n| n == 1));
        assert!(dst.is_file());
    }

    #[test]
    fn test_join_relative_skips_cur_dir() {
        let joined = join_relative(Path::new("/build/Func"), Path::new("."));
        assert_eq!(joined, PathBuf::from("/build/Func"));
        let joined = join_relative(Path::new("/build/Func"), Path::new("./my_app/lambdas"));
        assert_eq!(joined, PathBuf::from("/build/Func/my_app/lambdas"));
    }
}
