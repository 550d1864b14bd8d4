//! Force-included files copied over the assembled build output
//!
//! A distribution path without [`GLOB_MARKER`] names one destination. With a
//! marker, everything up to the first `/` after it is a pattern for existing
//! directories and the remainder is the destination inside each match:
//! `shared/*/vendor.txt` copies into every `shared/<dir>/vendor.txt` that does
//! not exist yet.
//!
//! Overlays are optional. Missing sources and copy failures are logged and
//! skipped.

use super::copy::{copy_path, join_relative};
use lambdapack_config::build_config::GLOB_MARKER;
use lambdapack_config::ForceInclude;
use lambdapack_logger as logger;
use std::path::{Path, PathBuf};

/// Where an overlay is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayScope {
    /// Inside one function's build directory; plain destinations are overwritten
    Unit,
    /// At the build root after all functions are assembled; existing
    /// destinations are left untouched
    BuildRoot,
}

/// A glob distribution path split around its marker
#[derive(Debug, PartialEq, Eq)]
struct GlobTarget<'a> {
    pattern: &'a str,
    suffix: &'a str,
}

fn split_glob(distribution: &str) -> Option<GlobTarget<'_>> {
    let marker = distribution.find(GLOB_MARKER)?;
    let split = distribution[marker..]
        .find('/')
        .map_or(distribution.len(), |offset| marker + offset);
    Some(GlobTarget {
        pattern: &distribution[..split],
        suffix: distribution[split..].trim_start_matches('/'),
    })
}

/// Apply one force-include rooted at `target`. Returns the number of files copied.
pub fn apply(root: &Path, target: &Path, include: &ForceInclude, scope: OverlayScope) -> usize {
    let source = root.join(&include.source);
    if !source.exists() {
        logger::debug(&format!(
            "Skipping force-include {}: source does not exist",
            include.source.display()
        ));
        return 0;
    }

    if !include.is_glob() {
        let dest = join_relative(target, Path::new(&include.distribution));
        if scope == OverlayScope::BuildRoot && dest.exists() {
            return 0;
        }
        return copy_best_effort(&source, &dest);
    }

    let Some(glob_target) = split_glob(&include.distribution) else {
        return 0;
    };
    glob_destinations(target, &glob_target, &source)
        .iter()
        .map(|dest| copy_best_effort(&source, dest))
        .sum()
}

/// Destinations under every matching directory that do not exist yet
fn glob_destinations(target: &Path, glob_target: &GlobTarget<'_>, source: &Path) -> Vec<PathBuf> {
    let base = glob::Pattern::escape(&target.to_string_lossy());
    let pattern = format!("{}/{}", base.trim_end_matches('/'), glob_target.pattern);

    let matches = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            logger::warn(&format!("Invalid force-include pattern '{}': {}", pattern, e));
            return Vec::new();
        }
    };

    let file_name = source.file_name().map(PathBuf::from).unwrap_or_default();
    matches
        .filter_map(Result::ok)
        .filter(|path| path.is_dir())
        .map(|dir| {
            if glob_target.suffix.is_empty() {
                dir.join(&file_name)
            } else {
                join_relative(&dir, Path::new(glob_target.suffix))
            }
        })
        .filter(|dest| !dest.exists())
        .collect()
}

fn copy_best_effort(source: &Path, dest: &Path) -> usize {
    match copy_path(source, dest) {
        Ok(copied) => {
            logger::debug(&format!(
                "Copied {} -> {}",
                source.display(),
                dest.display()
            ));
            copied
        }
        Err(e) => {
            logger::warn(&format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                dest.display(),
                e
            ));
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    }

    #[test]
    fn test_split_glob() {
        assert!(!ForceInclude::new("src/vendor.txt", "shared/vendor.txt").is_glob());
        assert_eq!(split_glob("shared/vendor.txt"), None);
        assert_eq!(
            split_glob("shared/*/vendor.txt"),
            Some(GlobTarget {
                pattern: "shared/*",
                suffix: "vendor.txt"
            })
        );
        assert_eq!(
            split_glob("*/lib/vendor"),
            Some(GlobTarget {
                pattern: "*",
                suffix: "lib/vendor"
            })
        );
        assert_eq!(
            split_glob("lambda*"),
            Some(GlobTarget {
                pattern: "lambda*",
                suffix: ""
            })
        );
    }

    #[test]
    fn test_glob_copies_only_where_missing() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let root = dir.path().join("project");
        let target = dir.path().join("build");
        if write(&root.join("src/vendor.txt"), "shared").is_err()
            || fs::create_dir_all(target.join("shared/a")).is_err()
            || write(&target.join("shared/b/vendor.txt"), "existing").is_err()
            || write(&target.join("shared/not-a-dir"), "file").is_err()
        {
            return;
        }

        let include = ForceInclude::new("src/vendor.txt", "shared/*/vendor.txt");
        let copied = apply(&root, &target, &include, OverlayScope::Unit);

        assert_eq!(copied, 1);
        assert_eq!(
            fs::read_to_string(target.join("shared/a/vendor.txt")).ok(),
            Some("shared".to_string())
        );
        assert_eq!(
            fs::read_to_string(target.join("shared/b/vendor.txt")).ok(),
            Some("existing".to_string())
        );
    }

    #[test]
    fn test_plain_destination_copies_directory() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let root = dir.path().join("project");
        let target = dir.path().join("build/Func");
        if write(&root.join("src/my_app/common/config.py"), "").is_err()
            || write(&root.join("src/my_app/common/models.py"), "").is_err()
        {
            return;
        }

        let include = ForceInclude::new("src/my_app/common", "my_app/common");
        assert_eq!(apply(&root, &target, &include, OverlayScope::Unit), 2);
        assert!(target.join("my_app/common/config.py").is_file());
        assert!(target.join("my_app/common/models.py").is_file());
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let include = ForceInclude::new("void/null/nothing", "void/null/nothing");
        let target = dir.path().join("build");
        assert_eq!(apply(dir.path(), &target, &include, OverlayScope::Unit), 0);
        assert!(!target.join("void").exists());
    }

    #[test]
    fn test_build_root_scope_keeps_existing() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let root = dir.path().join("project");
        let target = dir.path().join("build");
        if write(&root.join("README.md"), "new").is_err()
            || write(&target.join("README.md"), "old").is_err()
        {
            return;
        }

        let include = ForceInclude::new("README.md", "README.md");
        assert_eq!(apply(&root, &target, &include, OverlayScope::BuildRoot), 0);
        assert_eq!(
            fs::read_to_string(target.join("README.md")).ok(),
            Some("old".to_string())
        );
        assert_eq!(apply(&root, &target, &include, OverlayScope::Unit), 1);
        assert_eq!(
            fs::read_to_string(target.join("README.md")).ok(),
            Some("new".to_string())
        );
    }
}
