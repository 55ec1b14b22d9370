//! Output paths and directory preparation.
//!
//! Paths written into the mapping are computed lexically, relative to the
//! output folder, and always use forward slashes so the mapping reads the
//! same on every platform.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::error::{QualificationResult, QualificationRunError};
use crate::services::FileSystem;

/// Returns true if `name` is a single plain path segment.
///
/// Names taken from a snapshot become folder and file names below the output
/// folders; anything that could climb out of them (separators, `.`, `..`, a
/// root or a drive prefix) is rejected, as are blank names.
#[must_use]
pub fn is_plain_name(name: &str) -> bool {
    if name.trim().is_empty() || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(segment)), None) if segment == OsStr::new(name)
    )
}

/// `<output_folder>/<project_name>`.
#[must_use]
pub fn project_output_path(output_folder: &Path, project_name: &str) -> PathBuf {
    output_folder.join(project_name)
}

/// `<folder>/<name><extension>`.
#[must_use]
pub fn observed_data_file(folder: &Path, name: &str, extension: &str) -> PathBuf {
    folder.join(format!("{name}{extension}"))
}

fn normalized(path: &Path) -> Vec<Component<'_>> {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(out.last(), Some(Component::Normal(_))) => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

fn is_anchor(component: Option<&Component<'_>>) -> bool {
    matches!(component, Some(Component::Prefix(_) | Component::RootDir))
}

/// Express `path` relative to `base`, joined with forward slashes.
///
/// `..` segments are emitted when `path` lies outside `base`. When the two
/// paths share no anchor (different roots or drive prefixes, or one absolute
/// and one relative), or when `base` keeps a leading `..` that cannot be
/// resolved lexically, `path` is returned unchanged apart from separators.
#[must_use]
pub fn relative_path(path: &Path, base: &Path) -> String {
    let target = normalized(path);
    let base = normalized(base);

    let anchored = is_anchor(target.first()) || is_anchor(base.first());
    let unresolved_base = base.contains(&Component::ParentDir);
    if (anchored && target.first() != base.first()) || unresolved_base {
        return path.to_string_lossy().replace('\\', "/");
    }

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let segments: Vec<String> = std::iter::repeat("..".to_string())
        .take(base.len() - common)
        .chain(
            target[common..]
                .iter()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        )
        .collect();

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

/// Delete `path` if it exists, then create it empty.
///
/// # Errors
/// `OutputDirectory` if the deletion or the creation fails.
pub fn recreate_directory(fs: &dyn FileSystem, path: &Path) -> QualificationResult<()> {
    if fs.directory_exists(path) {
        tracing::debug!(path = %path.display(), "deleting existing output directory");
        fs.delete_directory(path)
            .map_err(|source| QualificationRunError::OutputDirectory {
                path: path.to_path_buf(),
                source,
            })?;
    }
    ensure_directory(fs, path)
}

/// Create `path` and its missing parents.
///
/// # Errors
/// `OutputDirectory` if the creation fails.
pub fn ensure_directory(fs: &dyn FileSystem, path: &Path) -> QualificationResult<()> {
    fs.create_directory(path)
        .map_err(|source| QualificationRunError::OutputDirectory {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::LocalFileSystem;

    #[test]
    fn test_relative_path_below_base() {
        let path = Path::new("c:/tests/outputs/toto/S1");
        assert_eq!(relative_path(path, Path::new("c:/tests/outputs/")), "toto/S1");
        assert_eq!(relative_path(path, Path::new("c:/tests/outputs")), "toto/S1");
    }

    #[test]
    fn test_relative_path_outside_base() {
        assert_eq!(
            relative_path(Path::new("/data/obs/OBS.xlsx"), Path::new("/data/outputs")),
            "../obs/OBS.xlsx"
        );
        assert_eq!(
            relative_path(Path::new("shared/OBS.xlsx"), Path::new("run/outputs")),
            "../../shared/OBS.xlsx"
        );
    }

    #[test]
    fn test_relative_path_ignores_cur_dir_and_resolves_parent() {
        assert_eq!(
            relative_path(Path::new("./out/./a/../b/file.json"), Path::new("out")),
            "b/file.json"
        );
    }

    #[test]
    fn test_relative_path_to_itself() {
        assert_eq!(relative_path(Path::new("/a/b"), Path::new("/a/b/")), ".");
    }

    #[test]
    fn test_relative_path_mixed_anchors_returns_path() {
        assert_eq!(relative_path(Path::new("/abs/x"), Path::new("rel")), "/abs/x");
    }

    #[test]
    fn test_relative_path_unresolved_base_parent_returns_path() {
        assert_eq!(relative_path(Path::new("a"), Path::new("../out")), "a");
        assert_eq!(
            relative_path(Path::new("../out/toto/S1"), Path::new("../out")),
            "../out/toto/S1"
        );
    }

    #[test]
    fn test_plain_names() {
        for name in ["toto", "S1", "OBS data", "Ind.v2", "..hidden"] {
            assert!(is_plain_name(name), "{name}");
        }
    }

    #[test]
    fn test_names_that_leave_the_folder_are_not_plain() {
        for name in [
            "", "  ", ".", "..", "../victim", "../../victim/OBS", "a/b", "a\\b", "/abs", "toto/",
            "./toto",
        ] {
            assert!(!is_plain_name(name), "{name:?}");
        }
    }

    #[test]
    fn test_observed_data_file_name() {
        assert_eq!(
            observed_data_file(Path::new("obs"), "OBS", ".xlsx"),
            Path::new("obs").join("OBS.xlsx")
        );
        assert_eq!(
            project_output_path(Path::new("c:/tests/outputs/"), "toto"),
            Path::new("c:/tests/outputs/toto")
        );
    }

    #[test]
    fn test_recreate_directory_removes_stale_content() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("toto");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("stale.json"), "{}").unwrap();

        recreate_directory(&LocalFileSystem, &target).unwrap();

        assert!(target.is_dir());
        assert!(!target.join("stale.json").exists());
    }
}
