//! Filesystem helpers shared by the Roost cache and CLI.
//!
//! Paths are `camino` UTF-8 paths and every access goes through `cap-std`
//! directory handles opened from ambient authority at the edge.
#![forbid(unsafe_code)]

use std::io::{self, Read};
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Read a UTF-8 text file into memory.
///
/// # Errors
/// Returns the underlying I/O error when the file cannot be opened or is not
/// valid UTF-8.
pub fn read_utf8(path: &Utf8Path) -> io::Result<String> {
    let mut file = fs_utf8::File::open_ambient(path, ambient_authority())?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Whether `path` names an existing regular file.
///
/// # Errors
/// Returns an error when the parent directory cannot be opened or the
/// metadata lookup fails for a reason other than absence.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other("path should include a file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    match dir.metadata(name) {
        Ok(meta) => Ok(meta.is_file()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(error) => Err(error),
    }
}

/// Create every missing directory above `path`.
///
/// Absolute paths are split into a root handle and a relative suffix so
/// `cap-std` can create the directories beneath it.
///
/// # Errors
/// Returns the underlying I/O error when a directory cannot be created.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }
    let (base, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

fn split_base(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let (base, relative) = match std_parent.components().next() {
        // Windows drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_parent.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from parent path"))?
                .to_path_buf();
            (base, relative)
        }
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        _ => (Utf8PathBuf::from("."), std_parent.to_path_buf()),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative_utf8 = Utf8PathBuf::from_path_buf(relative)
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;
    Ok((dir, relative_utf8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn utf8(temp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8 temp path")
    }

    #[rstest]
    fn creates_nested_parents(temp: TempDir) {
        let target = utf8(&temp).join("cache/nested/scores.db");
        ensure_parent_dir(&target).expect("create parents");
        assert!(target.parent().expect("target has a parent").is_dir());
    }

    #[rstest]
    fn reads_text_files(temp: TempDir) {
        let target = utf8(&temp).join("preferences.json");
        std::fs::write(&target, "{\"budget\":{}}").expect("write fixture");
        assert_eq!(read_utf8(&target).expect("read fixture"), "{\"budget\":{}}");
        assert!(file_is_file(&target).expect("stat fixture"));
    }

    #[rstest]
    fn missing_files_are_not_files(temp: TempDir) {
        let target = utf8(&temp).join("absent.json");
        assert!(!file_is_file(&target).expect("stat absent file"));
        assert!(read_utf8(&target).is_err());
    }
}
