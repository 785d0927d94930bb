//! Snapshot file helpers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Replace `path` with `contents`.
///
/// The bytes go to a sibling temporary file that is renamed over the target,
/// so a failed write leaves the previous snapshot in place. Parent
/// directories are created as needed.
pub fn write_snapshot(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

/// Remove a snapshot file. Returns whether a file was removed.
pub fn remove_snapshot(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_snapshot_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/catalog.json");
        write_snapshot(&path, b"[]").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"[]");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_write_snapshot_replaces() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("table.csv");
        write_snapshot(&path, b"one").unwrap();
        write_snapshot(&path, b"two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn test_remove_snapshot() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gone.json");
        assert!(!remove_snapshot(&path).unwrap());
        fs::write(&path, b"x").unwrap();
        assert!(remove_snapshot(&path).unwrap());
        assert!(!path.exists());
    }
}
