//! Source directory listing

use std::fs;
use std::path::Path;
use tracing::debug;

/// List the names of all non-directory entries directly under `dir`, sorted.
///
/// An unreadable or missing directory yields an empty list; callers treat
/// that as "nothing to do".
pub fn list_files(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut files: Vec<String> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            // follows symlinks, so a link to a directory is skipped too
            let is_dir = fs::metadata(entry.path()).map(|m| m.is_dir()).ok()?;
            if is_dir {
                None
            } else {
                Some(entry.file_name().to_string_lossy().into_owned())
            }
        })
        .collect();

    files.sort();
    debug!("Found {} files in {}", files.len(), dir.display());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lists_files_but_not_directories() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("b.jpg"), b"b").unwrap();
        fs::write(temp_dir.path().join("a.heic"), b"a").unwrap();
        fs::create_dir(temp_dir.path().join("nested")).unwrap();
        fs::write(temp_dir.path().join("nested").join("c.png"), b"c").unwrap();

        let files = list_files(temp_dir.path());

        assert_eq!(files, vec!["a.heic".to_string(), "b.jpg".to_string()]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let temp_dir = tempdir().expect("Failed to create temp dir");

        assert!(list_files(&temp_dir.path().join("does-not-exist")).is_empty());
    }

    #[test]
    fn test_file_path_is_empty() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        assert!(list_files(&file).is_empty());
    }
}
