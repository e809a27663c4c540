use crate::domain::ports::Storage;
use crate::utils::error::{PrepError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path);
        fs::read(&full_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => PrepError::InputNotFound {
                path: full_path.display().to_string(),
            },
            _ => PrepError::IoError(e),
        })
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            // 跟隨符號連結：指向一般檔案的連結也算候選檔案
            if !entry.path().is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => tracing::debug!("Ignoring non UTF-8 file name: {:?}", raw),
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let err = storage.read_file("missing.json").unwrap_err();
        assert!(matches!(err, PrepError::InputNotFound { .. }));
    }

    #[test]
    fn test_write_then_list() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("a.json", b"[]").unwrap();
        storage.write_file("nested/b.json", b"{}").unwrap();

        assert_eq!(storage.read_file("a.json").unwrap(), b"[]");
        // Subdirectories are not files.
        assert_eq!(storage.list_files().unwrap(), vec!["a.json".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_follows_symlinks_to_files() {
        let dir = TempDir::new().unwrap();
        let target_dir = TempDir::new().unwrap();
        std::fs::write(target_dir.path().join("words.json"), "{}").unwrap();
        std::os::unix::fs::symlink(
            target_dir.path().join("words.json"),
            dir.path().join("linked.json"),
        )
        .unwrap();
        std::os::unix::fs::symlink(target_dir.path(), dir.path().join("linked_dir.json")).unwrap();

        let storage = LocalStorage::new(dir.path());

        assert_eq!(storage.list_files().unwrap(), vec!["linked.json".to_string()]);
    }
}
