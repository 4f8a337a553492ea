//! In-memory filesystem adapter for testing and dry runs.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use kiln_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{KilnError, KilnResult},
};

/// In-memory filesystem. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a file in place, creating its parents (testing helper).
    pub fn seed(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let path = path.into();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                insert_ancestors(&mut inner.directories, parent);
            }
            inner.files.insert(path, content.into());
        }
    }

    /// A file's content as text (testing helper).
    pub fn read_to_string(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner
            .files
            .get(path)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Every stored file path.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
        }
    }
}

fn insert_ancestors(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        directories.insert(current.clone());
    }
}

fn lock_error(path: &Path) -> KilnError {
    KilnError::Internal {
        message: format!("memory filesystem lock poisoned while accessing {}", path.display()),
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;
        insert_ancestors(&mut inner.directories, path);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> KilnResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> KilnResult<Vec<u8>> {
        let inner = self.inner.read().map_err(|_| lock_error(path))?;
        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn list_files(&self, dir: &Path) -> KilnResult<Vec<PathBuf>> {
        let inner = self.inner.read().map_err(|_| lock_error(dir))?;
        if !inner.directories.contains(dir) {
            return Err(ApplicationError::FilesystemError {
                path: dir.to_path_buf(),
                reason: "template directory not found".into(),
            }
            .into());
        }
        Ok(inner
            .files
            .keys()
            .filter_map(|p| p.strip_prefix(dir).ok())
            .map(Path::to_path_buf)
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> KilnResult<()> {
        let mut inner = self.inner.write().map_err(|_| lock_error(path))?;
        if !inner.directories.contains(path) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such directory".into(),
            }
            .into());
        }
        inner.files.retain(|p, _| !p.starts_with(path));
        inner.directories.retain(|d| !d.starts_with(path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent_directory() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/out/a.txt"), b"x").is_err());

        fs.create_dir_all(Path::new("/out")).unwrap();
        fs.write_file(Path::new("/out/a.txt"), b"x").unwrap();
        assert_eq!(fs.read_to_string(Path::new("/out/a.txt")).as_deref(), Some("x"));
        assert!(fs.exists(Path::new("/out")));
    }

    #[test]
    fn list_files_is_relative_and_sorted() {
        let fs = MemoryFilesystem::new();
        fs.seed("/tpl/src/main.js", "m");
        fs.seed("/tpl/_gitignore", "g");
        fs.seed("/other/x", "x");

        let files = fs.list_files(Path::new("/tpl")).unwrap();
        assert_eq!(
            files,
            vec![PathBuf::from("_gitignore"), PathBuf::from("src/main.js")]
        );
    }

    #[test]
    fn remove_dir_all_only_touches_the_subtree() {
        let fs = MemoryFilesystem::new();
        fs.seed("/out/app/src/main.js", "m");
        fs.seed("/out/application.txt", "sibling with a shared prefix");

        fs.remove_dir_all(Path::new("/out/app")).unwrap();

        assert!(!fs.exists(Path::new("/out/app")));
        assert!(!fs.exists(Path::new("/out/app/src")));
        assert_eq!(fs.paths(), vec![PathBuf::from("/out/application.txt")]);
        assert!(fs.remove_dir_all(Path::new("/out/app")).is_err());
    }

    #[test]
    fn clones_share_storage() {
        let fs = MemoryFilesystem::new();
        let other = fs.clone();
        fs.seed("/a/b", "1");
        assert!(other.exists(Path::new("/a/b")));
        other.clear();
        assert!(fs.paths().is_empty());
    }
}
