//! Injectable storage capability used by the transform.
//!
//! The transform never touches `std::fs` directly; everything goes through an
//! [`AssetStore`] so that server-side builds can target an in-memory backend
//! while static builds write to real disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use same_file::is_same_file;

/// Narrow storage capability: read a source asset, report its size, probe
/// existence, copy to an output location. Deliberately not a full filesystem
/// abstraction.
pub trait AssetStore: Send + Sync {
    /// Read the full contents of `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Size in bytes of the file at `path`.
    fn size(&self, path: &Path) -> io::Result<u64>;

    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Copy `source` to `destination`, creating parent directories as needed.
    fn copy(&self, source: &Path, destination: &Path) -> io::Result<()>;
}

/// Real-disk backend used for static builds.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskStore;

impl AssetStore for DiskStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn copy(&self, source: &Path, destination: &Path) -> io::Result<()> {
        if destination.exists() && is_same_file(source, destination)? {
            return Ok(());
        }
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }

        // Stream rather than buffering whole assets in memory.
        let mut reader = fs::File::open(source)?;
        let mut writer = fs::File::create(destination)?;
        io::copy(&mut reader, &mut writer)?;
        Ok(())
    }
}

/// In-memory backend for dev/server builds and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: DashMap<PathBuf, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, replacing any previous content at the same path.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the store holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetStore for MemoryStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).map(|entry| entry.clone()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn size(&self, path: &Path) -> io::Result<u64> {
        self.read(path).map(|content| content.len() as u64)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn copy(&self, source: &Path, destination: &Path) -> io::Result<()> {
        let content = self.read(source)?;
        self.files.insert(destination.to_path_buf(), content);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn disk_copy_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source.png");
        fs::write(&source, b"png bytes").unwrap();

        let destination = dir.path().join("out/nested/source.png");
        DiskStore.copy(&source, &destination).unwrap();

        assert_eq!(fs::read(&destination).unwrap(), b"png bytes");
    }

    #[test]
    fn disk_copy_onto_itself_is_a_no_op() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("self.png");
        fs::write(&source, b"content").unwrap();

        DiskStore.copy(&source, &source).unwrap();
        assert_eq!(fs::read(&source).unwrap(), b"content");
    }

    #[test]
    fn disk_store_reports_size_and_existence() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.bin");
        fs::write(&file, vec![0u8; 42]).unwrap();

        assert_eq!(DiskStore.size(&file).unwrap(), 42);
        assert!(DiskStore.exists(&file));
        assert!(!DiskStore.exists(&dir.path().join("missing.bin")));
    }

    #[test]
    fn memory_store_round_trips_content() {
        let store = MemoryStore::new();
        store.insert("/src/a.svg", b"<svg/>".to_vec());

        assert!(store.exists(Path::new("/src/a.svg")));
        assert_eq!(store.size(Path::new("/src/a.svg")).unwrap(), 6);
        assert_eq!(store.read(Path::new("/src/a.svg")).unwrap(), b"<svg/>");

        store.copy(Path::new("/src/a.svg"), Path::new("/out/a.svg")).unwrap();
        assert_eq!(store.read(Path::new("/out/a.svg")).unwrap(), b"<svg/>");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn memory_store_read_of_missing_file_is_not_found() {
        let store = MemoryStore::new();
        let err = store.read(Path::new("/nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
