//! Flat on-disk store for uploaded files.
//!
//! Files are keyed by their original name inside a single directory. A second
//! upload with the same name replaces the first. Uploads are written to a
//! temporary file next to the target and renamed over it once complete, so a
//! failed upload never leaves a truncated file behind.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::StorageError;

/// Prefix of in-flight upload files; never served.
const TEMP_PREFIX: &str = ".upload-";

/// The upload directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

/// An opened stored file ready to be streamed to a client.
#[derive(Debug)]
pub struct StoredFile {
    pub file: File,
    /// Final path component, used in `Content-Disposition`.
    pub file_name: String,
    pub len: u64,
}

/// An upload being written to a temporary file.
///
/// Call [`PendingUpload::commit`] to move it into place or
/// [`PendingUpload::abort`] to discard it.
#[derive(Debug)]
pub struct PendingUpload {
    file: File,
    temp_path: PathBuf,
    target: PathBuf,
    written: u64,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).await?;
        info!(root = %self.root.display(), "Storage directory ready");
        Ok(())
    }

    /// Reduce a client supplied file name to its final path component.
    ///
    /// Both `/` and `\` count as separators. Names that reduce to nothing, to
    /// `.` or to `..` are rejected.
    pub fn sanitize_file_name(name: &str) -> Result<String, StorageError> {
        let last = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default().trim();

        if last.is_empty() || last == "." || last == ".." || last.contains('\0') {
            return Err(StorageError::invalid_name(name));
        }
        if last.starts_with(TEMP_PREFIX) {
            return Err(StorageError::invalid_name(name));
        }

        Ok(last.to_string())
    }

    /// Map a relative download path onto a path inside the store.
    ///
    /// Only plain path segments are accepted; `..`, `.`, roots and
    /// drive prefixes all make the path invalid.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, StorageError> {
        let path = Path::new(relative);
        let mut resolved = self.root.clone();
        let mut segments = 0;

        for component in path.components() {
            match component {
                Component::Normal(segment) => {
                    resolved.push(segment);
                    segments += 1;
                }
                _ => return Err(StorageError::invalid_name(relative)),
            }
        }

        if segments == 0 {
            return Err(StorageError::invalid_name(relative));
        }

        Ok(resolved)
    }

    /// Start writing an upload named `name`.
    pub async fn begin_upload(&self, name: &str) -> Result<PendingUpload, StorageError> {
        let file_name = Self::sanitize_file_name(name)?;
        let target = self.root.join(&file_name);
        let temp_path = self
            .root
            .join(format!("{}{}", TEMP_PREFIX, Uuid::new_v4()));

        let file = File::create(&temp_path).await?;
        debug!(target = %target.display(), temp = %temp_path.display(), "Upload started");

        Ok(PendingUpload {
            file,
            temp_path,
            target,
            written: 0,
        })
    }

    /// Store `bytes` under `name` in one step.
    pub async fn save(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let mut upload = self.begin_upload(name).await?;
        if let Err(e) = upload.write(bytes).await {
            upload.abort().await;
            return Err(e);
        }
        upload.commit().await
    }

    /// Open the stored file at `relative` for download.
    pub async fn open(&self, relative: &str) -> Result<StoredFile, StorageError> {
        let path = self.resolve(relative)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| StorageError::invalid_name(relative))?;
        if file_name.starts_with(TEMP_PREFIX) {
            return Err(StorageError::not_found(relative));
        }

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::not_found(relative))
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(StorageError::not_found(relative));
        }

        Ok(StoredFile {
            file,
            file_name,
            len: metadata.len(),
        })
    }
}

impl PendingUpload {
    /// Append a chunk of the upload body.
    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flush the temporary file and rename it over the target.
    pub async fn commit(mut self) -> Result<PathBuf, StorageError> {
        let result = async {
            self.file.flush().await?;
            self.file.sync_all().await?;
            fs::rename(&self.temp_path, &self.target).await
        }
        .await;

        match result {
            Ok(()) => {
                info!(path = %self.target.display(), bytes = self.written, "File stored");
                Ok(self.target)
            }
            Err(e) => {
                remove_temp(&self.temp_path).await;
                Err(e.into())
            }
        }
    }

    /// Discard the temporary file.
    pub async fn abort(self) {
        drop(self.file);
        remove_temp(&self.temp_path).await;
    }
}

async fn remove_temp(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove temporary upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(FileStore::sanitize_file_name("a.txt").unwrap(), "a.txt");
        assert_eq!(
            FileStore::sanitize_file_name("../../etc/passwd").unwrap(),
            "passwd"
        );
        assert_eq!(
            FileStore::sanitize_file_name("C:\\Users\\me\\photo.jpg").unwrap(),
            "photo.jpg"
        );
        assert_eq!(
            FileStore::sanitize_file_name("holiday pics.png").unwrap(),
            "holiday pics.png"
        );
    }

    #[test]
    fn test_sanitize_rejects_empty_and_dots() {
        for name in ["", "   ", ".", "..", "dir/", "dir/..", ".upload-123"] {
            assert!(
                matches!(
                    FileStore::sanitize_file_name(name),
                    Err(StorageError::InvalidName(_))
                ),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_resolve() {
        let store = FileStore::new("/srv/files");

        assert_eq!(
            store.resolve("a.txt").unwrap(),
            PathBuf::from("/srv/files/a.txt")
        );
        assert_eq!(
            store.resolve("docs/a.txt").unwrap(),
            PathBuf::from("/srv/files/docs/a.txt")
        );
        for path in ["", "../secret", "docs/../../secret", "/etc/passwd", "./a.txt"] {
            assert!(store.resolve(path).is_err(), "{path:?} should be rejected");
        }
    }

    #[tokio::test]
    async fn test_save_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let path = store.save("a.txt", b"hello").await.unwrap();
        assert_eq!(path, dir.path().join("a.txt"));

        let mut stored = store.open("a.txt").await.unwrap();
        assert_eq!(stored.file_name, "a.txt");
        assert_eq!(stored.len, 5);

        let mut body = String::new();
        stored.file.read_to_string(&mut body).await.unwrap();
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn test_save_overwrites_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save("a.txt", b"first").await.unwrap();
        store.save("a.txt", b"second").await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"second");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_abort_discards_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let mut upload = store.begin_upload("b.txt").await.unwrap();
        upload.write(b"partial").await.unwrap();
        upload.abort().await;

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_open_missing_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let store = FileStore::new(dir.path());

        assert!(matches!(
            store.open("missing.txt").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.open("sub").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            store.open("../outside").await,
            Err(StorageError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_ensure_root_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/files"));

        store.ensure_root().await.unwrap();
        assert!(store.root().is_dir());
    }
}
