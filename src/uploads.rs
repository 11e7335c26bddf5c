use std::path::{Path, PathBuf};
use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;
use tracing::info;
use crate::core::library::{LibraryError, LibraryResult};

const NAME_BYTES: usize = 16;

// UploadedFile is the single image part of a book form
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UploadedFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(original_name: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            original_name: original_name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }
}

#[async_trait]
pub(crate) trait UploadHandler: Sync + Send {
    // persists the file and returns the web path it is served under
    async fn store(&self, file: &UploadedFile) -> LibraryResult<String>;
}

// DiskUploadHandler writes uploads into a public directory under random names
#[derive(Debug, Clone)]
pub struct DiskUploadHandler {
    dir: PathBuf,
    prefix: String,
}

impl DiskUploadHandler {
    pub(crate) fn new(dir: impl Into<PathBuf>, prefix: &str) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl UploadHandler for DiskUploadHandler {
    async fn store(&self, file: &UploadedFile) -> LibraryResult<String> {
        let name = generate_file_name(file.original_name.as_str());
        tokio::fs::create_dir_all(&self.dir).await.map_err(|err| LibraryError::io(
            format!("failed to create upload dir {:?} due to {}", self.dir, err).as_str()))?;
        let path = self.dir.join(&name);
        tokio::fs::write(&path, &file.bytes).await.map_err(|err| LibraryError::io(
            format!("failed to write upload {:?} due to {}", path, err).as_str()))?;
        info!("stored upload {} ({} bytes) as {}", file.original_name, file.bytes.len(), name);
        Ok(format!("{}/{}", self.prefix, name))
    }
}

// 16 random bytes as lowercase hex followed by the original extension, dot included
pub(crate) fn generate_file_name(original_name: &str) -> String {
    let mut raw = [0u8; NAME_BYTES];
    OsRng.fill_bytes(&mut raw);
    format!("{}{}", hex::encode(raw), extension_of(original_name))
}

fn extension_of(original_name: &str) -> String {
    // browsers on some platforms send the full client path
    let base = original_name.rsplit(['/', '\\']).next().unwrap_or(original_name);
    match Path::new(base).extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use crate::core::library::LibraryError;
    use crate::uploads::{extension_of, generate_file_name, DiskUploadHandler, UploadHandler, UploadedFile};

    #[tokio::test]
    async fn test_should_generate_hex_name_with_extension() {
        let name = generate_file_name("cover.PNG");
        assert!(name.ends_with(".PNG"));
        let stem = name.trim_end_matches(".PNG");
        assert_eq!(32, stem.len());
        assert!(stem.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[tokio::test]
    async fn test_should_generate_distinct_names() {
        let names: HashSet<String> = (0..1000).map(|_| generate_file_name("a.jpg")).collect();
        assert_eq!(1000, names.len());
    }

    #[tokio::test]
    async fn test_should_keep_last_extension_only() {
        assert_eq!(".gz", extension_of("archive.tar.gz"));
        assert_eq!("", extension_of("README"));
        assert_eq!("", extension_of(".bashrc"));
        assert_eq!(".", extension_of("cover."));
        assert_eq!(".jpg", extension_of("C:\\Users\\me\\cover.jpg"));
    }

    #[tokio::test]
    async fn test_should_store_upload_on_disk() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let handler = DiskUploadHandler::new(dir.path().join("images/uploads"), "/images/uploads/");
        let file = UploadedFile::new("cover.png", Some("image/png"), b"png-bytes".to_vec());

        let path = handler.store(&file).await.expect("should store upload");
        let name = path.strip_prefix("/images/uploads/").expect("should carry prefix");
        let written = std::fs::read(dir.path().join("images/uploads").join(name)).expect("should read upload");
        assert_eq!(b"png-bytes".to_vec(), written);
    }

    #[tokio::test]
    async fn test_should_propagate_write_failure() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").expect("should write blocker");
        let handler = DiskUploadHandler::new(blocker.join("uploads"), "/images/uploads");
        let file = UploadedFile::new("cover.png", None, b"png-bytes".to_vec());

        let res = handler.store(&file).await;
        assert!(matches!(res, Err(LibraryError::Io { .. })));
    }
}
