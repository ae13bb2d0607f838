use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::telegram::InputFile;

/// Turns a document path into upload content.
pub trait DocumentLoader: Send + Sync {
    fn load(&self, path: &str) -> Result<InputFile>;
}

/// Reads documents from the local filesystem, whole and synchronously.
pub struct FsLoader;

impl DocumentLoader for FsLoader {
    fn load(&self, path: &str) -> Result<InputFile> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Io(format!("Failed to read document {}: {}", path, e)))?;

        let file_name = Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("file");

        debug!("Loaded document {} ({} bytes)", path, bytes.len());
        Ok(InputFile::new(file_name, bytes))
    }
}
