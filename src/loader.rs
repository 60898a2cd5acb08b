//! Loading scene documents from storage

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads the text of one scene document
///
/// Implementations must release any handle before returning, including on
/// failure.
pub trait DocumentLoader {
    /// Read the full document at `path`
    fn load(&self, path: &Path) -> Result<String>;

    /// Whether a document exists at `path`
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Loads documents from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl DocumentLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<String> {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;

        let text = String::from_utf8(bytes)
            .map_err(|e| Error::InvalidXml(format!("Document is not valid UTF-8: {}", e)))?;
        Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }
}
