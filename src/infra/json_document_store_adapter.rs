use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::app::ports::DocumentStorePort;
use crate::error::{CleanerError, Result};

/// Reads and writes JSON documents on the local filesystem.
///
/// Documents are written pretty-printed with two-space indentation and
/// non-ASCII text kept as-is. Writes go to a temporary file beside the target
/// and are renamed into place, so a failed save leaves no partial file.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFileDocumentStore;

impl JsonFileDocumentStore {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentStorePort for JsonFileDocumentStore {
    fn load(&self, path: &Path) -> Result<Value> {
        debug!("Loading JSON document from {}", path.display());
        let contents = fs::read_to_string(path).map_err(|source| CleanerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| CleanerError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn save(&self, path: &Path, document: &Value) -> Result<()> {
        let rendered = serde_json::to_string_pretty(document)?;

        let write_error = |source: std::io::Error| CleanerError::Write {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
        file.write_all(rendered.as_bytes()).map_err(write_error)?;
        file.flush().map_err(write_error)?;
        file.persist(path).map_err(|e| write_error(e.error))?;

        info!("Wrote JSON document to {}", path.display());
        Ok(())
    }
}
