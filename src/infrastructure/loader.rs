//! Reading tree documents from disk.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::infrastructure::error::{InfraError, InfraResult};

/// On-disk document format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// `.toml` is TOML, everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Json,
        }
    }

    pub fn parse(self, content: &str) -> Result<Value, String> {
        match self {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Toml => {
                let table: toml::Value = toml::from_str(content).map_err(|e| e.to_string())?;
                serde_json::to_value(table).map_err(|e| e.to_string())
            }
        }
    }
}

/// Load a tree document as a generic value.
#[instrument(level = "debug")]
pub fn load_document(path: &Path) -> InfraResult<Value> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
    let format = DocumentFormat::from_path(path);
    debug!("parsing {} as {:?}", path.display(), format);
    format.parse(&content).map_err(|message| InfraError::Parse {
        path: path.to_path_buf(),
        message,
    })
}
