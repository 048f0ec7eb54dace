// 🗂️ Company Mapping - which company published which source file
// Optional JSON file: {"mappings": [{"filename", "legalName", "commonName"}]}

use crate::entities::CompanyName;
use crate::error::{ImportError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMapping {
    /// Base filename, matched exactly
    pub filename: String,
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub common_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingTable {
    pub mappings: Vec<CompanyMapping>,
}

impl MappingTable {
    pub fn new(mappings: Vec<CompanyMapping>) -> Self {
        MappingTable { mappings }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ImportError::MappingLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&text).map_err(|e| ImportError::MappingLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load the mapping file, falling back to an empty table on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => {
                debug!(count = table.mappings.len(), path = %path.display(), "loaded company mappings");
                table
            }
            Err(e) => {
                warn!("{}; continuing without company mappings", e);
                MappingTable::default()
            }
        }
    }

    /// Company for a source file, by base filename. First match wins.
    pub fn resolve(&self, source: &Path) -> CompanyName {
        let Some(base) = source.file_name().and_then(|n| n.to_str()) else {
            return CompanyName::unknown();
        };

        self.mappings
            .iter()
            .find(|m| m.filename == base)
            .map(|m| CompanyName {
                legal_name: m.legal_name.clone(),
                common_name: m.common_name.clone(),
            })
            .unwrap_or_else(CompanyName::unknown)
    }
}
