// ⚠️ Import Errors
// Only MappingLoad is recovered locally; every other variant aborts the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Mapping file absent or malformed (callers fall back to an empty table)
    #[error("failed to load company mappings from {path}: {reason}")]
    MappingLoad { path: PathBuf, reason: String },

    /// Required XML attribute not present on an element
    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// Required container element not present in the document
    #[error("{path}: document has no `{element}` element")]
    MissingElement { path: PathBuf, element: &'static str },

    /// Text that should hold an integer does not
    #[error("`{field}` is not a valid number: {value:?}")]
    NumberFormat { field: &'static str, value: String },

    #[error("XML parse error in {path}: {source}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, ImportError>;
