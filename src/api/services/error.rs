//! Service-level error taxonomy.

use crate::storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramServiceError {
    /// The requested diagram does not exist; nothing was written.
    #[error("Diagram not found: {diagram_id}")]
    NotFound { diagram_id: String },
    /// The request was rejected before touching storage.
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DiagramServiceError {
    pub fn not_found(diagram_id: &str) -> Self {
        DiagramServiceError::NotFound {
            diagram_id: diagram_id.to_string(),
        }
    }
}
