//! Storage trait definitions for the API storage backends.

use super::StorageError;
use crate::models::{BoneRecord, DiagramRecord, DiagramStatus, StoredDiagram};
use chrono::{DateTime, Utc};

/// Field changes for a diagram row. `None` leaves a field untouched.
///
/// `status` is doubly optional: `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramPatch {
    pub title: Option<String>,
    pub created_by: Option<String>,
    pub status: Option<Option<DiagramStatus>>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DiagramPatch {
    /// Merge into `record`. `updated_at` becomes `now` unless the patch sets it.
    pub fn apply(&self, record: &mut DiagramRecord, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(created_by) = &self.created_by {
            record.created_by = created_by.clone();
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(tags) = &self.tags {
            record.tags = tags.clone();
        }
        if let Some(created_at) = self.created_at {
            record.created_at = created_at;
        }
        record.updated_at = self.updated_at.unwrap_or(now);
    }
}

/// Storage backend trait for diagram persistence.
///
/// Every method runs as one transaction: it either commits completely or
/// leaves storage as it was.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// All diagrams with their flat bone sets
    async fn list_diagrams(&self) -> Result<Vec<StoredDiagram>, StorageError>;

    /// Get diagram by ID with its flat bone set
    async fn get_diagram(&self, diagram_id: &str) -> Result<Option<StoredDiagram>, StorageError>;

    /// Get a single bone by ID, regardless of owning diagram
    async fn get_bone(&self, bone_id: &str) -> Result<Option<BoneRecord>, StorageError>;

    /// Insert a diagram and its bones. Bones must be ordered parents first.
    async fn create_diagram(
        &self,
        diagram: DiagramRecord,
        bones: Vec<BoneRecord>,
    ) -> Result<StoredDiagram, StorageError>;

    /// Merge `patch` into a diagram and, when `bones` is given, replace its
    /// whole bone set with them (parents first).
    ///
    /// Returns `Ok(None)` without writing anything if the diagram does not exist.
    async fn update_diagram(
        &self,
        diagram_id: &str,
        patch: DiagramPatch,
        bones: Option<Vec<BoneRecord>>,
    ) -> Result<Option<StoredDiagram>, StorageError>;

    /// Delete a diagram and all its bones. Returns false if it did not exist.
    async fn delete_diagram(&self, diagram_id: &str) -> Result<bool, StorageError>;

    /// Number of stored diagrams
    async fn count_diagrams(&self) -> Result<u64, StorageError>;
}
