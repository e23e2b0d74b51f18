//! Diagram service: lifecycle of diagram records and their bone trees.
//!
//! Reads materialize the flat bone set into a tree of roots. An update that
//! carries `bones` replaces the whole tree: the submission is flattened here
//! and the backend deletes the old bones and inserts the new ones in the same
//! transaction as the field changes.

use super::error::DiagramServiceError;
use crate::models::diagram::DEFAULT_CREATOR;
use crate::models::{
    BoneInput, CreateDiagramRequest, Diagram, DiagramRecord, UpdateDiagramRequest,
};
use crate::storage::{DiagramPatch, StorageBackend};
use crate::tree::{
    MAX_BONE_DEPTH, SharedIdGenerator, UuidIdGenerator, bone_depth, flatten_bone_tree,
};
use std::sync::Arc;
use tracing::info;

/// Service for creating, reading, updating and deleting diagrams.
#[derive(Clone)]
pub struct DiagramService {
    storage: Arc<dyn StorageBackend>,
    ids: SharedIdGenerator,
}

impl DiagramService {
    /// Create a diagram service that generates UUID identifiers.
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self::with_id_generator(storage, Arc::new(UuidIdGenerator))
    }

    pub fn with_id_generator(storage: Arc<dyn StorageBackend>, ids: SharedIdGenerator) -> Self {
        Self { storage, ids }
    }

    /// Get the storage backend.
    pub fn storage(&self) -> &Arc<dyn StorageBackend> {
        &self.storage
    }

    /// All diagrams, each with its bone tree materialized.
    pub async fn list_diagrams(&self) -> Result<Vec<Diagram>, DiagramServiceError> {
        let diagrams = self.storage.list_diagrams().await?;
        Ok(diagrams.into_iter().map(Diagram::from_stored).collect())
    }

    /// One diagram with its bone tree materialized.
    pub async fn get_diagram(&self, diagram_id: &str) -> Result<Diagram, DiagramServiceError> {
        self.storage
            .get_diagram(diagram_id)
            .await?
            .map(Diagram::from_stored)
            .ok_or_else(|| DiagramServiceError::not_found(diagram_id))
    }

    /// Create an empty diagram: generated id, no tags, no status, no bones.
    pub async fn create_diagram(
        &self,
        request: CreateDiagramRequest,
    ) -> Result<Diagram, DiagramServiceError> {
        validate_title(&request.title)?;

        let created_by = request
            .created_by
            .filter(|creator| !creator.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CREATOR.to_string());
        let record = DiagramRecord::new(self.ids.generate(), request.title, created_by);

        let stored = self.storage.create_diagram(record, Vec::new()).await?;
        info!("Created diagram {} ({})", stored.record.id, stored.record.title);
        Ok(Diagram::from_stored(stored))
    }

    /// Merge the fields present in `request` into a diagram. When `bones` is
    /// present the diagram's entire bone tree is replaced by it.
    pub async fn update_diagram(
        &self,
        diagram_id: &str,
        request: UpdateDiagramRequest,
    ) -> Result<Diagram, DiagramServiceError> {
        let (patch, bone_tree) = into_patch(request)?;

        let bones = bone_tree.map(|nodes| flatten_bone_tree(diagram_id, &nodes, self.ids.as_ref()));
        if let Some(bones) = &bones {
            info!(
                "Replacing bone tree of diagram {} with {} bones",
                diagram_id,
                bones.len()
            );
        }

        let stored = self
            .storage
            .update_diagram(diagram_id, patch, bones)
            .await?
            .ok_or_else(|| DiagramServiceError::not_found(diagram_id))?;

        info!("Updated diagram {}", diagram_id);
        Ok(Diagram::from_stored(stored))
    }

    /// Delete a diagram together with all of its bones.
    pub async fn delete_diagram(&self, diagram_id: &str) -> Result<(), DiagramServiceError> {
        if !self.storage.delete_diagram(diagram_id).await? {
            return Err(DiagramServiceError::not_found(diagram_id));
        }
        info!("Deleted diagram {}", diagram_id);
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), DiagramServiceError> {
    if title.trim().is_empty() {
        return Err(DiagramServiceError::Validation(
            "title must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_bone_depth(bones: &[BoneInput]) -> Result<(), DiagramServiceError> {
    let depth = bone_depth(bones);
    if depth > MAX_BONE_DEPTH {
        return Err(DiagramServiceError::Validation(format!(
            "bones nest {} levels deep; at most {} are allowed",
            depth, MAX_BONE_DEPTH
        )));
    }
    Ok(())
}

fn required<T>(field: &str, value: Option<Option<T>>) -> Result<Option<T>, DiagramServiceError> {
    match value {
        Some(None) => Err(DiagramServiceError::Validation(format!(
            "{} cannot be null",
            field
        ))),
        Some(Some(value)) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Split an update request into row changes and an optional replacement tree.
/// An explicit `null` for `tags` or `bones` empties them.
fn into_patch(
    request: UpdateDiagramRequest,
) -> Result<(DiagramPatch, Option<Vec<BoneInput>>), DiagramServiceError> {
    let title = required("title", request.title)?;
    if let Some(title) = &title {
        validate_title(title)?;
    }

    let patch = DiagramPatch {
        title,
        created_by: required("createdBy", request.created_by)?,
        status: request.status,
        tags: request.tags.map(Option::unwrap_or_default),
        created_at: required("createdAt", request.created_at)?,
        updated_at: required("updatedAt", request.updated_at)?,
    };
    let bones = request.bones.map(Option::unwrap_or_default);
    if let Some(bones) = &bones {
        validate_bone_depth(bones)?;
    }

    Ok((patch, bones))
}
