//! In-memory storage backend.
//!
//! Used when no DATABASE_URL is configured and throughout the test suite.
//! Enforces the same keys as the PostgreSQL schema: unique diagram ids,
//! unique bone ids, and parents that belong to the same diagram and were
//! inserted before their children.

use super::{StorageError, traits::*};
use crate::models::{BoneRecord, DiagramRecord, StoredDiagram};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct MemoryState {
    diagrams: Vec<DiagramRecord>,
    bones: Vec<BoneRecord>,
}

impl MemoryState {
    fn stored(&self, record: &DiagramRecord) -> StoredDiagram {
        StoredDiagram {
            record: record.clone(),
            bones: self
                .bones
                .iter()
                .filter(|bone| bone.diagram_id == record.id)
                .cloned()
                .collect(),
        }
    }

    fn position(&self, diagram_id: &str) -> Option<usize> {
        self.diagrams.iter().position(|d| d.id == diagram_id)
    }
}

/// In-memory storage backend guarded by a single lock.
#[derive(Debug, Default)]
pub struct InMemoryStorageBackend {
    state: RwLock<MemoryState>,
}

impl InMemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Check `bones` against the bone ids that stay in storage, the way the
/// relational keys would. `existing` is extended with the new ids.
fn check_new_bones(
    diagram_id: &str,
    bones: &[BoneRecord],
    existing: &mut HashSet<String>,
) -> Result<(), StorageError> {
    let mut inserted: HashSet<&str> = HashSet::new();
    for bone in bones {
        if bone.diagram_id != diagram_id {
            return Err(StorageError::ConstraintViolation(format!(
                "bone {} belongs to diagram {}, not {}",
                bone.id, bone.diagram_id, diagram_id
            )));
        }
        if !existing.insert(bone.id.clone()) {
            return Err(StorageError::ConstraintViolation(format!(
                "duplicate bone id {}",
                bone.id
            )));
        }
        if let Some(parent_id) = bone.parent_id.as_deref() {
            if !inserted.contains(parent_id) {
                return Err(StorageError::ConstraintViolation(format!(
                    "bone {} references missing parent {}",
                    bone.id, parent_id
                )));
            }
        }
        inserted.insert(bone.id.as_str());
    }
    Ok(())
}

#[async_trait]
impl StorageBackend for InMemoryStorageBackend {
    async fn list_diagrams(&self) -> Result<Vec<StoredDiagram>, StorageError> {
        let state = self.state.read().await;
        Ok(state.diagrams.iter().map(|d| state.stored(d)).collect())
    }

    async fn get_diagram(&self, diagram_id: &str) -> Result<Option<StoredDiagram>, StorageError> {
        let state = self.state.read().await;
        Ok(state
            .diagrams
            .iter()
            .find(|d| d.id == diagram_id)
            .map(|d| state.stored(d)))
    }

    async fn get_bone(&self, bone_id: &str) -> Result<Option<BoneRecord>, StorageError> {
        let state = self.state.read().await;
        Ok(state.bones.iter().find(|b| b.id == bone_id).cloned())
    }

    async fn create_diagram(
        &self,
        diagram: DiagramRecord,
        bones: Vec<BoneRecord>,
    ) -> Result<StoredDiagram, StorageError> {
        let mut state = self.state.write().await;
        if state.position(&diagram.id).is_some() {
            return Err(StorageError::ConstraintViolation(format!(
                "duplicate diagram id {}",
                diagram.id
            )));
        }

        let mut existing: HashSet<String> = state.bones.iter().map(|b| b.id.clone()).collect();
        check_new_bones(&diagram.id, &bones, &mut existing)?;

        debug!(
            "Inserting diagram {} with {} bones",
            diagram.id,
            bones.len()
        );
        state.diagrams.push(diagram.clone());
        state.bones.extend(bones.iter().cloned());

        Ok(StoredDiagram {
            record: diagram,
            bones,
        })
    }

    async fn update_diagram(
        &self,
        diagram_id: &str,
        patch: DiagramPatch,
        bones: Option<Vec<BoneRecord>>,
    ) -> Result<Option<StoredDiagram>, StorageError> {
        let mut state = self.state.write().await;
        let Some(index) = state.position(diagram_id) else {
            return Ok(None);
        };

        // Work on copies and swap them in once every check has passed.
        let mut record = state.diagrams[index].clone();
        patch.apply(&mut record, Utc::now());

        if let Some(new_bones) = bones {
            let mut remaining: Vec<BoneRecord> = state
                .bones
                .iter()
                .filter(|b| b.diagram_id != diagram_id)
                .cloned()
                .collect();
            let mut existing: HashSet<String> = remaining.iter().map(|b| b.id.clone()).collect();
            check_new_bones(diagram_id, &new_bones, &mut existing)?;

            debug!(
                "Replacing bones of diagram {}: {} new bones",
                diagram_id,
                new_bones.len()
            );
            remaining.extend(new_bones);
            state.bones = remaining;
        }

        state.diagrams[index] = record;
        let stored = state.stored(&state.diagrams[index]);
        Ok(Some(stored))
    }

    async fn delete_diagram(&self, diagram_id: &str) -> Result<bool, StorageError> {
        let mut state = self.state.write().await;
        let Some(index) = state.position(diagram_id) else {
            return Ok(false);
        };

        state.diagrams.remove(index);
        state.bones.retain(|b| b.diagram_id != diagram_id);
        Ok(true)
    }

    async fn count_diagrams(&self) -> Result<u64, StorageError> {
        let state = self.state.read().await;
        Ok(state.diagrams.len() as u64)
    }
}
