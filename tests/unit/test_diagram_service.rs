//! Unit tests for the diagram service

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fishbone_api::models::{BoneInput, CreateDiagramRequest, DiagramStatus, UpdateDiagramRequest};
use fishbone_api::services::{DiagramService, DiagramServiceError};
use fishbone_api::storage::{InMemoryStorageBackend, StorageBackend};
use fishbone_api::tree::IdGenerator;

#[derive(Default)]
struct SequentialIds {
    next: AtomicUsize,
}

impl IdGenerator for SequentialIds {
    fn generate(&self) -> String {
        format!("id-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

fn service() -> (DiagramService, Arc<InMemoryStorageBackend>) {
    let storage = Arc::new(InMemoryStorageBackend::new());
    let service = DiagramService::with_id_generator(
        storage.clone(),
        Arc::new(SequentialIds::default()),
    );
    (service, storage)
}

fn create_request(title: &str) -> CreateDiagramRequest {
    CreateDiagramRequest {
        title: title.to_string(),
        created_by: None,
    }
}

fn bones_update(bones: Vec<BoneInput>) -> UpdateDiagramRequest {
    UpdateDiagramRequest {
        bones: Some(Some(bones)),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_diagram_defaults() {
    let (service, _) = service();

    let diagram = service.create_diagram(create_request("Incident A")).await.unwrap();

    assert_eq!(diagram.id, "id-1");
    assert_eq!(diagram.title, "Incident A");
    assert_eq!(diagram.created_by, "user");
    assert!(diagram.tags.is_empty());
    assert_eq!(diagram.status, None);
    assert!(diagram.bones.is_empty());
    assert_eq!(diagram.created_at, diagram.updated_at);
}

#[tokio::test]
async fn test_create_diagram_keeps_creator() {
    let (service, _) = service();
    let request = CreateDiagramRequest {
        title: "Incident B".to_string(),
        created_by: Some("ann".to_string()),
    };

    let diagram = service.create_diagram(request).await.unwrap();

    assert_eq!(diagram.created_by, "ann");
}

#[tokio::test]
async fn test_create_diagram_requires_title() {
    let (service, storage) = service();

    let result = service.create_diagram(create_request("  ")).await;

    assert!(matches!(result, Err(DiagramServiceError::Validation(_))));
    assert_eq!(storage.count_diagrams().await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_builds_nested_tree() {
    let (service, _) = service();
    let created = service.create_diagram(create_request("Incident A")).await.unwrap();

    let request = bones_update(vec![
        BoneInput::named("Cause1").with_children(vec![BoneInput::named("Sub1")]),
    ]);
    let updated = service.update_diagram(&created.id, request).await.unwrap();

    assert_eq!(updated.bones.len(), 1);
    let root = &updated.bones[0];
    assert_eq!(root.name, "Cause1");
    assert_eq!(root.id, "id-2");
    assert_eq!(root.created_by, "user");
    assert_eq!(root.parent_id, None);
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].name, "Sub1");
    assert_eq!(root.children[0].id, "id-3");
    assert_eq!(root.children[0].parent_id.as_deref(), Some("id-2"));
}

#[tokio::test]
async fn test_update_with_empty_bones_clears_tree() {
    let (service, storage) = service();
    let created = service.create_diagram(create_request("Incident A")).await.unwrap();
    service
        .update_diagram(&created.id, bones_update(vec![BoneInput::named("Cause1")]))
        .await
        .unwrap();

    let updated = service
        .update_diagram(&created.id, bones_update(Vec::new()))
        .await
        .unwrap();

    assert!(updated.bones.is_empty());
    assert!(storage.get_bone("id-2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_without_bones_leaves_tree_untouched() {
    let (service, _) = service();
    let created = service.create_diagram(create_request("Incident A")).await.unwrap();
    service
        .update_diagram(&created.id, bones_update(vec![BoneInput::named("Cause1")]))
        .await
        .unwrap();

    let request = UpdateDiagramRequest {
        status: Some(Some(DiagramStatus::Published)),
        ..Default::default()
    };
    let updated = service.update_diagram(&created.id, request).await.unwrap();

    assert_eq!(updated.status, Some(DiagramStatus::Published));
    assert_eq!(updated.bones.len(), 1);
    assert_eq!(updated.bones[0].id, "id-2");
}

#[tokio::test]
async fn test_update_null_status_clears_it() {
    let (service, _) = service();
    let created = service.create_diagram(create_request("Incident A")).await.unwrap();
    service
        .update_diagram(
            &created.id,
            UpdateDiagramRequest {
                status: Some(Some(DiagramStatus::Archived)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = service
        .update_diagram(
            &created.id,
            UpdateDiagramRequest {
                status: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, None);
}

#[tokio::test]
async fn test_update_missing_diagram_is_not_found_and_mutates_nothing() {
    let (service, storage) = service();
    let existing = service.create_diagram(create_request("Incident A")).await.unwrap();

    let result = service
        .update_diagram("missing", bones_update(vec![BoneInput::named("Cause1")]))
        .await;

    assert!(matches!(result, Err(DiagramServiceError::NotFound { .. })));
    let stored = storage.get_diagram(&existing.id).await.unwrap().unwrap();
    assert!(stored.bones.is_empty());
    assert_eq!(storage.count_diagrams().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_rejects_null_title() {
    let (service, _) = service();
    let created = service.create_diagram(create_request("Incident A")).await.unwrap();

    let result = service
        .update_diagram(
            &created.id,
            UpdateDiagramRequest {
                title: Some(None),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(DiagramServiceError::Validation(_))));
    assert_eq!(service.get_diagram(&created.id).await.unwrap().title, "Incident A");
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let (service, storage) = service();
    let created = service.create_diagram(create_request("Incident A")).await.unwrap();
    service
        .update_diagram(
            &created.id,
            bones_update(vec![BoneInput::named("Cause1").with_children(vec![BoneInput::named("Sub1")])]),
        )
        .await
        .unwrap();

    service.delete_diagram(&created.id).await.unwrap();

    assert!(matches!(
        service.get_diagram(&created.id).await,
        Err(DiagramServiceError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete_diagram(&created.id).await,
        Err(DiagramServiceError::NotFound { .. })
    ));
    assert!(storage.get_bone("id-3").await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_materializes_each_diagram() {
    let (service, _) = service();
    let a = service.create_diagram(create_request("A")).await.unwrap();
    service.create_diagram(create_request("B")).await.unwrap();
    service
        .update_diagram(
            &a.id,
            bones_update(vec![BoneInput::named("Root").with_children(vec![BoneInput::named("Leaf")])]),
        )
        .await
        .unwrap();

    let diagrams = service.list_diagrams().await.unwrap();

    assert_eq!(diagrams.len(), 2);
    let listed = diagrams.iter().find(|d| d.id == a.id).unwrap();
    assert_eq!(listed.bones.len(), 1);
    assert_eq!(listed.bones[0].children.len(), 1);
}
