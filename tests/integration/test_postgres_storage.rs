//! PostgreSQL storage backend tests.
//!
//! These run against the database named by DATABASE_URL and are skipped when
//! it is not set. Every test uses fresh random ids so they can share a schema.

use fishbone_api::models::{BoneInput, BoneRecord, DiagramRecord, DiagramStatus};
use fishbone_api::storage::{DiagramPatch, PostgresStorageBackend, StorageBackend, StorageError};
use fishbone_api::tree::{UuidIdGenerator, flatten_bone_tree, materialize};
use serial_test::serial;
use sqlx::postgres::PgPoolOptions;

async fn backend() -> Option<PostgresStorageBackend> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL storage test");
        return None;
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .unwrap();
    let backend = PostgresStorageBackend::new(pool);
    backend.migrate().await.unwrap();
    Some(backend)
}

fn new_diagram() -> DiagramRecord {
    DiagramRecord::new(
        uuid::Uuid::new_v4().to_string(),
        "Postgres diagram".to_string(),
        "user".to_string(),
    )
}

fn sample_bones(diagram_id: &str) -> Vec<BoneRecord> {
    let tree = vec![
        BoneInput::named("Machine").with_children(vec![
            BoneInput::named("Wear"),
            BoneInput::named("Calibration").with_children(vec![BoneInput::named("Drift")]),
        ]),
        BoneInput::named("Method"),
    ];
    flatten_bone_tree(diagram_id, &tree, &UuidIdGenerator)
}

#[tokio::test]
#[serial]
async fn test_round_trip_keeps_sibling_order() {
    let Some(storage) = backend().await else { return };
    let record = new_diagram();
    let bones = sample_bones(&record.id);

    storage.create_diagram(record.clone(), bones.clone()).await.unwrap();
    let stored = storage.get_diagram(&record.id).await.unwrap().unwrap();

    assert_eq!(stored.bones, bones);
    let roots = materialize(stored.bones);
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0].name, "Machine");
    assert_eq!(roots[0].children[1].children[0].name, "Drift");

    storage.delete_diagram(&record.id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_update_replaces_tree_and_fields() {
    let Some(storage) = backend().await else { return };
    let record = new_diagram();
    let old_bones = sample_bones(&record.id);
    storage.create_diagram(record.clone(), old_bones.clone()).await.unwrap();

    let patch = DiagramPatch {
        status: Some(Some(DiagramStatus::Archived)),
        tags: Some(vec!["db".to_string()]),
        ..Default::default()
    };
    let new_bones = sample_bones(&record.id);
    let updated = storage
        .update_diagram(&record.id, patch, Some(new_bones.clone()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.record.status, Some(DiagramStatus::Archived));
    assert_eq!(updated.record.tags, vec!["db"]);
    assert_eq!(updated.bones, new_bones);
    assert!(storage.get_bone(&old_bones[0].id).await.unwrap().is_none());

    storage.delete_diagram(&record.id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_update_can_reuse_replaced_ids() {
    let Some(storage) = backend().await else { return };
    let record = new_diagram();
    let bones = sample_bones(&record.id);
    storage.create_diagram(record.clone(), bones.clone()).await.unwrap();

    let updated = storage
        .update_diagram(&record.id, DiagramPatch::default(), Some(bones.clone()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.bones, bones);
    storage.delete_diagram(&record.id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_failed_replace_rolls_back() {
    let Some(storage) = backend().await else { return };
    let record = new_diagram();
    let bones = sample_bones(&record.id);
    storage.create_diagram(record.clone(), bones.clone()).await.unwrap();

    let mut colliding = sample_bones(&record.id);
    colliding[1].id = colliding[0].id.clone();
    let patch = DiagramPatch {
        title: Some("Should not stick".to_string()),
        ..Default::default()
    };
    let result = storage.update_diagram(&record.id, patch, Some(colliding)).await;

    assert!(matches!(result, Err(StorageError::ConstraintViolation(_))));
    let stored = storage.get_diagram(&record.id).await.unwrap().unwrap();
    assert_eq!(stored.record.title, "Postgres diagram");
    assert_eq!(stored.bones, bones);

    storage.delete_diagram(&record.id).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_missing_diagram_and_cascade_delete() {
    let Some(storage) = backend().await else { return };

    let missing = storage
        .update_diagram("no-such-diagram", DiagramPatch::default(), Some(Vec::new()))
        .await
        .unwrap();
    assert!(missing.is_none());

    let record = new_diagram();
    let bones = sample_bones(&record.id);
    storage.create_diagram(record.clone(), bones.clone()).await.unwrap();

    assert!(storage.delete_diagram(&record.id).await.unwrap());
    assert!(!storage.delete_diagram(&record.id).await.unwrap());
    for bone in &bones {
        assert!(storage.get_bone(&bone.id).await.unwrap().is_none());
    }
}
