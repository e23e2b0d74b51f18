//! Sample Ishikawa diagrams used to seed an empty store.

use super::{StorageBackend, StorageError};
use crate::models::{BoneInput, BoneRecord, DiagramRecord, DiagramStatus, StoredDiagram};
use crate::tree::{UuidIdGenerator, flatten_bone_tree};
use chrono::{DateTime, Utc};
use tracing::info;

struct MockDiagram {
    id: &'static str,
    title: &'static str,
    created_by: &'static str,
    created_at: &'static str,
    updated_at: &'static str,
    status: DiagramStatus,
    tags: [&'static str; 2],
    bones: Vec<BoneInput>,
}

fn bone(id: &str, name: &str, created_by: &str, children: Vec<BoneInput>) -> BoneInput {
    BoneInput::named(name)
        .with_id(id)
        .with_creator(created_by)
        .with_children(children)
}

fn leaf(id: &str, name: &str, created_by: &str) -> BoneInput {
    BoneInput::named(name).with_id(id).with_creator(created_by)
}

fn mock_definitions() -> Vec<MockDiagram> {
    vec![
        MockDiagram {
            id: "1",
            title: "Missed Deadline",
            created_by: "You",
            created_at: "2024-06-12T09:00:00Z",
            updated_at: "2024-06-15T10:30:00Z",
            status: DiagramStatus::Published,
            tags: ["Deadline", "Urgent"],
            bones: vec![
                bone("1-1", "People", "You", vec![leaf("1-1-1", "Micromanaging Boss", "You")]),
                bone("1-2", "Processes", "You", vec![]),
            ],
        },
        MockDiagram {
            id: "2",
            title: "System Crash",
            created_by: "Team",
            created_at: "2024-07-01T14:30:00Z",
            updated_at: "2024-07-02T08:15:00Z",
            status: DiagramStatus::Draft,
            tags: ["IT", "Critical"],
            bones: vec![
                bone(
                    "2-1",
                    "Infrastructure",
                    "DevOps",
                    vec![leaf("2-1-1", "Outdated Servers", "DevOps")],
                ),
                bone("2-2", "Software", "Engineering", vec![]),
            ],
        },
        MockDiagram {
            id: "3",
            title: "Low Customer Satisfaction",
            created_by: "You",
            created_at: "2024-05-20T11:15:00Z",
            updated_at: "2024-06-01T09:00:00Z",
            status: DiagramStatus::Published,
            tags: ["Customer", "Feedback"],
            bones: vec![
                bone(
                    "3-1",
                    "Support",
                    "Support Lead",
                    vec![
                        leaf("3-1-1", "Slow Response Time", "Support Lead"),
                        leaf("3-1-2", "Untrained Staff", "Support Lead"),
                    ],
                ),
                bone(
                    "3-2",
                    "Product",
                    "Product Owner",
                    vec![leaf("3-2-1", "Frequent Bugs", "Product Owner")],
                ),
            ],
        },
        MockDiagram {
            id: "4",
            title: "High Employee Turnover",
            created_by: "HR",
            created_at: "2024-03-10T08:45:00Z",
            updated_at: "2024-04-01T14:20:00Z",
            status: DiagramStatus::Archived,
            tags: ["HR", "Retention"],
            bones: vec![
                bone(
                    "4-1",
                    "Culture",
                    "HR",
                    vec![
                        leaf("4-1-1", "Lack of Recognition", "HR"),
                        leaf("4-1-2", "Toxic Environment", "HR"),
                    ],
                ),
                bone("4-2", "Compensation", "Finance", vec![]),
            ],
        },
        MockDiagram {
            id: "5",
            title: "Project Overbudget",
            created_by: "PMO",
            created_at: "2024-02-25T13:20:00Z",
            updated_at: "2024-03-05T10:10:00Z",
            status: DiagramStatus::Published,
            tags: ["Budget", "Project"],
            bones: vec![
                bone("5-1", "Planning", "PMO", vec![leaf("5-1-1", "Unclear Scope", "PMO")]),
                bone(
                    "5-2",
                    "Execution",
                    "Project Manager",
                    vec![
                        leaf("5-2-1", "Vendor Delays", "Project Manager"),
                        leaf("5-2-2", "Resource Misallocation", "Project Manager"),
                    ],
                ),
            ],
        },
    ]
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StorageError::Other(format!("Invalid fixture timestamp {}: {}", value, e)))
}

/// The five sample diagrams, flat and ready to insert.
pub fn mock_diagrams() -> Result<Vec<StoredDiagram>, StorageError> {
    mock_definitions()
        .into_iter()
        .map(|mock| -> Result<StoredDiagram, StorageError> {
            let bones: Vec<BoneRecord> = flatten_bone_tree(mock.id, &mock.bones, &UuidIdGenerator);
            Ok(StoredDiagram {
                record: DiagramRecord {
                    id: mock.id.to_string(),
                    title: mock.title.to_string(),
                    created_by: mock.created_by.to_string(),
                    status: Some(mock.status),
                    tags: mock.tags.iter().map(|t| t.to_string()).collect(),
                    created_at: parse_timestamp(mock.created_at)?,
                    updated_at: parse_timestamp(mock.updated_at)?,
                },
                bones,
            })
        })
        .collect()
}

/// Insert the sample diagrams if storage holds no diagrams yet.
///
/// Returns the number of diagrams inserted.
pub async fn seed_mock_diagrams(storage: &dyn StorageBackend) -> Result<usize, StorageError> {
    if storage.count_diagrams().await? > 0 {
        info!("Storage already holds diagrams, skipping mock seed");
        return Ok(0);
    }

    let diagrams = mock_diagrams()?;
    let count = diagrams.len();
    for diagram in diagrams {
        storage.create_diagram(diagram.record, diagram.bones).await?;
    }
    info!("Seeded {} mock diagrams", count);
    Ok(count)
}
