use super::bone::{Bone, BoneInput, BoneRecord};
use super::enums::DiagramStatus;
use crate::tree::materialize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Creator recorded when a request does not name one.
pub const DEFAULT_CREATOR: &str = "user";

/// Flat storage row for a diagram, without its bones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramRecord {
    pub id: String,
    pub title: String,
    pub created_by: String,
    pub status: Option<DiagramStatus>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DiagramRecord {
    pub fn new(id: String, title: String, created_by: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            created_by,
            status: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A diagram row together with every bone it owns, flat and in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDiagram {
    pub record: DiagramRecord,
    pub bones: Vec<BoneRecord>,
}

/// Diagram as exposed to callers: root bones only, children nested below them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub id: String,
    pub title: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: Option<DiagramStatus>,
    pub tags: Vec<String>,
    pub bones: Vec<Bone>,
}

impl Diagram {
    /// Materialize a stored diagram. The flat bone set is consumed and only
    /// the roots remain on the returned value.
    pub fn from_stored(stored: StoredDiagram) -> Self {
        let StoredDiagram { record, bones } = stored;
        Self {
            id: record.id,
            title: record.title,
            created_by: record.created_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
            status: record.status,
            tags: record.tags,
            bones: materialize(bones),
        }
    }
}

/// Request body for `POST /diagrams`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiagramRequest {
    pub title: String,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Request body for `PATCH /diagrams/{id}`.
///
/// The outer `Option` records whether a field was sent at all, the inner one
/// whether it was sent as `null`. `status: null` clears the status. Tags and
/// bones are always lists, so `tags: null` and `bones: null` store an empty
/// list rather than a null. `null` for the other fields is rejected.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDiagramRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub created_by: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub updated_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<DiagramStatus>)]
    pub status: Option<Option<DiagramStatus>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Vec<String>>)]
    pub tags: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Vec<BoneInput>>)]
    pub bones: Option<Option<Vec<BoneInput>>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Response body for `DELETE /diagrams/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteDiagramResponse {
    pub message: String,
}
