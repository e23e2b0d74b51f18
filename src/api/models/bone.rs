use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Flat storage row for a bone: one node of a diagram's cause tree.
///
/// `parent_id` is `None` for root bones. Rows of one diagram are always
/// handed around in insertion order, so a parent precedes its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoneRecord {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub parent_id: Option<String>,
    pub diagram_id: String,
}

/// Materialized bone with its children attached, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bone {
    pub id: String,
    pub name: String,
    pub created_by: String,
    pub parent_id: Option<String>,
    pub diagram_id: String,
    #[serde(default)]
    pub children: Vec<Bone>,
}

impl Bone {
    /// Number of bones in this subtree, the bone itself included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Bone::subtree_len).sum::<usize>()
    }
}

/// One node of a nested bone tree submitted in a diagram update.
///
/// Every field is optional; a missing or empty `id` gets a fresh identifier,
/// and `null` children mean the same as no children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoneInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub children: Option<Vec<BoneInput>>,
}

impl BoneInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_creator(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    pub fn with_children(mut self, children: Vec<BoneInput>) -> Self {
        self.children = Some(children);
        self
    }
}
