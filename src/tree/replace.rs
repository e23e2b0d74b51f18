use super::ids::IdGenerator;
use crate::models::{BoneInput, BoneRecord};
use tracing::debug;

/// Creator recorded on a bone submitted without one.
pub const DEFAULT_BONE_CREATOR: &str = "user";

/// Deepest bone tree accepted in one submission; a lone root is depth 1.
pub const MAX_BONE_DEPTH: usize = 128;

/// Number of levels in a submitted tree, counted without recursion so that
/// an oversized submission can be measured safely before it is rejected.
pub fn bone_depth(nodes: &[BoneInput]) -> usize {
    let mut deepest = 0;
    let mut pending: Vec<(&BoneInput, usize)> = nodes.iter().map(|node| (node, 1)).collect();

    while let Some((node, depth)) = pending.pop() {
        deepest = deepest.max(depth);
        if let Some(children) = node.children.as_deref() {
            pending.extend(children.iter().map(|child| (child, depth + 1)));
        }
    }
    deepest
}

/// Turn a nested bone submission into the flat rows that replace a
/// diagram's current bones.
///
/// Nodes are visited depth-first in input order. A node keeps its supplied id
/// when it is non-empty and gets a fresh one from `ids` otherwise; its parent
/// is the node it was nested under. A parent's row is always emitted before
/// the rows of its children, which is the order they must be inserted in.
pub fn flatten_bone_tree(
    diagram_id: &str,
    nodes: &[BoneInput],
    ids: &dyn IdGenerator,
) -> Vec<BoneRecord> {
    let mut records = Vec::new();
    push_level(diagram_id, nodes, None, ids, &mut records);
    records
}

fn push_level(
    diagram_id: &str,
    nodes: &[BoneInput],
    parent_id: Option<&str>,
    ids: &dyn IdGenerator,
    records: &mut Vec<BoneRecord>,
) {
    for node in nodes {
        let id = match node.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => ids.generate(),
        };

        let record = BoneRecord {
            id: id.clone(),
            name: node.name.clone().unwrap_or_default(),
            created_by: node
                .created_by
                .clone()
                .unwrap_or_else(|| DEFAULT_BONE_CREATOR.to_string()),
            parent_id: parent_id.map(str::to_string),
            diagram_id: diagram_id.to_string(),
        };
        debug!(
            "Creating bone: {}, id: {}, parent_id: {:?}",
            record.name, record.id, record.parent_id
        );
        records.push(record);

        if let Some(children) = node.children.as_deref() {
            push_level(diagram_id, children, Some(&id), ids, records);
        }
    }
}
