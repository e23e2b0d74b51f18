use crate::models::{Bone, BoneRecord};
use std::collections::HashMap;

/// Rebuild the nested view of a diagram's flat bone set.
///
/// Returns the root bones (no parent) in their stored order, each carrying
/// its descendants at full depth. Bones that are not reachable from a root
/// are not part of the result.
pub fn materialize(bones: Vec<BoneRecord>) -> Vec<Bone> {
    let mut roots = Vec::new();
    let mut children_of: HashMap<String, Vec<BoneRecord>> = HashMap::new();

    for bone in bones {
        match bone.parent_id.as_ref() {
            None => roots.push(bone),
            Some(parent_id) => children_of
                .entry(parent_id.clone())
                .or_default()
                .push(bone),
        }
    }

    roots
        .into_iter()
        .map(|root| attach_children(root, &mut children_of))
        .collect()
}

/// Number of root bones in a flat bone set.
pub fn count_roots(bones: &[BoneRecord]) -> usize {
    bones.iter().filter(|bone| bone.parent_id.is_none()).count()
}

// Child lists are taken out of the index as they are attached, so each
// stored row lands in the tree at most once.
fn attach_children(record: BoneRecord, children_of: &mut HashMap<String, Vec<BoneRecord>>) -> Bone {
    let children = children_of
        .remove(&record.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach_children(child, children_of))
        .collect();

    Bone {
        id: record.id,
        name: record.name,
        created_by: record.created_by,
        parent_id: record.parent_id,
        diagram_id: record.diagram_id,
        children,
    }
}
