//! Unit tests for rebuilding bone trees from flat storage rows

use fishbone_api::models::{Bone, BoneRecord};
use fishbone_api::tree::{count_roots, materialize};

fn record(id: &str, parent_id: Option<&str>) -> BoneRecord {
    BoneRecord {
        id: id.to_string(),
        name: format!("bone {}", id),
        created_by: "user".to_string(),
        parent_id: parent_id.map(str::to_string),
        diagram_id: "d1".to_string(),
    }
}

fn names(bones: &[Bone]) -> Vec<&str> {
    bones.iter().map(|b| b.id.as_str()).collect()
}

#[test]
fn test_empty_set_has_no_roots() {
    assert!(materialize(Vec::new()).is_empty());
    assert_eq!(count_roots(&[]), 0);
}

#[test]
fn test_only_roots_are_returned_at_top_level() {
    let bones = vec![
        record("a", None),
        record("a1", Some("a")),
        record("b", None),
        record("a2", Some("a")),
        record("b1", Some("b")),
    ];
    let expected_roots = count_roots(&bones);

    let roots = materialize(bones);

    assert_eq!(roots.len(), expected_roots);
    assert_eq!(names(&roots), vec!["a", "b"]);
    assert_eq!(names(&roots[0].children), vec!["a1", "a2"]);
    assert_eq!(names(&roots[1].children), vec!["b1"]);
}

#[test]
fn test_children_are_attached_at_full_depth() {
    let mut bones = vec![record("level0", None)];
    for depth in 1..50 {
        let parent = format!("level{}", depth - 1);
        bones.push(record(&format!("level{}", depth), Some(&parent)));
    }

    let roots = materialize(bones);

    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].subtree_len(), 50);

    let mut node = &roots[0];
    let mut depth = 0;
    while let Some(child) = node.children.first() {
        assert_eq!(child.parent_id.as_deref(), Some(node.id.as_str()));
        node = child;
        depth += 1;
    }
    assert_eq!(depth, 49);
}

#[test]
fn test_sibling_order_follows_storage_order() {
    let bones = vec![
        record("root", None),
        record("zeta", Some("root")),
        record("alpha", Some("root")),
        record("mid", Some("root")),
    ];

    let roots = materialize(bones);

    assert_eq!(names(&roots[0].children), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_fields_are_carried_over() {
    let mut child = record("c", Some("r"));
    child.created_by = "ann".to_string();
    child.name = "Machine".to_string();

    let roots = materialize(vec![record("r", None), child]);

    let child = &roots[0].children[0];
    assert_eq!(child.name, "Machine");
    assert_eq!(child.created_by, "ann");
    assert_eq!(child.diagram_id, "d1");
    assert!(child.children.is_empty());
}

#[test]
fn test_orphans_are_not_reachable() {
    let bones = vec![record("r", None), record("lost", Some("missing"))];

    let roots = materialize(bones);

    assert_eq!(roots.len(), 1);
    assert!(roots[0].children.is_empty());
}
