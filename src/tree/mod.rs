//! Bone tree algorithms.
//!
//! Bones are stored flat, each row pointing at its parent. Reads rebuild the
//! nested view with [`materialize`]; writes go the other way with
//! [`flatten_bone_tree`], which turns a nested submission into rows ordered so
//! that every parent precedes its children.

mod ids;
mod materialize;
mod replace;

pub use ids::{IdGenerator, SharedIdGenerator, UuidIdGenerator};
pub use materialize::{count_roots, materialize};
pub use replace::{DEFAULT_BONE_CREATOR, MAX_BONE_DEPTH, bone_depth, flatten_bone_tree};
