use std::sync::Arc;
use uuid::Uuid;

/// Source of globally unique identifiers for diagrams and bones.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

pub type SharedIdGenerator = Arc<dyn IdGenerator>;

/// Random v4 UUIDs in hyphenated form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
