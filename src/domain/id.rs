//! Node identifier generation

use uuid::Uuid;

/// Source of fresh node identifiers.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

/// Random v4 UUIDs in simple (hyphen-less) form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        new_id()
    }
}

/// Mint a new identifier.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}
