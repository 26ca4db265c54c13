use uuid::Uuid;

/// Capability for minting entity identifiers. Injected wherever fresh IDs are
/// needed so tests can substitute a deterministic sequence.
pub trait IdGenerator: Send + Sync {
    fn next(&self) -> String;
}

/// Production generator backed by random UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
