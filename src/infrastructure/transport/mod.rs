pub mod in_memory_backend;
pub mod push_hub;

pub use in_memory_backend::{InMemoryBackend, MutationKind, RecordedMutation, RecordedReorder};
pub use push_hub::InMemoryPushChannel;
