pub mod cache;
pub mod entity_fetcher;
pub mod entity_kind;
pub mod mutation_gateway;
pub mod push_channel;

pub use cache::{CacheRefresher, SnapshotSink};
pub use entity_fetcher::EntityFetcher;
pub use entity_kind::EntityKind;
pub use mutation_gateway::{MutationGateway, ReorderGateway};
pub use push_channel::PushChannel;
