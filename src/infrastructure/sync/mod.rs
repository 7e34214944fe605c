pub mod change_feed;
pub mod payload;

pub use change_feed::ChangeFeedAdapter;
pub use payload::decode_snapshot;
