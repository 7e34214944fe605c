pub mod cache;
pub mod sync;
pub mod transport;
