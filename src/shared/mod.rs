pub mod config;
pub mod error;

pub use config::{AppConfig, FeedConfig, LoggingConfig, ReorderConfig, ReorderFailurePolicy};
pub use error::{AppError, Result};
