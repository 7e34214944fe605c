pub mod dto;
pub mod kinds;
pub mod ports;
pub mod services;
pub mod shared;

pub use kinds::{AccountKind, SubmissionKind, TagGroupKind};
