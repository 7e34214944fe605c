pub mod entities;
pub mod value_objects;

pub use entities::{Account, Record, RecordMeta, Submission, TagGroup};
pub use value_objects::{DropPosition, EntityId, Schedule};
