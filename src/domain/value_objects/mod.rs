pub mod drop_position;
pub mod entity_id;
pub mod schedule;

pub use drop_position::DropPosition;
pub use entity_id::EntityId;
pub use schedule::Schedule;
