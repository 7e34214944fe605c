pub mod account;
pub mod submission;
pub mod tag_group;

pub use account::map_account_dto;
pub use submission::map_submission_dto;
pub use tag_group::map_tag_group_dto;
