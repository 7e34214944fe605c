pub mod account;
pub mod record;
pub mod submission;
pub mod tag_group;

pub use account::{Account, AccountLoginState};
pub use record::{Record, RecordMeta};
pub use submission::{
    PostAttempt, PostState, Submission, SubmissionFile, SubmissionParts, SubmissionType,
    ValidationResult, WebsiteOptions,
};
pub use tag_group::TagGroup;
