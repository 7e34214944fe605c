pub mod account_dto;
pub mod submission_dto;
pub mod tag_group_dto;

pub use account_dto::{AccountDto, AccountStateDto};
pub use submission_dto::{
    PostQueueRecordDto, PostRecordDto, ScheduleDto, ScheduleType, SubmissionDto,
    SubmissionFileDto, ValidationMessageDto, ValidationResultDto, WebsiteOptionsDataDto,
    WebsiteOptionsDto,
};
pub use tag_group_dto::TagGroupDto;
