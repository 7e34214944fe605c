use crate::application::dto::{AccountDto, SubmissionDto, TagGroupDto};
use crate::application::ports::EntityKind;
use crate::application::shared::mappers::{
    map_account_dto, map_submission_dto, map_tag_group_dto,
};
use crate::domain::entities::{Account, Submission, TagGroup};

pub struct SubmissionKind;

impl EntityKind for SubmissionKind {
    type Record = Submission;
    type Dto = SubmissionDto;

    const NAME: &'static str = "submission";
    const CHANNEL: &'static str = "SUBMISSION_UPDATES";

    fn from_dto(dto: Self::Dto) -> Self::Record {
        map_submission_dto(dto)
    }
}

pub struct AccountKind;

impl EntityKind for AccountKind {
    type Record = Account;
    type Dto = AccountDto;

    const NAME: &'static str = "account";
    const CHANNEL: &'static str = "ACCOUNT_UPDATES";

    fn from_dto(dto: Self::Dto) -> Self::Record {
        map_account_dto(dto)
    }
}

pub struct TagGroupKind;

impl EntityKind for TagGroupKind {
    type Record = TagGroup;
    type Dto = TagGroupDto;

    const NAME: &'static str = "tag-group";
    const CHANNEL: &'static str = "TAG_GROUP_UPDATES";

    fn from_dto(dto: Self::Dto) -> Self::Record {
        map_tag_group_dto(dto)
    }
}
