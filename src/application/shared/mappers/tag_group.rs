use crate::application::dto::TagGroupDto;
use crate::domain::entities::{RecordMeta, TagGroup};

pub fn map_tag_group_dto(dto: TagGroupDto) -> TagGroup {
    TagGroup::new(
        RecordMeta::new(dto.id, dto.created_at, dto.updated_at),
        dto.name,
        dto.tags,
    )
}
