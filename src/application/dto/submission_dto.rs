use crate::domain::entities::{PostState, SubmissionType};
use crate::domain::value_objects::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// サーバーから届く投稿のワイヤ表現
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDto {
    pub id: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub submission_type: SubmissionType,
    #[serde(default)]
    pub order: f64,
    #[serde(default)]
    pub is_scheduled: bool,
    #[serde(default)]
    pub schedule: ScheduleDto,
    #[serde(default)]
    pub is_template: bool,
    #[serde(default)]
    pub is_multi_submission: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub post_queue_record: Option<PostQueueRecordDto>,
    #[serde(default)]
    pub files: Vec<SubmissionFileDto>,
    #[serde(default)]
    pub options: Vec<WebsiteOptionsDto>,
    #[serde(default)]
    pub posts: Vec<PostRecordDto>,
    #[serde(default)]
    pub validations: Vec<ValidationResultDto>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    #[default]
    None,
    Single,
    Recurring,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    #[serde(default)]
    pub schedule_type: ScheduleType,
    #[serde(default)]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cron: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostQueueRecordDto {
    pub id: EntityId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFileDto {
    pub id: EntityId,
    pub file_name: String,
    pub mime_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub order: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteOptionsDto {
    pub id: EntityId,
    #[serde(default)]
    pub account_id: Option<EntityId>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub data: WebsiteOptionsDataDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteOptionsDataDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecordDto {
    pub id: EntityId,
    pub state: PostState,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResultDto {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub errors: Vec<ValidationMessageDto>,
    #[serde(default)]
    pub warnings: Vec<ValidationMessageDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessageDto {
    pub id: String,
    #[serde(default)]
    pub field: Option<String>,
}
