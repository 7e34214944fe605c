use crate::domain::value_objects::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub website: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub state: AccountStateDto,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStateDto {
    #[serde(default)]
    pub is_logged_in: bool,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub username: Option<String>,
}
