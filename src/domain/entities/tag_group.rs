use super::record::{Record, RecordMeta};
use crate::domain::value_objects::EntityId;
use chrono::{DateTime, Utc};

/// まとめて適用するタグの組
#[derive(Debug, Clone)]
pub struct TagGroup {
    meta: RecordMeta,
    name: String,
    tags: Vec<String>,
}

impl TagGroup {
    /// タグは前後の空白を除去し、空のものは捨てる
    pub fn new(meta: RecordMeta, name: String, tags: Vec<String>) -> Self {
        let tags = tags
            .into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();

        Self { meta, name, tags }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Record for TagGroup {
    fn id(&self) -> &EntityId {
        self.meta.id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.meta.created_at()
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.meta.updated_at()
    }
}
