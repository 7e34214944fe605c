use crate::domain::value_objects::EntityId;
use chrono::{DateTime, Utc};

/// サーバー所有エンティティの共通機能。
///
/// Record は構築後に変更されない。内容が変わる場合は新しい値を作り直し、
/// 下流の計算は `Arc` の同一性で変更を検知する。
pub trait Record: Send + Sync + 'static {
    fn id(&self) -> &EntityId;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}

/// ID とタイムスタンプの組。`updated_at >= created_at` を常に満たす。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    id: EntityId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RecordMeta {
    /// `updated_at` が `created_at` より前の場合は `created_at` に揃える
    pub fn new(id: EntityId, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            updated_at: updated_at.max(created_at),
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn updated_at_never_precedes_created_at() {
        let created = Utc::now();
        let meta = RecordMeta::new(
            EntityId::parse("a").unwrap(),
            created,
            created - Duration::seconds(30),
        );

        assert_eq!(meta.updated_at(), created);
        assert!(meta.updated_at() >= meta.created_at());
    }
}
