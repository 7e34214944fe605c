use crate::domain::value_objects::{DropPosition, EntityId};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// 作成・更新・削除エンドポイント。結果はキャッシュに反映せず、呼び出し元に返すだけ。
#[async_trait]
pub trait MutationGateway: Send + Sync {
    async fn create(&self, kind: &str, payload: Value) -> Result<(), AppError>;

    async fn update(&self, kind: &str, id: &EntityId, payload: Value) -> Result<(), AppError>;

    async fn delete(&self, kind: &str, ids: &[EntityId]) -> Result<(), AppError>;
}

/// 並べ替えの永続化エンドポイント
#[async_trait]
pub trait ReorderGateway: Send + Sync {
    async fn reorder(
        &self,
        moved: &EntityId,
        target: &EntityId,
        position: DropPosition,
    ) -> Result<(), AppError>;
}
