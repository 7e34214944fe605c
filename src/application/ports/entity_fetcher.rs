use super::entity_kind::EntityKind;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// 種別ごとのコレクション全件取得（リクエスト/レスポンス）。
///
/// タイムアウトやリトライはこのポートの実装側の責務。
#[async_trait]
pub trait EntityFetcher<K: EntityKind>: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<K::Dto>, AppError>;
}
