use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

/// サーバー起点のスナップショット配信。
///
/// 同一チャネル内の配信順序はトランスポートが保証する（at-least-once）。
#[async_trait]
pub trait PushChannel: Send + Sync {
    async fn subscribe(&self, channel: &str) -> Result<mpsc::Receiver<Value>, AppError>;
}
