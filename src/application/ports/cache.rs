use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;

/// プッシュチャネルのペイロードを受け取ってキャッシュを丸ごと差し替える受け口。
///
/// 種別の異なるキャッシュを ChangeFeedAdapter が一律に扱うためのオブジェクト安全な境界。
pub trait SnapshotSink: Send + Sync {
    fn channel(&self) -> &str;

    /// ペイロードをデコードして差し替え、反映後の件数を返す
    fn apply_payload(&self, payload: Value) -> Result<usize, AppError>;
}

/// キャッシュの再取得（全件ロード）を要求するためのポート
#[async_trait]
pub trait CacheRefresher: Send + Sync {
    async fn refresh(&self) -> Result<(), AppError>;
}
