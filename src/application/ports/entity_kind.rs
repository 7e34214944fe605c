use crate::domain::entities::Record;
use serde::de::DeserializeOwned;

/// エンティティ種別ごとの定義（Record 型、DTO 型、プッシュチャネル名、DTO からの変換）。
///
/// `from_dto` は純粋かつ同期的で、チャネルが正当に届けうる DTO に対しては失敗しない。
pub trait EntityKind: Send + Sync + 'static {
    type Record: Record;
    type Dto: DeserializeOwned + Send + 'static;

    /// ログやミューテーション API で使う種別名
    const NAME: &'static str;

    /// プッシュチャネル名
    const CHANNEL: &'static str;

    fn from_dto(dto: Self::Dto) -> Self::Record;
}
