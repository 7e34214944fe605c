use crate::application::ports::{EntityKind, MutationGateway};
use crate::domain::value_objects::EntityId;
use crate::shared::error::AppError;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// 種別ごとの作成・更新・削除。
///
/// 結果はキャッシュへ反映しない。反映はサーバーからのスナップショット配信を待つ。
pub struct MutationService<K: EntityKind> {
    gateway: Arc<dyn MutationGateway>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: EntityKind> Clone for MutationService<K> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            _kind: PhantomData,
        }
    }
}

impl<K: EntityKind> MutationService<K> {
    pub fn new(gateway: Arc<dyn MutationGateway>) -> Self {
        Self {
            gateway,
            _kind: PhantomData,
        }
    }

    pub async fn create<P>(&self, payload: &P) -> Result<(), AppError>
    where
        P: Serialize + Sync,
    {
        let payload = serde_json::to_value(payload)?;
        self.gateway
            .create(K::NAME, payload)
            .await
            .inspect(|_| debug!(kind = K::NAME, "create sent"))
            .inspect_err(|e| warn!(kind = K::NAME, error = %e, "Failed to create"))
    }

    pub async fn update<P>(&self, id: &EntityId, payload: &P) -> Result<(), AppError>
    where
        P: Serialize + Sync,
    {
        let payload = serde_json::to_value(payload)?;
        self.gateway
            .update(K::NAME, id, payload)
            .await
            .inspect(|_| debug!(kind = K::NAME, id = %id, "update sent"))
            .inspect_err(|e| warn!(kind = K::NAME, id = %id, error = %e, "Failed to update"))
    }

    pub async fn delete(&self, ids: &[EntityId]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Err(AppError::InvalidInput("No ids to delete".to_string()));
        }
        self.gateway
            .delete(K::NAME, ids)
            .await
            .inspect(|_| debug!(kind = K::NAME, count = ids.len(), "delete sent"))
            .inspect_err(|e| warn!(kind = K::NAME, error = %e, "Failed to delete"))
    }
}
