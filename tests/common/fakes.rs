use async_trait::async_trait;
use crosspost_sync::application::ports::{EntityFetcher, EntityKind, ReorderGateway};
use crosspost_sync::domain::value_objects::{DropPosition, EntityId};
use crosspost_sync::infrastructure::sync::decode_snapshot;
use crosspost_sync::shared::error::AppError;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, Notify};

/// release されるまで応答を返さない全件取得
pub struct GatedFetcher {
    payload: Mutex<Result<Value, AppError>>,
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
    calls: AtomicUsize,
}

impl GatedFetcher {
    pub fn new(payload: Result<Value, AppError>) -> Self {
        Self {
            payload: Mutex::new(payload),
            started: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn respond_with(&self, payload: Result<Value, AppError>) {
        *self.payload.lock().await = payload;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<K: EntityKind> EntityFetcher<K> for GatedFetcher {
    async fn fetch_all(&self) -> Result<Vec<K::Dto>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        self.release.notified().await;
        let payload = self.payload.lock().await.clone()?;
        decode_snapshot(payload)
    }
}

/// 呼び出しを記録し、release されるまで完了しない並べ替えゲートウェイ
pub struct HeldReorderGateway {
    pub calls: Mutex<Vec<(EntityId, EntityId, DropPosition)>>,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
    failure: Option<AppError>,
}

impl HeldReorderGateway {
    pub fn succeeding() -> Self {
        Self::with_failure(None)
    }

    pub fn failing(err: AppError) -> Self {
        Self::with_failure(Some(err))
    }

    fn with_failure(failure: Option<AppError>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
            failure,
        }
    }
}

#[async_trait]
impl ReorderGateway for HeldReorderGateway {
    async fn reorder(
        &self,
        moved: &EntityId,
        target: &EntityId,
        position: DropPosition,
    ) -> Result<(), AppError> {
        self.calls
            .lock()
            .await
            .push((moved.clone(), target.clone(), position));
        self.entered.notify_one();
        self.release.notified().await;
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
