use super::push_hub::InMemoryPushChannel;
use crate::application::ports::{
    EntityFetcher, EntityKind, MutationGateway, PushChannel, ReorderGateway,
};
use crate::application::services::reorder::apply_move;
use crate::domain::value_objects::{DropPosition, EntityId};
use crate::infrastructure::sync::decode_snapshot;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{Mutex, RwLock, mpsc};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMutation {
    pub action: MutationKind,
    pub kind: String,
    pub ids: Vec<EntityId>,
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedReorder {
    pub moved: EntityId,
    pub target: EntityId,
    pub position: DropPosition,
}

#[derive(Default)]
struct FetchState {
    calls: usize,
    fail_next: Option<String>,
}

/// 全ポートをプロセス内で実装するバックエンド。
///
/// 種別ごとのスナップショット（JSON）を保持し、全件取得はそこから返す。
/// `publish` で保存と同時にプッシュチャネルへ配信する。ミューテーションは記録するだけ。
/// 並べ替えが成功すると、保存済みの投稿スナップショットの order を振り直して配信し直す。
pub struct InMemoryBackend {
    push: InMemoryPushChannel,
    snapshots: RwLock<HashMap<String, Value>>,
    fetches: Mutex<HashMap<String, FetchState>>,
    mutations: Mutex<Vec<RecordedMutation>>,
    reorders: Mutex<Vec<RecordedReorder>>,
    reorder_failure: Mutex<Option<String>>,
    reorder_channel: Option<&'static str>,
}

impl InMemoryBackend {
    pub fn new(buffer: usize) -> Self {
        Self::with_push(InMemoryPushChannel::new(buffer))
    }

    pub fn with_push(push: InMemoryPushChannel) -> Self {
        Self {
            push,
            snapshots: RwLock::new(HashMap::new()),
            fetches: Mutex::new(HashMap::new()),
            mutations: Mutex::new(Vec::new()),
            reorders: Mutex::new(Vec::new()),
            reorder_failure: Mutex::new(None),
            reorder_channel: Some("SUBMISSION_UPDATES"),
        }
    }

    /// 並べ替え成功後にスナップショットを配信し直さない
    pub fn without_reorder_echo(mut self) -> Self {
        self.reorder_channel = None;
        self
    }

    pub fn push_channel(&self) -> &InMemoryPushChannel {
        &self.push
    }

    /// 配信せずにスナップショットだけ差し替える
    pub async fn seed<K: EntityKind>(&self, payload: Value) {
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(K::CHANNEL.to_string(), payload);
    }

    /// スナップショットを差し替えてプッシュ配信する
    pub async fn publish<K: EntityKind>(&self, payload: Value) -> usize {
        self.seed::<K>(payload.clone()).await;
        let delivered = self.push.publish(K::CHANNEL, payload).await;
        debug!(channel = K::CHANNEL, delivered, "snapshot published");
        delivered
    }

    pub async fn snapshot<K: EntityKind>(&self) -> Option<Value> {
        let snapshots = self.snapshots.read().await;
        snapshots.get(K::CHANNEL).cloned()
    }

    /// 次の全件取得1回だけをネットワークエラーにする
    pub async fn fail_next_fetch<K: EntityKind>(&self, message: impl Into<String>) {
        let mut fetches = self.fetches.lock().await;
        fetches.entry(K::CHANNEL.to_string()).or_default().fail_next = Some(message.into());
    }

    pub async fn fetch_count<K: EntityKind>(&self) -> usize {
        let fetches = self.fetches.lock().await;
        fetches.get(K::CHANNEL).map(|state| state.calls).unwrap_or(0)
    }

    /// 以降の並べ替え要求を失敗させる（None で解除）
    pub async fn fail_reorders(&self, message: Option<String>) {
        *self.reorder_failure.lock().await = message;
    }

    pub async fn mutations(&self) -> Vec<RecordedMutation> {
        self.mutations.lock().await.clone()
    }

    pub async fn reorders(&self) -> Vec<RecordedReorder> {
        self.reorders.lock().await.clone()
    }

    async fn record(&self, mutation: RecordedMutation) {
        debug!(kind = %mutation.kind, action = ?mutation.action, "mutation recorded");
        self.mutations.lock().await.push(mutation);
    }

    async fn echo_reorder(
        &self,
        channel: &'static str,
        moved: &EntityId,
        target: &EntityId,
        position: DropPosition,
    ) -> Result<(), AppError> {
        let updated = {
            let mut snapshots = self.snapshots.write().await;
            let Some(current) = snapshots.get(channel) else {
                return Ok(());
            };
            let Some(updated) = renumber_snapshot(current, moved, target, position)? else {
                return Ok(());
            };
            snapshots.insert(channel.to_string(), updated.clone());
            updated
        };

        let delivered = self.push.publish(channel, updated).await;
        info!(channel, delivered, "reordered snapshot published");
        Ok(())
    }
}

#[async_trait]
impl<K: EntityKind> EntityFetcher<K> for InMemoryBackend {
    async fn fetch_all(&self) -> Result<Vec<K::Dto>, AppError> {
        {
            let mut fetches = self.fetches.lock().await;
            let state = fetches.entry(K::CHANNEL.to_string()).or_default();
            state.calls += 1;
            if let Some(message) = state.fail_next.take() {
                return Err(AppError::Network(message));
            }
        }

        let payload = self.snapshot::<K>().await.unwrap_or(Value::Null);
        decode_snapshot(payload)
    }
}

#[async_trait]
impl PushChannel for InMemoryBackend {
    async fn subscribe(&self, channel: &str) -> Result<mpsc::Receiver<Value>, AppError> {
        self.push.subscribe(channel).await
    }
}

#[async_trait]
impl MutationGateway for InMemoryBackend {
    async fn create(&self, kind: &str, payload: Value) -> Result<(), AppError> {
        self.record(RecordedMutation {
            action: MutationKind::Create,
            kind: kind.to_string(),
            ids: Vec::new(),
            payload: Some(payload),
        })
        .await;
        Ok(())
    }

    async fn update(&self, kind: &str, id: &EntityId, payload: Value) -> Result<(), AppError> {
        self.record(RecordedMutation {
            action: MutationKind::Update,
            kind: kind.to_string(),
            ids: vec![id.clone()],
            payload: Some(payload),
        })
        .await;
        Ok(())
    }

    async fn delete(&self, kind: &str, ids: &[EntityId]) -> Result<(), AppError> {
        if ids.is_empty() {
            return Err(AppError::InvalidInput("No ids to delete".to_string()));
        }
        self.record(RecordedMutation {
            action: MutationKind::Delete,
            kind: kind.to_string(),
            ids: ids.to_vec(),
            payload: None,
        })
        .await;
        Ok(())
    }
}

#[async_trait]
impl ReorderGateway for InMemoryBackend {
    async fn reorder(
        &self,
        moved: &EntityId,
        target: &EntityId,
        position: DropPosition,
    ) -> Result<(), AppError> {
        self.reorders.lock().await.push(RecordedReorder {
            moved: moved.clone(),
            target: target.clone(),
            position,
        });

        if let Some(message) = self.reorder_failure.lock().await.clone() {
            return Err(AppError::Network(message));
        }

        if let Some(channel) = self.reorder_channel {
            self.echo_reorder(channel, moved, target, position).await?;
        }
        Ok(())
    }
}

// 現在の order 昇順に並べ、移動を適用してから 0.. の連番で振り直す
fn renumber_snapshot(
    current: &Value,
    moved: &EntityId,
    target: &EntityId,
    position: DropPosition,
) -> Result<Option<Value>, AppError> {
    let items = match current {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items,
            _ => return Ok(None),
        },
        _ => return Ok(None),
    };

    let mut sorted: Vec<&Value> = items.iter().collect();
    sorted.sort_by(|a, b| order_of(a).total_cmp(&order_of(b)));

    let ids = sorted
        .iter()
        .map(|item| {
            item.get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| AppError::DeserializationError("Snapshot item without id".into()))
                .and_then(|raw| EntityId::parse(raw).map_err(AppError::InvalidInput))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let Some(next) = apply_move(&ids, moved, target, position) else {
        return Ok(None);
    };

    let by_id: HashMap<&str, &Value> = sorted
        .iter()
        .zip(ids.iter())
        .map(|(item, id)| (id.as_str(), *item))
        .collect();

    let renumbered = next
        .iter()
        .enumerate()
        .filter_map(|(idx, id)| {
            by_id.get(id.as_str()).map(|item| {
                let mut item = (*item).clone();
                if let Value::Object(map) = &mut item {
                    map.insert("order".to_string(), Value::from(idx as f64));
                }
                item
            })
        })
        .collect();

    Ok(Some(Value::Array(renumbered)))
}

fn order_of(item: &Value) -> f64 {
    item.get("order").and_then(Value::as_f64).unwrap_or(0.0)
}
