use crate::application::ports::{CacheRefresher, EntityFetcher, EntityKind, SnapshotSink};
use crate::domain::entities::Record;
use crate::domain::value_objects::EntityId;
use crate::infrastructure::sync::decode_snapshot;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingState {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// キャッシュのある時点の状態。
///
/// `items` と `index` は常に丸ごと差し替えられ、部分的に書き換えられることはない。
/// そのため読み手はロックなしでスナップショットを保持し続けられる。
pub struct CacheSnapshot<R> {
    items: Arc<Vec<Arc<R>>>,
    index: Arc<HashMap<EntityId, Arc<R>>>,
    loading_state: LoadingState,
    error: Option<String>,
    last_loaded_at: Option<DateTime<Utc>>,
    generation: u64,
}

impl<R> Clone for CacheSnapshot<R> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            index: Arc::clone(&self.index),
            loading_state: self.loading_state,
            error: self.error.clone(),
            last_loaded_at: self.last_loaded_at,
            generation: self.generation,
        }
    }
}

impl<R: Record> CacheSnapshot<R> {
    fn empty(generation: u64) -> Self {
        Self {
            items: Arc::new(Vec::new()),
            index: Arc::new(HashMap::new()),
            loading_state: LoadingState::Idle,
            error: None,
            last_loaded_at: None,
            generation,
        }
    }

    pub fn items(&self) -> &Arc<Vec<Arc<R>>> {
        &self.items
    }

    pub fn get(&self, id: &EntityId) -> Option<&Arc<R>> {
        self.index.get(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn loading_state(&self) -> LoadingState {
        self.loading_state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.last_loaded_at
    }

    /// `items` が差し替えられるたびに増える世代番号
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(|r| r.id().clone()).collect()
    }

    /// `index` と `items` のメンバーが一致し、同じ Record を指しているか
    pub fn is_consistent(&self) -> bool {
        self.index.len() == self.items.len()
            && self.items.iter().all(|record| {
                self.index
                    .get(record.id())
                    .is_some_and(|indexed| Arc::ptr_eq(indexed, record))
            })
    }
}

fn build_collection<R: Record>(
    cache: &str,
    records: Vec<R>,
) -> (Arc<Vec<Arc<R>>>, Arc<HashMap<EntityId, Arc<R>>>) {
    let mut items = Vec::with_capacity(records.len());
    let mut index = HashMap::with_capacity(records.len());

    for record in records {
        let record = Arc::new(record);
        match index.entry(record.id().clone()) {
            Entry::Occupied(_) => {
                warn!(cache, id = %record.id(), "duplicate id in snapshot, keeping first occurrence");
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&record));
                items.push(record);
            }
        }
    }

    (Arc::new(items), Arc::new(index))
}

/// 取得中に `load_all` が破棄されたとき `Loading` を元に戻す
struct LoadGuard<'a, R> {
    cache: &'static str,
    state: &'a watch::Sender<CacheSnapshot<R>>,
    previous: LoadingState,
    settled: bool,
}

impl<R> LoadGuard<'_, R> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl<R> Drop for LoadGuard<'_, R> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let previous = self.previous;
        let restored = self.state.send_if_modified(|snapshot| {
            if snapshot.loading_state != LoadingState::Loading {
                return false;
            }
            snapshot.loading_state = previous;
            true
        });
        if restored {
            warn!(cache = self.cache, state = ?previous, "load cancelled before completion");
        }
    }
}

/// サーバー所有エンティティのキャッシュ（種別ごとに1つ）。
///
/// 全件ロードとプッシュによる丸ごとの差し替えだけで更新される。
/// 競合する書き込みはマージせず、最後に完了したものが勝つ。
pub struct EntityCache<K: EntityKind> {
    fetcher: Arc<dyn EntityFetcher<K>>,
    state: watch::Sender<CacheSnapshot<K::Record>>,
}

impl<K: EntityKind> EntityCache<K> {
    pub fn new(fetcher: Arc<dyn EntityFetcher<K>>) -> Self {
        let (state, _) = watch::channel(CacheSnapshot::empty(0));
        Self { fetcher, state }
    }

    pub fn name(&self) -> &'static str {
        K::NAME
    }

    /// 現在のスナップショットを取得
    pub fn snapshot(&self) -> CacheSnapshot<K::Record> {
        self.state.borrow().clone()
    }

    /// 現在のスナップショットと、以降の更新を受け取る購読を作成
    pub fn subscribe(&self) -> watch::Receiver<CacheSnapshot<K::Record>> {
        self.state.subscribe()
    }

    pub fn items(&self) -> Arc<Vec<Arc<K::Record>>> {
        Arc::clone(&self.state.borrow().items)
    }

    pub fn get_by_id(&self, id: &EntityId) -> Option<Arc<K::Record>> {
        self.state.borrow().index.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn loading_state(&self) -> LoadingState {
        self.state.borrow().loading_state
    }

    /// 全件を取得してキャッシュを差し替える。
    ///
    /// すでにロード中なら何もせずに戻る（キューには積まない）。失敗時は `Error` に遷移し、
    /// 直前の `items` はそのまま残す。完了前に future が破棄された場合は元の状態に戻す。
    pub async fn load_all(&self) -> Result<(), AppError> {
        let mut previous = None;
        self.state.send_if_modified(|snapshot| {
            if snapshot.loading_state == LoadingState::Loading {
                return false;
            }
            previous = Some(snapshot.loading_state);
            snapshot.loading_state = LoadingState::Loading;
            true
        });

        let Some(previous) = previous else {
            debug!(cache = K::NAME, "load already in flight, skipping");
            return Ok(());
        };
        let guard = LoadGuard {
            cache: K::NAME,
            state: &self.state,
            previous,
            settled: false,
        };

        debug!(cache = K::NAME, "loading collection");
        let result = self.fetcher.fetch_all().await;
        guard.settle();

        match result {
            Ok(dtos) => {
                let count = self.replace_from_dtos(dtos);
                info!(cache = K::NAME, count, "collection loaded");
                Ok(())
            }
            Err(err) => {
                error!(cache = K::NAME, error = %err, "collection load failed");
                let message = err.to_string();
                self.state.send_modify(|snapshot| {
                    snapshot.loading_state = LoadingState::Error;
                    snapshot.error = Some(message);
                });
                Err(err)
            }
        }
    }

    /// 無条件に丸ごと差し替えて `Loaded` にする。新しい集合に無い Record は捨てられる。
    pub fn replace(&self, records: Vec<K::Record>) -> usize {
        let (items, index) = build_collection(K::NAME, records);
        let count = items.len();

        self.state.send_modify(|snapshot| {
            snapshot.items = items;
            snapshot.index = index;
            snapshot.loading_state = LoadingState::Loaded;
            snapshot.error = None;
            snapshot.last_loaded_at = Some(Utc::now());
            snapshot.generation += 1;
        });

        debug!(cache = K::NAME, count, "snapshot replaced");
        count
    }

    pub fn replace_from_dtos(&self, dtos: Vec<K::Dto>) -> usize {
        self.replace(dtos.into_iter().map(K::from_dto).collect())
    }

    /// 空の `Idle` 状態に戻す（ログアウト時など）
    pub fn clear(&self) {
        self.state.send_modify(|snapshot| {
            let generation = snapshot.generation + 1;
            *snapshot = CacheSnapshot::empty(generation);
        });
        debug!(cache = K::NAME, "cache cleared");
    }
}

impl<K: EntityKind> SnapshotSink for EntityCache<K> {
    fn channel(&self) -> &str {
        K::CHANNEL
    }

    fn apply_payload(&self, payload: Value) -> Result<usize, AppError> {
        let dtos = decode_snapshot::<K::Dto>(payload)?;
        Ok(self.replace_from_dtos(dtos))
    }
}

#[async_trait]
impl<K: EntityKind> CacheRefresher for EntityCache<K> {
    async fn refresh(&self) -> Result<(), AppError> {
        self.load_all().await
    }
}
