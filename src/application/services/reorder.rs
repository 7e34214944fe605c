use crate::application::ports::{CacheRefresher, ReorderGateway};
use crate::domain::value_objects::{DropPosition, EntityId};
use crate::shared::config::{ReorderConfig, ReorderFailurePolicy};
use crate::shared::error::AppError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// `moved` を取り除き、`target` の前後に挿入し直した並びを返す。
///
/// 同一 ID 同士の移動や、どちらかが並びに無い場合は `None`。
pub fn apply_move(
    order: &[EntityId],
    moved: &EntityId,
    target: &EntityId,
    position: DropPosition,
) -> Option<Vec<EntityId>> {
    if moved == target {
        return None;
    }
    let from = order.iter().position(|id| id == moved)?;
    if !order.contains(target) {
        return None;
    }

    let mut next = order.to_vec();
    let item = next.remove(from);
    let anchor = next.iter().position(|id| id == target)?;
    let insert_at = match position {
        DropPosition::Before => anchor,
        DropPosition::After => anchor + 1,
    };
    next.insert(insert_at, item);
    Some(next)
}

/// ドラッグ方向から挿入位置を決める（下へは後ろ、上へは前）
pub fn position_for(order: &[EntityId], moved: &EntityId, target: &EntityId) -> Option<DropPosition> {
    let from = order.iter().position(|id| id == moved)?;
    let to = order.iter().position(|id| id == target)?;
    match from.cmp(&to) {
        std::cmp::Ordering::Less => Some(DropPosition::After),
        std::cmp::Ordering::Greater => Some(DropPosition::Before),
        std::cmp::Ordering::Equal => None,
    }
}

/// ローカルで適用済みの並べ替え1件（永続化待ち）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderRequest {
    pub id: Uuid,
    pub moved: EntityId,
    pub target: EntityId,
    pub position: DropPosition,
}

#[derive(Debug)]
struct PendingMove {
    request: ReorderRequest,
    recorded_at: Instant,
    /// 永続化済みで、サーバーのスナップショットへの反映待ち
    persisted: bool,
}

#[derive(Debug, Default)]
struct EngineState {
    order: Vec<EntityId>,
    enabled: bool,
    dragging: Option<EntityId>,
    deferred_seed: Option<(Vec<EntityId>, bool)>,
    pending: Vec<PendingMove>,
}

/// 楽観的な並べ替え。
///
/// ローカルの並びはプロジェクションの出力から `seed` で丸ごと差し替える。
/// ドロップ時は即座にローカルへ反映し、永続化はゲートウェイへ非同期に依頼する。
/// 移動は保留として覚えておき、途中で `seed` されても上に適用し直す。
/// 永続化に成功した移動は、`seed` された並びがすでにそれを反映しているか TTL が切れるまで残る。
/// ドラッグ中の `seed` はドラッグ終了（またはキャンセル）まで保留する。
#[derive(Clone)]
pub struct ReorderEngine {
    gateway: Arc<dyn ReorderGateway>,
    refresher: Option<Arc<dyn CacheRefresher>>,
    policy: ReorderFailurePolicy,
    pending_ttl: Duration,
    state: Arc<Mutex<EngineState>>,
}

impl ReorderEngine {
    pub fn new(gateway: Arc<dyn ReorderGateway>, config: &ReorderConfig) -> Self {
        Self {
            gateway,
            refresher: None,
            policy: config.on_failure,
            pending_ttl: Duration::from_secs(config.pending_ttl_secs),
            state: Arc::new(Mutex::new(EngineState::default())),
        }
    }

    /// 失敗時に再取得するキャッシュ（`Refetch` ポリシーでのみ使う）
    pub fn with_refresher(mut self, refresher: Arc<dyn CacheRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    pub fn with_pending_ttl(mut self, ttl: Duration) -> Self {
        self.pending_ttl = ttl;
        self
    }

    pub fn policy(&self) -> ReorderFailurePolicy {
        self.policy
    }

    /// 最新のプロジェクション出力で並びを置き換える。ドラッグ中なら false を返して保留する。
    pub fn seed(&self, ids: Vec<EntityId>, reorderable: bool) -> bool {
        let mut state = self.lock();
        if state.dragging.is_some() {
            debug!(count = ids.len(), "seed deferred until drag ends");
            state.deferred_seed = Some((ids, reorderable));
            return false;
        }
        self.apply_seed(&mut state, ids, reorderable);
        true
    }

    pub fn order(&self) -> Vec<EntityId> {
        self.lock().order.clone()
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    pub fn dragging(&self) -> Option<EntityId> {
        self.lock().dragging.clone()
    }

    /// 永続化が完了していない移動の数
    pub fn pending_count(&self) -> usize {
        self.lock().pending.iter().filter(|p| !p.persisted).count()
    }

    /// 永続化済みだが、まだ `seed` された並びに現れていない移動の数
    pub fn awaiting_snapshot_count(&self) -> usize {
        self.lock().pending.iter().filter(|p| p.persisted).count()
    }

    pub fn start_drag(&self, id: &EntityId) -> bool {
        let mut state = self.lock();
        if !state.enabled {
            debug!(id = %id, "drag ignored: reordering disabled for this view");
            return false;
        }
        if !state.order.contains(id) {
            warn!(id = %id, "drag ignored: item not in current order");
            return false;
        }
        state.dragging = Some(id.clone());
        true
    }

    pub fn cancel_drag(&self) {
        let mut state = self.lock();
        state.dragging = None;
        self.flush_deferred(&mut state);
    }

    /// ドロップをローカルの並びへ同期的に反映し、永続化すべき要求を返す
    pub fn end_drag(&self, target: &EntityId, position: DropPosition) -> Option<ReorderRequest> {
        let mut state = self.lock();
        let moved = state.dragging.take()?;

        let request = match apply_move(&state.order, &moved, target, position) {
            Some(next) => {
                state.order = next;
                let request = ReorderRequest {
                    id: Uuid::new_v4(),
                    moved,
                    target: target.clone(),
                    position,
                };
                state.pending.push(PendingMove {
                    request: request.clone(),
                    recorded_at: Instant::now(),
                    persisted: false,
                });
                debug!(
                    moved = %request.moved,
                    target = %request.target,
                    position = %request.position,
                    "reorder applied locally"
                );
                Some(request)
            }
            None => None,
        };

        self.flush_deferred(&mut state);
        request
    }

    /// ゲートウェイへ永続化を依頼する。失敗してもローカルの並びは戻さない。
    pub async fn persist(&self, request: ReorderRequest) -> Result<(), AppError> {
        let result = self
            .gateway
            .reorder(&request.moved, &request.target, request.position)
            .await;

        let Err(err) = result else {
            if let Some(pending) = self
                .lock()
                .pending
                .iter_mut()
                .find(|p| p.request.id == request.id)
            {
                pending.persisted = true;
            }
            debug!(moved = %request.moved, "reorder persisted");
            return Ok(());
        };

        self.lock().pending.retain(|p| p.request.id != request.id);

        warn!(
            moved = %request.moved,
            target = %request.target,
            error = %err,
            "Failed to persist reorder"
        );
        if self.policy == ReorderFailurePolicy::Refetch {
            match &self.refresher {
                Some(refresher) => {
                    info!("refetching after failed reorder");
                    if let Err(refresh_err) = refresher.refresh().await {
                        warn!(error = %refresh_err, "Refetch after failed reorder also failed");
                    }
                }
                None => warn!("Refetch policy configured without a cache refresher"),
            }
        }
        Err(err)
    }

    /// ドロップを反映し、永続化をバックグラウンドで実行する
    pub fn drop_on(
        &self,
        target: &EntityId,
        position: DropPosition,
    ) -> Option<JoinHandle<Result<(), AppError>>> {
        let request = self.end_drag(target, position)?;
        let engine = self.clone();
        Some(tokio::spawn(async move { engine.persist(request).await }))
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush_deferred(&self, state: &mut EngineState) {
        if let Some((ids, reorderable)) = state.deferred_seed.take() {
            self.apply_seed(state, ids, reorderable);
        }
    }

    fn apply_seed(&self, state: &mut EngineState, ids: Vec<EntityId>, reorderable: bool) {
        let ttl = self.pending_ttl;
        let before = state.pending.len();
        state.pending.retain(|p| p.recorded_at.elapsed() < ttl);
        let expired = before - state.pending.len();
        if expired > 0 {
            warn!(expired, "dropping unconfirmed reorders past their ttl");
        }

        let mut order = ids;
        let mut replayed = 0;
        state.pending.retain(|pending| {
            let request = &pending.request;
            match apply_move(&order, &request.moved, &request.target, request.position) {
                Some(next) if next != order => {
                    order = next;
                    replayed += 1;
                    true
                }
                // 並びがすでに移動を反映している
                _ => !pending.persisted,
            }
        });

        state.order = order;
        state.enabled = reorderable;
        debug!(
            count = state.order.len(),
            replayed,
            reorderable,
            "reorder order seeded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::{mock, predicate::*};

    mock! {
        pub Gateway {}

        #[async_trait]
        impl ReorderGateway for Gateway {
            async fn reorder(
                &self,
                moved: &EntityId,
                target: &EntityId,
                position: DropPosition,
            ) -> Result<(), AppError>;
        }
    }

    mock! {
        pub Refresher {}

        #[async_trait]
        impl CacheRefresher for Refresher {
            async fn refresh(&self) -> Result<(), AppError>;
        }
    }

    fn ids(values: &[&str]) -> Vec<EntityId> {
        values.iter().map(|v| EntityId::parse(v).unwrap()).collect()
    }

    fn id(value: &str) -> EntityId {
        EntityId::parse(value).unwrap()
    }

    fn engine_with(gateway: MockGateway, policy: ReorderFailurePolicy) -> ReorderEngine {
        let config = ReorderConfig {
            on_failure: policy,
            pending_ttl_secs: 30,
        };
        ReorderEngine::new(Arc::new(gateway), &config)
    }

    #[test]
    fn test_apply_move_after_and_before() {
        let order = ids(&["A", "B", "C", "D"]);

        assert_eq!(
            apply_move(&order, &id("A"), &id("C"), DropPosition::After),
            Some(ids(&["B", "C", "A", "D"]))
        );
        assert_eq!(
            apply_move(&order, &id("D"), &id("B"), DropPosition::Before),
            Some(ids(&["A", "D", "B", "C"]))
        );
    }

    #[test]
    fn test_apply_move_rejects_noops_and_unknown_ids() {
        let order = ids(&["A", "B"]);

        assert_eq!(apply_move(&order, &id("A"), &id("A"), DropPosition::After), None);
        assert_eq!(apply_move(&order, &id("Z"), &id("A"), DropPosition::After), None);
        assert_eq!(apply_move(&order, &id("A"), &id("Z"), DropPosition::After), None);
    }

    #[test]
    fn test_position_for_follows_drag_direction() {
        let order = ids(&["A", "B", "C"]);

        assert_eq!(position_for(&order, &id("A"), &id("C")), Some(DropPosition::After));
        assert_eq!(position_for(&order, &id("C"), &id("A")), Some(DropPosition::Before));
        assert_eq!(position_for(&order, &id("B"), &id("B")), None);
    }

    #[test]
    fn test_end_drag_applies_locally_before_persistence() {
        let engine = engine_with(MockGateway::new(), ReorderFailurePolicy::KeepLocal);
        engine.seed(ids(&["A", "B", "C", "D"]), true);

        assert!(engine.start_drag(&id("A")));
        let request = engine.end_drag(&id("C"), DropPosition::After).unwrap();

        assert_eq!(engine.order(), ids(&["B", "C", "A", "D"]));
        assert_eq!(request.moved, id("A"));
        assert_eq!(request.target, id("C"));
        assert_eq!(engine.pending_count(), 1);
        assert!(engine.dragging().is_none());
    }

    #[test]
    fn test_drop_on_itself_is_ignored() {
        let engine = engine_with(MockGateway::new(), ReorderFailurePolicy::KeepLocal);
        engine.seed(ids(&["A", "B"]), true);

        engine.start_drag(&id("A"));
        assert!(engine.end_drag(&id("A"), DropPosition::After).is_none());
        assert_eq!(engine.order(), ids(&["A", "B"]));
        assert_eq!(engine.pending_count(), 0);
    }

    #[test]
    fn test_drag_disabled_for_filtered_view() {
        let engine = engine_with(MockGateway::new(), ReorderFailurePolicy::KeepLocal);
        engine.seed(ids(&["A", "B"]), false);

        assert!(!engine.is_enabled());
        assert!(!engine.start_drag(&id("A")));
        assert!(engine.end_drag(&id("B"), DropPosition::After).is_none());
    }

    #[tokio::test]
    async fn test_persist_forwards_move_and_marks_it_persisted() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_reorder()
            .with(eq(id("D")), eq(id("B")), eq(DropPosition::Before))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let engine = engine_with(gateway, ReorderFailurePolicy::KeepLocal);
        engine.seed(ids(&["A", "B", "C", "D"]), true);

        engine.start_drag(&id("D"));
        let request = engine.end_drag(&id("B"), DropPosition::Before).unwrap();
        engine.persist(request).await.unwrap();

        assert_eq!(engine.order(), ids(&["A", "D", "B", "C"]));
        assert_eq!(engine.pending_count(), 0);
        assert_eq!(engine.awaiting_snapshot_count(), 1);
    }

    #[tokio::test]
    async fn test_persisted_move_survives_stale_seed_until_snapshot_reflects_it() {
        let mut gateway = MockGateway::new();
        gateway.expect_reorder().times(1).returning(|_, _, _| Ok(()));
        let engine = engine_with(gateway, ReorderFailurePolicy::KeepLocal);
        engine.seed(ids(&["A", "B", "C", "D"]), true);

        engine.start_drag(&id("A"));
        let request = engine.end_drag(&id("C"), DropPosition::After).unwrap();
        engine.persist(request).await.unwrap();

        // 確定のプッシュが届く前のキャッシュから seed される
        engine.seed(ids(&["A", "B", "C", "D"]), true);
        assert_eq!(engine.order(), ids(&["B", "C", "A", "D"]));
        assert_eq!(engine.awaiting_snapshot_count(), 1);

        engine.seed(ids(&["B", "C", "A", "D"]), true);
        assert_eq!(engine.order(), ids(&["B", "C", "A", "D"]));
        assert_eq!(engine.awaiting_snapshot_count(), 0);

        // 以降の seed ではもう適用し直さない
        engine.seed(ids(&["D", "C", "B", "A"]), true);
        assert_eq!(engine.order(), ids(&["D", "C", "B", "A"]));
    }

    #[tokio::test]
    async fn test_failure_keeps_local_order_by_default() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_reorder()
            .times(1)
            .returning(|_, _, _| Err(AppError::Network("timeout".into())));
        let mut refresher = MockRefresher::new();
        refresher.expect_refresh().times(0);
        let engine = engine_with(gateway, ReorderFailurePolicy::KeepLocal)
            .with_refresher(Arc::new(refresher));
        engine.seed(ids(&["A", "B", "C"]), true);

        engine.start_drag(&id("A"));
        let request = engine.end_drag(&id("C"), DropPosition::After).unwrap();
        let result = engine.persist(request).await;

        assert_eq!(result, Err(AppError::Network("timeout".into())));
        assert_eq!(engine.order(), ids(&["B", "C", "A"]));
    }

    #[tokio::test]
    async fn test_failure_triggers_refetch_when_configured() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_reorder()
            .times(1)
            .returning(|_, _, _| Err(AppError::Network("timeout".into())));
        let mut refresher = MockRefresher::new();
        refresher.expect_refresh().times(1).returning(|| Ok(()));
        let engine = engine_with(gateway, ReorderFailurePolicy::Refetch)
            .with_refresher(Arc::new(refresher));
        engine.seed(ids(&["A", "B"]), true);

        engine.start_drag(&id("A"));
        let request = engine.end_drag(&id("B"), DropPosition::After).unwrap();

        assert!(engine.persist(request).await.is_err());
        assert_eq!(engine.pending_count(), 0);
        assert_eq!(engine.awaiting_snapshot_count(), 0);
    }

    #[test]
    fn test_seed_replays_unconfirmed_moves() {
        let engine = engine_with(MockGateway::new(), ReorderFailurePolicy::KeepLocal);
        engine.seed(ids(&["A", "B", "C", "D"]), true);
        engine.start_drag(&id("A"));
        engine.end_drag(&id("C"), DropPosition::After).unwrap();

        // 永続化前に古い並びのスナップショットが届く
        engine.seed(ids(&["A", "B", "C", "D", "E"]), true);

        assert_eq!(engine.order(), ids(&["B", "C", "A", "D", "E"]));
    }

    #[test]
    fn test_expired_moves_are_not_replayed() {
        let engine = engine_with(MockGateway::new(), ReorderFailurePolicy::KeepLocal)
            .with_pending_ttl(Duration::ZERO);
        engine.seed(ids(&["A", "B", "C"]), true);
        engine.start_drag(&id("A"));
        engine.end_drag(&id("C"), DropPosition::After).unwrap();

        engine.seed(ids(&["A", "B", "C"]), true);

        assert_eq!(engine.order(), ids(&["A", "B", "C"]));
        assert_eq!(engine.pending_count(), 0);
    }

    #[test]
    fn test_seed_during_drag_is_deferred() {
        let engine = engine_with(MockGateway::new(), ReorderFailurePolicy::KeepLocal);
        engine.seed(ids(&["A", "B", "C"]), true);
        engine.start_drag(&id("C"));

        assert!(!engine.seed(ids(&["C", "A", "B", "X"]), true));
        assert_eq!(engine.order(), ids(&["A", "B", "C"]));

        engine.end_drag(&id("A"), DropPosition::Before).unwrap();

        // 保留していた並びに、たった今の移動を重ねる
        assert_eq!(engine.order(), ids(&["C", "A", "B", "X"]));
    }

    #[test]
    fn test_cancel_drag_applies_deferred_seed() {
        let engine = engine_with(MockGateway::new(), ReorderFailurePolicy::KeepLocal);
        engine.seed(ids(&["A", "B"]), true);
        engine.start_drag(&id("A"));
        engine.seed(ids(&["B"]), false);

        engine.cancel_drag();

        assert_eq!(engine.order(), ids(&["B"]));
        assert!(!engine.is_enabled());
    }

    #[tokio::test]
    async fn test_drop_on_persists_in_background() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_reorder()
            .with(eq(id("B")), eq(id("A")), eq(DropPosition::Before))
            .times(1)
            .returning(|_, _, _| Ok(()));
        let engine = engine_with(gateway, ReorderFailurePolicy::KeepLocal);
        engine.seed(ids(&["A", "B"]), true);

        engine.start_drag(&id("B"));
        let handle = engine.drop_on(&id("A"), DropPosition::Before).unwrap();
        assert_eq!(engine.order(), ids(&["B", "A"]));

        handle.await.unwrap().unwrap();
        assert_eq!(engine.pending_count(), 0);
        assert_eq!(engine.awaiting_snapshot_count(), 1);
    }
}
