use crate::application::ports::{
    CacheRefresher, EntityFetcher, MutationGateway, PushChannel, ReorderGateway,
};
use crate::application::services::{MutationService, ReorderEngine, SubmissionQuery};
use crate::application::{AccountKind, SubmissionKind, TagGroupKind};
use crate::domain::entities::{Record, Submission};
use crate::infrastructure::cache::EntityCache;
use crate::infrastructure::sync::ChangeFeedAdapter;
use crate::infrastructure::transport::InMemoryBackend;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// 外部とのやり取りを担うコラボレーター一式
#[derive(Clone)]
pub struct Collaborators {
    pub submissions: Arc<dyn EntityFetcher<SubmissionKind>>,
    pub accounts: Arc<dyn EntityFetcher<AccountKind>>,
    pub tag_groups: Arc<dyn EntityFetcher<TagGroupKind>>,
    pub push: Arc<dyn PushChannel>,
    pub mutations: Arc<dyn MutationGateway>,
    pub reorder: Arc<dyn ReorderGateway>,
}

impl Collaborators {
    /// 全ポートをプロセス内バックエンドで賄う
    pub fn in_memory(backend: Arc<InMemoryBackend>) -> Self {
        Self {
            submissions: backend.clone(),
            accounts: backend.clone(),
            tag_groups: backend.clone(),
            push: backend.clone(),
            mutations: backend.clone(),
            reorder: backend,
        }
    }
}

/// 起動時ロードの結果。失敗したキャッシュがあっても他には波及させない。
#[derive(Debug, Default)]
pub struct BootstrapReport {
    pub loaded: Vec<&'static str>,
    pub failed: Vec<(&'static str, AppError)>,
}

impl BootstrapReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// アプリケーション全体の状態を管理する構造体
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub submissions: Arc<EntityCache<SubmissionKind>>,
    pub accounts: Arc<EntityCache<AccountKind>>,
    pub tag_groups: Arc<EntityCache<TagGroupKind>>,
    pub submission_mutations: MutationService<SubmissionKind>,
    pub account_mutations: MutationService<AccountKind>,
    pub tag_group_mutations: MutationService<TagGroupKind>,
    pub reorder: ReorderEngine,
    feed: Arc<Mutex<ChangeFeedAdapter>>,
}

impl AppState {
    pub fn new(config: AppConfig, collaborators: Collaborators) -> anyhow::Result<Self> {
        config.validate().map_err(AppError::ConfigurationError)?;

        let submissions = Arc::new(EntityCache::new(collaborators.submissions));
        let accounts = Arc::new(EntityCache::new(collaborators.accounts));
        let tag_groups = Arc::new(EntityCache::new(collaborators.tag_groups));

        let mut feed = ChangeFeedAdapter::new(collaborators.push);
        feed.register(submissions.clone());
        feed.register(accounts.clone());
        feed.register(tag_groups.clone());

        let reorder = ReorderEngine::new(collaborators.reorder, &config.reorder)
            .with_refresher(submissions.clone());

        Ok(Self {
            config: Arc::new(config),
            submissions,
            accounts,
            tag_groups,
            submission_mutations: MutationService::new(collaborators.mutations.clone()),
            account_mutations: MutationService::new(collaborators.mutations.clone()),
            tag_group_mutations: MutationService::new(collaborators.mutations),
            reorder,
            feed: Arc::new(Mutex::new(feed)),
        })
    }

    /// 全キャッシュを並行してロードし、その後プッシュ購読を開始する
    pub async fn bootstrap(&self) -> Result<BootstrapReport, AppError> {
        let caches: [(&'static str, Arc<dyn CacheRefresher>); 3] = [
            (self.submissions.name(), self.submissions.clone()),
            (self.accounts.name(), self.accounts.clone()),
            (self.tag_groups.name(), self.tag_groups.clone()),
        ];

        let results = join_all(caches.iter().map(|(name, cache)| async move {
            (*name, cache.refresh().await)
        }))
        .await;

        let mut report = BootstrapReport::default();
        for (name, result) in results {
            match result {
                Ok(()) => report.loaded.push(name),
                Err(err) => {
                    error!(cache = name, error = %err, "Initial load failed");
                    report.failed.push((name, err));
                }
            }
        }

        self.feed.lock().await.start().await?;
        info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "bootstrap finished"
        );
        Ok(report)
    }

    pub async fn is_feed_running(&self) -> bool {
        self.feed.lock().await.is_running()
    }

    pub async fn shutdown(&self) {
        self.feed.lock().await.stop();
    }

    /// ログアウト時などに全キャッシュを空に戻す
    pub fn clear_all(&self) {
        self.submissions.clear();
        self.accounts.clear();
        self.tag_groups.clear();
        info!("all caches cleared");
    }

    /// 投稿ビューの並びで並べ替えエンジンを差し替える
    pub fn seed_reorder(&self, view: &[Arc<Submission>], query: &SubmissionQuery) -> bool {
        let ids = view.iter().map(|s| s.id().clone()).collect();
        self.reorder.seed(ids, query.allows_reorder())
    }
}
