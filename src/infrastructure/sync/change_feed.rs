use crate::application::ports::{PushChannel, SnapshotSink};
use crate::shared::error::AppError;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// プッシュチャネルの購読とキャッシュ差し替えを仲介する。
///
/// エンティティ種別ごとに1チャネルを購読し、届いたスナップショットを対応するキャッシュへ
/// 丸ごと反映する。同じチャネルで連続して届いた場合、観測できるのは最後の1件の効果だけになる。
pub struct ChangeFeedAdapter {
    push: Arc<dyn PushChannel>,
    sinks: Vec<Arc<dyn SnapshotSink>>,
    tasks: Vec<JoinHandle<()>>,
}

impl ChangeFeedAdapter {
    pub fn new(push: Arc<dyn PushChannel>) -> Self {
        Self {
            push,
            sinks: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// キャッシュを登録（start 前に呼ぶ）
    pub fn register(&mut self, sink: Arc<dyn SnapshotSink>) {
        self.sinks.push(sink);
    }

    pub fn channels(&self) -> Vec<String> {
        self.sinks.iter().map(|s| s.channel().to_string()).collect()
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }

    /// 登録済みの全チャネルを購読し、受信タスクを起動する
    pub async fn start(&mut self) -> Result<(), AppError> {
        if !self.tasks.is_empty() {
            debug!("change feed already started");
            return Ok(());
        }

        let mut tasks: Vec<JoinHandle<()>> = Vec::with_capacity(self.sinks.len());
        for sink in &self.sinks {
            let channel = sink.channel().to_string();
            let mut receiver = match self.push.subscribe(&channel).await {
                Ok(receiver) => receiver,
                Err(err) => {
                    for task in &tasks {
                        task.abort();
                    }
                    return Err(err);
                }
            };

            let sink = Arc::clone(sink);
            tasks.push(tokio::spawn(async move {
                while let Some(payload) = receiver.recv().await {
                    match sink.apply_payload(payload) {
                        Ok(count) => debug!(channel = %channel, count, "snapshot applied"),
                        Err(err) => {
                            error!(channel = %channel, error = %err, "dropping undecodable snapshot")
                        }
                    }
                }
                debug!(channel = %channel, "push channel closed");
            }));
        }

        info!(channels = tasks.len(), "change feed started");
        self.tasks = tasks;
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
        info!("change feed stopped");
    }
}

impl Drop for ChangeFeedAdapter {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
