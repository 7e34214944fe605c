use crate::application::ports::PushChannel;
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tracing::trace;

/// プロセス内の名前付きチャネル配信ハブ。
///
/// チャネルごとに購読者へ順番通りに配信する。閉じた購読者は publish 時に取り除く。
#[derive(Clone)]
pub struct InMemoryPushChannel {
    buffer: usize,
    subscribers: Arc<RwLock<HashMap<String, Vec<mpsc::Sender<Value>>>>>,
}

impl InMemoryPushChannel {
    pub fn new(buffer: usize) -> Self {
        Self {
            buffer: buffer.max(1),
            subscribers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 購読者へ配信し、届いた購読者数を返す
    pub async fn publish(&self, channel: &str, payload: Value) -> usize {
        let senders = {
            let subscribers = self.subscribers.read().await;
            match subscribers.get(channel) {
                Some(senders) if !senders.is_empty() => senders.clone(),
                _ => {
                    trace!(channel, "no subscribers for push");
                    return 0;
                }
            }
        };

        let mut delivered = 0;
        let mut saw_closed = false;
        for sender in &senders {
            match sender.try_send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(pending)) => {
                    if sender.send(pending).await.is_ok() {
                        delivered += 1;
                    } else {
                        saw_closed = true;
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => saw_closed = true,
            }
        }

        if saw_closed {
            let mut subscribers = self.subscribers.write().await;
            if let Some(senders) = subscribers.get_mut(channel) {
                senders.retain(|sender| !sender.is_closed());
            }
        }

        delivered
    }

    pub async fn subscriber_count(&self, channel: &str) -> usize {
        let subscribers = self.subscribers.read().await;
        subscribers
            .get(channel)
            .map(|senders| senders.iter().filter(|s| !s.is_closed()).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl PushChannel for InMemoryPushChannel {
    async fn subscribe(&self, channel: &str) -> Result<mpsc::Receiver<Value>, AppError> {
        if channel.trim().is_empty() {
            return Err(AppError::InvalidInput("Channel name is required".to_string()));
        }
        let (tx, rx) = mpsc::channel(self.buffer);
        let mut subscribers = self.subscribers.write().await;
        subscribers.entry(channel.to_string()).or_default().push(tx);
        Ok(rx)
    }
}
