#![allow(dead_code)]

pub mod fakes;
pub mod fixtures;

use crosspost_sync::application::ports::EntityKind;
use crosspost_sync::infrastructure::cache::{CacheSnapshot, EntityCache};
use std::time::Duration;

/// キャッシュが条件を満たすまで待つ（2秒でタイムアウト）
pub async fn wait_for<K, F>(cache: &EntityCache<K>, mut predicate: F) -> CacheSnapshot<K::Record>
where
    K: EntityKind,
    F: FnMut(&CacheSnapshot<K::Record>) -> bool,
{
    let mut rx = cache.subscribe();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if predicate(&snapshot) {
                    return snapshot.clone();
                }
            }
            if rx.changed().await.is_err() {
                panic!("cache dropped while waiting");
            }
        }
    })
    .await
    .expect("timed out waiting for cache")
}
