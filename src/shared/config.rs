use serde::{Deserialize, Serialize};

/// 並べ替えの永続化に失敗した時の挙動
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReorderFailurePolicy {
    /// ローカルの並び順をそのまま残す（次のスナップショットで上書きされる）
    #[default]
    KeepLocal,
    /// キャッシュを再取得してサーバーの並び順に戻す
    Refetch,
}

impl ReorderFailurePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keep_local" | "keep-local" | "keep" => Some(Self::KeepLocal),
            "refetch" | "reload" => Some(Self::Refetch),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub reorder: ReorderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedConfig {
    pub channel_buffer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReorderConfig {
    #[serde(default)]
    pub on_failure: ReorderFailurePolicy,
    pub pending_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            reorder: ReorderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { channel_buffer: 64 }
    }
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            on_failure: ReorderFailurePolicy::KeepLocal,
            pending_ttl_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "crosspost_sync=debug,info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー参照関数から設定を組み立てる（テスト用に環境変数を差し替えられる）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(value) = lookup("CROSSPOST_FEED_BUFFER").as_deref().and_then(parse_usize) {
            cfg.feed.channel_buffer = value;
        }
        if let Some(policy) = lookup("CROSSPOST_REORDER_ON_FAILURE")
            .as_deref()
            .and_then(ReorderFailurePolicy::parse)
        {
            cfg.reorder.on_failure = policy;
        }
        if let Some(value) = lookup("CROSSPOST_PENDING_TTL_SECS").as_deref().and_then(parse_u64) {
            cfg.reorder.pending_ttl_secs = value;
        }
        if let Some(filter) = lookup("CROSSPOST_LOG_FILTER") {
            let filter = filter.trim();
            if !filter.is_empty() {
                cfg.logging.filter = filter.to_string();
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.feed.channel_buffer == 0 {
            return Err("Feed channel_buffer must be greater than 0".to_string());
        }
        if self.reorder.pending_ttl_secs == 0 {
            return Err("Reorder pending_ttl_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.reorder.on_failure, ReorderFailurePolicy::KeepLocal);
    }

    #[test]
    fn env_overrides_are_applied() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("CROSSPOST_FEED_BUFFER", "8"),
            ("CROSSPOST_REORDER_ON_FAILURE", "refetch"),
            ("CROSSPOST_PENDING_TTL_SECS", " 5 "),
            ("CROSSPOST_LOG_FILTER", "warn"),
        ]));

        assert_eq!(cfg.feed.channel_buffer, 8);
        assert_eq!(cfg.reorder.on_failure, ReorderFailurePolicy::Refetch);
        assert_eq!(cfg.reorder.pending_ttl_secs, 5);
        assert_eq!(cfg.logging.filter, "warn");
    }

    #[test]
    fn unparseable_values_keep_defaults() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("CROSSPOST_FEED_BUFFER", "lots"),
            ("CROSSPOST_REORDER_ON_FAILURE", "panic"),
            ("CROSSPOST_LOG_FILTER", "   "),
        ]));

        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn zero_values_fail_validation() {
        let mut cfg = AppConfig::default();
        cfg.feed.channel_buffer = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.reorder.pending_ttl_secs = 0;
        assert!(cfg.validate().is_err());
    }
}
