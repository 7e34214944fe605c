use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 投稿スケジュール。変更は常に新しい値への差し替えで表現する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schedule {
    #[default]
    None,
    Once {
        at: DateTime<Utc>,
    },
    Recurring {
        cron: String,
        next_run: Option<DateTime<Utc>>,
    },
}

impl Schedule {
    pub fn is_none(&self) -> bool {
        matches!(self, Schedule::None)
    }

    /// 次に実行される予定時刻（不明な場合は None）
    pub fn next_run(&self) -> Option<DateTime<Utc>> {
        match self {
            Schedule::None => None,
            Schedule::Once { at } => Some(*at),
            Schedule::Recurring { next_run, .. } => *next_run,
        }
    }
}
