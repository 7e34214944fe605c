use super::record::{Record, RecordMeta};
use crate::domain::value_objects::EntityId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountLoginState {
    pub is_logged_in: bool,
    pub pending: bool,
    pub username: Option<String>,
}

/// 投稿先サイトのアカウント
#[derive(Debug, Clone)]
pub struct Account {
    meta: RecordMeta,
    name: String,
    website: String,
    groups: Vec<String>,
    login: AccountLoginState,
    display_label: String,
}

impl Account {
    pub fn new(
        meta: RecordMeta,
        name: String,
        website: String,
        groups: Vec<String>,
        login: AccountLoginState,
    ) -> Self {
        let display_label = match login.username.as_deref().map(str::trim) {
            Some(username) if !username.is_empty() => format!("{name} ({username})"),
            _ => name.clone(),
        };

        Self {
            meta,
            name,
            website,
            groups,
            login,
            display_label,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn website(&self) -> &str {
        &self.website
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn login(&self) -> &AccountLoginState {
        &self.login
    }

    pub fn is_logged_in(&self) -> bool {
        self.login.is_logged_in
    }

    pub fn display_label(&self) -> &str {
        &self.display_label
    }
}

impl Record for Account {
    fn id(&self) -> &EntityId {
        self.meta.id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.meta.created_at()
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.meta.updated_at()
    }
}
