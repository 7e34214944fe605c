use super::record::{Record, RecordMeta};
use crate::domain::value_objects::{EntityId, Schedule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionType {
    File,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostState {
    Running,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionFile {
    pub id: EntityId,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub order: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 投稿先ごとのオプション。`is_default` のものが投稿全体のタイトル等を持つ。
#[derive(Debug, Clone, PartialEq)]
pub struct WebsiteOptions {
    pub id: EntityId,
    pub account_id: Option<EntityId>,
    pub is_default: bool,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub rating: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostAttempt {
    pub id: EntityId,
    pub state: PostState,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationResult {
    pub option_id: Option<EntityId>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Submission を組み立てるための入力一式
#[derive(Debug, Clone)]
pub struct SubmissionParts {
    pub meta: RecordMeta,
    pub submission_type: SubmissionType,
    pub order: f64,
    pub is_scheduled: bool,
    pub schedule: Schedule,
    pub is_template: bool,
    pub is_multi_submission: bool,
    pub is_archived: bool,
    pub queued_at: Option<DateTime<Utc>>,
    pub files: Vec<SubmissionFile>,
    pub options: Vec<WebsiteOptions>,
    pub posts: Vec<PostAttempt>,
    pub validations: Vec<ValidationResult>,
}

/// 投稿エンティティ。
///
/// 派生値（タイトル、エラー有無、代表ファイル、最終更新時刻など）は構築時に一度だけ計算し、
/// 読み出しのたびに走査し直さない。
#[derive(Debug, Clone)]
pub struct Submission {
    meta: RecordMeta,
    submission_type: SubmissionType,
    order: f64,
    is_scheduled: bool,
    schedule: Schedule,
    is_template: bool,
    is_multi_submission: bool,
    is_archived: bool,
    queued_at: Option<DateTime<Utc>>,
    files: Vec<SubmissionFile>,
    options: Vec<WebsiteOptions>,
    posts: Vec<PostAttempt>,
    validations: Vec<ValidationResult>,

    title: String,
    default_option: Option<usize>,
    primary_file: Option<usize>,
    has_errors: bool,
    has_warnings: bool,
    last_modified: DateTime<Utc>,
    last_post_state: Option<PostState>,
}

impl Submission {
    pub fn new(parts: SubmissionParts) -> Self {
        let SubmissionParts {
            meta,
            submission_type,
            order,
            is_scheduled,
            schedule,
            is_template,
            is_multi_submission,
            is_archived,
            queued_at,
            files,
            mut options,
            posts,
            validations,
        } = parts;

        let default_option = normalize_default_option(&mut options);
        let title = default_option
            .and_then(|idx| options[idx].title.as_deref())
            .map(str::trim)
            .unwrap_or_default()
            .to_string();

        let primary_file = files
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.order.total_cmp(&b.order))
            .map(|(idx, _)| idx);

        let has_errors = validations.iter().any(|v| !v.errors.is_empty());
        let has_warnings = validations.iter().any(|v| !v.warnings.is_empty());

        let last_modified = files
            .iter()
            .map(|f| f.updated_at)
            .chain(options.iter().map(|o| o.updated_at))
            .fold(meta.updated_at(), |latest, at| latest.max(at));

        let last_post_state = posts
            .iter()
            .max_by_key(|p| p.created_at)
            .map(|p| p.state);

        Self {
            meta,
            submission_type,
            order,
            is_scheduled,
            schedule,
            is_template,
            is_multi_submission,
            is_archived,
            queued_at,
            files,
            options,
            posts,
            validations,
            title,
            default_option,
            primary_file,
            has_errors,
            has_warnings,
            last_modified,
            last_post_state,
        }
    }

    pub fn submission_type(&self) -> SubmissionType {
        self.submission_type
    }

    pub fn order(&self) -> f64 {
        self.order
    }

    pub fn is_scheduled(&self) -> bool {
        self.is_scheduled
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn is_template(&self) -> bool {
        self.is_template
    }

    pub fn is_multi_submission(&self) -> bool {
        self.is_multi_submission
    }

    pub fn is_archived(&self) -> bool {
        self.is_archived
    }

    pub fn is_queued(&self) -> bool {
        self.queued_at.is_some()
    }

    pub fn queued_at(&self) -> Option<DateTime<Utc>> {
        self.queued_at
    }

    pub fn files(&self) -> &[SubmissionFile] {
        &self.files
    }

    pub fn options(&self) -> &[WebsiteOptions] {
        &self.options
    }

    pub fn posts(&self) -> &[PostAttempt] {
        &self.posts
    }

    pub fn validations(&self) -> &[ValidationResult] {
        &self.validations
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn default_options(&self) -> Option<&WebsiteOptions> {
        self.default_option.map(|idx| &self.options[idx])
    }

    pub fn primary_file(&self) -> Option<&SubmissionFile> {
        self.primary_file.map(|idx| &self.files[idx])
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    pub fn has_warnings(&self) -> bool {
        self.has_warnings
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn last_post_state(&self) -> Option<PostState> {
        self.last_post_state
    }
}

impl Record for Submission {
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

// 既定オプションはちょうど1つ。フラグが無ければ先頭、複数あれば最初のものを採用する。
fn normalize_default_option(options: &mut [WebsiteOptions]) -> Option<usize> {
    if options.is_empty() {
        return None;
    }
    let chosen = options.iter().position(|o| o.is_default).unwrap_or(0);

    for (idx, option) in options.iter_mut().enumerate() {
        option.is_default = idx == chosen;
    }
    Some(chosen)
}
