use crate::domain::entities::{Account, Submission, SubmissionType, TagGroup};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type Compute<R, P> = dyn Fn(&[Arc<R>], &P) -> Vec<Arc<R>> + Send + Sync;

struct Memo<R, P> {
    items: Arc<Vec<Arc<R>>>,
    params: P,
    output: Arc<Vec<Arc<R>>>,
}

/// キャッシュの items から導出したビュー。
///
/// `items` の同一性（Arc のポインタ）とパラメータが前回と同じなら再計算せず、
/// 前回と同じ Arc を返す。利用者ごとに1つ持つ想定で、利用者間では共有しない。
pub struct Projection<R, P> {
    compute: Box<Compute<R, P>>,
    memo: Option<Memo<R, P>>,
    recomputes: u64,
}

impl<R, P> Projection<R, P>
where
    R: Send + Sync + 'static,
    P: Clone + PartialEq,
{
    pub fn new<F>(compute: F) -> Self
    where
        F: Fn(&[Arc<R>], &P) -> Vec<Arc<R>> + Send + Sync + 'static,
    {
        Self {
            compute: Box::new(compute),
            memo: None,
            recomputes: 0,
        }
    }

    pub fn get(&mut self, items: &Arc<Vec<Arc<R>>>, params: &P) -> Arc<Vec<Arc<R>>> {
        if let Some(memo) = &self.memo {
            if Arc::ptr_eq(&memo.items, items) && memo.params == *params {
                return Arc::clone(&memo.output);
            }
        }

        let output = Arc::new((self.compute)(items.as_slice(), params));
        self.recomputes += 1;
        self.memo = Some(Memo {
            items: Arc::clone(items),
            params: params.clone(),
            output: Arc::clone(&output),
        });
        output
    }

    /// 実際に計算し直した回数
    pub fn recomputes(&self) -> u64 {
        self.recomputes
    }

    pub fn invalidate(&mut self) {
        self.memo = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    /// 予約もキュー投入もされていないもの
    Drafts,
    Scheduled,
    /// 投稿済み（アーカイブ済み）
    Posted,
    /// 検証エラーあり
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionQuery {
    pub submission_type: Option<SubmissionType>,
    pub status: StatusFilter,
    pub search: String,
}

impl SubmissionQuery {
    pub fn of_type(submission_type: SubmissionType) -> Self {
        Self {
            submission_type: Some(submission_type),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// 表示順がキャッシュの order 順と一致する時だけ並べ替えを許可する。
    /// 種別フィルタは集合を分けるだけで相対順を崩さないので対象外。
    pub fn allows_reorder(&self) -> bool {
        self.status == StatusFilter::All && self.search.trim().is_empty()
    }

    fn matches_status(&self, submission: &Submission) -> bool {
        match self.status {
            StatusFilter::Posted => submission.is_archived(),
            _ if submission.is_archived() => false,
            StatusFilter::All => true,
            StatusFilter::Drafts => !submission.is_scheduled() && !submission.is_queued(),
            StatusFilter::Scheduled => submission.is_scheduled(),
            StatusFilter::Failed => submission.has_errors(),
        }
    }
}

/// 投稿一覧の既定ビュー。
///
/// テンプレートとマルチ投稿を除き、order 昇順（同値は入力順）に並べてから
/// ステータスとタイトル検索で絞り込む。
pub fn project_submissions(items: &[Arc<Submission>], query: &SubmissionQuery) -> Vec<Arc<Submission>> {
    let needle = normalize_search(&query.search);

    let mut view: Vec<Arc<Submission>> = items
        .iter()
        .filter(|s| !s.is_template() && !s.is_multi_submission())
        .filter(|s| {
            query
                .submission_type
                .is_none_or(|kind| s.submission_type() == kind)
        })
        .cloned()
        .collect();

    view.sort_by(|a, b| a.order().total_cmp(&b.order()));

    view.retain(|s| query.matches_status(s) && contains_folded(s.title(), needle.as_deref()));
    view
}

pub fn submissions_projection() -> Projection<Submission, SubmissionQuery> {
    Projection::new(project_submissions)
}

/// 指定種別のテンプレートをタイトル順（大文字小文字無視）で返す
pub fn project_templates(
    items: &[Arc<Submission>],
    submission_type: &SubmissionType,
) -> Vec<Arc<Submission>> {
    let mut view: Vec<Arc<Submission>> = items
        .iter()
        .filter(|s| s.is_template() && s.submission_type() == *submission_type)
        .cloned()
        .collect();
    view.sort_by_cached_key(|s| s.title().to_lowercase());
    view
}

pub fn templates_projection() -> Projection<Submission, SubmissionType> {
    Projection::new(project_templates)
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountQuery {
    pub website: Option<String>,
    pub logged_in_only: bool,
    pub search: String,
}

pub fn project_accounts(items: &[Arc<Account>], query: &AccountQuery) -> Vec<Arc<Account>> {
    let needle = normalize_search(&query.search);

    let mut view: Vec<Arc<Account>> = items
        .iter()
        .filter(|a| {
            query
                .website
                .as_deref()
                .is_none_or(|website| a.website().eq_ignore_ascii_case(website))
        })
        .filter(|a| !query.logged_in_only || a.is_logged_in())
        .filter(|a| contains_folded(a.display_label(), needle.as_deref()))
        .cloned()
        .collect();

    view.sort_by_cached_key(|a| (a.website().to_lowercase(), a.name().to_lowercase()));
    view
}

pub fn accounts_projection() -> Projection<Account, AccountQuery> {
    Projection::new(project_accounts)
}

/// グループ名かいずれかのタグに検索語を含むものを名前順で返す
pub fn project_tag_groups(items: &[Arc<TagGroup>], search: &String) -> Vec<Arc<TagGroup>> {
    let needle = normalize_search(search);

    let mut view: Vec<Arc<TagGroup>> = items
        .iter()
        .filter(|g| {
            contains_folded(g.name(), needle.as_deref())
                || g.tags().iter().any(|tag| contains_folded(tag, needle.as_deref()))
        })
        .cloned()
        .collect();

    view.sort_by_cached_key(|g| g.name().to_lowercase());
    view
}

pub fn tag_groups_projection() -> Projection<TagGroup, String> {
    Projection::new(project_tag_groups)
}

fn normalize_search(search: &str) -> Option<String> {
    let trimmed = search.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn contains_folded(haystack: &str, needle: Option<&str>) -> bool {
    needle.is_none_or(|needle| haystack.to_lowercase().contains(needle))
}
