use crosspost_sync::application::services::{
    ClickModifiers, SelectionState, StatusFilter, SubmissionQuery, position_for,
    submissions_projection,
};
use crosspost_sync::application::{AccountKind, SubmissionKind, TagGroupKind};
use crosspost_sync::domain::{EntityId, Record};
use crosspost_sync::infrastructure::transport::InMemoryBackend;
use crosspost_sync::{AppConfig, AppState, Collaborators, init_logging};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const EPOCH: &str = "2024-05-01T10:00:00Z";

fn submission(id: &str, title: &str, order: f64, scheduled: bool) -> Value {
    json!({
        "id": id,
        "createdAt": EPOCH,
        "updatedAt": EPOCH,
        "type": "FILE",
        "order": order,
        "isScheduled": scheduled,
        "schedule": if scheduled {
            json!({ "scheduleType": "SINGLE", "scheduledFor": "2024-06-01T09:00:00Z" })
        } else {
            json!({ "scheduleType": "NONE" })
        },
        "options": [{
            "id": format!("{id}-default"),
            "isDefault": true,
            "data": { "title": title },
            "createdAt": EPOCH,
            "updatedAt": EPOCH
        }]
    })
}

fn view_ids<R: Record>(items: &[Arc<R>]) -> Vec<EntityId> {
    items.iter().map(|r| r.id().clone()).collect()
}

fn labels(ids: &[EntityId]) -> String {
    ids.iter().map(EntityId::as_str).collect::<Vec<_>>().join(", ")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config.logging);

    let backend = Arc::new(InMemoryBackend::new(config.feed.channel_buffer));
    backend
        .seed::<SubmissionKind>(json!([
            submission("s1", "Morning sketch", 1.0, false),
            submission("s2", "Evening study", 2.0, false),
            submission("s3", "Commission", 3.0, true),
        ]))
        .await;
    backend
        .seed::<AccountKind>(json!([{
            "id": "a1",
            "createdAt": EPOCH,
            "updatedAt": EPOCH,
            "name": "main",
            "website": "furaffinity",
            "state": { "isLoggedIn": true, "username": "painter" }
        }]))
        .await;
    backend
        .seed::<TagGroupKind>(json!({ "data": [{
            "id": "g1",
            "createdAt": EPOCH,
            "updatedAt": EPOCH,
            "name": "Art",
            "tags": ["sketch", "digital"]
        }] }))
        .await;

    let state = AppState::new(config, Collaborators::in_memory(backend.clone()))?;
    let report = state.bootstrap().await?;
    info!(loaded = ?report.loaded, failed = report.failed.len(), "caches ready");

    let all = SubmissionQuery::default();
    let drafts = all.clone().with_status(StatusFilter::Drafts);
    let mut all_view = submissions_projection();
    let mut drafts_view = submissions_projection();

    let view = all_view.get(&state.submissions.items(), &all);
    info!(order = %labels(&view_ids(&view)), "all submissions");
    info!(
        order = %labels(&view_ids(&drafts_view.get(&state.submissions.items(), &drafts))),
        "drafts"
    );

    let mut selection = SelectionState::new();
    let ids = view_ids(&view);
    if let (Some(first), Some(last)) = (ids.first(), ids.last()) {
        selection.click(first, ClickModifiers::NONE, &ids);
        selection.click(last, ClickModifiers::SHIFT, &ids);
        info!(mode = ?selection.mode(), "range selected");
    }

    state.seed_reorder(&view, &all);
    if let [moved, _, target, ..] = ids.as_slice() {
        if let Some(position) = position_for(&ids, moved, target) {
            state.reorder.start_drag(moved);
            if let Some(handle) = state.reorder.drop_on(target, position) {
                info!(order = %labels(&state.reorder.order()), "local order after drop");
                match handle.await? {
                    Ok(()) => info!("reorder persisted"),
                    Err(err) => warn!(error = %err, "reorder failed"),
                }
            }
        }
    }

    backend
        .publish::<SubmissionKind>(json!([
            submission("s2", "Evening study", 2.0, true),
            submission("s4", "New piece", 0.5, false),
        ]))
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let snapshot = state.submissions.snapshot();
    info!(
        count = snapshot.len(),
        state = ?snapshot.loading_state(),
        "after push"
    );
    let drafts_after = drafts_view.get(snapshot.items(), &drafts);
    info!(order = %labels(&view_ids(&drafts_after)), "drafts after push");

    let live = view_ids(&all_view.get(snapshot.items(), &all));
    selection.retain_visible(&live);
    info!(selected = %labels(&selection.selected_in(&live)), "selection after push");

    state.shutdown().await;
    state.clear_all();
    Ok(())
}
