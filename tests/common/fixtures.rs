use serde_json::{Value, json};

const EPOCH: &str = "2024-05-01T10:00:00Z";

/// 既定オプションにタイトルを持つ投稿の JSON
pub fn submission(id: &str, title: &str, order: f64) -> Value {
    json!({
        "id": id,
        "createdAt": EPOCH,
        "updatedAt": EPOCH,
        "type": "FILE",
        "order": order,
        "options": [{
            "id": format!("{id}-default"),
            "isDefault": true,
            "data": { "title": title, "tags": [] },
            "createdAt": EPOCH,
            "updatedAt": EPOCH
        }]
    })
}

pub fn scheduled_submission(id: &str, title: &str, order: f64) -> Value {
    let mut value = submission(id, title, order);
    value["isScheduled"] = json!(true);
    value["schedule"] = json!({
        "scheduleType": "SINGLE",
        "scheduledFor": "2024-06-01T09:00:00Z"
    });
    value
}

pub fn account(id: &str, name: &str, website: &str) -> Value {
    json!({
        "id": id,
        "createdAt": EPOCH,
        "updatedAt": EPOCH,
        "name": name,
        "website": website,
        "state": { "isLoggedIn": true, "username": name }
    })
}

pub fn tag_group(id: &str, name: &str, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "createdAt": EPOCH,
        "updatedAt": EPOCH,
        "name": name,
        "tags": tags
    })
}
