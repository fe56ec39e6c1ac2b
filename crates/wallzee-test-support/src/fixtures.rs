//! Raw documents shaped like backend responses.

use serde_json::{Value, json};

/// Wallpaper document with a stored file id of `file-{id}`.
#[must_use]
pub fn wallpaper_doc(id: &str, title: &str, device: &str, created_at: &str) -> Value {
    json!({
        "$id": id,
        "$createdAt": created_at,
        "title": title,
        "category": device,
        "imageId": format!("file-{id}"),
        "downloads": 0,
        "featured": false,
    })
}

/// Wallpaper document referencing a category.
#[must_use]
pub fn categorized_wallpaper_doc(id: &str, device: &str, category_id: &str, created_at: &str) -> Value {
    let mut doc = wallpaper_doc(id, id, device, created_at);
    doc["categoryId"] = Value::from(category_id);
    doc
}

/// Category document.
#[must_use]
pub fn category_doc(id: &str, name: &str) -> Value {
    json!({
        "$id": id,
        "name": name,
        "description": "",
        "icon": "",
    })
}

/// User profile document.
#[must_use]
pub fn user_doc(id: &str, email: &str, is_admin: bool, created_at: &str) -> Value {
    json!({
        "$id": id,
        "$createdAt": created_at,
        "name": email.split('@').next().unwrap_or_default(),
        "email": email,
        "isAdmin": is_admin,
        "createdAt": created_at,
    })
}

/// Account document as returned for the active session.
#[must_use]
pub fn account_doc(id: &str, email: &str, labels: &[&str]) -> Value {
    json!({
        "$id": id,
        "name": email.split('@').next().unwrap_or_default(),
        "email": email,
        "labels": labels,
    })
}

/// Document list envelope.
#[must_use]
pub fn document_list(documents: Vec<Value>) -> Value {
    json!({
        "total": documents.len(),
        "documents": documents,
    })
}

/// Backend error body.
#[must_use]
pub fn error_body(code: u16, kind: &str, message: &str) -> Value {
    json!({
        "message": message,
        "code": code,
        "type": kind,
    })
}
