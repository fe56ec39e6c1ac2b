//! REST paths relative to the API endpoint.

/// Collection documents: `/databases/{db}/collections/{collection}/documents`.
#[must_use]
pub fn documents(database: &str, collection: &str) -> String {
    format!("/databases/{database}/collections/{collection}/documents")
}

/// One document.
#[must_use]
pub fn document(database: &str, collection: &str, id: &str) -> String {
    format!("{}/{id}", documents(database, collection))
}

/// Bucket files: `/storage/buckets/{bucket}/files`.
#[must_use]
pub fn files(bucket: &str) -> String {
    format!("/storage/buckets/{bucket}/files")
}

/// One file.
#[must_use]
pub fn file(bucket: &str, id: &str) -> String {
    format!("{}/{id}", files(bucket))
}

/// Resized preview of a file.
#[must_use]
pub fn file_preview(bucket: &str, id: &str) -> String {
    format!("{}/preview", file(bucket, id))
}

/// Original bytes with an attachment disposition.
#[must_use]
pub fn file_download(bucket: &str, id: &str) -> String {
    format!("{}/download", file(bucket, id))
}

/// Original bytes with an inline disposition.
#[must_use]
pub fn file_view(bucket: &str, id: &str) -> String {
    format!("{}/view", file(bucket, id))
}

/// Current account.
pub const ACCOUNT: &str = "/account";
/// Email/password session creation.
pub const EMAIL_SESSION: &str = "/account/sessions/email";
/// Active session.
pub const CURRENT_SESSION: &str = "/account/sessions/current";
/// Password change.
pub const ACCOUNT_PASSWORD: &str = "/account/password";

/// Server-side user.
#[must_use]
pub fn user(id: &str) -> String {
    format!("/users/{id}")
}

/// Server-side user labels.
#[must_use]
pub fn user_labels(id: &str) -> String {
    format!("{}/labels", user(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_paths() {
        assert_eq!(
            document("db", "walls", "w1"),
            "/databases/db/collections/walls/documents/w1"
        );
        assert_eq!(file_preview("b", "f"), "/storage/buckets/b/files/f/preview");
        assert_eq!(user_labels("u"), "/users/u/labels");
    }
}
