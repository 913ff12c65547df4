//! Types for responses from the backend to the admin panel.

use crate::timestamp;
pub use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error body returned by the backend.
///
/// Validation failures carry per-field messages in `errors`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[serde(default)]
    pub message: Option<String>,
    /// Set instead of `message` by the framework's own validation responses.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl Error {
    pub fn summary(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.title.as_deref())
            .filter(|message| !message.trim().is_empty())
    }
}

/// The usual response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default = "succeeded_by_default", alias = "success")]
    pub succeeded: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

fn succeeded_by_default() -> bool {
    true
}

/// Not every endpoint wraps its payload in an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Wrapped(Envelope<T>),
    Bare(T),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            page_number: 1,
            page_size: 0,
            total_records: 0,
            total_pages: 0,
        }
    }
}

/// Body of `POST /Account/authenticate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authenticate {
    #[serde(default, alias = "succeeded")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<AuthenticatedUser>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: String,
    pub user_name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub jw_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub post_count: i64,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub children: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub view_count: i64,
    pub is_published: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub category_id: String,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tech_stacks: Vec<String>,
    #[serde(default)]
    pub live_demo_url: Option<String>,
    #[serde(default)]
    pub source_code_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(with = "timestamp")]
    pub start_date: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(with = "timestamp")]
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub donor_name: String,
    pub amount: f64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub payment_method: String,
    pub is_confirmed: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Result of `POST /Files/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn payload_accepts_wrapped_and_bare_bodies() {
        let wrapped = r#"{"succeeded":true,"message":"","data":{"url":"https://img/a.png"}}"#;
        let bare = r#"{"url":"https://img/b.png"}"#;

        match serde_json::from_str::<Payload<UploadedFile>>(wrapped).unwrap() {
            Payload::Wrapped(envelope) => assert_eq!(envelope.data.url, "https://img/a.png"),
            Payload::Bare(_) => panic!("expected an envelope"),
        }
        match serde_json::from_str::<Payload<UploadedFile>>(bare).unwrap() {
            Payload::Bare(file) => assert_eq!(file.url, "https://img/b.png"),
            Payload::Wrapped(_) => panic!("expected a bare body"),
        }
    }

    #[test]
    fn category_tree_deserializes() {
        let json = r#"{
            "id": "1", "name": "Tech", "slug": "tech", "postCount": 3,
            "createdAt": "2024-01-02T03:04:05",
            "children": [
                {"id": "2", "name": "Rust", "slug": "rust", "postCount": 1,
                 "createdAt": "2024-01-02T03:04:05Z", "parentId": "1"}
            ]
        }"#;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.children.len(), 1);
        assert_eq!(category.children[0].parent_id.as_deref(), Some("1"));
        assert!(category.description.is_none());
    }

    #[test]
    fn authenticate_reads_jw_token() {
        let json = r#"{"success":true,"message":"ok","data":{
            "id":"u1","userName":"admin","email":"a@b.c","roles":["Admin"],"jwToken":"t0k"}}"#;
        let auth: Authenticate = serde_json::from_str(json).unwrap();
        assert!(auth.success);
        assert_eq!(auth.data.unwrap().jw_token, "t0k");
    }
}
