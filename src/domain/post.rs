//! Wire types for the cnblogs post API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Post type for a regular blog post
pub const POST_TYPE_BLOG: u8 = 1;

/// Access permission flag for a public post
pub const ACCESS_PUBLIC: u32 = 268_435_456;

/// Editor id of the Markdown editor
pub const EDITOR_MARKDOWN: u8 = 5;

/// Payload for `POST /api/posts`.
///
/// The presence of `id` turns the request into an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    /// Existing post id (update only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    pub title: String,
    pub post_body: String,
    pub is_markdown: bool,
    pub is_draft: bool,
    pub is_published: bool,
    pub post_type: u8,
    pub access_permission: u32,
    pub include_in_main_syndication: bool,
    pub display_on_home_page: bool,
    pub is_allow_comments: bool,
    pub tags: Vec<String>,
    pub using_editor_id: u8,

    /// Original publication time, kept as the API formats it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_id: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
}

impl PostPayload {
    /// Payload for a public Markdown post
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        tags: Vec<String>,
        draft: bool,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            post_body: body.into(),
            is_markdown: true,
            is_draft: draft,
            is_published: !draft,
            post_type: POST_TYPE_BLOG,
            access_permission: ACCESS_PUBLIC,
            include_in_main_syndication: true,
            display_on_home_page: true,
            is_allow_comments: true,
            tags,
            using_editor_id: EDITOR_MARKDOWN,
            date_published: None,
            author: None,
            blog_id: None,
            url: None,
        }
    }

    /// Turn this payload into an update of `remote`.
    ///
    /// Copies the remote-authoritative fields so the update does not reset
    /// them. `fallback_id` is used when the fetched post omits its id.
    pub fn update_of(mut self, remote: &RemotePost, fallback_id: u64) -> Self {
        self.id = Some(remote.id.unwrap_or(fallback_id));
        self.date_published = remote.date_published.clone().filter(|d| !d.is_empty());
        self.author = remote.author.clone();
        self.blog_id = remote.blog_id.clone();
        self.url = remote.url.clone();
        self
    }

    /// True when the payload updates an existing post
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }
}

/// Current representation of a post as returned by `GET /api/posts/{id}`.
///
/// Only the fields carried over into updates are read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub date_published: Option<String>,

    #[serde(default)]
    pub author: Option<Value>,

    #[serde(default)]
    pub blog_id: Option<Value>,

    #[serde(default)]
    pub url: Option<Value>,
}

/// Response of a successful save
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PublishedPost {
    pub id: u64,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_payload_shape() {
        let payload = PostPayload::new("Hello", "# Body", vec!["a".to_string()], false);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "title": "Hello",
                "postBody": "# Body",
                "isMarkdown": true,
                "isDraft": false,
                "isPublished": true,
                "postType": 1,
                "accessPermission": 268435456,
                "includeInMainSyndication": true,
                "displayOnHomePage": true,
                "isAllowComments": true,
                "tags": ["a"],
                "usingEditorId": 5
            })
        );
        assert!(!payload.is_update());
    }

    #[test]
    fn test_draft_is_not_published() {
        let payload = PostPayload::new("Draft", "", vec![], true);
        assert!(payload.is_draft);
        assert!(!payload.is_published);
    }

    #[test]
    fn test_update_copies_remote_fields() {
        let remote: RemotePost = serde_json::from_value(json!({
            "id": 42,
            "title": "Old title",
            "datePublished": "2025-11-22T13:15:00.000Z",
            "author": "someone",
            "blogId": 7,
            "url": "//www.cnblogs.com/someone/p/42"
        }))
        .unwrap();

        let payload = PostPayload::new("New title", "body", vec![], false).update_of(&remote, 99);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["id"], 42);
        assert_eq!(value["title"], "New title");
        assert_eq!(value["datePublished"], "2025-11-22T13:15:00.000Z");
        assert_eq!(value["author"], "someone");
        assert_eq!(value["blogId"], 7);
        assert_eq!(value["url"], "//www.cnblogs.com/someone/p/42");
    }

    #[test]
    fn test_update_without_remote_id_uses_requested_id() {
        let payload =
            PostPayload::new("t", "b", vec![], false).update_of(&RemotePost::default(), 42);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["id"], 42);
        assert!(value.get("datePublished").is_none());
        assert!(value.get("blogId").is_none());
    }
}
