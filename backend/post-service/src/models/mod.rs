/// Data models for post-service
///
/// This module defines structures for:
/// - Post: stored post record together with its reaction state
/// - Reaction: a single like/dislike derived for the statistics view
/// - UserIdentity: the part of a user account the feed renders
/// - Request/response payloads shared by services and handlers
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Id carried by a post that has not been stored yet.
pub const UNSET_ID: i64 = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Post,
    Repost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
}

/// Media attached to a post or used as an avatar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub media_type: MediaType,
}

impl Attachment {
    pub fn image(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            media_type: MediaType::Image,
        }
    }
}

/// Reaction a viewer can apply to a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostAction {
    Like,
    Dislike,
    Repost,
}

impl PostAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostAction::Like => "like",
            PostAction::Dislike => "dislike",
            PostAction::Repost => "repost",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

/// Post entity as held by the post store
///
/// `likes` and `dislikes` map a reacting user id to the moment the reaction
/// was recorded; their key sets are the reaction sets. `reposts` maps a
/// reposting user id to the id of the post they reposted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub source_id: Option<i64>,
    pub owner_id: i64,
    pub content: Option<String>,
    pub created: DateTime<Utc>,
    pub likes: HashMap<i64, DateTime<Utc>>,
    pub dislikes: HashMap<i64, DateTime<Utc>>,
    pub reposts: HashMap<i64, i64>,
    pub link: Option<String>,
    pub post_type: PostType,
    pub attachment: Option<Attachment>,
}

impl Post {
    /// An unsaved original post owned by `owner_id`
    pub fn new(owner_id: i64, content: Option<String>) -> Self {
        Self {
            id: UNSET_ID,
            source_id: None,
            owner_id,
            content,
            created: Utc::now(),
            likes: HashMap::new(),
            dislikes: HashMap::new(),
            reposts: HashMap::new(),
            link: None,
            post_type: PostType::Post,
            attachment: None,
        }
    }

    /// An unsaved repost of `source_id`
    pub fn repost_of(owner_id: i64, source_id: i64, content: Option<String>) -> Self {
        Self {
            source_id: Some(source_id),
            post_type: PostType::Repost,
            ..Self::new(owner_id, content)
        }
    }

    pub fn liked_by(&self, user_id: i64) -> bool {
        self.likes.contains_key(&user_id)
    }

    pub fn disliked_by(&self, user_id: i64) -> bool {
        self.dislikes.contains_key(&user_id)
    }

    pub fn reposted_by(&self, user_id: i64) -> bool {
        self.reposts.contains_key(&user_id)
    }
}

/// A single like or dislike, derived from a post's reaction maps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub user_id: i64,
    pub date: DateTime<Utc>,
    pub kind: ReactionKind,
}

/// User as seen by the feed: enough to render an author line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    pub username: String,
    pub avatar: Option<Attachment>,
    pub is_read_only: bool,
}

impl UserIdentity {
    /// Placeholder rendered when an owner cannot be resolved
    pub fn unknown() -> Self {
        Self {
            id: 0,
            username: "unknown".to_string(),
            avatar: None,
            is_read_only: true,
        }
    }
}

/// Create or edit request for a post
///
/// `id == 0` (or an id that matches no stored post) creates a new post;
/// otherwise only `content` of the stored post is replaced.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub id: i64,
    pub content: Option<String>,
    pub link: Option<String>,
    pub attachment_id: Option<String>,
    /// Set to create a repost of an existing post
    pub source_id: Option<i64>,
}

/// Feed entry rendered for one viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub source: Option<Box<PostResponse>>,
    pub owner_id: i64,
    pub owner_name: String,
    pub author: UserIdentity,
    /// Unix timestamp (seconds)
    pub created: i64,
    pub content: Option<String>,
    pub likes: usize,
    pub liked_by_me: bool,
    pub dislikes: usize,
    pub disliked_by_me: bool,
    pub reposts: usize,
    pub reposted_by_me: bool,
    pub link: Option<String>,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub attachment: Option<Attachment>,
}

impl PostResponse {
    pub fn from_post(
        post: &Post,
        source: Option<PostResponse>,
        owner: UserIdentity,
        viewer_id: i64,
    ) -> Self {
        Self {
            id: post.id,
            source: source.map(Box::new),
            owner_id: post.owner_id,
            owner_name: owner.username.clone(),
            author: owner,
            created: post.created.timestamp(),
            content: post.content.clone(),
            likes: post.likes.len(),
            liked_by_me: post.liked_by(viewer_id),
            dislikes: post.dislikes.len(),
            disliked_by_me: post.disliked_by(viewer_id),
            reposts: post.reposts.len(),
            reposted_by_me: post.reposted_by(viewer_id),
            link: post.link.clone(),
            post_type: post.post_type,
            attachment: post.attachment.clone(),
        }
    }
}

/// One row of the reactions view of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticResponse {
    pub user: UserIdentity,
    /// Unix timestamp (milliseconds)
    pub date: i64,
    #[serde(rename = "type")]
    pub kind: ReactionKind,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegistrationRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticationRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticationResponse {
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvatarRequest {
    pub attachment_id: String,
}
