/// In-memory post store
///
/// All posts and their reaction state live in one id-keyed map guarded by a
/// single async mutex. Every operation takes the lock once, does its work and
/// releases it before returning, so callers never observe a half-applied
/// update. Nothing here calls out to other components while the lock is held.
///
/// The store raises no domain errors: a missing post is `None` or an empty
/// list, and the caller decides what that means.
use crate::models::{Post, PostAction, Reaction, ReactionKind};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;

/// Storage operations the feed is built on
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Every post, most recent first
    async fn list_all(&self) -> Vec<Post>;

    async fn get_by_id(&self, id: i64) -> Option<Post>;

    /// Posts matching `ids`; duplicates collapse, unknown ids are skipped
    async fn get_by_ids(&self, ids: &[i64]) -> Vec<Post>;

    /// Posts owned by `owner_id`, most recent first
    async fn list_by_owner(&self, owner_id: i64) -> Vec<Post>;

    /// Insert `candidate` under a fresh id, or replace only the content of the
    /// stored post carrying `candidate.id`
    async fn save(&self, candidate: Post) -> Post;

    /// Remove the post when both id and owner match; otherwise do nothing
    async fn remove_by_id_and_owner(&self, id: i64, owner_id: i64);

    async fn react(&self, id: i64, user_id: i64, action: PostAction) -> Option<Post>;

    /// Likes followed by dislikes; empty when the post does not exist
    async fn statistics_for(&self, post_id: i64) -> Vec<Reaction>;

    async fn len(&self) -> usize;
}

/// How a like and a dislike from the same user interact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReactionPolicy {
    /// Likes and dislikes accumulate independently; a user may hold both
    #[default]
    Additive,
    /// A like removes the user's dislike and a dislike removes their like
    Exclusive,
}

impl ReactionPolicy {
    pub fn from_flag(exclusive: bool) -> Self {
        if exclusive {
            ReactionPolicy::Exclusive
        } else {
            ReactionPolicy::Additive
        }
    }
}

#[derive(Default)]
struct PostTable {
    /// Highest id ever handed out; never decreases
    last_id: i64,
    items: BTreeMap<i64, Post>,
}

pub struct InMemoryPostStore {
    table: Mutex<PostTable>,
    policy: ReactionPolicy,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::with_policy(ReactionPolicy::default())
    }

    pub fn with_policy(policy: ReactionPolicy) -> Self {
        Self {
            table: Mutex::new(PostTable::default()),
            policy,
        }
    }

    pub fn policy(&self) -> ReactionPolicy {
        self.policy
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn list_all(&self) -> Vec<Post> {
        let table = self.table.lock().await;
        table.items.values().rev().cloned().collect()
    }

    async fn get_by_id(&self, id: i64) -> Option<Post> {
        let table = self.table.lock().await;
        table.items.get(&id).cloned()
    }

    async fn get_by_ids(&self, ids: &[i64]) -> Vec<Post> {
        let wanted: BTreeSet<i64> = ids.iter().copied().collect();
        let table = self.table.lock().await;
        wanted
            .into_iter()
            .filter_map(|id| table.items.get(&id).cloned())
            .collect()
    }

    async fn list_by_owner(&self, owner_id: i64) -> Vec<Post> {
        let table = self.table.lock().await;
        table
            .items
            .values()
            .rev()
            .filter(|post| post.owner_id == owner_id)
            .cloned()
            .collect()
    }

    async fn save(&self, candidate: Post) -> Post {
        let mut table = self.table.lock().await;

        if let Some(existing) = table.items.get_mut(&candidate.id) {
            existing.content = candidate.content;
            return existing.clone();
        }

        table.last_id += 1;
        let post = Post {
            id: table.last_id,
            ..candidate
        };
        table.items.insert(post.id, post.clone());
        post
    }

    async fn remove_by_id_and_owner(&self, id: i64, owner_id: i64) {
        let mut table = self.table.lock().await;
        let owned = table
            .items
            .get(&id)
            .map(|post| post.owner_id == owner_id)
            .unwrap_or(false);
        if owned {
            table.items.remove(&id);
        }
    }

    async fn react(&self, id: i64, user_id: i64, action: PostAction) -> Option<Post> {
        let mut table = self.table.lock().await;
        let post = table.items.get_mut(&id)?;
        let now = Utc::now();

        match action {
            PostAction::Like => {
                post.likes.entry(user_id).or_insert(now);
                if self.policy == ReactionPolicy::Exclusive {
                    post.dislikes.remove(&user_id);
                }
            }
            PostAction::Dislike => {
                post.dislikes.entry(user_id).or_insert(now);
                if self.policy == ReactionPolicy::Exclusive {
                    post.likes.remove(&user_id);
                }
            }
            // The reposting user is not recorded; a repost only re-reads the post.
            PostAction::Repost => {}
        }

        Some(post.clone())
    }

    async fn statistics_for(&self, post_id: i64) -> Vec<Reaction> {
        let table = self.table.lock().await;
        let Some(post) = table.items.get(&post_id) else {
            return Vec::new();
        };

        let mut likes: Vec<Reaction> = post
            .likes
            .iter()
            .map(|(user_id, date)| Reaction {
                user_id: *user_id,
                date: *date,
                kind: ReactionKind::Like,
            })
            .collect();
        let mut dislikes: Vec<Reaction> = post
            .dislikes
            .iter()
            .map(|(user_id, date)| Reaction {
                user_id: *user_id,
                date: *date,
                kind: ReactionKind::Dislike,
            })
            .collect();

        likes.sort_by_key(|r| (r.date, r.user_id));
        dislikes.sort_by_key(|r| (r.date, r.user_id));
        likes.extend(dislikes);
        likes
    }

    async fn len(&self) -> usize {
        self.table.lock().await.items.len()
    }
}
