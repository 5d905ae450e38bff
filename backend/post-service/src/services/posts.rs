/// Post service - assembles viewer-specific feed entries from stored posts
///
/// Reads go through the store (one lock acquisition per call), then owners
/// and repost sources are resolved in batches and every post is rendered for
/// the requesting viewer. No store lock is held while users are resolved.
use crate::db::PostStore;
use crate::error::{AppError, Result};
use crate::metrics::feed::{
    FEED_PAGE_SIZE, FEED_REQUEST_TOTAL, POST_REACTION_TOTAL, POST_STORE_SIZE,
};
use crate::middleware::check_post_update;
use crate::models::{
    Attachment, Post, PostAction, PostRequest, PostResponse, StatisticResponse, UserIdentity,
    UNSET_ID,
};
use crate::services::users::UserLookup;
use std::collections::HashMap;
use std::sync::Arc;

pub struct PostService {
    store: Arc<dyn PostStore>,
    users: Arc<dyn UserLookup>,
    result_size: usize,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>, users: Arc<dyn UserLookup>, result_size: usize) -> Self {
        Self {
            store,
            users,
            result_size,
        }
    }

    pub fn result_size(&self) -> usize {
        self.result_size
    }

    /// Every post, most recent first
    pub async fn list_all(&self, viewer_id: i64) -> Result<Vec<PostResponse>> {
        let posts = self.store.list_all().await;
        self.render_page("all", posts, viewer_id).await
    }

    /// The newest `result_size` posts
    pub async fn list_recent(&self, viewer_id: i64) -> Result<Vec<PostResponse>> {
        let posts = self.window(|_| true).await;
        self.render_page("recent", posts, viewer_id).await
    }

    /// Up to `result_size` posts older than `id`, most recent first
    pub async fn list_before(&self, id: i64, viewer_id: i64) -> Result<Vec<PostResponse>> {
        let posts = self.window(|post| post.id < id).await;
        self.render_page("before", posts, viewer_id).await
    }

    /// Up to `result_size` posts newer than `id`, most recent first
    pub async fn list_after(&self, id: i64, viewer_id: i64) -> Result<Vec<PostResponse>> {
        let posts = self.window(|post| post.id > id).await;
        self.render_page("after", posts, viewer_id).await
    }

    /// Posts written by `owner_id`, rendered for `viewer_id`
    pub async fn list_by_owner(&self, owner_id: i64, viewer_id: i64) -> Result<Vec<PostResponse>> {
        let posts = self.store.list_by_owner(owner_id).await;
        self.render_page("owner", posts, viewer_id).await
    }

    pub async fn get_one(&self, id: i64, viewer_id: i64) -> Result<PostResponse> {
        FEED_REQUEST_TOTAL.with_label_values(&["one"]).inc();

        let post = self
            .store
            .get_by_id(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("post {}", id)))?;
        self.assemble_one(post, viewer_id).await
    }

    /// Create a post, or edit the content of a post `viewer_id` owns
    ///
    /// The returned entry never carries a resolved repost source.
    pub async fn save(&self, request: PostRequest, viewer_id: i64) -> Result<PostResponse> {
        let existing = if request.id != UNSET_ID {
            self.store.get_by_id(request.id).await
        } else {
            None
        };

        // Check-then-write is not atomic; a concurrent delete turns the edit into an insert.
        if let Some(existing) = &existing {
            check_post_update(viewer_id, existing)?;
        } else if let Some(source_id) = request.source_id {
            if self.store.get_by_id(source_id).await.is_none() {
                return Err(AppError::NotFound(format!("source post {}", source_id)));
            }
        }

        let candidate = Self::candidate_from(request, viewer_id);
        let post = self.store.save(candidate).await;

        if existing.is_some() {
            tracing::info!(post_id = post.id, user_id = viewer_id, "post content updated");
        } else {
            tracing::info!(post_id = post.id, user_id = viewer_id, post_type = ?post.post_type, "post created");
            self.refresh_store_size().await;
        }

        let owners = self.resolve_owners(&[post.owner_id]).await?;
        Ok(render(&post, None, &owners, viewer_id))
    }

    /// Delete a post owned by `viewer_id`; anything else is silently ignored
    pub async fn remove_by_id(&self, id: i64, viewer_id: i64) {
        self.store.remove_by_id_and_owner(id, viewer_id).await;
        tracing::debug!(post_id = id, user_id = viewer_id, "post removal requested");
        self.refresh_store_size().await;
    }

    pub async fn react(&self, id: i64, viewer_id: i64, action: PostAction) -> Result<PostResponse> {
        let post = self
            .store
            .react(id, viewer_id, action)
            .await
            .ok_or_else(|| AppError::NotFound(format!("post {}", id)))?;

        POST_REACTION_TOTAL
            .with_label_values(&[action.as_str()])
            .inc();
        tracing::debug!(post_id = id, user_id = viewer_id, kind = action.as_str(), "reaction applied");

        self.assemble_one(post, viewer_id).await
    }

    /// Likes and dislikes of a post with reactor identities resolved
    ///
    /// Empty when the post does not exist.
    pub async fn statistics_for(&self, id: i64) -> Result<Vec<StatisticResponse>> {
        let reactions = self.store.statistics_for(id).await;
        let user_ids: Vec<i64> = reactions.iter().map(|r| r.user_id).collect();
        let users = self.resolve_owners(&user_ids).await?;

        Ok(reactions
            .into_iter()
            .map(|reaction| StatisticResponse {
                user: users
                    .get(&reaction.user_id)
                    .cloned()
                    .unwrap_or_else(UserIdentity::unknown),
                date: reaction.date.timestamp_millis(),
                kind: reaction.kind,
            })
            .collect())
    }

    /// Most-recent-first posts passing `keep`, capped at `result_size`
    async fn window(&self, keep: impl Fn(&Post) -> bool) -> Vec<Post> {
        self.store
            .list_all()
            .await
            .into_iter()
            .filter(|post| keep(post))
            .take(self.result_size)
            .collect()
    }

    async fn render_page(
        &self,
        endpoint: &str,
        posts: Vec<Post>,
        viewer_id: i64,
    ) -> Result<Vec<PostResponse>> {
        FEED_REQUEST_TOTAL.with_label_values(&[endpoint]).inc();
        FEED_PAGE_SIZE
            .with_label_values(&[endpoint])
            .observe(posts.len() as f64);

        self.assemble(&posts, viewer_id).await
    }

    async fn assemble_one(&self, post: Post, viewer_id: i64) -> Result<PostResponse> {
        let mut rendered = self.assemble(std::slice::from_ref(&post), viewer_id).await?;
        rendered
            .pop()
            .ok_or_else(|| AppError::Internal(format!("post {} was not rendered", post.id)))
    }

    /// Render `posts` in order, resolving one level of repost sources and all
    /// owners with a single user lookup
    async fn assemble(&self, posts: &[Post], viewer_id: i64) -> Result<Vec<PostResponse>> {
        let source_ids: Vec<i64> = posts.iter().filter_map(|post| post.source_id).collect();
        let sources = if source_ids.is_empty() {
            Vec::new()
        } else {
            self.store.get_by_ids(&source_ids).await
        };

        let owner_ids: Vec<i64> = posts
            .iter()
            .chain(sources.iter())
            .map(|post| post.owner_id)
            .collect();
        let owners = self.resolve_owners(&owner_ids).await?;

        let rendered_sources: HashMap<i64, PostResponse> = sources
            .iter()
            .map(|source| (source.id, render(source, None, &owners, viewer_id)))
            .collect();

        Ok(posts
            .iter()
            .map(|post| {
                let source = post
                    .source_id
                    .and_then(|id| rendered_sources.get(&id).cloned());
                render(post, source, &owners, viewer_id)
            })
            .collect())
    }

    async fn resolve_owners(&self, ids: &[i64]) -> Result<HashMap<i64, UserIdentity>> {
        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = self.users.get_by_ids(&ids).await?;
        if users.len() < ids.len() {
            tracing::debug!(
                requested = ids.len(),
                resolved = users.len(),
                "some users could not be resolved"
            );
        }
        Ok(users.into_iter().map(|user| (user.id, user)).collect())
    }

    async fn refresh_store_size(&self) {
        POST_STORE_SIZE.set(self.store.len().await as i64);
    }

    fn candidate_from(request: PostRequest, owner_id: i64) -> Post {
        let mut post = match request.source_id {
            Some(source_id) => Post::repost_of(owner_id, source_id, request.content),
            None => Post::new(owner_id, request.content),
        };
        post.id = request.id;
        post.link = request.link;
        post.attachment = request.attachment_id.map(Attachment::image);
        post
    }
}

fn render(
    post: &Post,
    source: Option<PostResponse>,
    owners: &HashMap<i64, UserIdentity>,
    viewer_id: i64,
) -> PostResponse {
    let owner = owners
        .get(&post.owner_id)
        .cloned()
        .unwrap_or_else(UserIdentity::unknown);
    PostResponse::from_post(post, source, owner, viewer_id)
}
