/// Post handlers - HTTP endpoints for feed reads, post edits and reactions
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{PostAction, PostRequest};
use crate::services::PostService;
use actix_web::{web, HttpResponse};

/// GET /api/v1/posts
pub async fn list_posts(
    service: web::Data<PostService>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let posts = service.list_all(user_id.0).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/v1/posts/recent
pub async fn list_recent(
    service: web::Data<PostService>,
    user_id: UserId,
) -> Result<HttpResponse> {
    let posts = service.list_recent(user_id.0).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/v1/posts/before/{id}
pub async fn list_before(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let posts = service.list_before(*post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/v1/posts/after/{id}
pub async fn list_after(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let posts = service.list_after(*post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/v1/posts/user/{id}
pub async fn list_user_posts(
    service: web::Data<PostService>,
    user_id: UserId,
    owner_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let posts = service.list_by_owner(*owner_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let post = service.get_one(*post_id, user_id.0).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/v1/posts
pub async fn save_post(
    service: web::Data<PostService>,
    user_id: UserId,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    let post = service.save(req.into_inner(), user_id.0).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    service.remove_by_id(*post_id, user_id.0).await;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/v1/posts/{id}/likes
pub async fn like_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    react(service, user_id, *post_id, PostAction::Like).await
}

/// DELETE /api/v1/posts/{id}/likes
///
/// Records a dislike; there is no operation that withdraws a like.
pub async fn unlike_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    react(service, user_id, *post_id, PostAction::Dislike).await
}

/// POST /api/v1/posts/{id}/dislikes
pub async fn dislike_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    react(service, user_id, *post_id, PostAction::Dislike).await
}

/// POST /api/v1/posts/{id}/reposts
pub async fn repost_post(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    react(service, user_id, *post_id, PostAction::Repost).await
}

/// GET /api/v1/posts/reactions/{id}
pub async fn get_post_reactions(
    service: web::Data<PostService>,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let reactions = service.statistics_for(*post_id).await?;
    Ok(HttpResponse::Ok().json(reactions))
}

async fn react(
    service: web::Data<PostService>,
    user_id: UserId,
    post_id: i64,
    action: PostAction,
) -> Result<HttpResponse> {
    let post = service.react(post_id, user_id.0, action).await?;
    Ok(HttpResponse::Ok().json(post))
}
