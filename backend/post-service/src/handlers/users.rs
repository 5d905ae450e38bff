/// User handlers - registration, authentication and profile lookups
use crate::db::UserDirectory;
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{
    Attachment, AuthenticationRequest, AuthenticationResponse, AvatarRequest,
    RegistrationRequest,
};
use crate::security::TokenService;
use crate::services::UserLookup;
use actix_web::{web, HttpResponse};
use validator::Validate;

/// POST /api/v1/registration
pub async fn register(
    users: web::Data<UserDirectory>,
    tokens: web::Data<TokenService>,
    req: web::Json<RegistrationRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    let user = users.register(&req.username, &req.password).await?;
    tracing::info!(user_id = user.id, username = %user.username, "user registered");

    let token = tokens.issue(&user)?;
    Ok(HttpResponse::Ok().json(AuthenticationResponse { token }))
}

/// POST /api/v1/authentication
pub async fn authenticate(
    users: web::Data<UserDirectory>,
    tokens: web::Data<TokenService>,
    req: web::Json<AuthenticationRequest>,
) -> Result<HttpResponse> {
    let user = users.authenticate(&req.username, &req.password).await?;
    let token = tokens.issue(&user)?;
    Ok(HttpResponse::Ok().json(AuthenticationResponse { token }))
}

/// GET /api/v1/me
pub async fn get_me(users: web::Data<UserDirectory>, user_id: UserId) -> Result<HttpResponse> {
    let me = users.get_by_id(user_id.0).await?;
    Ok(HttpResponse::Ok().json(me))
}

/// GET /api/v1/me/users/{id}
pub async fn get_user(
    users: web::Data<UserDirectory>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user = users.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// POST /api/v1/me/avatar
pub async fn set_avatar(
    users: web::Data<UserDirectory>,
    user_id: UserId,
    req: web::Json<AvatarRequest>,
) -> Result<HttpResponse> {
    let user = users
        .set_avatar(user_id.0, Attachment::image(req.into_inner().attachment_id))
        .await?;
    Ok(HttpResponse::Ok().json(user))
}
