/// HTTP handlers for post-service endpoints
///
/// This module contains handlers for:
/// - Posts: feed pages, single posts, create/edit/delete, reactions
/// - Users: registration, authentication, profile lookups
pub mod posts;
pub mod users;

use crate::error::AppError;
use crate::middleware::{JwtAuthMiddleware, MetricsMiddleware};
use actix_web::web;

/// Register the `/api/v1` routes
///
/// Expects `web::Data<PostService>`, `web::Data<UserDirectory>` and
/// `web::Data<TokenService>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api/v1")
            .wrap(MetricsMiddleware)
            .route("/registration", web::post().to(users::register))
            .route("/authentication", web::post().to(users::authenticate))
            .service(
                web::scope("")
                    .wrap(JwtAuthMiddleware)
                    .service(
                        web::scope("/me")
                            .route("", web::get().to(users::get_me))
                            .route("/users/{id}", web::get().to(users::get_user))
                            .route("/avatar", web::post().to(users::set_avatar)),
                    )
                    .service(
                        web::scope("/posts")
                            .service(
                                web::resource("")
                                    .route(web::get().to(posts::list_posts))
                                    .route(web::post().to(posts::save_post)),
                            )
                            .route("/recent", web::get().to(posts::list_recent))
                            .route("/before/{id}", web::get().to(posts::list_before))
                            .route("/after/{id}", web::get().to(posts::list_after))
                            .route("/user/{id}", web::get().to(posts::list_user_posts))
                            .route(
                                "/reactions/{id}",
                                web::get().to(posts::get_post_reactions),
                            )
                            .service(
                                web::resource("/{id}")
                                    .route(web::get().to(posts::get_post))
                                    .route(web::delete().to(posts::delete_post)),
                            )
                            .service(
                                web::resource("/{id}/likes")
                                    .route(web::post().to(posts::like_post))
                                    .route(web::delete().to(posts::unlike_post)),
                            )
                            .route("/{id}/dislikes", web::post().to(posts::dislike_post))
                            .route("/{id}/reposts", web::post().to(posts::repost_post)),
                    ),
            ),
    );
}
