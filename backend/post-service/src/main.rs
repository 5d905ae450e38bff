use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use chrono::Utc;
use post_service::db::{InMemoryPostStore, PostStore, ReactionPolicy, UserDirectory};
use post_service::handlers;
use post_service::security::TokenService;
use post_service::services::PostService;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    store: Arc<InMemoryPostStore>,
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "post-service",
        "version": env!("CARGO_PKG_VERSION"),
        "posts": state.store.len().await,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
        }
    }
}

/// Post Service
///
/// Serves the Nova social feed from a single-process, in-memory store.
///
/// # Routes
///
/// - `/api/v1/registration`, `/api/v1/authentication` - account bootstrap
/// - `/api/v1/me/*` - profile lookups
/// - `/api/v1/posts/*` - feed pages, post edits, reactions
/// - `/api/v1/health`, `/metrics` - operations
///
/// Post and user state live only in memory and are lost on restart.
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match post_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting post-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let policy = ReactionPolicy::from_flag(config.api.exclusive_reactions);
    let post_store = Arc::new(InMemoryPostStore::with_policy(policy));
    let user_directory = Arc::new(UserDirectory::new());
    tracing::info!(
        result_size = config.api.result_size,
        reaction_policy = ?post_store.policy(),
        "In-memory stores initialized"
    );

    let store: Arc<dyn PostStore> = post_store.clone();
    let post_service = web::Data::new(PostService::new(
        store,
        user_directory.clone(),
        config.api.result_size,
    ));
    let users_data = web::Data::from(user_directory);
    let tokens_data = web::Data::new(TokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
    ));
    let health_state = web::Data::new(HealthState { store: post_store });

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(post_service.clone())
            .app_data(users_data.clone())
            .app_data(tokens_data.clone())
            .app_data(health_state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(post_service::metrics::serve_metrics),
            )
            // Health check endpoints
            .route("/api/v1/health", web::get().to(health_summary))
            .route("/api/v1/health/live", web::get().to(liveness_check))
            .configure(handlers::configure)
    })
    .bind(&http_bind_address)?
    .disable_signals()
    .run();

    let server_handle = server.handle();

    tokio::select! {
        result = server => {
            if let Err(e) = &result {
                tracing::error!("HTTP server exited with error: {}", e);
            }
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
        }
    }

    tracing::info!("Post-service shutting down");
    Ok(())
}
