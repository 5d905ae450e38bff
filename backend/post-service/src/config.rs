/// Configuration management for Post Service
///
/// Loads configuration from environment variables (and a `.env` file when
/// present). Everything the service needs at startup is resolved here and
/// handed to the composition root; nothing is seeded implicitly.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Feed API configuration
    pub api: ApiConfig,
    /// Token configuration
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Feed API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Upper bound on entries in every paginated response
    pub result_size: usize,
    /// A like retracts the same user's dislike and vice versa
    pub exclusive_reactions: bool,
}

/// Token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify access tokens
    pub jwt_secret: String,
    /// Access token lifetime
    pub token_ttl_secs: i64,
}

const DEV_JWT_SECRET: &str = "post-service-development-secret";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // A missing .env file is fine; real deployments inject env vars.
        let _ = dotenvy::dotenv();

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("POST_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("POST_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            api: ApiConfig {
                result_size: parse_result_size(std::env::var("API_RESULT_SIZE").ok())?,
                exclusive_reactions: parse_flag(std::env::var("REACTIONS_EXCLUSIVE").ok()),
            },
            auth: AuthConfig {
                jwt_secret: match std::env::var("JWT_SECRET") {
                    Ok(secret) if !secret.trim().is_empty() => secret,
                    _ if production => {
                        return Err("JWT_SECRET must be set in production".to_string())
                    }
                    _ => DEV_JWT_SECRET.to_string(),
                },
                token_ttl_secs: std::env::var("JWT_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_token_ttl_secs),
            },
        })
    }
}

fn parse_result_size(raw: Option<String>) -> Result<usize, String> {
    let Some(raw) = raw else {
        return Ok(default_result_size());
    };

    match raw.trim().parse::<usize>() {
        Ok(0) => Err("API_RESULT_SIZE must be a positive integer".to_string()),
        Ok(size) => Ok(size),
        Err(e) => Err(format!("Failed to parse API_RESULT_SIZE='{}': {}", raw, e)),
    }
}

fn parse_flag(raw: Option<String>) -> bool {
    matches!(
        raw.as_deref().map(str::trim),
        Some("1") | Some("true") | Some("TRUE") | Some("yes")
    )
}

fn default_result_size() -> usize {
    20
}

fn default_token_ttl_secs() -> i64 {
    86_400
}
