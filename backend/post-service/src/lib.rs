/// Post Service Library
///
/// Social feed backend for the Nova platform: users publish posts, react to
/// them, and read cursor-paginated feeds personalized for the viewer.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and the `/api/v1` route table
/// - `models`: Posts, reactions, user identities and request/response payloads
/// - `services`: Feed assembly and the `UserLookup` seam
/// - `db`: In-memory post store and user directory
/// - `security`: Password hashing and access tokens
/// - `middleware`: Authentication, ownership checks, request metrics
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
