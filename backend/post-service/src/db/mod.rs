/// Storage layer
///
/// This module provides:
/// - The post store trait and its single-lock in-memory implementation
/// - The in-memory user directory backing `UserLookup`
pub mod post_repo;
pub mod user_repo;

pub use post_repo::{InMemoryPostStore, PostStore, ReactionPolicy};
pub use user_repo::UserDirectory;
