/// Business logic layer for post-service
///
/// This module provides:
/// - Post service: feed assembly, post creation/editing, reactions
/// - User lookup: the seam through which owners and reactors are resolved
pub mod posts;
pub mod users;

// Re-export commonly used services
pub use posts::PostService;
pub use users::UserLookup;
