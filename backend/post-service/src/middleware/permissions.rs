/// Authorization checks for post-service
///
/// Only the owner of a post may edit its content. Deletion is filtered by
/// owner inside the store and never reports a violation.
use crate::error::{AppError, Result};
use crate::models::Post;

/// Check if a user owns a post
pub fn check_post_ownership(user_id: i64, post: &Post) -> Result<()> {
    if post.owner_id == user_id {
        Ok(())
    } else {
        Err(AppError::InvalidOwner(format!(
            "user {} does not own post {}",
            user_id, post.id
        )))
    }
}

/// Verify user has access to update a post
pub fn check_post_update(user_id: i64, post: &Post) -> Result<()> {
    check_post_ownership(user_id, post)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_may_update() {
        let post = Post::new(1, None);
        assert!(check_post_update(1, &post).is_ok());
    }

    #[test]
    fn test_other_user_is_invalid_owner() {
        let post = Post::new(1, None);
        assert!(matches!(
            check_post_update(2, &post),
            Err(AppError::InvalidOwner(_))
        ));
    }
}
