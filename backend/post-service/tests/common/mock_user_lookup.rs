//! Mock UserLookup for Integration Tests
//!
//! Serves a fixed set of user identities and counts batch lookups so tests
//! can verify that a feed read resolves its users in one call.

use async_trait::async_trait;
use post_service::error::{AppError, Result};
use post_service::models::UserIdentity;
use post_service::services::UserLookup;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock user directory keyed by user id
#[derive(Clone)]
pub struct MockUserLookup {
    /// Simulated users: user_id -> identity
    users: Arc<Mutex<HashMap<i64, UserIdentity>>>,
    /// Number of get_by_ids calls, for N+1 verification
    batch_call_count: Arc<Mutex<usize>>,
}

impl MockUserLookup {
    /// Create mock lookup with `(id, username)` pairs
    pub fn new(users: Vec<(i64, &str)>) -> Self {
        let users = users
            .into_iter()
            .map(|(id, name)| {
                (
                    id,
                    UserIdentity {
                        id,
                        username: name.to_string(),
                        avatar: None,
                        is_read_only: false,
                    },
                )
            })
            .collect();

        Self {
            users: Arc::new(Mutex::new(users)),
            batch_call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn get_batch_call_count(&self) -> usize {
        *self.batch_call_count.lock().unwrap()
    }

    pub fn reset_batch_call_count(&self) {
        *self.batch_call_count.lock().unwrap() = 0;
    }
}

#[async_trait]
impl UserLookup for MockUserLookup {
    async fn get_by_id(&self, id: i64) -> Result<UserIdentity> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<UserIdentity>> {
        {
            let mut count = self.batch_call_count.lock().unwrap();
            *count += 1;
        }

        let users = self.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}
