/// In-memory user directory
///
/// Same shape as the post store: one map behind one async mutex. Password
/// hashing and verification run outside the lock.
use crate::error::{AppError, Result};
use crate::models::{Attachment, UserIdentity};
use crate::security::{hash_password, verify_password};
use crate::services::users::UserLookup;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::Mutex;

struct UserAccount {
    id: i64,
    username: String,
    password_hash: String,
    avatar: Option<Attachment>,
    is_read_only: bool,
}

impl UserAccount {
    fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id,
            username: self.username.clone(),
            avatar: self.avatar.clone(),
            is_read_only: self.is_read_only,
        }
    }
}

#[derive(Default)]
struct UserTable {
    last_id: i64,
    items: BTreeMap<i64, UserAccount>,
    by_username: HashMap<String, i64>,
}

#[derive(Default)]
pub struct UserDirectory {
    table: Mutex<UserTable>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account; usernames are unique
    pub async fn register(&self, username: &str, password: &str) -> Result<UserIdentity> {
        let password_hash = hash_password(password)?;

        let mut table = self.table.lock().await;
        if table.by_username.contains_key(username) {
            return Err(AppError::Conflict(format!(
                "username '{}' is already taken",
                username
            )));
        }

        table.last_id += 1;
        let account = UserAccount {
            id: table.last_id,
            username: username.to_string(),
            password_hash,
            avatar: None,
            is_read_only: false,
        };
        let identity = account.identity();
        table.by_username.insert(account.username.clone(), account.id);
        table.items.insert(account.id, account);

        Ok(identity)
    }

    /// Check credentials and return the matching user
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<UserIdentity> {
        let (identity, password_hash) = {
            let table = self.table.lock().await;
            table
                .by_username
                .get(username)
                .and_then(|id| table.items.get(id))
                .map(|account| (account.identity(), account.password_hash.clone()))
                .ok_or_else(|| AppError::Unauthorized("Wrong username or password".to_string()))?
        };

        if verify_password(password, &password_hash)? {
            Ok(identity)
        } else {
            Err(AppError::Unauthorized(
                "Wrong username or password".to_string(),
            ))
        }
    }

    pub async fn set_avatar(&self, user_id: i64, avatar: Attachment) -> Result<UserIdentity> {
        let mut table = self.table.lock().await;
        let account = table
            .items
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
        account.avatar = Some(avatar);
        Ok(account.identity())
    }
}

#[async_trait]
impl UserLookup for UserDirectory {
    async fn get_by_id(&self, id: i64) -> Result<UserIdentity> {
        let table = self.table.lock().await;
        table
            .items
            .get(&id)
            .map(UserAccount::identity)
            .ok_or_else(|| AppError::NotFound(format!("user {}", id)))
    }

    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<UserIdentity>> {
        let table = self.table.lock().await;
        let mut seen = BTreeSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| table.items.get(id).map(UserAccount::identity))
            .collect())
    }
}
