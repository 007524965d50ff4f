//! Process-local [`UserRepository`] for tests and database-less development.
//!
//! Uniqueness is checked and the row inserted under one mutex acquisition,
//! giving the same single-winner guarantee as the database constraints.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    UniqueUserColumn, UserInsertError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    EmailAddress, NewUser, ProfileImageUrl, StoredUser, User, UserDraft, UserId, Username,
};

#[derive(Default)]
struct Tables {
    rows: HashMap<UserId, StoredUser>,
    by_username: HashMap<String, UserId>,
    by_email: HashMap<String, UserId>,
}

impl Tables {
    fn lookup(&self, index: &HashMap<String, UserId>, key: &str) -> Option<StoredUser> {
        index.get(key).and_then(|id| self.rows.get(id)).cloned()
    }
}

/// Mutex-guarded user table with username and email indexes.
pub struct InMemoryUserRepository {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock,
        }
    }

    /// Number of stored users.
    pub fn len(&self) -> Result<usize, UserPersistenceError> {
        Ok(self.lock()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, UserPersistenceError> {
        Ok(self.len()? == 0)
    }

    /// Remove a user and its index entries. Returns whether a row existed.
    pub fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut tables = self.lock()?;
        let Some(stored) = tables.rows.remove(id) else {
            return Ok(false);
        };
        tables.by_username.remove(stored.user.username().as_ref());
        tables.by_email.remove(stored.user.email().as_ref());
        Ok(true)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, UserPersistenceError> {
        self.tables
            .lock()
            .map_err(|_| UserPersistenceError::query("user table poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, new_user: &NewUser) -> Result<User, UserInsertError> {
        let created_at = self.clock.utc();
        let mut tables = self.lock()?;

        let mut conflicts = Vec::new();
        if tables.by_username.contains_key(new_user.username.as_ref()) {
            conflicts.push(UniqueUserColumn::Username);
        }
        if tables.by_email.contains_key(new_user.email.as_ref()) {
            conflicts.push(UniqueUserColumn::Email);
        }
        if !conflicts.is_empty() {
            return Err(UserInsertError::unique_violation(conflicts));
        }
        if tables.rows.contains_key(&new_user.id) {
            return Err(UserInsertError::unique_violation([]));
        }

        let user = User::new(UserDraft {
            id: new_user.id,
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            display_name: new_user.display_name.clone(),
            profile_image: None,
            created_at,
        });
        tables
            .by_username
            .insert(new_user.username.as_ref().to_owned(), new_user.id);
        tables
            .by_email
            .insert(new_user.email.as_ref().to_owned(), new_user.id);
        tables.rows.insert(
            new_user.id,
            StoredUser {
                user: user.clone(),
                password_hash: new_user.password_hash.clone(),
            },
        );
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.rows.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let tables = self.lock()?;
        Ok(tables.lookup(&tables.by_username, username.as_ref()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let tables = self.lock()?;
        Ok(tables.lookup(&tables.by_email, email.as_ref()))
    }

    async fn update_profile_image(
        &self,
        id: &UserId,
        url: &ProfileImageUrl,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut tables = self.lock()?;
        let Some(stored) = tables.rows.get_mut(id) else {
            return Ok(None);
        };
        stored.user = stored.user.clone().with_profile_image(url.clone());
        Ok(Some(stored.user.clone()))
    }
}
