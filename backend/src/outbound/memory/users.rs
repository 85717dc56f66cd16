//! In-memory `UserRepository`.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, User, UserId};

/// Users kept in registration order.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn email_taken(users: &[User], email: &Email, except: Option<&UserId>) -> bool {
    users
        .iter()
        .any(|user| &user.email == email && Some(&user.id) != except)
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.lock().await;
        if email_taken(&users, &user.email, None) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|user| &user.id == id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|user| &user.email == email).cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.users.lock().await.clone())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut users = self.users.lock().await;
        if email_taken(&users, &user.email, Some(&user.id)) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        let Some(slot) = users.iter_mut().find(|stored| stored.id == user.id) else {
            return Ok(false);
        };
        *slot = user.clone();
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut users = self.users.lock().await;
        let before = users.len();
        users.retain(|user| &user.id != id);
        Ok(users.len() != before)
    }
}
