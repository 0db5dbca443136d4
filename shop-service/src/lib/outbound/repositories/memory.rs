use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::Page;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;

/// Credential store kept in process memory.
///
/// Used when no database is configured and by the integration tests.
/// Enforces the same username and email uniqueness as the database schema.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, bypassing uniqueness checks.
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }
}

fn conflict(users: &[User], candidate: &User) -> Option<UserError> {
    let others = users.iter().filter(|u| u.id != candidate.id);

    for other in others {
        if other.username == candidate.username {
            return Some(UserError::UsernameAlreadyExists(
                candidate.username.to_string(),
            ));
        }
        if other.email == candidate.email {
            return Some(UserError::EmailAlreadyExists(candidate.email.to_string()));
        }
    }

    None
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if let Some(err) = conflict(&users, &user) {
            return Err(err);
        }

        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == *username).cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, UserError> {
        let users = self.users.read().await;

        let items = users
            .iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            page_number: page.page_number,
            page_size: page.page_size,
            total_items: users.len() as u64,
        })
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if let Some(err) = conflict(&users, &user) {
            return Err(err);
        }

        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| UserError::NotFound(user.id.to_string()))?;
        *slot = user.clone();

        Ok(user)
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut users = self.users.write().await;

        let index = users
            .iter()
            .position(|u| u.id == *id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        users.remove(index);

        Ok(())
    }
}
