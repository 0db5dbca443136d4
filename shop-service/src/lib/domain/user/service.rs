use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::passwords::BlockingHasher;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Page;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

/// Domain service implementation for user administration.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    hasher: BlockingHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `hasher` - Password hasher shared with the sign-in flows
    pub fn new(repository: Arc<UR>, hasher: BlockingHasher) -> Self {
        Self { repository, hasher }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.hasher.hash(&command.password).await?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            role: command.role,
            is_active: true,
            created_at: Utc::now(),
        };

        let created = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created.id,
            username = %created.username,
            role = %created.role,
            "User created"
        );

        Ok(created)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self, page: PageRequest) -> Result<Page<User>, UserError> {
        self.repository.list(page).await
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(email) = command.email {
            user.email = email;
        }

        if let Some(role) = command.role {
            user.role = role;
        }

        if let Some(is_active) = command.is_active {
            user.is_active = is_active;
        }

        if let Some(password) = command.password {
            user.password_hash = self.hasher.hash(&password).await?;
        }

        let updated = self.repository.update(user).await?;
        tracing::info!(
            user_id = %updated.id,
            role = %updated.role,
            is_active = updated.is_active,
            "User updated"
        );

        Ok(updated)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use auth::Role;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Password;
    use crate::domain::user::models::Username;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn list(&self, page: PageRequest) -> Result<Page<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    pub(crate) fn test_user(username: &str, password_hash: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(format!("{}@example.com", username)).unwrap(),
            password_hash: password_hash.to_string(),
            role: Role::User,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn service(repository: MockTestUserRepository) -> UserService<MockTestUserRepository> {
        UserService::new(Arc::new(repository), BlockingHasher::default())
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "manager"
                    && user.email.as_str() == "manager@example.com"
                    && user.role == Role::Admin
                    && user.is_active
                    && user.password_hash.starts_with("$argon2id$")
            })
            .times(1)
            .returning(|user| Ok(user));

        let command = CreateUserCommand::new(
            Username::new("manager".to_string()).unwrap(),
            EmailAddress::new("manager@example.com".to_string()).unwrap(),
            Password::new("password123".to_string()).unwrap(),
            Role::Admin,
        );

        let user = service(repository).create_user(command).await.unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_ne!(user.password_hash, "password123");
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_create().times(1).returning(|user| {
            Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()))
        });

        let command = CreateUserCommand::new(
            Username::new("user2".to_string()).unwrap(),
            EmailAddress::new("test@example.com".to_string()).unwrap(),
            Password::new("password456".to_string()).unwrap(),
            Role::User,
        );

        let result = service(repository).create_user(command).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repository = MockTestUserRepository::new();
        let expected = test_user("testuser", "$argon2id$test_hash");
        let user_id = expected.id;

        let returned = expected.clone();
        repository
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let user = service(repository).get_user(&user_id).await.unwrap();
        assert_eq!(user, expected);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(repository).get_user(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_users_passes_page_through() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_list()
            .withf(|page| page.page_number == 2 && page.page_size == 5)
            .times(1)
            .returning(|page| {
                Ok(Page {
                    items: vec![test_user("alice", "$argon2id$a")],
                    page_number: page.page_number,
                    page_size: page.page_size,
                    total_items: 6,
                })
            });

        let page = service(repository)
            .list_users(PageRequest::new(Some(2), Some(5)))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages(), 2);
        assert!(!page.has_next_page());
    }

    #[tokio::test]
    async fn test_update_user_partial() {
        let mut repository = MockTestUserRepository::new();
        let existing = test_user("alice", "$argon2id$original");
        let user_id = existing.id;

        let returned = existing.clone();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        repository
            .expect_update()
            .withf(|user| {
                user.username.as_str() == "alice"
                    && user.email.as_str() == "alice@example.com"
                    && user.role == Role::Admin
                    && !user.is_active
                    && user.password_hash == "$argon2id$original"
            })
            .times(1)
            .returning(|user| Ok(user));

        let command = UpdateUserCommand {
            role: Some(Role::Admin),
            is_active: Some(false),
            ..UpdateUserCommand::default()
        };

        let updated = service(repository)
            .update_user(&user_id, command)
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_update_user_rehashes_password() {
        let mut repository = MockTestUserRepository::new();
        let existing = test_user("alice", "$argon2id$original");
        let user_id = existing.id;

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));

        repository
            .expect_update()
            .withf(|user| {
                user.password_hash != "$argon2id$original"
                    && user.password_hash.starts_with("$argon2id$")
            })
            .times(1)
            .returning(|user| Ok(user));

        let command = UpdateUserCommand {
            password: Some(Password::new("new_password".to_string()).unwrap()),
            ..UpdateUserCommand::default()
        };

        let updated = service(repository)
            .update_user(&user_id, command)
            .await
            .unwrap();

        let hasher = BlockingHasher::default();
        assert!(hasher.verify("new_password", &updated.password_hash).await);
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_update().times(0);

        let result = service(repository)
            .update_user(&UserId::new(), UpdateUserCommand::default())
            .await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_delete()
            .times(1)
            .returning(|id| Err(UserError::NotFound(id.to_string())));

        let result = service(repository).delete_user(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
