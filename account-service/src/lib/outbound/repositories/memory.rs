use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store.
///
/// Enforces the same uniqueness rules as the Postgres schema; the write lock
/// makes check-and-insert atomic. Used by tests and local runs without a
/// database.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict(existing: &User, candidate: &User) -> Option<UserError> {
    if existing.id == candidate.id {
        return None;
    }
    if existing.username == candidate.username {
        return Some(UserError::UsernameAlreadyExists(
            candidate.username.to_string(),
        ));
    }
    if existing.email == candidate.email {
        return Some(UserError::EmailAlreadyExists(candidate.email.to_string()));
    }
    None
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if let Some(err) = users.values().find_map(|existing| conflict(existing, &user)) {
            return Err(err);
        }
        if users.contains_key(&user.id) {
            return Err(UserError::DatabaseError(format!(
                "duplicate user id {}",
                user.id
            )));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.username.as_str() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        if let Some(err) = users.values().find_map(|existing| conflict(existing, &user)) {
            return Err(err);
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::PersonName;
    use crate::domain::user::models::Username;

    fn user(username: &str, email: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            firstname: PersonName::new("Test".to_string()).unwrap(),
            lastname: PersonName::new("User".to_string()).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            date_joined: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repository = InMemoryUserRepository::new();
        let created = repository
            .create(user("alice", "alice@example.com"))
            .await
            .unwrap();

        let by_id = repository.find_by_id(&created.id).await.unwrap();
        let by_username = repository.find_by_username("alice").await.unwrap();
        let by_email = repository.find_by_email("alice@example.com").await.unwrap();

        assert_eq!(by_id, Some(created.clone()));
        assert_eq!(by_username, Some(created.clone()));
        assert_eq!(by_email, Some(created));
    }

    #[tokio::test]
    async fn test_lookups_are_case_sensitive() {
        let repository = InMemoryUserRepository::new();
        repository
            .create(user("alice", "alice@example.com"))
            .await
            .unwrap();

        assert_eq!(repository.find_by_username("Alice").await.unwrap(), None);
        assert_eq!(
            repository.find_by_email("ALICE@example.com").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates() {
        let repository = InMemoryUserRepository::new();
        repository
            .create(user("alice", "alice@example.com"))
            .await
            .unwrap();

        let same_username = repository.create(user("alice", "other@example.com")).await;
        let same_email = repository.create(user("bob", "alice@example.com")).await;

        assert!(matches!(
            same_username,
            Err(UserError::UsernameAlreadyExists(_))
        ));
        assert!(matches!(same_email, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update() {
        let repository = InMemoryUserRepository::new();
        let mut created = repository
            .create(user("alice", "alice@example.com"))
            .await
            .unwrap();

        created.password_hash = "$argon2id$new_hash".to_string();
        repository.update(created.clone()).await.unwrap();

        let stored = repository.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "$argon2id$new_hash");

        let missing = repository.update(user("bob", "bob@example.com")).await;
        assert!(matches!(missing, Err(UserError::NotFound(_))));
    }
}
