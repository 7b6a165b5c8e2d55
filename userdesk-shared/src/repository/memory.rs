/// In-memory user repository
///
/// Keeps users in a process-local map. It honours the same contract as the
/// PostgreSQL backend (sequential IDs starting at 1, case-insensitive email
/// uniqueness, ID ordering) so the service and HTTP layers can be exercised
/// without external dependencies.

use super::{page_offset, RepositoryError, RepositoryResult, UserRepository};
use crate::models::user::{normalize_email, CreateUser, UpdateUser, User, UserStatus};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    users: BTreeMap<i64, User>,
}

impl Store {
    fn email_owner(&self, email: &str) -> Option<i64> {
        self.users
            .values()
            .find(|u| u.email == email)
            .map(|u| u.id)
    }

    fn get_mut(&mut self, id: i64) -> RepositoryResult<&mut User> {
        self.users.get_mut(&id).ok_or(RepositoryError::NotFound(id))
    }
}

/// Process-local [`UserRepository`]
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Store>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn set_status(
        &self,
        id: i64,
        status: UserStatus,
        from: &[UserStatus],
    ) -> RepositoryResult<User> {
        let mut store = self.store.write().await;
        let user = store.get_mut(id)?;
        if !from.contains(&user.status) {
            return Err(RepositoryError::StatusConflict {
                id,
                status: user.status,
            });
        }
        user.status = status;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_user_list(&self, page: u32, limit: u32) -> RepositoryResult<(Vec<User>, i64)> {
        let store = self.store.read().await;
        let offset = usize::try_from(page_offset(page, limit)).unwrap_or(usize::MAX);

        let users = store
            .users
            .values()
            .skip(offset)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok((users, store.users.len() as i64))
    }

    async fn get_user_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn create_user(&self, data: CreateUser) -> RepositoryResult<User> {
        let email = normalize_email(&data.email);
        let mut store = self.store.write().await;

        if store.email_owner(&email).is_some() {
            return Err(RepositoryError::DuplicateEmail(email));
        }

        store.next_id += 1;
        let now = Utc::now();
        let user = User {
            id: store.next_id,
            name: data.name,
            surname: data.surname,
            email,
            phone: data.phone,
            password_hash: data.password_hash,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };

        store.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn suspend_user_by_id(&self, id: i64, from: &[UserStatus]) -> RepositoryResult<User> {
        self.set_status(id, UserStatus::Suspended, from).await
    }

    async fn deactivate_user_by_id(
        &self,
        id: i64,
        from: &[UserStatus],
    ) -> RepositoryResult<User> {
        self.set_status(id, UserStatus::Deactivated, from).await
    }

    async fn activate_user_by_id(&self, id: i64, from: &[UserStatus]) -> RepositoryResult<User> {
        self.set_status(id, UserStatus::Active, from).await
    }

    async fn update_user(&self, id: i64, data: UpdateUser) -> RepositoryResult<User> {
        let email = normalize_email(&data.email);
        let mut store = self.store.write().await;

        if !store.users.contains_key(&id) {
            return Err(RepositoryError::NotFound(id));
        }
        if store.email_owner(&email).map_or(false, |owner| owner != id) {
            return Err(RepositoryError::DuplicateEmail(email));
        }

        let user = store.get_mut(id)?;
        user.name = data.name;
        user.surname = data.surname;
        user.email = email;
        user.phone = data.phone;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> RepositoryResult<()> {
        let mut store = self.store.write().await;
        let user = store.get_mut(id)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn check_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let email = normalize_email(email);
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.email == email).cloned())
    }

    async fn ping(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
